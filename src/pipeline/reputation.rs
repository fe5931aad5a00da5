use crate::lexicon::{defaults, TermList};
use crate::models::{Signal, SignalSource, TrustTier, Verdict};
use crate::pipeline::traits::DomainReputation;

pub const KNOWN_FAKE_CONFIDENCE: f32 = 0.92;
pub const TRUSTED_CONFIDENCE: f32 = 0.93;

/// In-memory domain lists. All matching is substring over lower-cased text.
#[derive(Debug, Clone)]
pub struct DomainTable {
    fact_checkers: TermList,
    authoritative: TermList,
    known_fake: TermList,
    trusted: TermList,
}

impl DomainTable {
    pub fn new(
        fact_checkers: TermList,
        authoritative: TermList,
        known_fake: TermList,
        trusted: TermList,
    ) -> Self {
        Self {
            fact_checkers,
            authoritative,
            known_fake,
            trusted,
        }
    }
}

impl Default for DomainTable {
    fn default() -> Self {
        Self::new(
            TermList::from_lines(defaults::FACT_CHECKER_MARKERS.iter().copied()),
            TermList::from_lines(defaults::AUTHORITATIVE_MARKERS.iter().copied()),
            TermList::from_lines(defaults::KNOWN_FAKE_DOMAINS.iter().copied()),
            TermList::from_lines(defaults::TRUSTED_DOMAINS.iter().copied()),
        )
    }
}

impl DomainReputation for DomainTable {
    fn trust_tier(&self, url: &str) -> TrustTier {
        let url = url.to_lowercase();
        if self.fact_checkers.any_in(&url) {
            TrustTier::FactChecker
        } else if self.authoritative.any_in(&url) {
            TrustTier::Authoritative
        } else {
            TrustTier::Unclassified
        }
    }

    fn lookup(&self, host: &str) -> Option<Signal> {
        let host = host.to_lowercase();
        if let Some(domain) = self.known_fake.first_in(&host) {
            return Some(Signal::new(
                SignalSource::DomainReputation,
                Verdict::Fake,
                KNOWN_FAKE_CONFIDENCE,
                format!("{domain} is a known misinformation source"),
            ));
        }
        if let Some(domain) = self.trusted.first_in(&host) {
            return Some(Signal::new(
                SignalSource::DomainReputation,
                Verdict::Real,
                TRUSTED_CONFIDENCE,
                format!("{domain} is a trusted news or reference source"),
            ));
        }
        None
    }
}
