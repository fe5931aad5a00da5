use crate::lexicon::{Lexicons, TermList};
use crate::models::{EvidenceItem, TrustTier, Verdict, WebVerdict};
use tracing::debug;

const FACT_CHECKER_CONFIDENCE: f32 = 0.95;
const STRONG_BASE: f32 = 0.80;
const STRONG_STEP: f32 = 0.02;
const STRONG_CAP: f32 = 0.15;
const MODERATE_CONFIDENCE: f32 = 0.65;

/// One label must outweigh the other by this factor to count as consensus.
pub const CONSENSUS_RATIO: f32 = 1.2;
const CONSENSUS_BASE: f32 = 0.70;
const CONSENSUS_SPAN: f32 = 0.25;
const CONSENSUS_CAP: f32 = 0.95;
const WEIGHT_EPSILON: f32 = 0.01;
pub const MIXED_CONFIDENCE: f32 = 0.60;
pub const MIXED_REASONING: &str = "sources show mixed evidence";

const TITLE_CHARS: usize = 50;

/// Lexicon hits for a single evidence item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TermCounts {
    pub debunk: usize,
    pub support: usize,
}

/// A single item's FAKE/REAL opinion.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemVote {
    pub verdict: Verdict,
    pub confidence: f32,
    pub rationale: String,
}

impl ItemVote {
    pub fn new(verdict: Verdict, confidence: f32, rationale: impl Into<String>) -> Self {
        Self {
            verdict,
            confidence,
            rationale: rationale.into(),
        }
    }
}

/// Turns a batch of web results into one weighted FAKE/REAL vote.
#[derive(Debug, Clone)]
pub struct EvidenceScorer {
    debunk: TermList,
    support: TermList,
}

impl EvidenceScorer {
    pub fn new(debunk: TermList, support: TermList) -> Self {
        Self { debunk, support }
    }

    pub fn from_lexicons(lex: &Lexicons) -> Self {
        Self::new(lex.debunk.clone(), lex.support.clone())
    }

    pub fn count(&self, item: &EvidenceItem) -> TermCounts {
        let text = item.scan_text();
        TermCounts {
            debunk: self.debunk.count_present(&text),
            support: self.support.count_present(&text),
        }
    }

    /// Per-item rule, first match wins. A fact-checker page with no lexicon
    /// hits either way casts no vote.
    pub fn score_item(&self, item: &EvidenceItem) -> Option<ItemVote> {
        let TermCounts { debunk, support } = self.count(item);
        let title: String = item.title.chars().take(TITLE_CHARS).collect();
        let fact_checker = item.trust_tier == TrustTier::FactChecker;
        let authoritative = item.trust_tier == TrustTier::Authoritative;

        if fact_checker && debunk > 0 {
            return Some(ItemVote::new(
                Verdict::Fake,
                FACT_CHECKER_CONFIDENCE,
                format!("Fact-checker debunked: {title}"),
            ));
        }
        if fact_checker && support > debunk {
            return Some(ItemVote::new(
                Verdict::Real,
                FACT_CHECKER_CONFIDENCE,
                format!("Fact-checker verified: {title}"),
            ));
        }
        if debunk > support * 2 {
            return Some(ItemVote::new(
                Verdict::Fake,
                strong_confidence(debunk),
                format!("Debunked by: {title}"),
            ));
        }
        if support > debunk * 2 && authoritative {
            return Some(ItemVote::new(
                Verdict::Real,
                strong_confidence(support),
                format!("Confirmed by: {title}"),
            ));
        }
        if support > debunk {
            return Some(ItemVote::new(
                Verdict::Real,
                MODERATE_CONFIDENCE,
                format!("Supported by: {title}"),
            ));
        }
        if debunk > support {
            return Some(ItemVote::new(
                Verdict::Fake,
                MODERATE_CONFIDENCE,
                format!("Questioned by: {title}"),
            ));
        }
        None
    }

    /// `None` when no item cast a vote.
    pub fn score(&self, items: &[EvidenceItem]) -> Option<WebVerdict> {
        let votes: Vec<ItemVote> = items.iter().filter_map(|i| self.score_item(i)).collect();
        debug!(items = items.len(), votes = votes.len(), "scored web evidence");
        aggregate(&votes)
    }
}

fn strong_confidence(hits: usize) -> f32 {
    STRONG_BASE + (hits as f32 * STRONG_STEP).min(STRONG_CAP)
}

/// Confidence-weighted vote across items.
pub fn aggregate(votes: &[ItemVote]) -> Option<WebVerdict> {
    if votes.is_empty() {
        return None;
    }
    let weight_of = |label: Verdict| -> f32 {
        votes
            .iter()
            .filter(|v| v.verdict == label)
            .map(|v| v.confidence)
            .sum()
    };
    let fake_weight = weight_of(Verdict::Fake);
    let real_weight = weight_of(Verdict::Real);
    debug!(fake_weight, real_weight, "web evidence weights");

    let first_reason = |label: Verdict| {
        votes
            .iter()
            .find(|v| v.verdict == label)
            .map(|v| v.rationale.clone())
            .unwrap_or_default()
    };
    let consensus = |winning: f32| {
        (CONSENSUS_BASE + winning / (fake_weight + real_weight + WEIGHT_EPSILON) * CONSENSUS_SPAN)
            .min(CONSENSUS_CAP)
    };

    let verdict = if fake_weight > real_weight * CONSENSUS_RATIO {
        WebVerdict {
            verdict: Verdict::Fake,
            confidence: consensus(fake_weight),
            reasoning: first_reason(Verdict::Fake),
        }
    } else if real_weight > fake_weight * CONSENSUS_RATIO {
        WebVerdict {
            verdict: Verdict::Real,
            confidence: consensus(real_weight),
            reasoning: first_reason(Verdict::Real),
        }
    } else {
        WebVerdict {
            verdict: Verdict::from_is_fake(fake_weight > real_weight),
            confidence: MIXED_CONFIDENCE,
            reasoning: MIXED_REASONING.to_string(),
        }
    };
    Some(verdict)
}
