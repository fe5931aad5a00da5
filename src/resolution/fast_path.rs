use crate::lexicon::{Lexicons, PatternTable};
use crate::models::{Signal, SignalSource, Verdict};
use tracing::debug;

pub const FAST_PATH_CONFIDENCE: f32 = 0.95;
pub const DEBUNKED_RATIONALE: &str = "well-known debunked claim";
pub const BASIC_FACT_RATIONALE: &str = "verified basic fact";

/// Lexical lookup against curated known-false / known-true rule tables.
#[derive(Debug, Clone)]
pub struct FastPathMatcher {
    known_false: PatternTable,
    known_true: PatternTable,
}

impl FastPathMatcher {
    pub fn new(known_false: PatternTable, known_true: PatternTable) -> Self {
        Self {
            known_false,
            known_true,
        }
    }

    pub fn from_lexicons(lex: &Lexicons) -> Self {
        Self::new(lex.fast_path_fake.clone(), lex.fast_path_real.clone())
    }

    /// Known-false rules are checked before known-true ones. `None` is the
    /// common case and means "run the full pipeline".
    pub fn matches(&self, claim: &str) -> Option<Signal> {
        let text = claim.to_lowercase();
        if let Some(rule) = self.known_false.first_match(&text) {
            debug!(%rule, "fast path: known-false rule");
            return Some(Signal::new(
                SignalSource::FastPath,
                Verdict::Fake,
                FAST_PATH_CONFIDENCE,
                DEBUNKED_RATIONALE,
            ));
        }
        if let Some(rule) = self.known_true.first_match(&text) {
            debug!(%rule, "fast path: known-true rule");
            return Some(Signal::new(
                SignalSource::FastPath,
                Verdict::Real,
                FAST_PATH_CONFIDENCE,
                BASIC_FACT_RATIONALE,
            ));
        }
        None
    }
}

impl Default for FastPathMatcher {
    fn default() -> Self {
        Self::from_lexicons(&Lexicons::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debunked_claims_are_fake() {
        let m = FastPathMatcher::default();
        for claim in [
            "Vaccines cause autism",
            "The earth is flat",
            "5G towers spread COVID",
            "The moon landing was faked",
            "Climate change is a hoax",
            "Drinking bleach cures the flu",
        ] {
            let s = m.matches(claim).unwrap_or_else(|| panic!("no match for {claim}"));
            assert_eq!(s.verdict(), Verdict::Fake, "{claim}");
            assert_eq!(s.confidence(), FAST_PATH_CONFIDENCE);
            assert_eq!(s.rationale(), DEBUNKED_RATIONALE);
            assert_eq!(s.source(), SignalSource::FastPath);
        }
    }

    #[test]
    fn basic_facts_are_real() {
        let m = FastPathMatcher::default();
        for claim in [
            "Water is H2O",
            "The Earth orbits the Sun",
            "Paris is the capital of France",
            "Humans need oxygen to live",
        ] {
            let s = m.matches(claim).unwrap_or_else(|| panic!("no match for {claim}"));
            assert_eq!(s.verdict(), Verdict::Real, "{claim}");
            assert_eq!(s.rationale(), BASIC_FACT_RATIONALE);
        }
    }

    #[test]
    fn known_false_wins_over_known_true() {
        // "earth" + "round" is a basic fact, "flat earth" is checked first.
        let m = FastPathMatcher::default();
        let s = m.matches("flat earth folks say the earth is not round").unwrap();
        assert_eq!(s.verdict(), Verdict::Fake);
    }

    #[test]
    fn ordinary_claims_fall_through() {
        let m = FastPathMatcher::default();
        assert!(m.matches("The central bank raised rates by 25 basis points").is_none());
        assert!(m.matches("").is_none());
    }

    #[test]
    fn matching_is_repeatable() {
        let m = FastPathMatcher::default();
        assert_eq!(m.matches("Vaccines cause autism"), m.matches("Vaccines cause autism"));
    }
}
