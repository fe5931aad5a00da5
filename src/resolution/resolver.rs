use crate::models::{Signal, SignalSource, Verdict, VerdictResult, WebVerdict};
use crate::resolution::fast_path::FastPathMatcher;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Verdict used when every signal failed or was unavailable.
///
/// This is a product decision that biases toward over-flagging. It is kept as
/// data so it can be revisited without touching the priority chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConservativeDefault {
    pub verdict: Verdict,
    pub confidence: f32,
    pub reasoning: String,
}

pub const CONSERVATIVE_DEFAULT_VERDICT: Verdict = Verdict::Fake;
pub const CONSERVATIVE_DEFAULT_CONFIDENCE: f32 = 0.50;
pub const CONSERVATIVE_DEFAULT_REASONING: &str = "insufficient data from all sources";

impl Default for ConservativeDefault {
    fn default() -> Self {
        Self {
            verdict: CONSERVATIVE_DEFAULT_VERDICT,
            confidence: CONSERVATIVE_DEFAULT_CONFIDENCE,
            reasoning: CONSERVATIVE_DEFAULT_REASONING.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Multiplier applied to a fallback classifier's confidence.
    pub classifier_damping: f32,
    /// Lower bound after damping.
    pub classifier_floor: f32,
    pub conservative_default: ConservativeDefault,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            classifier_damping: 0.8,
            classifier_floor: 0.55,
            conservative_default: ConservativeDefault::default(),
        }
    }
}

/// How much the classifier signal is trusted on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassifierRole {
    /// Text: the classifier stands in for missing evidence and is damped.
    #[default]
    Fallback,
    /// Media: the classifier is the detector and is taken as-is.
    Primary,
}

/// Signals gathered for one request, in the order they fired.
#[derive(Clone, Debug, Default)]
pub struct CollectedSignals {
    pub classifier: Option<Signal>,
    pub classifier_role: ClassifierRole,
    pub web: Option<WebVerdict>,
    pub arbiter: Option<Signal>,
}

impl CollectedSignals {
    pub fn web_signal(&self) -> Option<Signal> {
        self.web.as_ref().map(|w| {
            Signal::new(
                SignalSource::WebEvidence,
                w.verdict,
                w.confidence,
                w.reasoning.clone(),
            )
        })
    }

    /// Every signal that fired: classifier, web evidence, arbiter.
    pub fn fired(&self) -> Vec<Signal> {
        let mut out: Vec<Signal> = self.classifier.iter().cloned().collect();
        out.extend(self.web_signal());
        out.extend(self.arbiter.iter().cloned());
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionTier {
    FastPath,
    Arbiter,
    WebEvidence,
    Classifier,
    ConservativeDefault,
}

/// Strict priority chain: fast path, arbiter, web evidence, classifier,
/// conservative default. The first available tier decides.
#[derive(Debug, Clone)]
pub struct VerdictResolver {
    fast_path: FastPathMatcher,
    policy: ResolutionPolicy,
}

impl VerdictResolver {
    pub fn new(fast_path: FastPathMatcher, policy: ResolutionPolicy) -> Self {
        Self { fast_path, policy }
    }

    pub fn fast_path(&self) -> &FastPathMatcher {
        &self.fast_path
    }

    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    pub fn resolve(&self, claim: Option<&str>, signals: &CollectedSignals) -> VerdictResult {
        self.resolve_with_tier(claim, signals).0
    }

    pub fn resolve_with_tier(
        &self,
        claim: Option<&str>,
        signals: &CollectedSignals,
    ) -> (VerdictResult, ResolutionTier) {
        if let Some(hit) = claim.and_then(|c| self.fast_path.matches(c)) {
            info!(verdict = %hit.verdict(), "resolved by fast path");
            let mut fired = vec![hit.clone()];
            fired.extend(signals.fired());
            let result = VerdictResult::new(hit.verdict(), hit.confidence(), hit.rationale(), fired);
            return (result, ResolutionTier::FastPath);
        }

        let fired = signals.fired();
        let (verdict, confidence, reasoning, tier) = if let Some(arbiter) = &signals.arbiter {
            (
                arbiter.verdict(),
                arbiter.confidence(),
                arbiter.rationale().to_string(),
                ResolutionTier::Arbiter,
            )
        } else if let Some(web) = &signals.web {
            (
                web.verdict,
                web.confidence,
                web.reasoning.clone(),
                ResolutionTier::WebEvidence,
            )
        } else if let Some(classifier) = &signals.classifier {
            let (confidence, reasoning) = match signals.classifier_role {
                ClassifierRole::Primary => {
                    (classifier.confidence(), classifier.rationale().to_string())
                }
                ClassifierRole::Fallback => (
                    self.damp(classifier.confidence()),
                    format!("classifier prediction (no web data): {}", classifier.rationale()),
                ),
            };
            (
                classifier.verdict(),
                confidence,
                reasoning,
                ResolutionTier::Classifier,
            )
        } else {
            let d = &self.policy.conservative_default;
            (
                d.verdict,
                d.confidence,
                d.reasoning.clone(),
                ResolutionTier::ConservativeDefault,
            )
        };

        debug!(?tier, %verdict, confidence, signals = fired.len(), "provisional verdict");
        (VerdictResult::new(verdict, confidence, reasoning, fired), tier)
    }

    fn damp(&self, confidence: f32) -> f32 {
        (confidence * self.policy.classifier_damping).max(self.policy.classifier_floor)
    }
}

impl Default for VerdictResolver {
    fn default() -> Self {
        Self::new(FastPathMatcher::default(), ResolutionPolicy::default())
    }
}
