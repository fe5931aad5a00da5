use crate::models::verdict::{clamp_confidence, Verdict};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Classifier,
    WebEvidence,
    Arbiter,
    FastPath,
    DomainReputation,
}

/// One source's opinion. Fields are private so a signal cannot change after
/// it is produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Signal {
    source: SignalSource,
    verdict: Verdict,
    confidence: f32,
    rationale: String,
}

impl Signal {
    pub fn new(
        source: SignalSource,
        verdict: Verdict,
        confidence: f32,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            source,
            verdict,
            confidence: clamp_confidence(confidence),
            rationale: rationale.into(),
        }
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }
}

/// Raw `{label, score}` pair returned by classifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub label: String,
    pub score: f32,
}

impl ClassifierOutput {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    pub fn says_fake(&self) -> bool {
        self.label.to_uppercase().contains("FAKE")
    }

    /// Probability that the input is fake, whichever label the model used.
    pub fn probability_fake(&self) -> f32 {
        let score = clamp_confidence(self.score);
        if self.says_fake() {
            score
        } else {
            1.0 - score
        }
    }
}

/// What the arbiter model reports back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArbiterVerdict {
    pub is_fake: bool,
    pub confidence: f32,
    pub reasoning: String,
}

impl ArbiterVerdict {
    pub fn to_signal(&self) -> Signal {
        Signal::new(
            SignalSource::Arbiter,
            Verdict::from_is_fake(self.is_fake),
            self.confidence,
            self.reasoning.clone(),
        )
    }
}
