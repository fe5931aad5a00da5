use crate::models::frame::FrameSummary;
use crate::models::signal::{Signal, SignalSource};
use crate::models::verdict::{clamp_confidence, Verdict};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which pipeline produced a result.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Text,
    Image,
    Video,
    Audio,
    Url,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerdictResult {
    pub verdict: Verdict,
    pub confidence: f32,
    pub reasoning: String,
    /// Every signal that actually fired, in the order it was produced.
    pub contributing_signals: Vec<Signal>,
    pub overridden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<FrameSummary>,
}

impl VerdictResult {
    pub fn new(
        verdict: Verdict,
        confidence: f32,
        reasoning: impl Into<String>,
        contributing_signals: Vec<Signal>,
    ) -> Self {
        Self {
            verdict,
            confidence: clamp_confidence(confidence),
            reasoning: reasoning.into(),
            contributing_signals,
            overridden: false,
            frames: None,
        }
    }

    /// Terminal result for inputs the engine refuses to judge.
    pub fn unverified(reasoning: impl Into<String>) -> Self {
        Self::new(Verdict::Unverified, 0.0, reasoning, Vec::new())
    }

    pub fn with_frames(mut self, frames: FrameSummary) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn fired(&self, source: SignalSource) -> bool {
        self.contributing_signals
            .iter()
            .any(|s| s.source() == source)
    }
}
