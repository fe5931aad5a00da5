use crate::models::verdict::Verdict;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameResult {
    pub index: usize,
    pub probability_fake: f32,
    pub label: Verdict,
}

/// Per-video statistics reported next to the verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSummary {
    pub frames_analyzed: usize,
    pub fake_frames: usize,
    pub real_frames: usize,
    pub average_probability_fake: f32,
    /// First few sampled frames, in sampling order.
    pub sample: Vec<FrameResult>,
}
