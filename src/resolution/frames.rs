use crate::error::{EngineError, EngineResult};
use crate::models::{clamp_confidence, percent, FrameResult, FrameSummary, Verdict};

/// Number of frame results carried in the summary.
const SUMMARY_SAMPLE: usize = 5;

/// Evenly spaced frame indices over `[0, total_frames)`: `min(target, total)`
/// positions, first and last frame included. The frame count comes from the
/// container header, so the product is widened to avoid overflow.
pub fn sample_frame_indices(total_frames: usize, target: usize) -> Vec<usize> {
    let n = target.min(total_frames);
    match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let last = (total_frames - 1) as u128;
            let steps = (n - 1) as u128;
            // Each index is at most `last`, which came from a usize.
            (0..n)
                .map(|i| (i as u128 * last / steps) as usize)
                .collect()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameAggregate {
    pub is_fake: bool,
    pub confidence: f32,
    pub summary: FrameSummary,
}

impl FrameAggregate {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_is_fake(self.is_fake)
    }

    pub fn rationale(&self) -> String {
        let s = &self.summary;
        let headline = if self.is_fake {
            "manipulation detected across sampled frames"
        } else {
            "video appears authentic"
        };
        format!(
            "{headline} ({}): {} of {} frames flagged fake, {} real, average fake probability {}",
            percent(self.confidence),
            s.fake_frames,
            s.frames_analyzed,
            s.real_frames,
            percent(s.average_probability_fake),
        )
    }
}

/// Majority vote over per-frame labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAggregator;

impl FrameAggregator {
    /// Confidence is the share of frames agreeing with the winner, so one
    /// extreme frame cannot dominate. Ties go to REAL.
    pub fn aggregate(&self, frames: &[FrameResult]) -> EngineResult<FrameAggregate> {
        if frames.is_empty() {
            return Err(EngineError::MalformedInput(
                "no extractable frames".to_string(),
            ));
        }
        let total = frames.len();
        let fake_frames = frames.iter().filter(|f| f.label == Verdict::Fake).count();
        let real_frames = total - fake_frames;
        let is_fake = fake_frames * 2 > total;
        let agreeing = if is_fake { fake_frames } else { real_frames };
        let average = frames.iter().map(|f| f.probability_fake).sum::<f32>() / total as f32;

        Ok(FrameAggregate {
            is_fake,
            confidence: clamp_confidence(agreeing as f32 / total as f32),
            summary: FrameSummary {
                frames_analyzed: total,
                fake_frames,
                real_frames,
                average_probability_fake: clamp_confidence(average),
                sample: frames.iter().take(SUMMARY_SAMPLE).cloned().collect(),
            },
        })
    }
}
