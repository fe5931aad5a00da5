//! Pure decision logic. Nothing in here performs I/O except the override
//! gate, which calls the arbiter through its trait.

pub mod evidence_scorer;
pub mod fast_path;
pub mod frames;
pub mod override_gate;
pub mod resolver;

pub use evidence_scorer::{aggregate, EvidenceScorer, ItemVote, TermCounts};
pub use fast_path::FastPathMatcher;
pub use frames::{sample_frame_indices, FrameAggregate, FrameAggregator};
pub use override_gate::OverrideGate;
pub use resolver::{
    ClassifierRole, CollectedSignals, ConservativeDefault, ResolutionPolicy, ResolutionTier,
    VerdictResolver, CONSERVATIVE_DEFAULT_CONFIDENCE, CONSERVATIVE_DEFAULT_REASONING,
    CONSERVATIVE_DEFAULT_VERDICT,
};
