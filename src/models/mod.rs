pub mod evidence;
pub mod frame;
pub mod ids;
pub mod result;
pub mod signal;
pub mod verdict;

pub use evidence::{EvidenceItem, SearchHit, TrustTier, WebVerdict};
pub use frame::{FrameResult, FrameSummary};
pub use ids::RequestId;
pub use result::{Modality, VerdictResult};
pub use signal::{ArbiterVerdict, ClassifierOutput, Signal, SignalSource};
pub use verdict::{clamp_confidence, percent, Verdict};
