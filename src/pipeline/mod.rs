pub mod classifier;
pub mod engine;
pub mod fetch;
pub mod llm_arbiter;
pub mod mock;
pub mod query;
pub mod registry;
pub mod reputation;
pub mod tavily;
pub mod traits;

pub use engine::{VerdictEngine, TOO_SHORT_REASONING};
pub use registry::SignalRegistry;
pub use reputation::DomainTable;
pub use traits::{
    ArbiterRequest, DomainReputation, LlmArbiter, MediaClassifier, PageFetcher, TextClassifier,
    VideoDecoder, WebSearch,
};
