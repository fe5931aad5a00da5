//! Multi-signal verdict engine: combines classifiers, web evidence, an LLM
//! arbiter and curated tables into one FAKE / REAL / UNVERIFIED verdict.

pub mod config;
pub mod error;
pub mod lexicon;
pub mod models;
pub mod pipeline;
pub mod resolution;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, SignalError, SignalResult};
pub use lexicon::Lexicons;
pub use models::{Modality, Signal, SignalSource, Verdict, VerdictResult};
pub use pipeline::{SignalRegistry, VerdictEngine};
