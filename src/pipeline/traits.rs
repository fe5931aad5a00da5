use crate::error::SignalResult;
use crate::models::{ArbiterVerdict, ClassifierOutput, SearchHit, Signal, TrustTier};
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> SignalResult<ClassifierOutput>;
}

/// Image-level detector, used for still images, sampled video frames and
/// audio clips alike.
#[async_trait]
pub trait MediaClassifier: Send + Sync {
    async fn classify(&self, bytes: &[u8]) -> SignalResult<ClassifierOutput>;
}

/// Turns container bytes into individually encoded frames.
#[async_trait]
pub trait VideoDecoder: Send + Sync {
    /// `Rejected` when the bytes are not a readable video.
    async fn frame_count(&self, video: &[u8]) -> SignalResult<usize>;
    async fn read_frame(&self, video: &[u8], index: usize) -> SignalResult<Vec<u8>>;
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> SignalResult<Vec<SearchHit>>;
}

/// What the arbiter is asked to judge.
#[derive(Clone, Debug, PartialEq)]
pub enum ArbiterRequest {
    Claim {
        text: String,
        /// Pre-formatted web evidence, one block per source.
        web_context: Vec<String>,
        /// Explicit date context, e.g. "October 2026".
        current_date: String,
    },
    Image {
        bytes: Vec<u8>,
    },
    Audio {
        bytes: Vec<u8>,
    },
}

impl ArbiterRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ArbiterRequest::Claim { .. } => "claim",
            ArbiterRequest::Image { .. } => "image",
            ArbiterRequest::Audio { .. } => "audio",
        }
    }
}

#[async_trait]
pub trait LlmArbiter: Send + Sync {
    async fn verify(&self, request: &ArbiterRequest) -> SignalResult<ArbiterVerdict>;
}

/// Static domain knowledge. Synchronous: implementations are in-memory tables.
pub trait DomainReputation: Send + Sync {
    fn trust_tier(&self, url: &str) -> TrustTier;
    /// Verdict for a host known to be reliable or unreliable as a whole.
    fn lookup(&self, host: &str) -> Option<Signal>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Readable text of the page, already stripped of markup.
    async fn fetch_text(&self, url: &Url) -> SignalResult<String>;
}
