//! Test doubles for every collector seam. Each one counts its calls and can be
//! slowed down to exercise timeouts.

use crate::error::{SignalError, SignalResult};
use crate::models::{ArbiterVerdict, ClassifierOutput, SearchHit};
use crate::pipeline::traits::{
    ArbiterRequest, LlmArbiter, MediaClassifier, PageFetcher, TextClassifier, VideoDecoder,
    WebSearch,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

#[derive(Debug, Default)]
struct Calls {
    count: AtomicUsize,
    delay: Duration,
}

impl Calls {
    async fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

pub struct DummyTextClassifier {
    reply: SignalResult<ClassifierOutput>,
    calls: Calls,
    inputs: Mutex<Vec<String>>,
}

impl DummyTextClassifier {
    pub fn says(label: &str, score: f32) -> Self {
        Self {
            reply: Ok(ClassifierOutput::new(label, score)),
            calls: Calls::default(),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(SignalError::Unavailable("dummy classifier down".to_string())),
            calls: Calls::default(),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.calls.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Texts handed to the classifier, in call order.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().map(|i| i.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextClassifier for DummyTextClassifier {
    async fn classify(&self, text: &str) -> SignalResult<ClassifierOutput> {
        if let Ok(mut i) = self.inputs.lock() {
            i.push(text.to_string());
        }
        self.calls.hit().await;
        self.reply.clone()
    }
}

type MediaFn = dyn Fn(&[u8]) -> SignalResult<ClassifierOutput> + Send + Sync;

pub struct DummyMediaClassifier {
    respond: Box<MediaFn>,
    calls: Calls,
}

impl DummyMediaClassifier {
    pub fn says(label: &str, score: f32) -> Self {
        let out = ClassifierOutput::new(label, score);
        Self::from_fn(move |_| Ok(out.clone()))
    }

    /// Answers `Rejected`, the way a detector reacts to bytes it cannot decode.
    pub fn rejecting() -> Self {
        Self::from_fn(|_| Err(SignalError::Rejected("not a decodable image".to_string())))
    }

    pub fn failing() -> Self {
        Self::from_fn(|_| Err(SignalError::Unavailable("dummy detector down".to_string())))
    }

    pub fn from_fn(
        respond: impl Fn(&[u8]) -> SignalResult<ClassifierOutput> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Calls::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.calls.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait]
impl MediaClassifier for DummyMediaClassifier {
    async fn classify(&self, bytes: &[u8]) -> SignalResult<ClassifierOutput> {
        self.calls.hit().await;
        (self.respond)(bytes)
    }
}

/// A video of `total` synthetic frames. Frame bytes encode the frame index
/// (see [`DummyVideoDecoder::index_of`]).
#[derive(Default)]
pub struct DummyVideoDecoder {
    total: usize,
    broken: HashSet<usize>,
    unreadable: bool,
    reads: Calls,
}

impl DummyVideoDecoder {
    pub fn with_frames(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn unreadable() -> Self {
        Self {
            unreadable: true,
            ..Self::default()
        }
    }

    /// Frames at these indices fail to decode.
    pub fn with_broken(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.broken.extend(indices);
        self
    }

    pub fn frame_bytes(index: usize) -> Vec<u8> {
        (index as u64).to_le_bytes().to_vec()
    }

    pub fn index_of(bytes: &[u8]) -> Option<usize> {
        let raw: [u8; 8] = bytes.try_into().ok()?;
        usize::try_from(u64::from_le_bytes(raw)).ok()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

#[async_trait]
impl VideoDecoder for DummyVideoDecoder {
    async fn frame_count(&self, _video: &[u8]) -> SignalResult<usize> {
        if self.unreadable {
            return Err(SignalError::Rejected("not a readable video".to_string()));
        }
        Ok(self.total)
    }

    async fn read_frame(&self, _video: &[u8], index: usize) -> SignalResult<Vec<u8>> {
        self.reads.hit().await;
        if index >= self.total || self.broken.contains(&index) {
            return Err(SignalError::Malformed(format!("frame {index} did not decode")));
        }
        Ok(Self::frame_bytes(index))
    }
}

pub struct DummyWebSearch {
    reply: SignalResult<Vec<SearchHit>>,
    queries: Mutex<Vec<String>>,
    calls: Calls,
}

impl DummyWebSearch {
    pub fn returning(hits: Vec<SearchHit>) -> Self {
        Self {
            reply: Ok(hits),
            queries: Mutex::new(Vec::new()),
            calls: Calls::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(SignalError::Unavailable("dummy search down".to_string())),
            queries: Mutex::new(Vec::new()),
            calls: Calls::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.calls.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

/// Convenience constructor for search fixtures.
pub fn hit(title: &str, url: &str, content: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        content: content.to_string(),
        score: 0.9,
    }
}

#[async_trait]
impl WebSearch for DummyWebSearch {
    async fn search(&self, query: &str, max_results: usize) -> SignalResult<Vec<SearchHit>> {
        if let Ok(mut q) = self.queries.lock() {
            q.push(query.to_string());
        }
        self.calls.hit().await;
        self.reply
            .clone()
            .map(|hits| hits.into_iter().take(max_results).collect())
    }
}

pub struct DummyArbiter {
    reply: SignalResult<ArbiterVerdict>,
    seen: Mutex<Vec<ArbiterRequest>>,
    calls: Calls,
}

impl DummyArbiter {
    pub fn says(is_fake: bool, confidence: f32, reasoning: &str) -> Self {
        Self {
            reply: Ok(ArbiterVerdict {
                is_fake,
                confidence,
                reasoning: reasoning.to_string(),
            }),
            seen: Mutex::new(Vec::new()),
            calls: Calls::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(SignalError::Malformed("dummy arbiter garbled".to_string())),
            seen: Mutex::new(Vec::new()),
            calls: Calls::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.calls.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Every request received, oldest first.
    pub fn requests(&self) -> Vec<ArbiterRequest> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmArbiter for DummyArbiter {
    async fn verify(&self, request: &ArbiterRequest) -> SignalResult<ArbiterVerdict> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.clone());
        }
        self.calls.hit().await;
        self.reply.clone()
    }
}

pub struct DummyPageFetcher {
    reply: SignalResult<String>,
    calls: Calls,
}

impl DummyPageFetcher {
    pub fn returning(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Calls::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: Err(SignalError::Unavailable("dummy fetch failed".to_string())),
            calls: Calls::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait]
impl PageFetcher for DummyPageFetcher {
    async fn fetch_text(&self, _url: &Url) -> SignalResult<String> {
        self.calls.hit().await;
        self.reply.clone()
    }
}
