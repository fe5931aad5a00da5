use crate::pipeline::reputation::DomainTable;
use crate::pipeline::traits::{
    DomainReputation, LlmArbiter, MediaClassifier, PageFetcher, TextClassifier, VideoDecoder,
    WebSearch,
};
use std::sync::Arc;

/// Every collector the engine may call, built once and handed to
/// [`VerdictEngine`](crate::pipeline::VerdictEngine). Absent collectors are
/// simply skipped.
#[derive(Clone)]
pub struct SignalRegistry {
    pub text_classifier: Option<Arc<dyn TextClassifier>>,
    pub image_classifier: Option<Arc<dyn MediaClassifier>>,
    pub frame_classifier: Option<Arc<dyn MediaClassifier>>,
    pub audio_classifier: Option<Arc<dyn MediaClassifier>>,
    pub video_decoder: Option<Arc<dyn VideoDecoder>>,
    pub web_search: Option<Arc<dyn WebSearch>>,
    pub arbiter: Option<Arc<dyn LlmArbiter>>,
    pub page_fetcher: Option<Arc<dyn PageFetcher>>,
    pub reputation: Arc<dyn DomainReputation>,
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self {
            text_classifier: None,
            image_classifier: None,
            frame_classifier: None,
            audio_classifier: None,
            video_decoder: None,
            web_search: None,
            arbiter: None,
            page_fetcher: None,
            reputation: Arc::new(DomainTable::default()),
        }
    }
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_classifier(mut self, c: Arc<dyn TextClassifier>) -> Self {
        self.text_classifier = Some(c);
        self
    }

    pub fn with_image_classifier(mut self, c: Arc<dyn MediaClassifier>) -> Self {
        self.image_classifier = Some(c);
        self
    }

    /// Falls back to the image classifier when unset.
    pub fn with_frame_classifier(mut self, c: Arc<dyn MediaClassifier>) -> Self {
        self.frame_classifier = Some(c);
        self
    }

    pub fn with_audio_classifier(mut self, c: Arc<dyn MediaClassifier>) -> Self {
        self.audio_classifier = Some(c);
        self
    }

    pub fn with_video_decoder(mut self, d: Arc<dyn VideoDecoder>) -> Self {
        self.video_decoder = Some(d);
        self
    }

    pub fn with_web_search(mut self, s: Arc<dyn WebSearch>) -> Self {
        self.web_search = Some(s);
        self
    }

    pub fn with_arbiter(mut self, a: Arc<dyn LlmArbiter>) -> Self {
        self.arbiter = Some(a);
        self
    }

    pub fn with_page_fetcher(mut self, f: Arc<dyn PageFetcher>) -> Self {
        self.page_fetcher = Some(f);
        self
    }

    pub fn with_reputation(mut self, r: Arc<dyn DomainReputation>) -> Self {
        self.reputation = r;
        self
    }

    pub(crate) fn frame_classifier(&self) -> Option<&Arc<dyn MediaClassifier>> {
        self.frame_classifier
            .as_ref()
            .or(self.image_classifier.as_ref())
    }

    /// Names of the configured collectors, for startup logging.
    pub fn describe(&self) -> Vec<&'static str> {
        [
            ("text_classifier", self.text_classifier.is_some()),
            ("image_classifier", self.image_classifier.is_some()),
            ("frame_classifier", self.frame_classifier.is_some()),
            ("audio_classifier", self.audio_classifier.is_some()),
            ("video_decoder", self.video_decoder.is_some()),
            ("web_search", self.web_search.is_some()),
            ("arbiter", self.arbiter.is_some()),
            ("page_fetcher", self.page_fetcher.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}
