use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, SignalError, SignalResult};
use crate::lexicon::Lexicons;
use crate::models::{
    percent, ClassifierOutput, EvidenceItem, FrameResult, Modality, RequestId, SearchHit, Signal,
    SignalSource, Verdict, VerdictResult,
};
use crate::pipeline::query::plan_search_query;
use crate::pipeline::registry::SignalRegistry;
use crate::pipeline::traits::{ArbiterRequest, MediaClassifier};
use crate::resolution::{
    sample_frame_indices, ClassifierRole, CollectedSignals, EvidenceScorer, FastPathMatcher,
    FrameAggregator, OverrideGate, ResolutionPolicy, VerdictResolver,
};
use chrono::Utc;
use futures_util::future::join_all;
use std::future::Future;
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

pub const TOO_SHORT_REASONING: &str = "text too short for analysis";

/// Orchestrates collectors around the pure resolution core. Cheap to share:
/// every field is read-only after construction.
pub struct VerdictEngine {
    registry: SignalRegistry,
    resolver: VerdictResolver,
    scorer: EvidenceScorer,
    frames: FrameAggregator,
    gate: OverrideGate,
    config: EngineConfig,
}

impl VerdictEngine {
    pub fn new(
        registry: SignalRegistry,
        lexicons: &Lexicons,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        let gate = OverrideGate::new(registry.arbiter.clone(), config.collector_timeout());
        info!(collectors = ?registry.describe(), "verdict engine ready");
        Ok(Self {
            resolver: VerdictResolver::new(
                FastPathMatcher::from_lexicons(lexicons),
                ResolutionPolicy::default(),
            ),
            scorer: EvidenceScorer::from_lexicons(lexicons),
            frames: FrameAggregator,
            gate,
            registry,
            config,
        })
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.resolver = VerdictResolver::new(self.resolver.fast_path().clone(), policy);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn resolve_text(&self, claim: &str) -> EngineResult<VerdictResult> {
        self.run(Modality::Text, self.text(claim)).await
    }

    pub async fn resolve_image(&self, image: &[u8]) -> EngineResult<VerdictResult> {
        self.run(Modality::Image, self.image(image)).await
    }

    pub async fn resolve_video(&self, video: &[u8]) -> EngineResult<VerdictResult> {
        self.run(Modality::Video, self.video(video)).await
    }

    pub async fn resolve_audio(&self, audio: &[u8]) -> EngineResult<VerdictResult> {
        self.run(Modality::Audio, self.audio(audio)).await
    }

    pub async fn resolve_url(&self, url: &str) -> EngineResult<VerdictResult> {
        self.run(Modality::Url, self.url(url)).await
    }

    /// One span per request and a hard ceiling on total latency. Dropping the
    /// inner future on timeout abandons any collector call still in flight.
    async fn run<F>(&self, modality: Modality, work: F) -> EngineResult<VerdictResult>
    where
        F: Future<Output = EngineResult<VerdictResult>>,
    {
        let request = RequestId::new();
        let span = info_span!("resolve", request = %request.short(), ?modality);
        let limit = self.config.request_timeout();
        async move {
            match tokio::time::timeout(limit, work).await {
                Ok(Ok(result)) => {
                    info!(
                        verdict = %result.verdict,
                        confidence = percent(result.confidence),
                        overridden = result.overridden,
                        signals = result.contributing_signals.len(),
                        "resolved"
                    );
                    Ok(result)
                }
                Ok(Err(err)) => {
                    warn!(error = %err, "request failed");
                    Err(err)
                }
                Err(_) => {
                    warn!(?limit, "request exceeded its ceiling");
                    Err(EngineError::Timeout(limit))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn text(&self, claim: &str) -> EngineResult<VerdictResult> {
        let claim = claim.trim();
        let chars = claim.chars().count();
        if chars < self.config.min_claim_chars {
            debug!(chars, "claim too short");
            return Ok(VerdictResult::unverified(TOO_SHORT_REASONING));
        }
        if chars > self.config.max_claim_chars {
            return Err(EngineError::MalformedInput(format!(
                "claim is {chars} characters, limit is {}",
                self.config.max_claim_chars
            )));
        }

        if self.resolver.fast_path().matches(claim).is_some() {
            return Ok(self.resolver.resolve(Some(claim), &CollectedSignals::default()));
        }

        let date = self.date_context();
        let query = plan_search_query(claim, &date);
        debug!(%query, "planned search");

        let (classifier, evidence) = tokio::join!(self.classify_text(claim), self.search(&query));
        let web = self.scorer.score(&evidence);

        let arbiter = match &self.registry.arbiter {
            Some(arbiter) => {
                let request = ArbiterRequest::Claim {
                    text: claim.to_string(),
                    web_context: evidence
                        .iter()
                        .map(|e| format!("{}: {}", e.title, e.snippet))
                        .collect(),
                    current_date: date,
                };
                self.collect("arbiter", arbiter.verify(&request))
                    .await
                    .ok()
                    .map(|v| v.to_signal())
            }
            None => None,
        };

        let signals = CollectedSignals {
            classifier,
            classifier_role: ClassifierRole::Fallback,
            web,
            arbiter,
        };
        Ok(self.resolver.resolve(Some(claim), &signals))
    }

    async fn classify_text(&self, claim: &str) -> Option<Signal> {
        let classifier = self.registry.text_classifier.as_ref()?;
        let head: String = claim.chars().take(self.config.classifier_max_chars).collect();
        let out = self.collect("text_classifier", classifier.classify(&head)).await.ok()?;
        Some(Signal::new(
            SignalSource::Classifier,
            Verdict::from_is_fake(out.says_fake()),
            out.score,
            format!("text classifier: {} ({})", out.label, percent(out.score)),
        ))
    }

    /// Search hits turned into scored evidence. Empty when search is absent
    /// or failed.
    async fn search(&self, query: &str) -> Vec<EvidenceItem> {
        let Some(search) = &self.registry.web_search else {
            return Vec::new();
        };
        match self
            .collect("web_search", search.search(query, self.config.max_search_results))
            .await
        {
            Ok(hits) => hits
                .into_iter()
                .take(self.config.max_search_results)
                .map(|h| self.evidence_item(h))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn evidence_item(&self, hit: SearchHit) -> EvidenceItem {
        let tier = self.registry.reputation.trust_tier(&hit.url);
        let snippet: String = hit
            .content
            .chars()
            .take(self.config.evidence_snippet_chars)
            .collect();
        EvidenceItem::new(hit.title, hit.url, snippet, tier)
    }

    async fn image(&self, image: &[u8]) -> EngineResult<VerdictResult> {
        if image.is_empty() {
            return Err(EngineError::MalformedInput("empty image".to_string()));
        }
        let classifier = media_signal(
            self.classify_media("image_classifier", self.registry.image_classifier.as_deref(), image)
                .await?,
            |p| p > self.config.image_fake_threshold,
            "image",
        );
        let provisional = self.resolve_media(classifier);
        Ok(self
            .gate
            .maybe_override(provisional, || ArbiterRequest::Image {
                bytes: image.to_vec(),
            })
            .await)
    }

    async fn audio(&self, audio: &[u8]) -> EngineResult<VerdictResult> {
        if audio.is_empty() {
            return Err(EngineError::MalformedInput("empty audio".to_string()));
        }
        let classifier = media_signal(
            self.classify_media("audio_classifier", self.registry.audio_classifier.as_deref(), audio)
                .await?,
            |p| p >= self.config.audio_fake_threshold,
            "voice",
        );
        let provisional = self.resolve_media(classifier);
        Ok(self
            .gate
            .maybe_override(provisional, || ArbiterRequest::Audio {
                bytes: audio.to_vec(),
            })
            .await)
    }

    async fn video(&self, video: &[u8]) -> EngineResult<VerdictResult> {
        if video.is_empty() {
            return Err(EngineError::MalformedInput("empty video".to_string()));
        }
        let decoder = self
            .registry
            .video_decoder
            .as_ref()
            .ok_or_else(|| EngineError::Config("no video decoder configured".to_string()))?;
        let classifier = self
            .registry
            .frame_classifier()
            .ok_or_else(|| EngineError::Config("no frame classifier configured".to_string()))?;

        let total = self
            .collect("video_decoder", decoder.frame_count(video))
            .await
            .map_err(|e| EngineError::MalformedInput(format!("unreadable video: {e}")))?;
        let indices = sample_frame_indices(total, self.config.frame_sample_target);
        debug!(total, sampled = indices.len(), "sampling frames");

        let threshold = self.config.frame_fake_threshold;
        let analysed = join_all(indices.into_iter().map(|index| async move {
            let frame = self
                .collect("video_decoder", decoder.read_frame(video, index))
                .await
                .ok()?;
            let out = self
                .collect("frame_classifier", classifier.classify(&frame))
                .await
                .ok()?;
            let p = out.probability_fake();
            let result = FrameResult {
                index,
                probability_fake: p,
                label: Verdict::from_is_fake(p > threshold),
            };
            Some((result, frame))
        }))
        .await;

        let mut results = Vec::new();
        let mut first_frame = None;
        for (result, frame) in analysed.into_iter().flatten() {
            if first_frame.is_none() {
                first_frame = Some(frame);
            }
            results.push(result);
        }

        let aggregate = self.frames.aggregate(&results)?;
        let signal = Signal::new(
            SignalSource::Classifier,
            aggregate.verdict(),
            aggregate.confidence,
            aggregate.rationale(),
        );
        let provisional = self.resolve_media(Some(signal)).with_frames(aggregate.summary);
        Ok(self
            .gate
            .maybe_override(provisional, move || ArbiterRequest::Image {
                bytes: first_frame.unwrap_or_default(),
            })
            .await)
    }

    async fn url(&self, raw: &str) -> EngineResult<VerdictResult> {
        let url = Url::parse(raw.trim())
            .map_err(|e| EngineError::MalformedInput(format!("invalid url {raw:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EngineError::MalformedInput(format!(
                "unsupported scheme {:?}",
                url.scheme()
            )));
        }
        let host = url
            .host_str()
            .ok_or_else(|| EngineError::MalformedInput("url has no host".to_string()))?
            .to_lowercase();

        if let Some(signal) = self.registry.reputation.lookup(&host) {
            debug!(%host, verdict = %signal.verdict(), "resolved by domain reputation");
            return Ok(VerdictResult::new(
                signal.verdict(),
                signal.confidence(),
                signal.rationale().to_string(),
                vec![signal],
            ));
        }

        let fetched = match &self.registry.page_fetcher {
            Some(fetcher) => self.collect("page_fetcher", fetcher.fetch_text(&url)).await,
            None => Err(SignalError::NotConfigured),
        }
        .map_err(|e| EngineError::MalformedInput(format!("could not fetch {host}: {e}")))?;
        let text = fetched.trim();
        if text.is_empty() {
            return Err(EngineError::MalformedInput(format!("no readable text at {host}")));
        }

        let mut result = self.text(text).await?;
        result.reasoning = format!("content from {host}: {}", result.reasoning);
        Ok(result)
    }

    /// `Rejected` means the bytes themselves are bad; anything else leaves the
    /// classifier signal absent.
    async fn classify_media(
        &self,
        name: &'static str,
        classifier: Option<&dyn MediaClassifier>,
        bytes: &[u8],
    ) -> EngineResult<Option<ClassifierOutput>> {
        let Some(classifier) = classifier else {
            debug!(collector = name, "not configured");
            return Ok(None);
        };
        match self.collect(name, classifier.classify(bytes)).await {
            Ok(out) => Ok(Some(out)),
            Err(SignalError::Rejected(reason)) => Err(EngineError::MalformedInput(reason)),
            Err(_) => Ok(None),
        }
    }

    fn resolve_media(&self, classifier: Option<Signal>) -> VerdictResult {
        let signals = CollectedSignals {
            classifier,
            classifier_role: ClassifierRole::Primary,
            ..CollectedSignals::default()
        };
        self.resolver.resolve(None, &signals)
    }

    /// Per-collector timeout. Failures are logged and handed back for the
    /// caller to drop.
    async fn collect<T, F>(&self, collector: &'static str, call: F) -> SignalResult<T>
    where
        F: Future<Output = SignalResult<T>>,
    {
        let limit = self.config.collector_timeout();
        let outcome = match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SignalError::Timeout(limit)),
        };
        if let Err(err) = &outcome {
            warn!(collector, error = %err, "signal unavailable");
        }
        outcome
    }

    fn date_context(&self) -> String {
        self.config
            .current_date
            .clone()
            .unwrap_or_else(|| Utc::now().format("%B %Y").to_string())
    }
}

/// Maps a detector's `{label, score}` onto a FAKE/REAL signal.
fn media_signal(
    output: Option<ClassifierOutput>,
    is_fake: impl Fn(f32) -> bool,
    kind: &str,
) -> Option<Signal> {
    let output = output?;
    let p = output.probability_fake();
    let fake = is_fake(p);
    let confidence = if fake { p } else { 1.0 - p };
    let finding = if !fake {
        "no significant manipulation markers"
    } else if p > 0.9 {
        "high confidence manipulation"
    } else if p > 0.7 {
        "likely manipulated"
    } else {
        "possible manipulation"
    };
    Some(Signal::new(
        SignalSource::Classifier,
        Verdict::from_is_fake(fake),
        confidence,
        format!("{kind} analysis: {finding} (fake probability {})", percent(p)),
    ))
}
