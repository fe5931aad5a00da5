use std::sync::Arc;
use verdict_engine::models::ClassifierOutput;
use verdict_engine::pipeline::mock::{DummyArbiter, DummyMediaClassifier, DummyVideoDecoder};
use verdict_engine::pipeline::ArbiterRequest;
use verdict_engine::{
    EngineConfig, EngineError, Lexicons, SignalError, SignalRegistry, SignalSource, Verdict,
    VerdictEngine,
};

const IMAGE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
const AUDIO: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";
const VIDEO: &[u8] = b"\x00\x00\x00\x18ftypmp42";

fn engine(registry: SignalRegistry) -> VerdictEngine {
    VerdictEngine::new(registry, &Lexicons::default(), EngineConfig::default()).unwrap()
}

fn image_engine(classifier: DummyMediaClassifier, arbiter: &Arc<DummyArbiter>) -> VerdictEngine {
    engine(
        SignalRegistry::new()
            .with_image_classifier(Arc::new(classifier))
            .with_arbiter(arbiter.clone()),
    )
}

#[tokio::test]
async fn real_image_never_consults_the_arbiter() {
    let arbiter = Arc::new(DummyArbiter::says(true, 0.99, "generated"));
    let result = image_engine(DummyMediaClassifier::says("Real", 0.9), &arbiter)
        .resolve_image(IMAGE)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::Real);
    assert!((result.confidence - 0.9).abs() < 1e-6);
    assert!(!result.overridden);
    assert_eq!(arbiter.calls(), 0);
}

#[tokio::test]
async fn image_below_threshold_is_real() {
    let arbiter = Arc::new(DummyArbiter::says(true, 0.99, "generated"));
    let result = image_engine(DummyMediaClassifier::says("FAKE", 0.6), &arbiter)
        .resolve_image(IMAGE)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::Real);
    assert!((result.confidence - 0.4).abs() < 1e-6);
    assert_eq!(arbiter.calls(), 0);
}

#[tokio::test]
async fn agreeing_arbiter_keeps_fake_image() {
    let arbiter = Arc::new(DummyArbiter::says(true, 0.9, "warped fingers"));
    let result = image_engine(DummyMediaClassifier::says("FAKE", 0.8), &arbiter)
        .resolve_image(IMAGE)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::Fake);
    assert!((result.confidence - 0.8).abs() < 1e-6);
    assert!(result.reasoning.contains("likely manipulated"));
    assert!(!result.overridden);
    assert_eq!(arbiter.calls(), 1);
}

#[tokio::test]
async fn disagreeing_arbiter_flips_fake_image() {
    let arbiter = Arc::new(DummyArbiter::says(false, 0.85, "consistent lighting"));
    let result = image_engine(DummyMediaClassifier::says("FAKE", 0.95), &arbiter)
        .resolve_image(IMAGE)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::Real);
    assert!(result.overridden);
    assert!((result.confidence - 0.85).abs() < 1e-6);
    assert!(result.reasoning.contains("Original model: FAKE (95.0%)"));
    let sources: Vec<_> = result.contributing_signals.iter().map(|s| s.source()).collect();
    assert_eq!(sources, vec![SignalSource::Classifier, SignalSource::Arbiter]);
    assert_eq!(
        arbiter.requests(),
        vec![ArbiterRequest::Image {
            bytes: IMAGE.to_vec()
        }]
    );
}

#[tokio::test]
async fn unreadable_image_is_malformed_input() {
    let arbiter = Arc::new(DummyArbiter::says(false, 0.9, "fine"));
    let err = image_engine(DummyMediaClassifier::rejecting(), &arbiter)
        .resolve_image(IMAGE)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));
    assert_eq!(arbiter.calls(), 0);

    let err = engine(SignalRegistry::new()).resolve_image(&[]).await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));
}

#[tokio::test]
async fn detector_outage_falls_to_conservative_default() {
    let result = engine(
        SignalRegistry::new().with_image_classifier(Arc::new(DummyMediaClassifier::failing())),
    )
    .resolve_image(IMAGE)
    .await
    .unwrap();
    assert_eq!(result.verdict, Verdict::Fake);
    assert!((result.confidence - 0.5).abs() < 1e-6);
    assert!(result.contributing_signals.is_empty());
}

#[tokio::test]
async fn audio_threshold_is_inclusive_and_arbiter_hears_audio() {
    let arbiter = Arc::new(DummyArbiter::says(true, 0.7, "synthetic prosody"));
    let registry = SignalRegistry::new()
        .with_audio_classifier(Arc::new(DummyMediaClassifier::says("fake", 0.5)))
        .with_arbiter(arbiter.clone());
    let result = engine(registry).resolve_audio(AUDIO).await.unwrap();
    assert_eq!(result.verdict, Verdict::Fake);
    assert!((result.confidence - 0.5).abs() < 1e-6);
    assert!(matches!(
        &arbiter.requests()[..],
        [ArbiterRequest::Audio { bytes }] if bytes == AUDIO
    ));
}

/// Fake probability per frame index, scripted through the frame bytes.
fn scripted_frames(probabilities: &'static [f32]) -> DummyMediaClassifier {
    DummyMediaClassifier::from_fn(move |bytes| {
        let index = DummyVideoDecoder::index_of(bytes)
            .ok_or_else(|| SignalError::Rejected("not a frame".to_string()))?;
        let p = probabilities[index % probabilities.len()];
        Ok(ClassifierOutput::new("FAKE", p))
    })
}

#[tokio::test]
async fn video_majority_vote() {
    let registry = SignalRegistry::new()
        .with_video_decoder(Arc::new(DummyVideoDecoder::with_frames(5)))
        .with_frame_classifier(Arc::new(scripted_frames(&[0.9, 0.8, 0.7, 0.2, 0.1])));
    let result = engine(registry).resolve_video(VIDEO).await.unwrap();

    assert_eq!(result.verdict, Verdict::Fake);
    assert!((result.confidence - 0.6).abs() < 1e-6);
    let frames = result.frames.expect("video carries a frame summary");
    assert_eq!(frames.frames_analyzed, 5);
    assert_eq!(frames.fake_frames, 3);
    assert_eq!(frames.real_frames, 2);
    assert!((frames.average_probability_fake - 0.54).abs() < 1e-5);
    assert_eq!(frames.sample.len(), 5);
}

#[tokio::test]
async fn video_override_sends_the_first_sampled_frame() {
    let arbiter = Arc::new(DummyArbiter::says(false, 0.75, "natural motion"));
    let registry = SignalRegistry::new()
        .with_video_decoder(Arc::new(DummyVideoDecoder::with_frames(5).with_broken([0])))
        .with_frame_classifier(Arc::new(scripted_frames(&[0.9])))
        .with_arbiter(arbiter.clone());
    let result = engine(registry).resolve_video(VIDEO).await.unwrap();

    assert_eq!(result.verdict, Verdict::Real);
    assert!(result.overridden);
    assert_eq!(result.frames.as_ref().map(|f| f.frames_analyzed), Some(4));
    assert_eq!(
        arbiter.requests(),
        vec![ArbiterRequest::Image {
            bytes: DummyVideoDecoder::frame_bytes(1)
        }]
    );
}

#[tokio::test]
async fn long_video_reads_a_bounded_number_of_frames() {
    let decoder = Arc::new(DummyVideoDecoder::with_frames(100_000));
    let registry = SignalRegistry::new()
        .with_video_decoder(decoder.clone())
        .with_image_classifier(Arc::new(scripted_frames(&[0.1])));
    let result = engine(registry).resolve_video(VIDEO).await.unwrap();
    assert_eq!(decoder.reads(), 10);
    assert_eq!(result.verdict, Verdict::Real);
    assert!((result.confidence - 1.0).abs() < 1e-6);
}

#[tokio::test]
async fn video_without_frames_is_malformed_input() {
    let registry = SignalRegistry::new()
        .with_video_decoder(Arc::new(DummyVideoDecoder::with_frames(3).with_broken([0, 1, 2])))
        .with_frame_classifier(Arc::new(scripted_frames(&[0.9])));
    let err = engine(registry).resolve_video(VIDEO).await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(ref m) if m.contains("no extractable frames")));

    let registry = SignalRegistry::new()
        .with_video_decoder(Arc::new(DummyVideoDecoder::with_frames(0)))
        .with_frame_classifier(Arc::new(scripted_frames(&[0.9])));
    let err = engine(registry).resolve_video(VIDEO).await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));

    let registry = SignalRegistry::new()
        .with_video_decoder(Arc::new(DummyVideoDecoder::unreadable()))
        .with_frame_classifier(Arc::new(scripted_frames(&[0.9])));
    let err = engine(registry).resolve_video(VIDEO).await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedInput(_)));
}

#[tokio::test]
async fn video_without_decoder_is_a_config_error() {
    let registry = SignalRegistry::new().with_frame_classifier(Arc::new(scripted_frames(&[0.9])));
    let err = engine(registry).resolve_video(VIDEO).await.unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}
