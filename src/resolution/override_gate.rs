use crate::models::{percent, Verdict, VerdictResult};
use crate::pipeline::traits::{ArbiterRequest, LlmArbiter};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Second opinion on media verdicts. It can only turn a FAKE into a REAL.
#[derive(Clone)]
pub struct OverrideGate {
    arbiter: Option<Arc<dyn LlmArbiter>>,
    timeout: Duration,
}

impl OverrideGate {
    pub fn new(arbiter: Option<Arc<dyn LlmArbiter>>, timeout: Duration) -> Self {
        Self { arbiter, timeout }
    }

    /// `media` is only built when the arbiter is actually consulted.
    pub async fn maybe_override<F>(&self, provisional: VerdictResult, media: F) -> VerdictResult
    where
        F: FnOnce() -> ArbiterRequest + Send,
    {
        if provisional.verdict != Verdict::Fake {
            return provisional;
        }
        let Some(arbiter) = &self.arbiter else {
            return provisional;
        };

        let request = media();
        let reply = match tokio::time::timeout(self.timeout, arbiter.verify(&request)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                warn!(kind = request.kind(), error = %err, "arbiter unavailable, keeping verdict");
                return provisional;
            }
            Err(_) => {
                warn!(kind = request.kind(), timeout = ?self.timeout, "arbiter timed out, keeping verdict");
                return provisional;
            }
        };

        if reply.is_fake {
            debug!(kind = request.kind(), "arbiter agrees with FAKE");
            return provisional;
        }

        let signal = reply.to_signal();
        info!(
            kind = request.kind(),
            from = percent(provisional.confidence),
            to = percent(signal.confidence()),
            "arbiter override: FAKE -> REAL"
        );
        let reasoning = format!(
            "Arbiter override: {}\n\nOriginal model: FAKE ({}): {}\nArbiter verification: REAL ({})",
            signal.rationale(),
            percent(provisional.confidence),
            provisional.reasoning,
            percent(signal.confidence()),
        );
        let mut contributing = provisional.contributing_signals;
        contributing.push(signal.clone());
        VerdictResult {
            verdict: Verdict::Real,
            confidence: signal.confidence(),
            reasoning,
            contributing_signals: contributing,
            overridden: true,
            frames: provisional.frames,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Signal, SignalSource};
    use crate::pipeline::mock::DummyArbiter;

    fn provisional(verdict: Verdict, confidence: f32) -> VerdictResult {
        let s = Signal::new(SignalSource::Classifier, verdict, confidence, "possible manipulation");
        VerdictResult::new(verdict, confidence, "image analysis: possible manipulation", vec![s])
    }

    fn image() -> ArbiterRequest {
        ArbiterRequest::Image { bytes: vec![1, 2, 3] }
    }

    fn gate(arbiter: &Arc<DummyArbiter>) -> OverrideGate {
        OverrideGate::new(Some(arbiter.clone()), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn real_verdict_never_reaches_the_arbiter() {
        let arbiter = Arc::new(DummyArbiter::says(true, 0.99, "looks generated"));
        let out = gate(&arbiter)
            .maybe_override(provisional(Verdict::Real, 0.8), image)
            .await;
        assert_eq!(out.verdict, Verdict::Real);
        assert!(!out.overridden);
        assert_eq!(arbiter.calls(), 0);
    }

    #[tokio::test]
    async fn unverified_verdict_never_reaches_the_arbiter() {
        let arbiter = Arc::new(DummyArbiter::says(false, 0.99, "fine"));
        let out = gate(&arbiter)
            .maybe_override(VerdictResult::unverified("unreadable"), image)
            .await;
        assert_eq!(out.verdict, Verdict::Unverified);
        assert_eq!(arbiter.calls(), 0);
    }

    #[tokio::test]
    async fn agreeing_arbiter_keeps_fake() {
        let arbiter = Arc::new(DummyArbiter::says(true, 0.9, "generated"));
        let before = provisional(Verdict::Fake, 0.7);
        let out = gate(&arbiter).maybe_override(before.clone(), image).await;
        assert_eq!(out, before);
        assert_eq!(arbiter.calls(), 1);
    }

    #[tokio::test]
    async fn disagreeing_arbiter_flips_to_real() {
        let arbiter = Arc::new(DummyArbiter::says(false, 0.85, "natural lighting"));
        let out = gate(&arbiter)
            .maybe_override(provisional(Verdict::Fake, 0.7), image)
            .await;
        assert_eq!(out.verdict, Verdict::Real);
        assert!(out.overridden);
        assert!((out.confidence - 0.85).abs() < 1e-6);
        assert!(out.reasoning.contains("natural lighting"));
        assert!(out
            .reasoning
            .contains("Original model: FAKE (70.0%): image analysis: possible manipulation"));
        assert!(out.reasoning.contains("Arbiter verification: REAL (85.0%)"));
        let last = out.contributing_signals.last().unwrap();
        assert_eq!(last.source(), SignalSource::Arbiter);
        assert_eq!(last.verdict(), Verdict::Real);
    }

    #[tokio::test]
    async fn failing_or_missing_arbiter_keeps_fake() {
        let arbiter = Arc::new(DummyArbiter::failing());
        let out = gate(&arbiter)
            .maybe_override(provisional(Verdict::Fake, 0.7), image)
            .await;
        assert_eq!(out.verdict, Verdict::Fake);
        assert!(!out.overridden);

        let out = OverrideGate::new(None, Duration::from_secs(1))
            .maybe_override(provisional(Verdict::Fake, 0.7), image)
            .await;
        assert_eq!(out.verdict, Verdict::Fake);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_arbiter_times_out_and_keeps_fake() {
        let arbiter = Arc::new(
            DummyArbiter::says(false, 0.9, "fine").with_delay(Duration::from_secs(60)),
        );
        let out = OverrideGate::new(Some(arbiter.clone()), Duration::from_secs(2))
            .maybe_override(provisional(Verdict::Fake, 0.7), image)
            .await;
        assert_eq!(out.verdict, Verdict::Fake);
        assert!(!out.overridden);
    }
}
