use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const ENV_PREFIX: &str = "VERDICT_";

/// Engine tuning. Everything has a default; `from_env` overrides field by
/// field from `VERDICT_*` variables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub collector_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_search_results: usize,
    pub frame_sample_target: usize,
    pub image_fake_threshold: f32,
    pub frame_fake_threshold: f32,
    pub audio_fake_threshold: f32,
    pub min_claim_chars: usize,
    pub max_claim_chars: usize,
    pub classifier_max_chars: usize,
    pub evidence_snippet_chars: usize,
    /// Date context handed to the arbiter, e.g. "November 2025".
    pub current_date: Option<String>,
    pub fast_path_fake_file: Option<PathBuf>,
    pub fast_path_real_file: Option<PathBuf>,
    pub debunk_terms_file: Option<PathBuf>,
    pub support_terms_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collector_timeout_ms: 10_000,
            request_timeout_ms: 40_000,
            max_search_results: 5,
            frame_sample_target: 10,
            image_fake_threshold: 0.65,
            frame_fake_threshold: 0.5,
            audio_fake_threshold: 0.5,
            min_claim_chars: 10,
            max_claim_chars: 50_000,
            classifier_max_chars: 512,
            evidence_snippet_chars: 500,
            current_date: None,
            fast_path_fake_file: None,
            fast_path_real_file: None,
            debunk_terms_file: None,
            support_terms_file: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `lookup` receives the full variable name, e.g. `VERDICT_MAX_SEARCH_RESULTS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        parse_into(&get, "COLLECTOR_TIMEOUT_MS", &mut cfg.collector_timeout_ms)?;
        parse_into(&get, "REQUEST_TIMEOUT_MS", &mut cfg.request_timeout_ms)?;
        parse_into(&get, "MAX_SEARCH_RESULTS", &mut cfg.max_search_results)?;
        parse_into(&get, "FRAME_SAMPLE_TARGET", &mut cfg.frame_sample_target)?;
        parse_into(&get, "IMAGE_FAKE_THRESHOLD", &mut cfg.image_fake_threshold)?;
        parse_into(&get, "FRAME_FAKE_THRESHOLD", &mut cfg.frame_fake_threshold)?;
        parse_into(&get, "AUDIO_FAKE_THRESHOLD", &mut cfg.audio_fake_threshold)?;
        parse_into(&get, "MIN_CLAIM_CHARS", &mut cfg.min_claim_chars)?;
        parse_into(&get, "MAX_CLAIM_CHARS", &mut cfg.max_claim_chars)?;
        parse_into(&get, "CLASSIFIER_MAX_CHARS", &mut cfg.classifier_max_chars)?;
        parse_into(&get, "EVIDENCE_SNIPPET_CHARS", &mut cfg.evidence_snippet_chars)?;

        cfg.current_date = get("CURRENT_DATE");
        cfg.fast_path_fake_file = get("FAST_PATH_FAKE_FILE").map(PathBuf::from);
        cfg.fast_path_real_file = get("FAST_PATH_REAL_FILE").map(PathBuf::from);
        cfg.debunk_terms_file = get("DEBUNK_TERMS_FILE").map(PathBuf::from);
        cfg.support_terms_file = get("SUPPORT_TERMS_FILE").map(PathBuf::from);

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.collector_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(EngineError::Config("timeouts must be non-zero".to_string()));
        }
        if self.frame_sample_target == 0 {
            return Err(EngineError::Config(
                "frame_sample_target must be at least 1".to_string(),
            ));
        }
        for (name, v) in [
            ("image_fake_threshold", self.image_fake_threshold),
            ("frame_fake_threshold", self.frame_fake_threshold),
            ("audio_fake_threshold", self.audio_fake_threshold),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EngineError::Config(format!("{name} must be in [0,1], got {v}")));
            }
        }
        if self.min_claim_chars > self.max_claim_chars {
            return Err(EngineError::Config(
                "min_claim_chars exceeds max_claim_chars".to_string(),
            ));
        }
        Ok(())
    }

    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_into<T>(get: &impl Fn(&str) -> Option<String>, name: &str, slot: &mut T) -> EngineResult<()>
where
    T: FromStr,
{
    if let Some(raw) = get(name) {
        *slot = raw
            .parse::<T>()
            .map_err(|_| EngineError::Config(format!("{ENV_PREFIX}{name}: cannot parse {raw:?}")))?;
    }
    Ok(())
}

/// Credentials are considered absent when empty or still a placeholder.
pub fn valid_api_key(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty() && !trimmed.contains("...")
}
