use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Fake,
    Real,
    Unverified,
}

impl Verdict {
    pub fn from_is_fake(is_fake: bool) -> Self {
        if is_fake {
            Verdict::Fake
        } else {
            Verdict::Real
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Real => "REAL",
            Verdict::Unverified => "UNVERIFIED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp into [0, 1]. NaN collapses to 0.
pub fn clamp_confidence(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Render a confidence the way rationales quote it, e.g. `72.0%`.
pub fn percent(v: f32) -> String {
    format!("{:.1}%", v * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_out_of_range_and_nan() {
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f32::NAN), 0.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
    }

    #[test]
    fn verdict_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Verdict::Fake).unwrap(), "\"FAKE\"");
        assert_eq!(
            serde_json::to_string(&Verdict::Unverified).unwrap(),
            "\"UNVERIFIED\""
        );
    }
}
