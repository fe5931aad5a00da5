use crate::models::verdict::Verdict;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    FactChecker,
    Authoritative,
    Unclassified,
}

/// Raw web search hit as returned by a search collector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub trust_tier: TrustTier,
}

impl EvidenceItem {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
        trust_tier: TrustTier,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            trust_tier,
        }
    }

    /// Lower-cased `title snippet`, the text the lexicons scan.
    pub fn scan_text(&self) -> String {
        format!("{} {}", self.title, self.snippet).to_lowercase()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebVerdict {
    pub verdict: Verdict,
    pub confidence: f32,
    pub reasoning: String,
}
