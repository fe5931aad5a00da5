use crate::error::{SignalError, SignalResult};
use crate::models::SearchHit;
use crate::pipeline::traits::WebSearch;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

pub struct TavilySearch {
    http: Client,
    key: String,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f32,
}

impl TavilySearch {
    pub fn new(key: &str, timeout: Duration) -> SignalResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("verdict-engine/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str, max_results: usize) -> SignalResult<Vec<SearchHit>> {
        let resp = self
            .http
            .post(TAVILY_ENDPOINT)
            .json(&serde_json::json!({
                "api_key": self.key,
                "query": query,
                "max_results": max_results,
                "search_depth": "advanced",
            }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SignalError::Unavailable(format!("tavily returned {status}")));
        }
        let body: TavilyResponse = resp.json().await?;
        Ok(body
            .results
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
            })
            .collect())
    }
}
