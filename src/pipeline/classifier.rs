use crate::error::{SignalError, SignalResult};
use crate::models::ClassifierOutput;
use crate::pipeline::traits::{MediaClassifier, TextClassifier};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Client for a hosted inference endpoint (Hugging Face style). Text is sent
/// as `{"inputs": ...}`, media as a raw octet stream.
pub struct RemoteClassifier {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

/// Inference servers disagree on nesting; accept all three shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Prediction {
    Single(ClassifierOutput),
    Flat(Vec<ClassifierOutput>),
    Nested(Vec<Vec<ClassifierOutput>>),
}

impl Prediction {
    fn best(self) -> Option<ClassifierOutput> {
        let all = match self {
            Prediction::Single(p) => vec![p],
            Prediction::Flat(ps) => ps,
            Prediction::Nested(pss) => pss.into_iter().flatten().collect(),
        };
        all.into_iter()
            .filter(|p| p.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

impl RemoteClassifier {
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> SignalResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("verdict-engine/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token,
        })
    }

    async fn send(&self, req: RequestBuilder) -> SignalResult<ClassifierOutput> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send().await?;
        let status = resp.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNSUPPORTED_MEDIA_TYPE | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            let detail = resp.text().await.unwrap_or_default();
            return Err(SignalError::Rejected(format!("{status}: {}", detail.trim())));
        }
        if !status.is_success() {
            return Err(SignalError::Unavailable(format!("classifier returned {status}")));
        }
        let prediction: Prediction = resp.json().await?;
        prediction
            .best()
            .ok_or_else(|| SignalError::Malformed("classifier returned no labels".to_string()))
    }
}

#[async_trait]
impl TextClassifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> SignalResult<ClassifierOutput> {
        self.send(
            self.http
                .post(&self.endpoint)
                .json(&serde_json::json!({ "inputs": text })),
        )
        .await
    }
}

#[async_trait]
impl MediaClassifier for RemoteClassifier {
    async fn classify(&self, bytes: &[u8]) -> SignalResult<ClassifierOutput> {
        self.send(
            self.http
                .post(&self.endpoint)
                .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                .body(bytes.to_vec()),
        )
        .await
    }
}
