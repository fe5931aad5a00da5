use crate::error::{SignalError, SignalResult};
use crate::models::ArbiterVerdict;
use crate::pipeline::traits::{ArbiterRequest, LlmArbiter};
use anyhow::{Context, Result};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

const CONTEXT_CHARS_PER_SOURCE: usize = 500;

const SYSTEM_PROMPT: &str = "You are an expert fact-checker and media forensics analyst. \
Answer only with a JSON object with keys: is_fake (boolean), confidence (number between 0 and 1), \
reasoning (short explanation).";

const IMAGE_PROMPT: &str = "Analyze whether this image is a DEEPFAKE or REAL. Look for \
AI-generated artifacts, unnatural lighting or shadows, inconsistent details and signs of digital \
manipulation. Respond in JSON: {\"is_fake\": true/false, \"confidence\": 0.0-1.0, \
\"reasoning\": \"brief explanation\"}";

const AUDIO_PROMPT: &str = "Analyze whether this audio is AI-GENERATED or a REAL HUMAN VOICE. \
Listen for unnatural speech patterns, a robotic or synthetic quality, inconsistent voice \
characteristics and voice-synthesis artifacts. Respond in JSON: {\"is_fake\": true/false, \
\"confidence\": 0.0-1.0, \"reasoning\": \"brief explanation\"}";

/// Secondary verification through an OpenAI-compatible chat endpoint.
pub struct OpenAiArbiter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiArbiter {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key), model)
    }

    /// For self-hosted or proxied endpoints.
    pub fn with_base(api_key: &str, api_base: &str, model: &str) -> Self {
        Self::with_config(
            OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(api_base),
            model,
        )
    }

    fn with_config(config: OpenAIConfig, model: &str) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }

    fn claim_prompt(text: &str, web_context: &[String], current_date: &str) -> String {
        let context = if web_context.is_empty() {
            String::new()
        } else {
            let blocks: Vec<String> = web_context
                .iter()
                .map(|b| b.chars().take(CONTEXT_CHARS_PER_SOURCE).collect())
                .collect();
            format!("\nAdditional context from web sources:\n{}\n", blocks.join("\n"))
        };
        format!(
            "Analyze this statement carefully, paying special attention to:\n\
1. TEMPORAL CONTEXT: is it about the past, present or future?\n\
2. CURRENT FACTS: as of {current_date}, what is the truth?\n\
3. CONTEXT: does the claim make sense right now?\n\n\
Statement to verify: \"{text}\"\n{context}\n\
Respond in JSON: {{\"is_fake\": true/false, \"confidence\": 0.0-1.0, \
\"reasoning\": \"why it is true or false right now\", \
\"temporal_analysis\": \"past/present/future context if relevant\"}}"
        )
    }

    /// Multimodal user turn. Built from JSON so the same path serves image and
    /// audio parts.
    fn media_message(request: &ArbiterRequest) -> Result<ChatCompletionRequestMessage> {
        let content = match request {
            ArbiterRequest::Image { bytes } => json!([
                { "type": "text", "text": IMAGE_PROMPT },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:{};base64,{}", image_mime(bytes), STANDARD.encode(bytes))
                    }
                }
            ]),
            ArbiterRequest::Audio { bytes } => json!([
                { "type": "text", "text": AUDIO_PROMPT },
                {
                    "type": "input_audio",
                    "input_audio": { "data": STANDARD.encode(bytes), "format": audio_format(bytes) }
                }
            ]),
            ArbiterRequest::Claim { .. } => anyhow::bail!("claims are sent as plain text"),
        };
        serde_json::from_value(json!({ "role": "user", "content": content }))
            .with_context(|| format!("building {} message", request.kind()))
    }

    async fn ask(&self, request: &ArbiterRequest) -> Result<String> {
        let user: ChatCompletionRequestMessage = match request {
            ArbiterRequest::Claim {
                text,
                web_context,
                current_date,
            } => ChatCompletionRequestUserMessageArgs::default()
                .content(Self::claim_prompt(text, web_context, current_date))
                .build()?
                .into(),
            _ => Self::media_message(request)?,
        };

        let chat = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                user,
            ])
            .build()?;

        let response = self.client.chat().create(chat).await?;
        response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .context("arbiter response missing content")
    }
}

#[derive(Deserialize)]
struct ArbiterReply {
    is_fake: bool,
    confidence: f32,
    reasoning: String,
    #[serde(default)]
    temporal_analysis: Option<String>,
}

/// Tolerates markdown fences and prose around the JSON object.
pub fn parse_reply(raw: &str) -> SignalResult<ArbiterVerdict> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let body = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned.trim(),
    };
    let reply: ArbiterReply = serde_json::from_str(body)
        .map_err(|e| SignalError::Malformed(format!("arbiter reply: {e}")))?;
    let reasoning = match reply.temporal_analysis.filter(|t| !t.trim().is_empty()) {
        Some(temporal) => format!("{} (temporal: {})", reply.reasoning.trim(), temporal.trim()),
        None => reply.reasoning.trim().to_string(),
    };
    Ok(ArbiterVerdict {
        is_fake: reply.is_fake,
        confidence: reply.confidence,
        reasoning,
    })
}

fn image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

fn audio_format(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"ID3") || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0) {
        "mp3"
    } else {
        "wav"
    }
}

#[async_trait]
impl LlmArbiter for OpenAiArbiter {
    async fn verify(&self, request: &ArbiterRequest) -> SignalResult<ArbiterVerdict> {
        let content = self.ask(request).await?;
        parse_reply(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"is_fake\": false, \"confidence\": 0.82, \"reasoning\": \"consistent shadows\"}\n```";
        let v = parse_reply(raw).unwrap();
        assert!(!v.is_fake);
        assert!((v.confidence - 0.82).abs() < 1e-6);
        assert_eq!(v.reasoning, "consistent shadows");
    }

    #[test]
    fn keeps_temporal_analysis() {
        let raw = "Here you go: {\"is_fake\": true, \"confidence\": 0.9, \"reasoning\": \"outdated\", \"temporal_analysis\": \"was true in 2019\"}";
        let v = parse_reply(raw).unwrap();
        assert!(v.is_fake);
        assert_eq!(v.reasoning, "outdated (temporal: was true in 2019)");
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(parse_reply("I cannot help with that."), Err(SignalError::Malformed(_))));
        assert!(matches!(
            parse_reply("{\"confidence\": 0.9}"),
            Err(SignalError::Malformed(_))
        ));
    }

    #[test]
    fn claim_prompt_carries_date_and_context() {
        let p = OpenAiArbiter::claim_prompt(
            "The PM resigned",
            &["Reuters: the PM resigned on Monday".to_string(), "x".repeat(900)],
            "October 2026",
        );
        assert!(p.contains("as of October 2026"));
        assert!(p.contains("Reuters: the PM resigned on Monday"));
        assert!(!p.contains(&"x".repeat(501)));
    }

    #[test]
    fn image_message_is_a_data_url() {
        let msg = OpenAiArbiter::media_message(&ArbiterRequest::Image {
            bytes: vec![0x89, b'P', b'N', b'G', 1, 2],
        })
        .unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("data:image/png;base64,"));
    }

    #[test]
    fn sniffs_media_types() {
        assert_eq!(image_mime(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(image_mime(b"GIF89a"), "image/gif");
        assert_eq!(audio_format(b"ID3\x04"), "mp3");
        assert_eq!(audio_format(b"RIFF....WAVE"), "wav");
    }
}
