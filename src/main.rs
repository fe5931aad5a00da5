use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use verdict_engine::config::valid_api_key;
use verdict_engine::pipeline::classifier::RemoteClassifier;
use verdict_engine::pipeline::fetch::HttpPageFetcher;
use verdict_engine::pipeline::llm_arbiter::OpenAiArbiter;
use verdict_engine::pipeline::tavily::TavilySearch;
use verdict_engine::{EngineConfig, Lexicons, SignalRegistry, VerdictEngine};

#[derive(Parser, Debug)]
#[command(name = "verdict")]
#[command(about = "Resolve a claim or media file to FAKE / REAL / UNVERIFIED")]
struct Args {
    #[command(subcommand)]
    input: Input,
}

#[derive(Subcommand, Debug)]
enum Input {
    /// Check a textual claim.
    Text { claim: String },
    /// Check an image file.
    Image { path: PathBuf },
    /// Check a video file (needs a frame decoder; none ships with the binary).
    Video { path: PathBuf },
    /// Check an audio file.
    Audio { path: PathBuf },
    /// Check a web page by URL.
    Url { url: String },
}

fn key(name: &str) -> Option<String> {
    env::var(name).ok().filter(|k| valid_api_key(k))
}

/// One inference endpoint per modality. Only the ones that are set get
/// registered; video frames fall back to the image endpoint.
#[derive(Debug, Default, PartialEq)]
struct ClassifierEndpoints {
    text: Option<String>,
    image: Option<String>,
    frame: Option<String>,
    audio: Option<String>,
}

impl ClassifierEndpoints {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            text: url("VERDICT_TEXT_CLASSIFIER_URL"),
            image: url("VERDICT_IMAGE_CLASSIFIER_URL"),
            frame: url("VERDICT_FRAME_CLASSIFIER_URL"),
            audio: url("VERDICT_AUDIO_CLASSIFIER_URL"),
        }
    }
}

fn build_registry(cfg: &EngineConfig) -> anyhow::Result<SignalRegistry> {
    let timeout = cfg.collector_timeout();
    let mut registry = SignalRegistry::new();

    if let Some(key) = key("TAVILY_API_KEY") {
        registry = registry.with_web_search(Arc::new(TavilySearch::new(&key, timeout)?));
    }
    if let Some(key) = key("OPENAI_API_KEY") {
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let arbiter = match env::var("OPENAI_API_BASE") {
            Ok(base) if !base.trim().is_empty() => OpenAiArbiter::with_base(&key, &base, &model),
            _ => OpenAiArbiter::new(&key, &model),
        };
        registry = registry.with_arbiter(Arc::new(arbiter));
    }

    let endpoints = ClassifierEndpoints::from_lookup(|name| env::var(name).ok());
    let token = key("VERDICT_CLASSIFIER_TOKEN");
    let remote = |endpoint: &str| -> anyhow::Result<Arc<RemoteClassifier>> {
        Ok(Arc::new(RemoteClassifier::new(endpoint, token.clone(), timeout)?))
    };
    if let Some(url) = &endpoints.text {
        registry = registry.with_text_classifier(remote(url)?);
    }
    if let Some(url) = &endpoints.image {
        registry = registry.with_image_classifier(remote(url)?);
    }
    if let Some(url) = &endpoints.frame {
        registry = registry.with_frame_classifier(remote(url)?);
    }
    if let Some(url) = &endpoints.audio {
        registry = registry.with_audio_classifier(remote(url)?);
    }
    registry = registry.with_page_fetcher(Arc::new(HttpPageFetcher::new(timeout)?));
    Ok(registry)
}

fn read(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("verdict_engine=info,verdict=info")),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let cfg = EngineConfig::from_env()?;
    let lexicons = Lexicons::from_config(&cfg)?;
    let registry = build_registry(&cfg)?;
    let engine = VerdictEngine::new(registry, &lexicons, cfg)?;

    let result = match &args.input {
        Input::Text { claim } => engine.resolve_text(claim).await?,
        Input::Image { path } => engine.resolve_image(&read(path)?).await?,
        Input::Video { path } => engine.resolve_video(&read(path)?).await?,
        Input::Audio { path } => engine.resolve_audio(&read(path)?).await?,
        Input::Url { url } => engine.resolve_url(url).await?,
    };
    info!(verdict = %result.verdict, "done");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn each_modality_has_its_own_endpoint() {
        let endpoints = ClassifierEndpoints::from_lookup(lookup(&[
            ("VERDICT_TEXT_CLASSIFIER_URL", "https://infer.example/text"),
            ("VERDICT_IMAGE_CLASSIFIER_URL", " https://infer.example/image "),
        ]));
        assert_eq!(endpoints.text.as_deref(), Some("https://infer.example/text"));
        assert_eq!(endpoints.image.as_deref(), Some("https://infer.example/image"));
        assert_eq!(endpoints.frame, None);
        assert_eq!(endpoints.audio, None);
    }

    #[test]
    fn blank_or_shared_endpoint_registers_nothing() {
        let endpoints = ClassifierEndpoints::from_lookup(lookup(&[
            ("VERDICT_CLASSIFIER_URL", "https://infer.example/any"),
            ("VERDICT_AUDIO_CLASSIFIER_URL", "   "),
        ]));
        assert_eq!(endpoints, ClassifierEndpoints::default());
    }
}
