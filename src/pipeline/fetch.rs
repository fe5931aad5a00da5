use crate::error::{SignalError, SignalResult};
use crate::pipeline::traits::PageFetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const MAX_PAGE_CHARS: usize = 5_000;

/// Provenance of a fetched page.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMeta {
    pub url: Url,
    pub retrieved_at_rfc3339: String,
    pub sha256_hex: String,
}

impl SourceMeta {
    /// Stamps a body retrieved from `url` just now.
    pub fn for_body(url: &Url, body: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        Self {
            url: url.clone(),
            retrieved_at_rfc3339: Utc::now().to_rfc3339(),
            sha256_hex: format!("{:x}", hasher.finalize()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub source: SourceMeta,
    pub text: String,
}

/// Pulls readable prose out of HTML: paragraphs and headings first, the whole
/// body as a fallback.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    noise: Regex,
    blocks: Regex,
    tags: Regex,
    spaces: Regex,
}

impl TextExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            noise: Regex::new(r"(?is)<(?:script|style|noscript|nav|footer)\b.*?</(?:script|style|noscript|nav|footer)>")?,
            blocks: Regex::new(r"(?is)<(?:p|h[1-6])\b[^>]*>(.*?)</(?:p|h[1-6])>")?,
            tags: Regex::new(r"(?s)<[^>]*>")?,
            spaces: Regex::new(r"\s+")?,
        })
    }

    pub fn extract(&self, html: &str, max_chars: usize) -> String {
        let html = self.noise.replace_all(html, " ");
        let blocks: Vec<String> = self
            .blocks
            .captures_iter(&html)
            .filter_map(|c| c.get(1))
            .map(|m| self.clean(m.as_str()))
            .filter(|b| !b.is_empty())
            .collect();
        let text = if blocks.is_empty() {
            self.clean(&html)
        } else {
            blocks.join(" ")
        };
        text.chars().take(max_chars).collect()
    }

    fn clean(&self, fragment: &str) -> String {
        let text = self.tags.replace_all(fragment, " ");
        let text = decode_entities(&text);
        self.spaces.replace_all(&text, " ").trim().to_string()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub struct HttpPageFetcher {
    client: Client,
    extractor: TextExtractor,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!("verdict-engine/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .context("building http client")?,
            extractor: TextExtractor::new()?,
        })
    }

    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        let body = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let source = SourceMeta::for_body(url, &body);
        Ok(FetchedPage {
            text: self.extractor.extract(&body, MAX_PAGE_CHARS),
            source,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &Url) -> SignalResult<String> {
        let page = self.fetch_page(url).await?;
        debug!(
            url = %page.source.url,
            sha256 = %page.source.sha256_hex,
            retrieved_at = %page.source.retrieved_at_rfc3339,
            chars = page.text.chars().count(),
            "fetched page"
        );
        if page.text.is_empty() {
            return Err(SignalError::Malformed("page has no readable text".to_string()));
        }
        Ok(page.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_and_headings_win() {
        let html = r#"<html><head><style>p { color: red }</style></head><body>
            <nav><p>Home | About</p></nav>
            <h1>Council approves budget</h1>
            <p class="lead">The council voted <b>7&ndash;2</b> on Tuesday.</p>
            <script>var p = "<p>ignored</p>";</script>
            <p>Spending rises by 4&nbsp;percent &amp; taxes stay flat.</p>
        </body></html>"#;
        let text = TextExtractor::new().unwrap().extract(html, MAX_PAGE_CHARS);
        assert_eq!(
            text,
            "Council approves budget The council voted 7&ndash;2 on Tuesday. Spending rises by 4 percent & taxes stay flat."
        );
    }

    #[test]
    fn falls_back_to_body_text() {
        let html = "<div>Just <span>a</span> div</div>";
        let text = TextExtractor::new().unwrap().extract(html, MAX_PAGE_CHARS);
        assert_eq!(text, "Just a div");
    }

    #[test]
    fn output_is_capped() {
        let html = format!("<p>{}</p>", "word ".repeat(5_000));
        let text = TextExtractor::new().unwrap().extract(&html, MAX_PAGE_CHARS);
        assert_eq!(text.chars().count(), MAX_PAGE_CHARS);
    }

    #[test]
    fn source_meta_records_digest_and_retrieval_time() {
        let url = Url::parse("https://news.example.net/a").unwrap();
        let meta = SourceMeta::for_body(&url, "abc");
        assert_eq!(meta.url, url);
        assert_eq!(
            meta.sha256_hex,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(chrono::DateTime::parse_from_rfc3339(&meta.retrieved_at_rfc3339).is_ok());
    }
}
