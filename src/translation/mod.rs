// src/translation/mod.rs
//! Chunked, paced, retrying translation of long free text

pub mod google;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

pub use google::GoogleTranslateBackend;

pub const FAILED_SENTINEL: &str = "[Translation failed]";
pub const MAX_CHUNK_CHARS: usize = 5000;
const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];
const RATE_LIMIT_MARKERS: [&str; 3] = ["too many requests", "rate limit", "429"];

/// A single remote translation call
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
}

#[async_trait]
impl<T: TranslationBackend + ?Sized> TranslationBackend for Box<T> {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        (**self).translate(text, target_lang).await
    }
}

/// Attempt limits and delays applied per chunk
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub max_chunk_chars: usize,
    /// Pause between consecutive chunks
    pub chunk_delay: Duration,
    /// Retry `n` waits `2^n * backoff_unit`
    pub backoff_unit: Duration,
    /// A rate-limited attempt `n` additionally waits `(n + 1) * rate_limit_step`
    pub rate_limit_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_chunk_chars: MAX_CHUNK_CHARS,
            chunk_delay: Duration::from_millis(500),
            backoff_unit: Duration::from_secs(1),
            rate_limit_step: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_unit * 2u32.saturating_pow(attempt)
    }

    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_step * (attempt + 1)
    }
}

pub struct Translator<B> {
    backend: B,
    policy: RetryPolicy,
    target_lang: String,
}

impl<B: TranslationBackend> Translator<B> {
    /// Translator targeting English with the default policy
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: RetryPolicy::default(),
            target_lang: "en".to_string(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Translate `text` chunk by chunk. Never fails: a chunk that exhausts
    /// its attempts is replaced by [`FAILED_SENTINEL`].
    pub async fn translate(&self, text: &str) -> String {
        let chunks = split_into_chunks(text, self.policy.max_chunk_chars);
        debug!("Translating {} chunk(s)", chunks.len());

        let mut translated = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            translated.push(self.translate_chunk(chunk).await);

            if index + 1 < chunks.len() {
                sleep(self.policy.chunk_delay).await;
            }
        }

        translated.join(" ")
    }

    async fn translate_chunk(&self, chunk: &str) -> String {
        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                let backoff = self.policy.backoff_delay(attempt);
                info!("Retrying after {}ms delay...", backoff.as_millis());
                sleep(backoff).await;
            }

            match self.backend.translate(chunk, &self.target_lang).await {
                Ok(text) => return text,
                Err(e) => {
                    let message = format!("{:#}", e);
                    warn!("Translation error (attempt {}): {}", attempt + 1, message);

                    if is_rate_limited(&message) && attempt + 1 < self.policy.max_attempts {
                        let wait = self.policy.rate_limit_delay(attempt);
                        info!(
                            "Rate limit detected, waiting {}ms before retry...",
                            wait.as_millis()
                        );
                        sleep(wait).await;
                    }
                }
            }
        }

        error!(
            "Giving up on chunk after {} attempts",
            self.policy.max_attempts
        );
        FAILED_SENTINEL.to_string()
    }
}

pub fn is_rate_limited(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Split `text` into trimmed chunks of at most `max_chars` characters.
///
/// A chunk ends after the last `.`, `!` or `?` inside the window; failing
/// that, at the last space; failing that, the window is cut hard. The
/// window excludes index `start + max_chars`, so punctuation sitting exactly
/// there does not count and the chunk falls back to the last space.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + max_chars).min(chars.len());

        if end < chars.len() {
            let window = &chars[start..end];
            let punctuation = window
                .iter()
                .rposition(|c| SENTENCE_ENDINGS.contains(c))
                .filter(|&pos| pos > 0);
            let space = window.iter().rposition(|c| *c == ' ').filter(|&pos| pos > 0);

            if let Some(pos) = punctuation {
                end = start + pos + 1;
            } else if let Some(pos) = space {
                end = start + pos;
            }
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        start = end;
    }

    chunks
}
