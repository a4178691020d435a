//! Remote backend using Google Translate's speech endpoint
//!
//! The endpoint returns MP3 and only accepts short snippets, so text is cut
//! into chunks at sentence and then word boundaries and the responses are
//! concatenated. MP3 frames are self-contained, so the joined bytes decode
//! as one stream.

use crate::config::Config;
use crate::speech::SpeechSynthesizer;
use crate::voices::VoiceProfile;
use crate::{NovelReaderError, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use std::time::Duration;

/// A sentence with its closing punctuation, or trailing text without any
static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]*|[.!?]+").expect("sentence pattern is valid"));

static SPACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

const USER_AGENT: &str = concat!("novelreader/", env!("CARGO_PKG_VERSION"));

/// Google Translate text-to-speech client
pub struct GoogleTts {
    client: Client,
    chunk_chars: usize,
}

impl GoogleTts {
    pub fn new(timeout: Duration, chunk_chars: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                NovelReaderError::Synthesis(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            chunk_chars: chunk_chars.max(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.google_timeout(), config.google_chunk_chars())
    }

    /// Endpoint for a voice's regional domain
    fn endpoint(voice: &VoiceProfile) -> String {
        format!(
            "https://translate.google.{}/translate_tts",
            voice.region_variant
        )
    }

    fn fetch_chunk(
        &self,
        voice: &VoiceProfile,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        let url = Self::endpoint(voice);
        let speed = voice.speaking_rate_factor.to_string();
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", voice.locale),
                ("ttsspeed", speed.as_str()),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
                ("q", chunk),
            ])
            .send()
            .map_err(|e| NovelReaderError::Synthesis(format!("Request to {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(|e| NovelReaderError::Synthesis(format!("{} refused request: {}", url, e)))?;

        let bytes = response.bytes().map_err(|e| {
            NovelReaderError::Synthesis(format!("Failed reading response from {}: {}", url, e))
        })?;
        Ok(bytes.to_vec())
    }
}

impl SpeechSynthesizer for GoogleTts {
    fn name(&self) -> &str {
        "google"
    }

    fn synthesize(&mut self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>> {
        let chunks = chunk_text(text, self.chunk_chars);
        if chunks.is_empty() {
            return Err(NovelReaderError::Synthesis("No text to speak".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            debug!(
                "Requesting chunk {}/{} ({} chars) from google.{}",
                idx + 1,
                chunks.len(),
                chunk.len(),
                voice.region_variant
            );
            audio.extend(self.fetch_chunk(voice, chunk, idx, chunks.len())?);
        }

        if audio.is_empty() {
            return Err(NovelReaderError::Synthesis(
                "Remote backend returned no audio".to_string(),
            ));
        }
        Ok(audio)
    }
}

/// Cut text into pieces of at most `max_len` bytes
///
/// Sentences are kept whole when they fit; longer sentences are packed
/// word by word. A single word longer than the limit becomes its own chunk.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let text = SPACES_RE.replace_all(text.trim(), " ");
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in SENTENCE_RE.find_iter(&text) {
        let sentence = sentence.as_str().trim();
        if sentence.is_empty() {
            continue;
        }

        // Pack whole sentences together while they fit
        if sentence.len() <= max_len {
            if current.is_empty() {
                current.push_str(sentence);
            } else if current.len() + 1 + sentence.len() <= max_len {
                current.push(' ');
                current.push_str(sentence);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(sentence);
            }
            continue;
        }

        for word in sentence.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.len() + 1 + word.len() <= max_len {
                current.push(' ');
                current.push_str(word);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
