use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use futures::future::try_join_all;
use regex::Regex;
use tracing::{debug, error};
use url::Url;

use crate::cli::chat::speech::{SpeechError, SpeechSynthesizer};

/// Longest piece of text the translate endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

const LANGUAGE: &str = "en";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

/// Speech synthesis through the Google Translate TTS endpoint, returning MP3.
pub struct GoogleTranslateTts {
    endpoint: Url,
    client: reqwest::Client,
}

impl GoogleTranslateTts {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { endpoint, client })
    }

    fn chunk_url(&self, chunk: &str, idx: usize, total: usize) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", chunk)
            .append_pair("tl", LANGUAGE)
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &chunk.chars().count().to_string())
            .append_pair("client", "tw-ob");
        url
    }

    async fn fetch_chunk(&self, chunk: &str, idx: usize, total: usize) -> Result<Vec<u8>, SpeechError> {
        let url = self.chunk_url(chunk, idx, total);
        debug!("Requesting speech chunk {}/{}: {:?}", idx + 1, total, chunk);

        let response = self.client.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            error!("Speech request failed with status {}", status);
            return Err(SpeechError::Status(status.as_u16()));
        }

        Ok(response.bytes().await.map_err(network_error)?.to_vec())
    }
}

fn network_error(e: reqwest::Error) -> SpeechError {
    SpeechError::Network(Box::new(e))
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        let total = chunks.len();

        // MP3 frames concatenate cleanly, so the pieces can be fetched in
        // parallel and joined in order.
        let parts = try_join_all(
            chunks
                .iter()
                .enumerate()
                .map(|(idx, chunk)| self.fetch_chunk(chunk, idx, total)),
        )
        .await?;

        let audio = parts.concat();
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(audio)
    }
}

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?;:,\n]+[.!?;:,\n]*").expect("sentence pattern is valid"))
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Cuts at punctuation first, then at whitespace, and only splits inside a
/// word when that word alone is too long. Neighbouring pieces are merged
/// back together while they still fit.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    for sentence in sentence_pattern().find_iter(text) {
        let sentence = sentence.as_str().trim();
        if sentence.is_empty() {
            continue;
        }
        if sentence.chars().count() <= max_chars {
            pieces.push(sentence.to_string());
        } else {
            pieces.extend(split_on_whitespace(sentence, max_chars));
        }
    }

    let mut merged: Vec<String> = Vec::new();
    for piece in pieces {
        match merged.last_mut() {
            Some(last) if last.chars().count() + 1 + piece.chars().count() <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            _ => merged.push(piece),
        }
    }
    merged
}

fn split_on_whitespace(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if current_len > 0 && current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }

        if word_len <= max_chars {
            current.push_str(word);
        } else {
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                out.push(piece.iter().collect());
            }
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}
