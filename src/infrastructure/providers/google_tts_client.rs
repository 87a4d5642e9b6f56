use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

use super::http::{build_client, ensure_success};
use crate::application::ports::{ProviderError, ProviderOutput, SpeechSynthesizer};

/// Longest piece the translate endpoint accepts in one request.
pub const MAX_PIECE_CHARS: usize = 100;

/// Speech synthesis through Google Translate's TTS endpoint. Long text is
/// split on whitespace and the MP3 pieces are concatenated.
pub struct GoogleTtsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTtsClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_piece(
        &self,
        piece: &str,
        language: &str,
        index: usize,
        total: usize,
    ) -> Result<bytes::Bytes, ProviderError> {
        let response = self
            .client
            .get(format!("{}/translate_tts", self.base_url))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", piece),
                ("tl", language),
                ("total", &total.to_string()),
                ("idx", &index.to_string()),
                ("textlen", &piece.chars().count().to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("tts", e))?;

        ensure_success(response, "tts")
            .await?
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest("tts body", e))
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsClient {
    async fn synthesize(
        &self,
        text: &str,
        language: &str,
    ) -> Result<ProviderOutput, ProviderError> {
        let pieces = split_text(text, MAX_PIECE_CHARS);
        if pieces.is_empty() {
            return Err(ProviderError::InvalidInput("missing text".to_string()));
        }

        let mut audio = BytesMut::new();
        for (index, piece) in pieces.iter().enumerate() {
            let bytes = self
                .fetch_piece(piece, language, index, pieces.len())
                .await?;
            audio.extend_from_slice(&bytes);
        }

        tracing::debug!(pieces = pieces.len(), bytes = audio.len(), "Speech synthesized");
        Ok(ProviderOutput::new(audio.freeze(), "mp3", "audio/mpeg"))
    }
}

/// Greedy whitespace split into pieces of at most `max_chars` characters.
/// Words longer than the limit are cut.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            pieces.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
