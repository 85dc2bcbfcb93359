use async_trait::async_trait;
use reqwest::{Client, Url};

use super::chunker;
use super::{SpeechSynthesizer, TtsError};

const USER_AGENT: &str = concat!("polyglot-server/", env!("CARGO_PKG_VERSION"));

const NORMAL_SPEED: &str = "1";
const SLOW_SPEED: &str = "0.3";

/// Client for the Google Translate `translate_tts` endpoint.
pub struct GoogleTts {
    client: Client,
    endpoint: Url,
}

impl GoogleTts {
    pub fn new(endpoint: Url) -> Result<Self, TtsError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, lang: &str, slow: bool) -> Result<Vec<u8>, TtsError> {
        let chunks = chunker::chunk(text);
        let total = chunks.len().to_string();
        let speed = if slow { SLOW_SPEED } else { NORMAL_SPEED };

        tracing::debug!(lang, slow, chunks = chunks.len(), "Requesting speech synthesis");

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();

            let bytes = self
                .client
                .get(self.endpoint.clone())
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", lang),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                    ("ttsspeed", speed),
                ])
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?;

            // MP3 frames are self-delimiting, so segments play back to back.
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }

        Ok(audio)
    }
}
