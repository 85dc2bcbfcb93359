pub mod chunker;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::languages;

pub use google::GoogleTts;

pub const MAX_TEXT_CHARS: usize = 1000;

#[derive(thiserror::Error, Debug)]
pub enum TtsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned no audio")]
    EmptyAudio,
}

/// Turns text into MP3 audio.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, lang: &str, slow: bool) -> Result<Vec<u8>, TtsError>;
}

pub struct TtsService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl TtsService {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }

    pub async fn speak(&self, text: &str, lang: &str, slow: bool) -> Result<Vec<u8>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest(
                "No text provided for speech synthesis".into(),
            ));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(AppError::BadRequest(format!(
                "Text too long for speech synthesis. Maximum {} characters allowed.",
                MAX_TEXT_CHARS
            )));
        }

        let lang = languages::speech_lang(lang);

        self.synthesizer
            .synthesize(text, lang, slow)
            .await
            .map_err(|e| AppError::SynthesisFailed(e.to_string()))
    }
}
