pub mod audio;
pub mod google;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;

use crate::error::AppError;
use crate::languages;

pub use audio::AudioClip;
pub use google::GoogleRecognizer;

pub const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum SttError {
    #[error("audio could not be understood")]
    Unintelligible,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self, audio: &AudioClip, lang: &str) -> Result<Recognition, SttError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub language: String,
    pub confidence: Option<f64>,
}

pub struct SttService {
    recognizer: Arc<dyn SpeechRecognizer>,
    scratch_dir: PathBuf,
}

impl SttService {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, scratch_dir: PathBuf) -> Self {
        Self {
            recognizer,
            scratch_dir,
        }
    }

    pub async fn transcribe(&self, audio: Bytes, lang: &str) -> Result<Transcript, AppError> {
        if audio.is_empty() {
            return Err(AppError::BadRequest("No audio file provided".into()));
        }
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(AppError::BadRequest(
                "Audio file too large. Maximum size is 10MB.".into(),
            ));
        }

        let lang = languages::speech_lang(lang);

        let scratch = tempfile::Builder::new()
            .prefix("speech-")
            .suffix(".wav")
            .tempfile_in(&self.scratch_dir)?;

        let outcome = self.transcribe_file(scratch.path(), audio, lang).await;

        // The scratch file goes away on every outcome.
        let path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            tracing::warn!("Failed to remove scratch file {}: {}", path.display(), e);
        }

        outcome
    }

    async fn transcribe_file(
        &self,
        path: &Path,
        bytes: Bytes,
        lang: &str,
    ) -> Result<Transcript, AppError> {
        let path = path.to_path_buf();
        let calibrated = tokio::task::spawn_blocking(move || -> Result<_, AppError> {
            std::fs::write(&path, &bytes)?;
            let clip = audio::read_wav(&path)
                .map_err(|e| AppError::BadRequest(format!("Unsupported audio format: {}", e)))?;
            Ok(audio::adjust_for_ambient_noise(clip))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        tracing::debug!(
            lang,
            seconds = calibrated.clip.duration_secs(),
            threshold = calibrated.energy_threshold,
            "Calibrated audio for recognition"
        );

        if !calibrated.has_speech() {
            return Err(AppError::AudioNotUnderstood);
        }

        let recognition = self
            .recognizer
            .recognize(&calibrated.clip, lang)
            .await
            .map_err(|e| match e {
                SttError::Unintelligible => AppError::AudioNotUnderstood,
                other => AppError::RecognitionFailed(other.to_string()),
            })?;

        Ok(Transcript {
            text: recognition.text,
            language: lang.to_string(),
            confidence: recognition.confidence,
        })
    }
}
