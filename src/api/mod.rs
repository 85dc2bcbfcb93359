pub mod handlers;
pub mod help;
pub mod page;
pub mod routes;


use serde::{Deserialize, Serialize};

use crate::languages::{AUTO, DEFAULT_SPEECH_LANG};
use crate::stt::Transcript;
use crate::translate::TranslationResult;

fn default_source_lang() -> String {
    AUTO.to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_speech_lang() -> String {
    DEFAULT_SPEECH_LANG.to_string()
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
    pub pronunciation: String,
    pub source_lang: String,
    pub target_lang: String,
    pub detected_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl From<TranslationResult> for TranslateResponse {
    fn from(result: TranslationResult) -> Self {
        Self {
            original_text: result.original_text,
            translated_text: result.translated_text,
            pronunciation: result.pronunciation,
            source_lang: result.source_lang,
            target_lang: result.target_lang,
            detected_lang: result.detected_lang,
            confidence: result.confidence,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_speech_lang")]
    pub lang: String,
    #[serde(default)]
    pub slow: bool,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub text: String,
    pub language: String,
    pub confidence: Option<f64>,
}

impl From<Transcript> for TranscriptResponse {
    fn from(transcript: Transcript) -> Self {
        Self {
            text: transcript.text,
            language: transcript.language,
            confidence: transcript.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub translator_available: bool,
    pub supported_languages: usize,
    pub version: String,
}
