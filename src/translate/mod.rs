pub mod google;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::languages::{self, AUTO};

pub use google::GoogleTranslator;

pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// What a translation backend hands back. Everything but the text is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub text: String,
    pub pronunciation: Option<String>,
    pub detected_lang: Option<String>,
    pub confidence: Option<f64>,
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: String,
    /// Backend transliteration, or the translated text when there is none.
    pub pronunciation: String,
    pub source_lang: String,
    pub target_lang: String,
    /// Backend detection, or the requested source code when there is none.
    pub detected_lang: String,
    pub confidence: Option<f64>,
}

pub struct TranslationService {
    translator: Option<Arc<dyn Translator>>,
}

impl TranslationService {
    pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
        Self { translator }
    }

    pub fn is_available(&self) -> bool {
        self.translator.is_some()
    }

    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest(
                "No text provided for translation".into(),
            ));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(AppError::BadRequest(format!(
                "Text too long. Maximum {} characters allowed.",
                MAX_TEXT_CHARS
            )));
        }
        if !languages::is_supported(source) {
            return Err(unsupported(source));
        }
        if target == AUTO || !languages::is_supported(target) {
            return Err(unsupported(target));
        }

        if source == target && source != AUTO {
            return Ok(TranslationResult {
                original_text: text.to_string(),
                translated_text: text.to_string(),
                pronunciation: text.to_string(),
                source_lang: source.to_string(),
                target_lang: target.to_string(),
                detected_lang: source.to_string(),
                confidence: None,
            });
        }

        let translator = self
            .translator
            .as_ref()
            .ok_or(AppError::TranslatorUnavailable)?;

        let translation = translator
            .translate(text, source, target)
            .await
            .map_err(|e| AppError::TranslationFailed(e.to_string()))?;

        let pronunciation = translation
            .pronunciation
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| translation.text.clone());

        Ok(TranslationResult {
            original_text: text.to_string(),
            translated_text: translation.text,
            pronunciation,
            source_lang: source.to_string(),
            target_lang: target.to_string(),
            detected_lang: translation
                .detected_lang
                .unwrap_or_else(|| source.to_string()),
            confidence: translation.confidence,
        })
    }
}

fn unsupported(code: &str) -> AppError {
    AppError::BadRequest(format!("Unsupported language: {}", code))
}
