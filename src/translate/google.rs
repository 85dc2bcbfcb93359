use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::{TranslateError, Translation, Translator};

const USER_AGENT: &str = concat!("polyglot-server/", env!("CARGO_PKG_VERSION"));

/// Client for the public Google Translate web endpoint (`translate_a/single`).
pub struct GoogleTranslator {
    client: Client,
    endpoint: Url,
}

impl GoogleTranslator {
    pub fn new(endpoint: Url) -> Result<Self, TranslateError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, TranslateError> {
        tracing::debug!(
            source,
            target,
            chars = text.chars().count(),
            "Requesting translation"
        );

        // Text goes in the form body: 5000 characters do not fit in a query string.
        let body: Value = self
            .client
            .post(self.endpoint.clone())
            .query(&[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("dt", "rm"),
            ])
            .form(&[("q", text)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_response(&body)
    }
}

/// Reads the nested-array payload:
/// `[0]` sentence segments `[translated, original, ..]`, where a trailing
/// segment with no translated string carries the transliteration at index 2;
/// `[2]` detected source language; `[6]` confidence.
pub fn parse_response(body: &Value) -> Result<Translation, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing sentence segments".into()))?;

    let mut text = String::new();
    let mut pronunciation = None;

    for segment in segments {
        match segment.get(0).and_then(Value::as_str) {
            Some(chunk) => text.push_str(chunk),
            None => {
                if let Some(translit) = segment.get(2).and_then(Value::as_str) {
                    pronunciation = Some(translit.to_string());
                }
            }
        }
    }

    if text.is_empty() {
        return Err(TranslateError::Malformed("empty translation".into()));
    }

    Ok(Translation {
        text,
        pronunciation,
        detected_lang: body.get(2).and_then(Value::as_str).map(str::to_string),
        confidence: body.get(6).and_then(Value::as_f64),
    })
}
