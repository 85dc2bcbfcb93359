use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Url};
use serde::Deserialize;

use super::{AudioClip, Recognition, SpeechRecognizer, SttError};

const USER_AGENT: &str = concat!("polyglot-server/", env!("CARGO_PKG_VERSION"));

/// Client for the Chromium speech endpoint (`speech-api/v2/recognize`).
pub struct GoogleRecognizer {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl GoogleRecognizer {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self, SttError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleRecognizer {
    async fn recognize(&self, audio: &AudioClip, lang: &str) -> Result<Recognition, SttError> {
        tracing::debug!(
            lang,
            seconds = audio.duration_secs(),
            "Requesting speech recognition"
        );

        let mut request = self.client.post(self.endpoint.clone()).query(&[
            ("client", "chromium"),
            ("lang", lang),
            ("output", "json"),
        ]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let body = request
            .header(
                CONTENT_TYPE,
                format!("audio/l16; rate={}", audio.sample_rate),
            )
            .body(audio.to_l16_be())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ResponseLine {
    #[serde(default)]
    result: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    transcript: String,
    confidence: Option<f64>,
}

/// The endpoint answers with one JSON object per line, usually an empty
/// `{"result":[]}` first. The first line carrying an alternative wins.
pub fn parse_response(body: &str) -> Result<Recognition, SttError> {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parsed: ResponseLine =
            serde_json::from_str(line).map_err(|e| SttError::Malformed(e.to_string()))?;

        let best = parsed
            .result
            .into_iter()
            .flat_map(|entry| entry.alternative)
            .next();

        if let Some(best) = best {
            if best.transcript.trim().is_empty() {
                continue;
            }
            return Ok(Recognition {
                text: best.transcript,
                confidence: best.confidence,
            });
        }
    }

    Err(SttError::Unintelligible)
}
