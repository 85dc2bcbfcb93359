use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::Url;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_SPEECH_URL: &str = "http://www.google.com/speech-api/v2/recognize";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("PORT must be a number, got '{0}'")]
    InvalidPort(String),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub translate_url: Url,
    pub tts_url: Url,
    pub speech_url: Url,
    pub speech_api_key: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => 5000,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));
        let scratch_dir = lookup("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        let translate_url = parse_url(&lookup, "TRANSLATE_URL", DEFAULT_TRANSLATE_URL)?;
        let tts_url = parse_url(&lookup, "TTS_URL", DEFAULT_TTS_URL)?;
        let speech_url = parse_url(&lookup, "SPEECH_URL", DEFAULT_SPEECH_URL)?;
        let speech_api_key = lookup("SPEECH_API_KEY").filter(|k| !k.is_empty());

        Ok(Self {
            host,
            port,
            static_dir,
            scratch_dir,
            translate_url,
            tts_url,
            speech_url,
            speech_api_key,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

fn parse_url<F>(lookup: &F, name: &'static str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.translate_url.as_str(), DEFAULT_TRANSLATE_URL);
        assert!(config.speech_api_key.is_none());
        assert_eq!(config.bind_addr().unwrap().port(), 5000);
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "8080")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_invalid_url() {
        let err = ServerConfig::from_lookup(lookup(&[("TTS_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "TTS_URL", .. }));
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let config = ServerConfig::from_lookup(lookup(&[("SPEECH_API_KEY", "")])).unwrap();
        assert!(config.speech_api_key.is_none());
    }
}
