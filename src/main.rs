use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod languages;
mod stt;
mod translate;
mod tts;

use api::routes::{create_router, AppState};
use config::ServerConfig;
use stt::{GoogleRecognizer, SttService};
use translate::{GoogleTranslator, TranslationService, Translator};
use tts::{GoogleTts, TtsService};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");
    let addr = config.bind_addr().expect("Invalid address");

    tracing::info!("Polyglot Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static directory: {}", config.static_dir.display());

    // A translator that fails to build leaves the rest of the service usable.
    let translator: Option<Arc<dyn Translator>> =
        match GoogleTranslator::new(config.translate_url.clone()) {
            Ok(t) => Some(Arc::new(t)),
            Err(e) => {
                tracing::warn!("Translation service unavailable: {}", e);
                None
            }
        };
    tracing::info!("Translator available: {}", translator.is_some());

    let synthesizer = GoogleTts::new(config.tts_url.clone()).expect("Failed to build TTS client");
    let recognizer = GoogleRecognizer::new(
        config.speech_url.clone(),
        config.speech_api_key.clone(),
    )
    .expect("Failed to build speech recognition client");

    if config.speech_api_key.is_none() {
        tracing::warn!("SPEECH_API_KEY is not set; speech recognition requests may be refused");
    }

    // Create app state
    let state = Arc::new(AppState {
        translation: TranslationService::new(translator),
        tts: TtsService::new(Arc::new(synthesizer)),
        stt: SttService::new(Arc::new(recognizer), config.scratch_dir.clone()),
    });

    // Create router
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
