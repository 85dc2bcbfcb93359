use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::error::AppError;
use crate::stt::SttService;
use crate::translate::TranslationService;
use crate::tts::TtsService;

/// Largest request body accepted; room for a 10 MB upload plus multipart framing.
pub const MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;

pub struct AppState {
    pub translation: TranslationService,
    pub tts: TtsService,
    pub stt: SttService,
}

pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Known paths answer other methods with a JSON 405, and missing static
    // files get the same JSON 404 as unknown routes.
    let method_not_allowed = handlers::method_not_allowed;
    let static_files =
        ServeDir::new(static_dir).not_found_service(handlers::not_found.into_service());

    Router::new()
        .route("/", get(handlers::index).fallback(method_not_allowed))
        .route(
            "/translate",
            post(handlers::translate).fallback(method_not_allowed),
        )
        .route(
            "/text-to-speech",
            post(handlers::text_to_speech).fallback(method_not_allowed),
        )
        .route(
            "/speech-to-text",
            post(handlers::speech_to_text).fallback(method_not_allowed),
        )
        .route(
            "/languages",
            get(handlers::list_languages).fallback(method_not_allowed),
        )
        .route("/help", get(handlers::help).fallback(method_not_allowed))
        .route("/health", get(handlers::health).fallback(method_not_allowed))
        .nest_service("/static", static_files)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"error":"Internal server error"}"#);
    }
}
