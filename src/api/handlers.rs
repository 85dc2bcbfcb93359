use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::{
    help, page, HealthResponse, SpeakRequest, TranscriptResponse, TranslateRequest,
    TranslateResponse,
};
use crate::api::routes::AppState;
use crate::error::AppError;
use crate::languages::{DEFAULT_SPEECH_LANG, LANGUAGES};

pub async fn index() -> Html<&'static str> {
    Html(page::index_html())
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, AppError> {
    let Json(request) = payload?;

    let result = state
        .translation
        .translate(&request.text, &request.source_lang, &request.target_lang)
        .await?;

    tracing::info!(
        source = %result.source_lang,
        target = %result.target_lang,
        detected = %result.detected_lang,
        "Translated text"
    );

    Ok(Json(result.into()))
}

pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let mp3 = state
        .tts
        .speak(&request.text, &request.lang, request.slow)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"speech.mp3\""),
        ],
        mp3,
    )
        .into_response())
}

pub async fn speech_to_text(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let mut multipart = multipart?;
    let mut audio = None;
    let mut lang = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("audio") => audio = Some(field.bytes().await?),
            Some("lang") => lang = Some(field.text().await?),
            _ => {}
        }
    }

    let audio = audio.ok_or_else(|| AppError::BadRequest("No audio file provided".into()))?;
    let lang = lang
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_SPEECH_LANG.to_string());

    let transcript = state.stt.transcribe(audio, &lang).await?;

    tracing::info!(
        language = %transcript.language,
        chars = transcript.text.chars().count(),
        "Recognized speech"
    );

    Ok(Json(transcript.into()))
}

pub async fn list_languages() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(LANGUAGES.clone())
}

pub async fn help() -> Json<Value> {
    Json(help::document())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        translator_available: state.translation.is_available(),
        supported_languages: LANGUAGES.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
