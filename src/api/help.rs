use serde_json::{json, Value};

use crate::{stt, translate, tts};

/// Static help document served at `/help`.
pub fn document() -> Value {
    json!({
        "name": "Polyglot",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "Translate text between the supported languages, with automatic source detection",
            "Pronunciation (transliteration) of the translated text when available",
            "Listen to any text as MP3 speech, at normal or slow speed",
            "Dictate with the microphone and get the recognized text back"
        ],
        "usage_tips": [
            "Pick 'Auto Detect' as the source language when you are unsure what you have",
            "Choosing the same source and target language returns the text unchanged",
            "Use slow speech when practising pronunciation",
            "Speak clearly and start recording after a short pause so background noise can be measured"
        ],
        "troubleshooting": {
            "translation_unavailable": "The translation backend could not be reached at startup; check /health and restart the service",
            "no_audio": "Allow microphone access in the browser and record at least one second of speech",
            "could_not_understand": "Reduce background noise, move closer to the microphone and choose the spoken language explicitly",
            "unsupported_audio": "Recordings must be uploaded as WAV files"
        },
        "limits": {
            "translation_max_chars": translate::MAX_TEXT_CHARS,
            "speech_synthesis_max_chars": tts::MAX_TEXT_CHARS,
            "speech_recognition_max_bytes": stt::MAX_AUDIO_BYTES
        },
        "endpoints": {
            "GET /": "Web interface",
            "POST /translate": "Translate text",
            "POST /text-to-speech": "Synthesize speech as MP3",
            "POST /speech-to-text": "Recognize speech from an uploaded WAV file",
            "GET /languages": "Supported language codes",
            "GET /help": "This document",
            "GET /health": "Service status"
        }
    })
}
