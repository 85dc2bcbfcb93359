use lazy_static::lazy_static;
use std::collections::BTreeMap;

/// Sentinel asking the translation backend to detect the source language.
pub const AUTO: &str = "auto";

/// Concrete language used by the speech endpoints when the client sends `auto`.
pub const DEFAULT_SPEECH_LANG: &str = "en";

const SUPPORTED: &[(&str, &str)] = &[
    (AUTO, "Auto Detect"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("zh-cn", "Chinese"),
    ("ja", "Japanese"),
    ("hi", "Hindi"),
    ("ar", "Arabic"),
    ("bn", "Bengali"),
    ("as-IN", "Assamese"),
];

lazy_static! {
    pub static ref LANGUAGES: BTreeMap<&'static str, &'static str> =
        SUPPORTED.iter().copied().collect();
}

pub fn is_supported(code: &str) -> bool {
    LANGUAGES.contains_key(code)
}

/// Speech synthesis and recognition need a concrete voice, so `auto`
/// collapses to the default language.
pub fn speech_lang(code: &str) -> &str {
    if code == AUTO {
        DEFAULT_SPEECH_LANG
    } else {
        code
    }
}

/// Languages in table order, `auto` first.
pub fn ordered() -> impl Iterator<Item = (&'static str, &'static str)> {
    SUPPORTED.iter().copied()
}
