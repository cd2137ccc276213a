//! Localization resolver: language codes to display names.
//!
//! The display name, not the code, is what oracle prompts use as the
//! target language.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Supported interface languages as (code, display name).
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("pt", "Português"),
    ("hi", "हिन्दी (Hindi)"),
    ("ur", "اردو (Urdu)"),
    ("bn", "বাংলা (Bengali)"),
    ("ta", "தமிழ் (Tamil)"),
    ("ar", "العربية (Arabic)"),
    ("sw", "Kiswahili"),
    ("am", "አማርኛ (Amharic)"),
    ("zh", "中文 (Mandarin)"),
    ("id", "Bahasa Indonesia"),
    ("vi", "Tiếng Việt"),
];

static BY_CODE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| SUPPORTED_LANGUAGES.iter().copied().collect());

/// A resolved target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
    display_name: &'static str,
}

impl Language {
    /// English, the fallback for unknown codes.
    pub const ENGLISH: Language = Language {
        code: "en",
        display_name: "English",
    };

    /// Resolves a language code; unknown codes fall back to English.
    pub fn resolve(code: &str) -> Self {
        let normalized = code.trim().to_ascii_lowercase();
        BY_CODE
            .get_key_value(normalized.as_str())
            .map(|(code, display_name)| Language {
                code: *code,
                display_name: *display_name,
            })
            .unwrap_or(Self::ENGLISH)
    }

    /// Returns true if the code names a supported language.
    pub fn is_supported(code: &str) -> bool {
        BY_CODE.contains_key(code.trim().to_ascii_lowercase().as_str())
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}
