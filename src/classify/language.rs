//! Supported output languages.
//!
//! The selector is a fixed table: each entry carries the human-readable label
//! embedded in prompts, the two-letter code passed to speech synthesis, and a
//! static fallback phrase spoken when the model's translation is missing.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A target language for the translated instruction and its audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Hindi,
    Kannada,
    English,
    Telugu,
    Tamil,
    Malayalam,
}

struct LanguageEntry {
    language: Language,
    name: &'static str,
    label: &'static str,
    code: &'static str,
    fallback_phrase: &'static str,
}

static LANGUAGES: &[LanguageEntry] = &[
    LanguageEntry {
        language: Language::Hindi,
        name: "Hindi",
        label: "Hindi (हिंदी)",
        code: "hi",
        fallback_phrase: "कृपया इस वस्तु को फेंकने से पहले स्क्रीन पर दिखाया गया डिब्बे का रंग देखें।",
    },
    LanguageEntry {
        language: Language::Kannada,
        name: "Kannada",
        label: "Kannada (ಕನ್ನಡ)",
        code: "kn",
        fallback_phrase: "ದಯವಿಟ್ಟು ಈ ವಸ್ತುವನ್ನು ಎಸೆಯುವ ಮೊದಲು ಪರದೆಯ ಮೇಲೆ ತೋರಿಸಿರುವ ಡಬ್ಬಿಯ ಬಣ್ಣವನ್ನು ನೋಡಿ.",
    },
    LanguageEntry {
        language: Language::English,
        name: "English",
        label: "English",
        code: "en",
        fallback_phrase: "Please check the bin colour shown on screen before disposing of this item.",
    },
    LanguageEntry {
        language: Language::Telugu,
        name: "Telugu",
        label: "Telugu (తెలుగు)",
        code: "te",
        fallback_phrase: "దయచేసి ఈ వస్తువును పారవేసే ముందు తెరపై చూపిన డబ్బా రంగును చూడండి.",
    },
    LanguageEntry {
        language: Language::Tamil,
        name: "Tamil",
        label: "Tamil (தமிழ்)",
        code: "ta",
        fallback_phrase: "இந்தப் பொருளை அப்புறப்படுத்தும் முன் திரையில் காட்டப்படும் தொட்டியின் நிறத்தைப் பார்க்கவும்.",
    },
    LanguageEntry {
        language: Language::Malayalam,
        name: "Malayalam",
        label: "Malayalam (മലയാളം)",
        code: "ml",
        fallback_phrase: "ഈ വസ്തു കളയുന്നതിന് മുമ്പ് സ്ക്രീനിൽ കാണിച്ചിരിക്കുന്ന ബിന്നിന്റെ നിറം ദയവായി പരിശോധിക്കുക.",
    },
];

impl Language {
    /// All supported languages, in selector order.
    pub const ALL: [Language; 6] = [
        Language::Hindi,
        Language::Kannada,
        Language::English,
        Language::Telugu,
        Language::Tamil,
        Language::Malayalam,
    ];

    fn entry(&self) -> &'static LanguageEntry {
        LANGUAGES
            .iter()
            .find(|e| e.language == *self)
            .unwrap_or(&LANGUAGES[0])
    }

    /// Look a language up by code (`"hi"`), English name (`"hindi"`) or full
    /// selector label (`"Hindi (हिंदी)"`).  Case-insensitive.
    ///
    /// ```
    /// use smartbin::classify::Language;
    ///
    /// assert_eq!(Language::find("kn"), Some(Language::Kannada));
    /// assert_eq!(Language::find("TAMIL"), Some(Language::Tamil));
    /// assert_eq!(Language::find("Klingon"), None);
    /// ```
    pub fn find(query: &str) -> Option<Self> {
        let query = query.trim();
        LANGUAGES
            .iter()
            .find(|e| {
                query.eq_ignore_ascii_case(e.code)
                    || query.eq_ignore_ascii_case(e.name)
                    || query == e.label
            })
            .map(|e| e.language)
    }

    /// Look a language up by its two-letter code only.
    pub fn from_code(code: &str) -> Option<Self> {
        LANGUAGES
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code.trim()))
            .map(|e| e.language)
    }

    /// Two-letter code used for speech synthesis.
    pub fn code(&self) -> &'static str {
        self.entry().code
    }

    /// English name (`"Hindi"`).
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    /// Selector label with native script (`"Hindi (हिंदी)"`).
    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// Phrase spoken when the model's translation is missing or empty.
    pub fn fallback_phrase(&self) -> &'static str {
        self.entry().fallback_phrase
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Hindi
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_selector_table() {
        assert_eq!(Language::Hindi.code(), "hi");
        assert_eq!(Language::Kannada.code(), "kn");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Telugu.code(), "te");
        assert_eq!(Language::Tamil.code(), "ta");
        assert_eq!(Language::Malayalam.code(), "ml");
    }

    #[test]
    fn every_language_has_a_table_entry() {
        for lang in Language::ALL {
            assert_eq!(lang.entry().language, lang);
            assert!(!lang.fallback_phrase().is_empty());
        }
    }

    #[test]
    fn find_accepts_code_name_and_label() {
        assert_eq!(Language::find("hi"), Some(Language::Hindi));
        assert_eq!(Language::find("Hindi"), Some(Language::Hindi));
        assert_eq!(Language::find("Hindi (हिंदी)"), Some(Language::Hindi));
        assert_eq!(Language::find(" ML "), Some(Language::Malayalam));
    }

    #[test]
    fn find_rejects_unknown() {
        assert_eq!(Language::find("fr"), None);
        assert_eq!(Language::find(""), None);
    }

    #[test]
    fn from_code_ignores_names() {
        assert_eq!(Language::from_code("te"), Some(Language::Telugu));
        assert_eq!(Language::from_code("Telugu"), None);
    }

    #[test]
    fn labels_carry_native_script() {
        assert!(Language::Tamil.label().contains("தமிழ்"));
        assert_eq!(Language::English.label(), "English");
    }
}
