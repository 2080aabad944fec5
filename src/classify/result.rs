//! The typed outcome of one classification request.

use serde::Serialize;

use crate::classify::category::{BinCategory, StyleDescriptor};

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

/// A fallback path the parser had to take.
///
/// A result carrying any of these is still complete and renderable; the
/// flags exist so callers can log or display that the reply drifted from the
/// requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// The reply had no delimiter; the translation is the fallback phrase.
    MissingDelimiter,
    /// The delimiter was present but nothing followed it.
    EmptyTranslation,
    /// Line 1 was not a category token; the category came from a keyword scan.
    CategoryFromScan,
    /// No category could be found at all.
    CategoryUnresolved,
    /// A JSON reply carried no translation field; the translation is the
    /// fallback phrase.
    UntranslatedJson,
}

// ---------------------------------------------------------------------------
// ClassificationResult
// ---------------------------------------------------------------------------

/// Parsed, validated classification of a single uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub bin_category: BinCategory,
    /// Disposal instruction in English.
    pub primary_instruction: String,
    /// Disposal instruction in the target language; may be empty.
    pub translated_instruction: String,
    /// Two-letter code of the target language.
    pub target_language_code: String,
    /// Short item name, when the reply carried one.
    pub item_name: Option<String>,
    /// Short disposal tip (often Hinglish), when the reply carried one.
    pub tip: Option<String>,
    /// One-line eco fact about the item.
    pub eco_fact: Option<String>,
    pub degradations: Vec<Degradation>,
}

impl ClassificationResult {
    /// The floor result: unknown category, no instructions.
    pub fn empty(target_language_code: &str) -> Self {
        Self {
            bin_category: BinCategory::Unknown,
            primary_instruction: String::new(),
            translated_instruction: String::new(),
            target_language_code: target_language_code.to_string(),
            item_name: None,
            tip: None,
            eco_fact: None,
            degradations: vec![Degradation::CategoryUnresolved],
        }
    }

    /// `true` when any fallback path was taken while parsing.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    /// `true` when the translation came from the model rather than being
    /// substituted or left empty.
    pub fn has_model_translation(&self) -> bool {
        !self.translated_instruction.is_empty()
            && !self.degradations.iter().any(|d| {
                matches!(d, Degradation::MissingDelimiter | Degradation::UntranslatedJson)
            })
    }

    /// Presentation style for the resolved category.
    pub fn style(&self) -> StyleDescriptor {
        self.bin_category.style()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
