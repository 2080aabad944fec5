//! Municipal bin categories and their presentation style.
//!
//! [`BinCategory`] is a closed enum: the three Swachh Bharat segregation bins
//! plus [`BinCategory::Unknown`] for replies that could not be resolved.
//! [`BinCategory::style`] maps each variant to the [`StyleDescriptor`] the
//! presentation layer renders.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BinCategory
// ---------------------------------------------------------------------------

/// The bin an item should be disposed of in.
///
/// | Variant   | Bin colour | Waste stream                         |
/// |-----------|------------|--------------------------------------|
/// | `Green`   | Green      | Wet / organic / kitchen waste        |
/// | `Blue`    | Blue       | Dry / recyclable (plastic, paper …)  |
/// | `Red`     | Red        | Hazardous / sanitary / sharps, glass |
/// | `Unknown` | none       | Reply could not be resolved          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinCategory {
    Green,
    Blue,
    Red,
    Unknown,
}

/// Category keywords in the order the fallback scan reports ties.
pub(crate) const CATEGORY_TOKENS: [(&str, BinCategory); 3] = [
    ("green", BinCategory::Green),
    ("blue", BinCategory::Blue),
    ("red", BinCategory::Red),
];

impl BinCategory {
    /// Resolve an exact category token (`"GREEN"`, `"blue"`, …).
    ///
    /// Matching is case-insensitive but otherwise exact; anything else yields
    /// `None`.
    ///
    /// ```
    /// use smartbin::classify::BinCategory;
    ///
    /// assert_eq!(BinCategory::from_token("Green"), Some(BinCategory::Green));
    /// assert_eq!(BinCategory::from_token("greenish"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        CATEGORY_TOKENS
            .iter()
            .find(|(kw, _)| token.eq_ignore_ascii_case(kw))
            .map(|(_, category)| *category)
    }

    /// The upper-case token the model is asked to reply with.
    pub fn token(&self) -> &'static str {
        match self {
            BinCategory::Green => "GREEN",
            BinCategory::Blue => "BLUE",
            BinCategory::Red => "RED",
            BinCategory::Unknown => "UNKNOWN",
        }
    }

    /// Presentation style for this category.
    pub fn style(&self) -> StyleDescriptor {
        match self {
            BinCategory::Green => StyleDescriptor {
                label: "GREEN BIN (Wet Waste)",
                severity: Severity::Success,
            },
            BinCategory::Blue => StyleDescriptor {
                label: "BLUE BIN (Dry Waste)",
                severity: Severity::Info,
            },
            BinCategory::Red => StyleDescriptor {
                label: "RED BIN (Hazardous)",
                severity: Severity::Error,
            },
            BinCategory::Unknown => StyleDescriptor {
                label: "Unsure — review manually",
                severity: Severity::Warning,
            },
        }
    }
}

impl std::fmt::Display for BinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

// ---------------------------------------------------------------------------
// StyleDescriptor
// ---------------------------------------------------------------------------

/// Tone used by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Label and tone for a [`BinCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleDescriptor {
    pub label: &'static str,
    pub severity: Severity,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
