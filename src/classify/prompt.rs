//! Prompt builder for waste classification.
//!
//! [`PromptBuilder`] produces the single instruction string sent alongside the
//! photo.  Every prompt carries the same three parts:
//!
//! 1. A role statement defining the three municipal bins by example.
//! 2. A rigid reply format split by [`AUDIO_DELIMITER`].
//! 3. A line-by-line contract (line 1 is exactly GREEN, BLUE or RED).
//!
//! [`Verbosity`] selects between the short four-line reply and a longer reply
//! with an item name, a tip and an eco fact.

use serde::{Deserialize, Serialize};

use crate::classify::language::Language;

/// Marker separating the English block from the translated block.
pub const AUDIO_DELIMITER: &str = "###AUDIO_TEXT###";

// ---------------------------------------------------------------------------
// Prompt sections
// ---------------------------------------------------------------------------

const ROLE_STATEMENT: &str = "\
You are an expert Indian Waste Management Guide for the Swachh Bharat source-segregation rules.
Look at the item in the image and decide which municipal bin it belongs in.

Categories:
- GREEN: wet / organic / kitchen waste (food scraps, fruit and vegetable peels, tea leaves, flowers, garden waste)
- BLUE: dry / recyclable waste (plastic bottles and wrappers, paper, cardboard, metal cans, clean packaging)
- RED: hazardous / sanitary waste (batteries, medicines, syringes and sharps, broken glass, diapers, sanitary pads)
";

const FORMAT_RULES: &str = "\
Do not use markdown, JSON, code fences, bullet points or any text outside this format.
Never write the marker anywhere except on its own line.";

// ---------------------------------------------------------------------------
// Verbosity
// ---------------------------------------------------------------------------

/// How much detail the model is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Four lines: category, one instruction, marker, translation.
    #[default]
    Terse,
    /// Category, item name, a short multi-sentence instruction, a tip, an
    /// eco fact, marker, translation.
    Detailed,
}

impl std::str::FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terse" => Ok(Verbosity::Terse),
            "detailed" => Ok(Verbosity::Detailed),
            other => Err(format!("unknown verbosity '{other}' (expected terse or detailed)")),
        }
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds classification prompts for one target language.
///
/// # Example
/// ```rust
/// use smartbin::classify::{Language, PromptBuilder, Verbosity, AUDIO_DELIMITER};
///
/// let prompt = PromptBuilder::for_language(Language::Hindi, Verbosity::Terse).build();
/// assert!(prompt.contains(AUDIO_DELIMITER));
/// assert!(prompt.contains("Hindi (हिंदी)"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language_label: String,
    verbosity: Verbosity,
}

impl PromptBuilder {
    /// Create a builder for a human-readable language label such as
    /// `"Hindi (हिंदी)"`.  An empty label is replaced by English.
    pub fn new(language_label: &str, verbosity: Verbosity) -> Self {
        let label = language_label.trim();
        let language_label = if label.is_empty() {
            Language::English.label().to_string()
        } else {
            label.to_string()
        };
        Self {
            language_label,
            verbosity,
        }
    }

    /// Create a builder for one of the supported [`Language`]s.
    pub fn for_language(language: Language, verbosity: Verbosity) -> Self {
        Self::new(language.label(), verbosity)
    }

    /// Build the full prompt string.
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(2048);
        prompt.push_str(ROLE_STATEMENT);
        prompt.push('\n');
        prompt.push_str(&self.reply_contract());
        prompt.push('\n');
        prompt.push_str(FORMAT_RULES);
        prompt.push('\n');
        prompt
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn reply_contract(&self) -> String {
        let lang = &self.language_label;
        match self.verbosity {
            Verbosity::Terse => format!(
                "Reply in EXACTLY 4 lines:\n\
                 Line 1: exactly one word, GREEN or BLUE or RED.\n\
                 Line 2: one short disposal instruction in English (e.g. \"Rinse it and crush it.\").\n\
                 Line 3: exactly {AUDIO_DELIMITER}\n\
                 Line 4: the same instruction translated into {lang}, written in its native script.\n\
                 \n\
                 Example reply:\n\
                 BLUE\n\
                 Rinse the bottle, crush it and put it in the blue bin.\n\
                 {AUDIO_DELIMITER}\n\
                 <the instruction in {lang}>\n"
            ),
            Verbosity::Detailed => format!(
                "Reply in EXACTLY this structure:\n\
                 Line 1: exactly one word, GREEN or BLUE or RED.\n\
                 Line 2: ITEM: <short item name in English>\n\
                 Line 3: two or three short sentences in English on how to prepare and dispose of the item.\n\
                 Line 4: TIP: <one fun disposal tip in Hinglish>\n\
                 Line 5: FACT: <one short eco fact about the item>\n\
                 Line 6: exactly {AUDIO_DELIMITER}\n\
                 Line 7: the instruction from line 3 translated into {lang}, written in its native script.\n\
                 \n\
                 Example reply:\n\
                 GREEN\n\
                 ITEM: Banana peel\n\
                 Drop the peel into the green bin without any plastic bag.\n\
                 TIP: Chhilke ko khaad banao, paudhe khush ho jayenge!\n\
                 FACT: A banana peel turns into compost in about two weeks.\n\
                 {AUDIO_DELIMITER}\n\
                 <the instruction in {lang}>\n"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
