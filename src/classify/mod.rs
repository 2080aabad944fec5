//! Classification core: prompt construction and reply parsing.
//!
//! This module provides:
//! * [`BinCategory`] / [`StyleDescriptor`]: the closed set of bins and their
//!   presentation style.
//! * [`Language`]: the fixed language selector and fallback phrases.
//! * [`PromptBuilder`] / [`Verbosity`]: builds the instruction sent with the
//!   photo.
//! * [`ResponseParser`]: turns a raw model reply into a
//!   [`ClassificationResult`], never failing.
//!
//! # Quick start
//!
//! ```rust
//! use smartbin::classify::{BinCategory, Language, PromptBuilder, ResponseParser, Verbosity};
//!
//! let language = Language::Hindi;
//! let prompt = PromptBuilder::for_language(language, Verbosity::Terse).build();
//! assert!(!prompt.is_empty());
//!
//! // `raw` is what the hosted model sent back.
//! let raw = "BLUE\nRinse and crush the bottle.\n###AUDIO_TEXT###\nबोतल को धोकर कुचल दें।";
//! let result = ResponseParser::new(language).parse(raw);
//! assert_eq!(result.bin_category, BinCategory::Blue);
//! assert_eq!(result.style().label, "BLUE BIN (Dry Waste)");
//! ```

pub mod category;
pub mod language;
pub mod parser;
pub mod prompt;
pub mod result;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use category::{BinCategory, Severity, StyleDescriptor};
pub use language::Language;
pub use parser::{scan_category, split_reply, strip_fences, ReplySegments, ResponseParser};
pub use prompt::{PromptBuilder, Verbosity, AUDIO_DELIMITER};
pub use result::{ClassificationResult, Degradation};
