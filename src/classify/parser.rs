//! Response parser: raw model reply → [`ClassificationResult`].
//!
//! The model's reply is untrusted text.  It may be wrapped in code fences,
//! use inconsistent line breaks, omit the delimiter, repeat it, or put the
//! category inline instead of on line 1.  [`ResponseParser::parse`] never
//! fails: every input, including the empty string, produces a well-formed
//! result, and every fallback path taken is recorded as a [`Degradation`].
//!
//! # Parsing steps
//!
//! ```text
//! raw ─▶ strip_fences ─▶ JSON object with `bin_type`? ──yes──▶ map fields
//!                                    │ no
//!                                    ▼
//!                        split_reply (first delimiter only)
//!                          │                       │
//!                     primary segment        translated segment
//!                          │                       │
//!          line 1 == GREEN/BLUE/RED ?          trim, keep verbatim
//!            yes: ITEM/TIP/FACT lines → fields, rest → instruction
//!            no : keyword scan → category, whole segment → instruction
//! ```

use std::borrow::Cow;

use serde::Deserialize;

use crate::classify::category::{BinCategory, CATEGORY_TOKENS};
use crate::classify::language::Language;
use crate::classify::prompt::AUDIO_DELIMITER;
use crate::classify::result::{ClassificationResult, Degradation};

const FENCE: &str = "```";
const ITEM_TAG: &str = "item:";
const TIP_TAG: &str = "tip:";
const FACT_TAG: &str = "fact:";

// ---------------------------------------------------------------------------
// Fence stripping
// ---------------------------------------------------------------------------

/// Remove Markdown code-fence markers from `raw`.
///
/// Whole fence lines (```` ``` ```` optionally followed by a language tag such
/// as `json` or `text`) are dropped; stray inline markers are deleted.  Text
/// without any marker is returned borrowed and untouched.
pub fn strip_fences(raw: &str) -> Cow<'_, str> {
    if !raw.contains(FENCE) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    for line in raw.split_inclusive('\n') {
        if let Some(tag) = line.trim().strip_prefix(FENCE) {
            let is_tag = tag.chars().all(|c| c.is_ascii_alphanumeric())
                && BinCategory::from_token(tag).is_none();
            if is_tag {
                continue;
            }
        }
        out.push_str(&line.replace(FENCE, ""));
    }
    Cow::Owned(out)
}

// ---------------------------------------------------------------------------
// Segment splitting
// ---------------------------------------------------------------------------

/// The two halves of a reply around the delimiter.
///
/// Both slices borrow from the input untrimmed, so
/// `primary + AUDIO_DELIMITER + translated` reconstructs it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplySegments<'a> {
    pub primary: &'a str,
    /// `None` when the delimiter does not occur.
    pub translated: Option<&'a str>,
}

/// Split `text` at the first [`AUDIO_DELIMITER`].
///
/// Later occurrences stay inside the translated half; a reply is never split
/// more than once.
///
/// ```
/// use smartbin::classify::{split_reply, AUDIO_DELIMITER};
///
/// let text = format!("RED\nTape it.\n{AUDIO_DELIMITER}\nA {AUDIO_DELIMITER} B");
/// let seg = split_reply(&text);
/// assert_eq!(seg.primary, "RED\nTape it.\n");
/// assert_eq!(seg.translated, Some(format!("\nA {AUDIO_DELIMITER} B").as_str()));
/// ```
pub fn split_reply(text: &str) -> ReplySegments<'_> {
    match text.split_once(AUDIO_DELIMITER) {
        Some((primary, translated)) => ReplySegments {
            primary,
            translated: Some(translated),
        },
        None => ReplySegments {
            primary: text,
            translated: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Legacy JSON replies
// ---------------------------------------------------------------------------

/// Shape of the JSON object earlier prompt versions asked for.
///
/// The first version never asked for a translation, so `audio_text` is
/// usually absent.
#[derive(Debug, Deserialize)]
struct JsonReply {
    bin_type: String,
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default, alias = "tip")]
    hinglish_tip: Option<String>,
    #[serde(default, alias = "eco_fact")]
    fact: Option<String>,
    #[serde(default, alias = "translation", alias = "translated_instruction")]
    audio_text: Option<String>,
}

// ---------------------------------------------------------------------------
// ResponseParser
// ---------------------------------------------------------------------------

/// Turns raw model replies into [`ClassificationResult`]s for one target
/// language.
///
/// # Example
/// ```rust
/// use smartbin::classify::{BinCategory, Language, ResponseParser};
///
/// let parser = ResponseParser::new(Language::Hindi);
/// let result = parser.parse("GREEN\nRinse it well.\n###AUDIO_TEXT###\nIse achhi tarah dho lein.");
/// assert_eq!(result.bin_category, BinCategory::Green);
/// assert_eq!(result.primary_instruction, "Rinse it well.");
/// assert_eq!(result.translated_instruction, "Ise achhi tarah dho lein.");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    language: Language,
}

impl ResponseParser {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Parse `raw` into a result.  Never fails.
    pub fn parse(&self, raw: &str) -> ClassificationResult {
        let cleaned = strip_fences(raw);
        let text = cleaned.trim();

        if text.is_empty() {
            log::warn!("parser: empty model reply, returning unresolved result");
            return ClassificationResult::empty(self.language.code());
        }

        if let Some(result) = self.parse_json(text) {
            return result;
        }

        let segments = split_reply(text);
        let mut degradations = Vec::new();

        let primary = parse_primary(segments.primary, &mut degradations);

        let translated_instruction = match segments.translated {
            Some(translated) => {
                let translated = translated.trim();
                if translated.is_empty() {
                    degradations.push(Degradation::EmptyTranslation);
                }
                translated.to_string()
            }
            None => {
                degradations.push(Degradation::MissingDelimiter);
                self.language.fallback_phrase().to_string()
            }
        };

        let result = ClassificationResult {
            bin_category: primary.category,
            primary_instruction: primary.instruction,
            translated_instruction,
            target_language_code: self.language.code().to_string(),
            item_name: primary.item_name,
            tip: primary.tip,
            eco_fact: primary.eco_fact,
            degradations,
        };
        log_degradations(&result);
        result
    }

    /// Map a JSON object reply.  Returns `None` for anything that is not an
    /// object with a `bin_type` field so the line parser can take over.
    fn parse_json(&self, text: &str) -> Option<ClassificationResult> {
        if !text.starts_with('{') {
            return None;
        }
        let reply: JsonReply = match serde_json::from_str(text) {
            Ok(reply) => reply,
            Err(e) => {
                log::debug!("parser: reply looks like JSON but does not decode ({e})");
                return None;
            }
        };

        let mut degradations = Vec::new();
        let bin_category = match BinCategory::from_token(&reply.bin_type) {
            Some(category) => category,
            None => resolve_by_scan(&reply.bin_type, &mut degradations),
        };

        let translated_instruction = match reply.audio_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => {
                degradations.push(Degradation::UntranslatedJson);
                self.language.fallback_phrase().to_string()
            }
        };

        let result = ClassificationResult {
            bin_category,
            primary_instruction: reply.instruction.unwrap_or_default().trim().to_string(),
            translated_instruction,
            target_language_code: self.language.code().to_string(),
            item_name: non_empty(reply.item_name),
            tip: non_empty(reply.hinglish_tip),
            eco_fact: non_empty(reply.fact),
            degradations,
        };
        log_degradations(&result);
        Some(result)
    }
}

// ---------------------------------------------------------------------------
// Primary segment
// ---------------------------------------------------------------------------

struct PrimaryBlock {
    category: BinCategory,
    instruction: String,
    item_name: Option<String>,
    tip: Option<String>,
    eco_fact: Option<String>,
}

fn parse_primary(segment: &str, degradations: &mut Vec<Degradation>) -> PrimaryBlock {
    let lines: Vec<&str> = segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(category) = lines.first().and_then(|first| category_line(first)) {
        let mut item_name = None;
        let mut tip = None;
        let mut eco_fact = None;
        let mut rest = Vec::with_capacity(lines.len());
        for line in &lines[1..] {
            // First occurrence of each tag fills its field; repeats stay in
            // the instruction.
            let tagged = [
                (ITEM_TAG, &mut item_name),
                (TIP_TAG, &mut tip),
                (FACT_TAG, &mut eco_fact),
            ]
            .into_iter()
            .find_map(|(tag, slot)| tagged_line(line, tag).map(|value| (slot, value)));
            match tagged {
                Some((slot, value)) if slot.is_none() => *slot = Some(value.to_string()),
                _ => rest.push(*line),
            }
        }
        return PrimaryBlock {
            category,
            instruction: rest.join(" "),
            item_name,
            tip,
            eco_fact,
        };
    }

    PrimaryBlock {
        category: resolve_by_scan(segment, degradations),
        instruction: segment.trim().to_string(),
        item_name: None,
        tip: None,
        eco_fact: None,
    }
}

/// Exact category token on its own line, ignoring Markdown emphasis and a
/// trailing `.`, `:` or `!`.
fn category_line(line: &str) -> Option<BinCategory> {
    let token = line
        .trim_matches(|c: char| c == '*' || c == '_' || c == '#' || c.is_whitespace())
        .trim_end_matches(['.', ':', '!']);
    BinCategory::from_token(token)
}

/// Value of a `TAG: value` line, matching the tag case-insensitively.
fn tagged_line<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let head = line.get(..tag.len())?;
    if !head.eq_ignore_ascii_case(tag) {
        return None;
    }
    let value = line[tag.len()..].trim();
    (!value.is_empty()).then_some(value)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Keyword scan
// ---------------------------------------------------------------------------

fn resolve_by_scan(text: &str, degradations: &mut Vec<Degradation>) -> BinCategory {
    match scan_category(text) {
        Some(category) => {
            degradations.push(Degradation::CategoryFromScan);
            category
        }
        None => {
            degradations.push(Degradation::CategoryUnresolved);
            BinCategory::Unknown
        }
    }
}

/// Earliest category keyword in `text`, matched case-insensitively as a
/// plain substring ("bluebin" and "BLUEish" both resolve to Blue).
pub fn scan_category(text: &str) -> Option<BinCategory> {
    let haystack = text.to_ascii_lowercase();
    CATEGORY_TOKENS
        .iter()
        .filter_map(|(keyword, category)| haystack.find(keyword).map(|pos| (pos, *category)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, category)| category)
}

fn log_degradations(result: &ClassificationResult) {
    if result.is_degraded() {
        log::warn!(
            "parser: degraded reply {:?} (category={}, lang={})",
            result.degradations,
            result.bin_category,
            result.target_language_code
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
