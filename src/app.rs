//! Terminal presentation of analysis reports.
//!
//! | Severity  | Marker | Used for          |
//! |-----------|--------|-------------------|
//! | `Success` | ✅     | Green bin         |
//! | `Info`    | ♻️     | Blue bin          |
//! | `Error`   | ⚠️     | Red bin           |
//! | `Warning` | ❓     | Unresolved result |

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::classify::{ClassificationResult, Severity};
use crate::pipeline::AnalysisReport;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✅",
        Severity::Info => "♻️",
        Severity::Error => "⚠️",
        Severity::Warning => "❓",
    }
}

/// Render the text part of a parsed result.
pub fn render_result(result: &ClassificationResult) -> String {
    let style = result.style();
    let mut out = String::with_capacity(256);

    let _ = writeln!(out, "{} GOES IN: {}", marker(style.severity), style.label);
    if let Some(item) = &result.item_name {
        let _ = writeln!(out, "Item:        {item}");
    }
    if !result.primary_instruction.is_empty() {
        let _ = writeln!(out, "Action:      {}", result.primary_instruction);
    }
    if let Some(tip) = &result.tip {
        let _ = writeln!(out, "Tip:         {tip}");
    }
    if let Some(fact) = &result.eco_fact {
        let _ = writeln!(out, "Fact:        {fact}");
    }
    if !result.translated_instruction.is_empty() {
        let _ = writeln!(
            out,
            "Translation: {} [{}]",
            result.translated_instruction, result.target_language_code
        );
    }
    if result.is_degraded() {
        let _ = writeln!(
            out,
            "Note:        reply did not follow the expected format ({:?})",
            result.degradations
        );
    }
    out
}

/// Render a full report, including the audio outcome.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = render_result(&report.result);
    match (&report.audio, &report.speech_error) {
        (Some(audio), _) => {
            let _ = writeln!(out, "Audio:       {} bytes of MP3", audio.len());
        }
        (None, Some(err)) => {
            let _ = writeln!(out, "Audio:       unavailable ({err})");
        }
        (None, None) => {}
    }
    out
}

// ---------------------------------------------------------------------------
// Audio output
// ---------------------------------------------------------------------------

/// Default file name for a report's audio inside `dir`.
pub fn default_audio_path(dir: &Path, language_code: &str) -> PathBuf {
    dir.join(format!("instruction-{language_code}.mp3"))
}

/// Write the report's audio to `path`, creating parent directories.
///
/// Returns `Ok(None)` when the report carries no audio.
pub fn save_audio(report: &AnalysisReport, path: &Path) -> Result<Option<PathBuf>> {
    let Some(audio) = &report.audio else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, audio).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(Some(path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{BinCategory, Degradation};
    use tempfile::tempdir;

    fn report(audio: Option<Vec<u8>>, speech_error: Option<&str>) -> AnalysisReport {
        let result = ClassificationResult {
            bin_category: BinCategory::Green,
            primary_instruction: "Compost the peel.".into(),
            translated_instruction: "छिलके को खाद बनाएं।".into(),
            target_language_code: "hi".into(),
            item_name: Some("Banana peel".into()),
            tip: Some("Chhilka compost mein daalo!".into()),
            eco_fact: None,
            degradations: Vec::new(),
        };
        AnalysisReport {
            style: result.style(),
            result,
            audio,
            speech_error: speech_error.map(str::to_string),
        }
    }

    #[test]
    fn renders_all_fields() {
        let text = render_report(&report(Some(vec![0; 42]), None));
        assert!(text.contains("✅ GOES IN: GREEN BIN (Wet Waste)"));
        assert!(text.contains("Item:        Banana peel"));
        assert!(text.contains("Action:      Compost the peel."));
        assert!(text.contains("Tip:         Chhilka compost mein daalo!"));
        assert!(!text.contains("Fact:"));
        assert!(text.contains("Translation: छिलके को खाद बनाएं। [hi]"));
        assert!(text.contains("42 bytes of MP3"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn renders_speech_failure() {
        let text = render_report(&report(None, Some("speech request timed out")));
        assert!(text.contains("Audio:       unavailable (speech request timed out)"));
    }

    #[test]
    fn renders_degraded_unknown() {
        let result = ClassificationResult::empty("ta");
        let text = render_result(&result);
        assert!(text.contains("❓ GOES IN: Unsure — review manually"));
        assert!(text.contains("CategoryUnresolved"));
        assert!(!text.contains("Action:"));
    }

    #[test]
    fn renders_eco_fact() {
        let mut r = report(None, None);
        r.result.eco_fact = Some("Peels rot in two weeks.".into());
        assert!(render_result(&r.result).contains("Fact:        Peels rot in two weeks."));
    }

    #[test]
    fn marks_degraded_category() {
        let mut r = report(None, None);
        r.result.degradations.push(Degradation::CategoryFromScan);
        assert!(render_report(&r).contains("Note:"));
    }

    #[test]
    fn save_audio_writes_file() {
        let dir = tempdir().expect("temp dir");
        let path = default_audio_path(&dir.path().join("audio"), "hi");

        let saved = save_audio(&report(Some(vec![7, 8, 9]), None), &path).expect("save");
        assert_eq!(saved.as_deref(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).expect("read"), vec![7, 8, 9]);
        assert!(path.ends_with("instruction-hi.mp3"));
    }

    #[test]
    fn save_audio_without_audio_is_noop() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("none.mp3");
        assert!(save_audio(&report(None, None), &path).expect("ok").is_none());
        assert!(!path.exists());
    }
}
