//! End-to-end checks of the classification contract through the public API.

use std::sync::Arc;

use async_trait::async_trait;
use smartbin::classify::{
    split_reply, BinCategory, Language, PromptBuilder, ResponseParser, Severity, Verbosity,
    AUDIO_DELIMITER,
};
use smartbin::model::{ModelClient, ModelError};
use smartbin::pipeline::{Analyzer, ImageUpload};
use smartbin::speech::{SpeechError, SpeechSynthesizer};

// ---------------------------------------------------------------------------
// Parser properties
// ---------------------------------------------------------------------------

const REPLIES_WITH_ONE_DELIMITER: &[&str] = &[
    "GREEN\nRinse it well.\n###AUDIO_TEXT###\nIse achhi tarah dho lein.",
    "  BLUE \n\n Fold the carton. \n###AUDIO_TEXT###  कार्टन मोड़ें।\n\n",
    "###AUDIO_TEXT###",
    "no category here ###AUDIO_TEXT### trailing",
    "RED\r\nWrap the blade.\r\n###AUDIO_TEXT###\r\nಬ್ಲೇಡ್ ಅನ್ನು ಸುತ್ತಿ.\r\n",
];

#[test]
fn single_delimiter_splits_losslessly() {
    for text in REPLIES_WITH_ONE_DELIMITER {
        let seg = split_reply(text);
        let translated = seg.translated.expect("delimiter present");
        assert!(!seg.primary.contains(AUDIO_DELIMITER));
        assert!(!translated.contains(AUDIO_DELIMITER));
        assert_eq!(format!("{}{AUDIO_DELIMITER}{}", seg.primary, translated), *text);
    }
}

#[test]
fn repeated_delimiter_splits_once() {
    for n in 2..6 {
        let tail: Vec<String> = (0..n).map(|i| format!("part{i}")).collect();
        let text = format!("BLUE\nCrush it.\n{}", {
            let mut s = String::new();
            for part in &tail {
                s.push_str(AUDIO_DELIMITER);
                s.push_str(part);
            }
            s
        });

        let result = ResponseParser::new(Language::Hindi).parse(&text);
        assert_eq!(result.bin_category, BinCategory::Blue);
        assert_eq!(result.primary_instruction, "Crush it.");
        assert_eq!(
            result.translated_instruction.matches(AUDIO_DELIMITER).count(),
            n - 1
        );
        assert!(result.translated_instruction.starts_with("part0"));
        assert!(result.translated_instruction.ends_with(&format!("part{}", n - 1)));
    }
}

#[test]
fn empty_reply_is_the_floor() {
    let result = ResponseParser::new(Language::Hindi).parse("");
    assert_eq!(result.bin_category, BinCategory::Unknown);
    assert_eq!(result.primary_instruction, "");
    assert_eq!(result.translated_instruction, "");
}

#[test]
fn canonical_green_reply() {
    let result = ResponseParser::new(Language::Hindi)
        .parse("GREEN\nRinse it well.\n###AUDIO_TEXT###\nIse achhi tarah dho lein.");
    assert_eq!(result.bin_category, BinCategory::Green);
    assert_eq!(result.primary_instruction, "Rinse it well.");
    assert_eq!(result.translated_instruction, "Ise achhi tarah dho lein.");
}

#[test]
fn inline_blue_resolves_by_scan() {
    let parser = ResponseParser::new(Language::English);
    for raw in [
        "The bottle belongs in the BLUE bin once rinsed.",
        "Category - blue. Rinse first.\n###AUDIO_TEXT###\nRinse first.",
        "Answer: Blue",
        "Toss it into the bluebin.",
        "It's a BLUEish wrapper",
    ] {
        assert_eq!(parser.parse(raw).bin_category, BinCategory::Blue, "{raw}");
    }
}

#[test]
fn reparsing_parsed_fields_is_inert() {
    let parser = ResponseParser::new(Language::Telugu);
    let first = parser.parse("RED\nKeep syringes capped.\n###AUDIO_TEXT###\nసిరంజిలను మూసి ఉంచండి.");
    assert_eq!(first.bin_category, BinCategory::Red);

    for text in [&first.primary_instruction, &first.translated_instruction] {
        let again = parser.parse(text);
        assert_eq!(again.bin_category, BinCategory::Unknown);
        assert_eq!(&again.primary_instruction, text);
    }
}

#[test]
fn presentation_mapping_is_total() {
    let expected = [
        (BinCategory::Green, Severity::Success),
        (BinCategory::Blue, Severity::Info),
        (BinCategory::Red, Severity::Error),
        (BinCategory::Unknown, Severity::Warning),
    ];
    for (category, severity) in expected {
        assert_eq!(category.style().severity, severity);
        assert!(!category.style().label.is_empty());
    }
}

// ---------------------------------------------------------------------------
// Prompt ↔ parser agreement
// ---------------------------------------------------------------------------

#[test]
fn prompt_example_parses_cleanly() {
    for verbosity in [Verbosity::Terse, Verbosity::Detailed] {
        let prompt = PromptBuilder::for_language(Language::English, verbosity).build();
        let example = prompt
            .split("Example reply:\n")
            .nth(1)
            .expect("prompt carries an example");
        let example: String = example
            .lines()
            .take_while(|line| !line.starts_with("Do not use"))
            .collect::<Vec<_>>()
            .join("\n");

        let result = ResponseParser::new(Language::English).parse(&example);
        assert_ne!(result.bin_category, BinCategory::Unknown);
        assert!(!result.is_degraded(), "{verbosity:?}: {:?}", result.degradations);
    }
}

// ---------------------------------------------------------------------------
// Pipeline with stub adapters
// ---------------------------------------------------------------------------

struct EchoModel(&'static str);

#[async_trait]
impl ModelClient for EchoModel {
    async fn generate(&self, image: &[u8], mime: &str, _: &str) -> Result<String, ModelError> {
        assert!(!image.is_empty());
        assert_eq!(mime, "image/png");
        Ok(self.0.to_string())
    }
}

struct CountingSpeech;

#[async_trait]
impl SpeechSynthesizer for CountingSpeech {
    async fn synthesize(&self, text: &str, code: &str) -> Result<Vec<u8>, SpeechError> {
        assert!(!text.trim().is_empty(), "empty text must never reach synthesis");
        Ok(format!("{code}:{}", text.chars().count()).into_bytes())
    }
}

#[tokio::test]
async fn pipeline_speaks_fallback_when_translation_empty() {
    let analyzer = Analyzer::new(
        Arc::new(EchoModel("GREEN\nCompost it.\n###AUDIO_TEXT###\n")),
        Some(Arc::new(CountingSpeech)),
        Language::Malayalam,
        Verbosity::Terse,
    );
    let upload = ImageUpload::from_bytes(vec![0x89, b'P', b'N', b'G'], "image/png").unwrap();

    let report = analyzer.analyze(&upload, |_| {}).await.unwrap();
    assert_eq!(report.result.bin_category, BinCategory::Green);
    assert!(report.result.translated_instruction.is_empty());

    let expected = format!(
        "ml:{}",
        Language::Malayalam.fallback_phrase().chars().count()
    );
    assert_eq!(report.audio, Some(expected.into_bytes()));
}
