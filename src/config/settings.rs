//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every field has a
//! default, so a partial `settings.toml` is valid.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::classify::{Language, Verbosity};

/// Hard cap on automatic model retries.  Requests to the hosted model are
/// billed, so a timed-out call is retried at most once.
pub const MAX_MODEL_RETRIES: u32 = 1;

// ---------------------------------------------------------------------------
// ModelConfig
// ---------------------------------------------------------------------------

/// Settings for the hosted multimodal model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL of the Generative Language API.
    pub base_url: String,
    /// API key.  Usually supplied at startup (`--api-key` or
    /// `SMARTBIN_API_KEY`) rather than stored here.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-1.5-flash"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum seconds to wait for a reply before timing out.
    pub timeout_secs: u64,
    /// Automatic retries after a timeout or transport error.  Clamped to
    /// [`MAX_MODEL_RETRIES`].
    pub max_retries: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-1.5-flash".into(),
            temperature: 0.2,
            timeout_secs: 30,
            max_retries: 0,
        }
    }
}

impl ModelConfig {
    /// The configured key, ignoring blank strings.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// `max_retries` clamped to [`MAX_MODEL_RETRIES`].
    pub fn retries(&self) -> u32 {
        self.max_retries.min(MAX_MODEL_RETRIES)
    }
}

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for speech synthesis of the translated instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Whether audio is produced at all.
    pub enabled: bool,
    /// Base URL of the text-to-speech endpoint.
    pub base_url: String,
    /// Maximum seconds to wait for one synthesis call, all chunks included.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://translate.google.com".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use smartbin::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Target language for the translated instruction and audio.
    pub language: Language,
    /// Reply format requested from the model.
    pub verbosity: Verbosity,
    /// Hosted model settings.
    pub model: ModelConfig,
    /// Speech synthesis settings.
    pub speech: SpeechConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` survives a TOML round trip.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.language, loaded.language);
        assert_eq!(original.verbosity, loaded.verbosity);

        assert_eq!(original.model.base_url, loaded.model.base_url);
        assert_eq!(original.model.api_key, loaded.model.api_key);
        assert_eq!(original.model.model, loaded.model.model);
        assert_eq!(original.model.timeout_secs, loaded.model.timeout_secs);
        assert_eq!(original.model.temperature, loaded.model.temperature);
        assert_eq!(original.model.max_retries, loaded.model.max_retries);

        assert_eq!(original.speech.enabled, loaded.speech.enabled);
        assert_eq!(original.speech.base_url, loaded.speech.base_url);
        assert_eq!(original.speech.timeout_secs, loaded.speech.timeout_secs);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.language, Language::Hindi);
        assert_eq!(config.model.model, ModelConfig::default().model);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.language, Language::Hindi);
        assert_eq!(cfg.verbosity, Verbosity::Terse);
        assert_eq!(cfg.model.model, "gemini-1.5-flash");
        assert_eq!(cfg.model.timeout_secs, 30);
        assert_eq!(cfg.model.max_retries, 0);
        assert!(cfg.model.api_key.is_none());
        assert!(cfg.speech.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "language = \"Tamil\"\nverbosity = \"detailed\"\n\n[model]\ntimeout_secs = 5\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.language, Language::Tamil);
        assert_eq!(cfg.verbosity, Verbosity::Detailed);
        assert_eq!(cfg.model.timeout_secs, 5);
        assert_eq!(cfg.model.model, "gemini-1.5-flash");
        assert!(cfg.speech.enabled);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.language = Language::Malayalam;
        cfg.model.api_key = Some("AIza-test".into());
        cfg.model.max_retries = 1;
        cfg.speech.enabled = false;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.language, Language::Malayalam);
        assert_eq!(loaded.model.api_key, Some("AIza-test".into()));
        assert_eq!(loaded.model.max_retries, 1);
        assert!(!loaded.speech.enabled);
    }

    #[test]
    fn blank_credential_is_missing() {
        let mut model = ModelConfig::default();
        assert_eq!(model.credential(), None);
        model.api_key = Some("   ".into());
        assert_eq!(model.credential(), None);
        model.api_key = Some(" key ".into());
        assert_eq!(model.credential(), Some("key"));
    }

    #[test]
    fn retries_are_capped() {
        let mut model = ModelConfig::default();
        model.max_retries = 5;
        assert_eq!(model.retries(), MAX_MODEL_RETRIES);
    }
}
