//! Configuration module for SmartBin.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the model and
//! speech adapters, `AppPaths` for cross-platform directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ModelConfig, SpeechConfig, MAX_MODEL_RETRIES};
