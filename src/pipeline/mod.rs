//! Analysis pipeline: one uploaded photo in, one [`AnalysisReport`] out.
//!
//! # Architecture
//!
//! ```text
//! ImageUpload ──▶ Analyzer::analyze()  ← async, one call per photo
//!                     │
//!                     ├─ PromptBuilder      (classify)
//!                     ├─ ModelClient        (model)     → hard failure on error
//!                     ├─ ResponseParser     (classify)  → never fails
//!                     └─ SpeechSynthesizer  (speech)    → audio omitted on error
//! ```
//!
//! Requests are independent: nothing is cached or shared between them.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use smartbin::config::AppConfig;
//! use smartbin::pipeline::{Analyzer, ImageUpload};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = AppConfig::load()?;
//!     config.model.api_key = std::env::var("SMARTBIN_API_KEY").ok();
//!
//!     let analyzer = Analyzer::from_config(&config)?;
//!     let upload = ImageUpload::from_path(Path::new("peel.jpg"))?;
//!     let report = analyzer
//!         .analyze(&upload, |stage| log::info!("{}", stage.label()))
//!         .await?;
//!     println!("{}", report.style.label);
//!     Ok(())
//! }
//! ```

pub mod runner;
pub mod state;
pub mod upload;

pub use runner::{AnalysisReport, Analyzer, PipelineError};
pub use state::AnalysisStage;
pub use upload::{ImageUpload, UploadError, MAX_IMAGE_BYTES, SUPPORTED_MIME_TYPES};
