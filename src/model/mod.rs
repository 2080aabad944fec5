//! Hosted model adapter.
//!
//! This module provides:
//! * [`ModelClient`]: async trait: image + prompt → raw reply text.
//! * [`GeminiClient`]: Generative Language `generateContent` backend.
//! * [`RetryingClient`]: wraps any client with at most one explicit retry.
//! * [`ModelError`]: error variants for model calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use smartbin::config::AppConfig;
//! use smartbin::model::{GeminiClient, ModelClient, RetryingClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = RetryingClient::new(
//!         GeminiClient::from_config(&config.model).expect("API key required"),
//!         config.model.retries(),
//!     );
//!
//!     let image = std::fs::read("bottle.jpg").unwrap();
//!     let raw = client
//!         .generate(&image, "image/jpeg", "Which bin does this go in?")
//!         .await
//!         .unwrap();
//!     println!("{raw}");
//! }
//! ```

pub mod client;
pub mod retry;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GeminiClient, ModelClient, ModelError};
pub use retry::RetryingClient;
