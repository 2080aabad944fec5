//! SmartBin: photo-based waste segregation assistant for India's municipal
//! Green / Blue / Red bins.
//!
//! * [`classify`]: prompt construction, reply parsing, bin categories.
//! * [`model`]: hosted multimodal model adapter.
//! * [`speech`]: text-to-speech adapter for the translated instruction.
//! * [`pipeline`]: per-photo analysis orchestration.
//! * [`app`]: terminal presentation.
//! * [`config`]: settings and paths.

pub mod app;
pub mod classify;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod speech;
