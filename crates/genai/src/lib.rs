//! Optional generative-AI integration: script analysis and image-prompt
//! suggestion. Runs in offline mode with canned answers when no API key
//! is configured.

pub mod client;

pub use client::{ExtractedAsset, GenAiClient, GenAiError};
