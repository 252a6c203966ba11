//! OpenAI-compatible chat completions.
//!
//! Works against the official API and any endpoint that speaks the
//! `/v1/chat/completions` wire format; point [`OpenAIClient::with_base_url`]
//! at the compatible host.

pub mod client;
pub mod types;

pub use client::OpenAIClient;
