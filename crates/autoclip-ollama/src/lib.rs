//! Autoclip Ollama - Ollama integration for narration script generation.
//!
//! This crate provides an async client for Ollama's generate API and a
//! parser that pulls a JSON value out of raw model output.

mod client;
mod error;
mod json;
mod types;

pub use client::OllamaClient;
pub use error::{OllamaError, OllamaResult};
pub use json::parse_json_response;
pub use types::*;
