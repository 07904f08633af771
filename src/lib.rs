//! Email classifier service.
//!
//! Accepts an email as an uploaded `.txt`/`.pdf` file or inline text,
//! normalizes it, classifies it as Productive or Improductive through a
//! remote LLM (with a deterministic keyword fallback) and suggests a reply.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod nlp;

pub use error::{Error, Result};
