//! Request translation from the `OpenAI` Chat Completions format to the Anthropic
//! Messages format.
//!
//! All translation functions are pure (no I/O). Malformed optional fields are
//! treated as absent; only a missing or non-list `messages` is fatal.

pub mod anthropic_types;
pub mod data_uri;
pub mod lenient;
pub mod openai_types;
pub mod request;
