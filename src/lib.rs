pub mod config;
pub mod error;
pub mod translate;

pub use config::{BridgeConfig, TranslateOptions, UnsupportedImages};
pub use error::{BridgeError, Result};
pub use translate::request::{openai_json_to_anthropic, openai_to_anthropic};
