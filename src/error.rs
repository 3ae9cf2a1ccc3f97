//! Error types for the bridge.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Translation error: {message}")]
    Translation { message: String },

    #[error("Unsupported image reference: {url} (only data: URIs can be embedded)")]
    UnsupportedImage { url: String },

    #[error("Unsupported content part: {kind}")]
    UnsupportedContent { kind: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BridgeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn translation(msg: impl Into<String>) -> Self {
        Self::Translation {
            message: msg.into(),
        }
    }

    pub fn unsupported_image(url: impl Into<String>) -> Self {
        Self::UnsupportedImage { url: url.into() }
    }

    pub fn unsupported_content(kind: impl Into<String>) -> Self {
        Self::UnsupportedContent { kind: kind.into() }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
