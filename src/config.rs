use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Anthropic requires `max_tokens`; used when the source request has none.
pub const DEFAULT_MAX_TOKENS: u64 = 4096;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub models: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u64,
    #[serde(default)]
    pub unsupported_images: UnsupportedImages,
}

/// What to do with an image part that cannot be embedded (an external URL, or a
/// part type Anthropic has no equivalent for).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedImages {
    /// Fail the whole translation.
    #[default]
    Reject,
    /// Leave the part out and keep the rest of the message.
    Drop,
}

/// Everything the translator needs besides the request itself.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateOptions {
    pub default_max_tokens: u64,
    pub unsupported_images: UnsupportedImages,
    pub models: HashMap<String, String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            default_max_tokens: DEFAULT_MAX_TOKENS,
            unsupported_images: UnsupportedImages::default(),
            models: HashMap::new(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            default_max_tokens: DEFAULT_MAX_TOKENS,
            unsupported_images: UnsupportedImages::default(),
        }
    }
}

fn default_max_tokens() -> u64 {
    DEFAULT_MAX_TOKENS
}

impl BridgeConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Search standard locations for a config file, falling back to defaults.
    /// Priority: CLI arg > CWD > XDG config > home dir
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::load(path);
        }

        for candidate in &config_search_paths() {
            if candidate.exists() {
                tracing::info!(path = %candidate.display(), "Loading config");
                return Self::load(candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Options handed to the translator.
    pub fn options(&self) -> TranslateOptions {
        TranslateOptions {
            default_max_tokens: self.translate.default_max_tokens,
            unsupported_images: self.translate.unsupported_images,
            models: self.models.clone(),
        }
    }
}

const APP_NAME: &str = "anthropic-bridge";

/// Config file candidates in lookup order: CWD, platform config dirs, home dotfile.
pub fn config_search_paths() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);

    let config_dirs: Vec<PathBuf> = if cfg!(target_os = "macos") {
        home.iter().map(|h| h.join("Library/Application Support")).collect()
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .into_iter()
            .chain(home.iter().map(|h| h.join(".config")))
            .collect()
    };

    std::iter::once(PathBuf::from(format!("{APP_NAME}.toml")))
        .chain(config_dirs.into_iter().map(|d| d.join(APP_NAME).join("config.toml")))
        .chain(home.map(|h| h.join(format!(".{APP_NAME}.toml"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
[translate]
default_max_tokens = 8192
unsupported_images = "drop"

[models]
"gpt-4o" = "claude-sonnet-4-20250514"
"#
        )
        .unwrap();

        let config = BridgeConfig::load(f.path()).unwrap();
        assert_eq!(config.translate.default_max_tokens, 8192);
        assert_eq!(config.translate.unsupported_images, UnsupportedImages::Drop);

        let options = config.options();
        assert_eq!(
            options.models.get("gpt-4o"),
            Some(&"claude-sonnet-4-20250514".to_string())
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let f = NamedTempFile::new().unwrap();
        let config = BridgeConfig::load(f.path()).unwrap();
        assert_eq!(config.options(), TranslateOptions::default());
        assert_eq!(config.translate.default_max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let err = BridgeConfig::find_and_load(Some(Path::new("/nonexistent/bridge.toml")));
        assert!(matches!(err, Err(BridgeError::Config { .. })));
    }

    #[test]
    fn test_search_paths_start_in_cwd() {
        let paths = config_search_paths();
        assert_eq!(paths[0], PathBuf::from("anthropic-bridge.toml"));
        assert!(paths[1..].iter().all(|p| {
            p.ends_with("anthropic-bridge/config.toml") || p.ends_with(".anthropic-bridge.toml")
        }));
    }

    #[test]
    fn test_bad_policy_is_a_toml_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[translate]\nunsupported_images = \"ignore\"").unwrap();
        assert!(matches!(
            BridgeConfig::load(f.path()),
            Err(BridgeError::Toml(_))
        ));
    }
}
