use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AegisError, Result};

/// Top-level configuration for the Aegis assistant.
///
/// Loaded from `~/.aegis/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AegisConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub activity: ActivityConfig,
}

impl AegisConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AegisConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AegisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Dialogue and reply-selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Seed for reply selection. `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    /// Idle minutes after which a session is replaced by a fresh one.
    pub session_timeout_minutes: u32,
    /// Offer a deeper tip after a topic reply.
    pub follow_up_offers: bool,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            session_timeout_minutes: 30,
            follow_up_offers: true,
        }
    }
}

/// Activity log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Whether processed messages are reported to the activity sink.
    pub enabled: bool,
    /// Capacity of the in-memory activity log.
    pub max_entries: usize,
    /// Logged message text is truncated to this many characters.
    pub details_max_chars: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1000,
            details_max_chars: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AegisConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.dialogue.rng_seed, None);
        assert_eq!(config.dialogue.session_timeout_minutes, 30);
        assert!(config.dialogue.follow_up_offers);
        assert!(config.activity.enabled);
        assert_eq!(config.activity.max_entries, 1000);
        assert_eq!(config.activity.details_max_chars, 200);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[dialogue]
rng_seed = 42
session_timeout_minutes = 5
follow_up_offers = false

[activity]
enabled = false
max_entries = 10
details_max_chars = 40
"#;
        let file = create_temp_config(content);
        let config = AegisConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.dialogue.rng_seed, Some(42));
        assert_eq!(config.dialogue.session_timeout_minutes, 5);
        assert!(!config.dialogue.follow_up_offers);
        assert!(!config.activity.enabled);
        assert_eq!(config.activity.max_entries, 10);
        assert_eq!(config.activity.details_max_chars, 40);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[dialogue]
rng_seed = 7
"#;
        let file = create_temp_config(content);
        let config = AegisConfig::load(file.path()).unwrap();
        assert_eq!(config.dialogue.rng_seed, Some(7));
        // Remaining fields use defaults
        assert_eq!(config.dialogue.session_timeout_minutes, 30);
        assert_eq!(config.general.log_level, "info");
        assert!(config.activity.enabled);
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = AegisConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.activity.max_entries, 1000);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let file = create_temp_config("[dialogue\nrng_seed = ");
        let result = AegisConfig::load(file.path());
        assert!(matches!(result, Err(AegisError::Config(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AegisConfig::load_or_default(Path::new("/nonexistent/aegis.toml"));
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AegisConfig::default();
        config.dialogue.rng_seed = Some(99);
        config.activity.max_entries = 3;
        config.save(&path).unwrap();

        let reloaded = AegisConfig::load(&path).unwrap();
        assert_eq!(reloaded.dialogue.rng_seed, Some(99));
        assert_eq!(reloaded.activity.max_entries, 3);
    }
}
