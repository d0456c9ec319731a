use crate::error::{ChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_KEYS: &str = "server, output, log_level";

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct ChatConfig {
    pub server: Option<String>,
    pub output: Option<String>,
    pub log_level: Option<String>,
}

impl ChatConfig {
    /// Reads `~/.chatctl/config.toml`. A missing or unreadable file yields
    /// the defaults.
    pub fn load() -> Self {
        let path = Self::config_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            Self::from_toml(&content)
        } else {
            Self::default()
        }
    }

    pub fn from_toml(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ChatError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "server" => self.server = Some(value),
            "output" => self.output = Some(value),
            "log_level" | "log-level" => self.log_level = Some(value),
            _ => {
                return Err(ChatError::Input(format!(
                    "Unknown key '{key}'. Valid keys: {CONFIG_KEYS}"
                )));
            }
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatctl")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        let cfg = ChatConfig::from_toml(
            "server = \"http://chat.internal:5001\"\noutput = \"json\"\nlog_level = \"debug\"\n",
        );
        assert_eq!(cfg.server.as_deref(), Some("http://chat.internal:5001"));
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        assert_eq!(ChatConfig::from_toml("server = ["), ChatConfig::default());
    }

    #[test]
    fn set_accepts_dashed_log_level() {
        let mut cfg = ChatConfig::default();
        cfg.set("log-level", "info".into()).unwrap();
        assert_eq!(cfg.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = ChatConfig::default();
        let err = cfg.set("api_key", "secret".into()).unwrap_err();
        assert!(matches!(err, ChatError::Input(_)));
        assert_eq!(cfg, ChatConfig::default());
    }

    #[test]
    fn round_trips_through_toml() {
        let mut cfg = ChatConfig::default();
        cfg.set("server", "http://localhost:5002".into()).unwrap();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(ChatConfig::from_toml(&text), cfg);
    }
}
