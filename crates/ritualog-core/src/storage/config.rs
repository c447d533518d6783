//! TOML-based application configuration.
//!
//! Stores:
//! - The journal owner's user id
//! - Streak policy for completion dates after the reference day
//! - Optional overrides for the creative and reflection prompt rotations
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::prompts::{PromptCatalog, ReflectionPrompt};
use crate::records::UserId;
use crate::streak::{FutureDatePolicy, StreakCalculator};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Id issued by the identity provider. Empty means signed out.
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreakConfig {
    #[serde(default)]
    pub future_dates: FutureDatePolicy,
}

/// Prompt list overrides. `None` keeps the built-in list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub creative: Option<Vec<String>>,
    #[serde(default)]
    pub reflection: Option<Vec<ReflectionPrompt>>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub prompts: PromptConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // unset optional: JSON when it parses, plain text otherwise
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default path, `<data_dir>/config.toml`.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default path, writing defaults there if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    /// The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        // reject empty prompt overrides now rather than at first use
        updated.prompt_catalog()?;
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    pub fn user_id(&self) -> Result<UserId, CoreError> {
        UserId::new(self.user.id.clone())
    }

    pub fn streak_calculator(&self) -> StreakCalculator {
        StreakCalculator::with_policy(self.streak.future_dates)
    }

    /// Build the prompt rotations, failing on an empty override.
    pub fn prompt_catalog(&self) -> Result<PromptCatalog, ConfigError> {
        PromptCatalog::from_overrides(
            self.prompts.creative.clone(),
            self.prompts.reflection.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.user.id, "");
        assert_eq!(parsed.streak.future_dates, FutureDatePolicy::Ignore);
        assert!(parsed.prompts.creative.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("streak.future_dates").as_deref(), Some("ignore"));
        assert_eq!(cfg.get("user.id").as_deref(), Some(""));
        assert!(cfg.get("user.missing_key").is_none());
    }

    #[test]
    fn set_updates_user_and_policy() {
        let mut cfg = Config::default();
        cfg.set("user.id", "alice").unwrap();
        cfg.set("streak.future_dates", "break").unwrap();
        assert_eq!(cfg.user.id, "alice");
        assert_eq!(cfg.streak_calculator().policy(), FutureDatePolicy::Break);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_enum() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("user.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("streak.future_dates", "sometimes"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.streak.future_dates, FutureDatePolicy::Ignore);
    }

    #[test]
    fn set_prompt_override_from_json() {
        let mut cfg = Config::default();
        cfg.set("prompts.creative", r#"["one", "two"]"#).unwrap();
        assert_eq!(cfg.prompt_catalog().unwrap().creative.len(), 2);
    }

    #[test]
    fn empty_prompt_override_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.set("prompts.creative", "[]").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPromptList(_)));
        assert!(cfg.prompts.creative.is_none());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.user.id, "");
        assert!(path.exists());
    }

    #[test]
    fn save_and_reload_preserves_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.user.id = "bob".into();
        cfg.prompts.reflection = Some(vec![ReflectionPrompt {
            kind: crate::prompts::ReflectionKind::Mastery,
            text: "What did you practise?".into(),
            tag: "mastery".into(),
            law: None,
        }]);
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user_id().unwrap().as_str(), "bob");
        assert_eq!(loaded.prompt_catalog().unwrap().reflection.len(), 1);
    }

    #[test]
    fn malformed_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "user = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn missing_user_is_not_authenticated() {
        assert!(matches!(
            Config::default().user_id(),
            Err(CoreError::NotAuthenticated)
        ));
    }
}
