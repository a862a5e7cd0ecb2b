use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use qblock_engine::EngineConfig;

use crate::supply::{PieceTemplate, SupplyPolicy, default_templates};

pub const CONFIG_PATH_ENV: &str = "QBLOCK_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub supply: SupplyPolicy,
    #[serde(default = "default_templates")]
    pub pieces: Vec<PieceTemplate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            supply: SupplyPolicy::default(),
            pieces: default_templates(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        Self::resolve(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Resolution order: explicit path, `$XDG_CONFIG_HOME`, `$HOME/.config`, cwd.
    pub fn resolve<F>(mut get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<PathBuf>,
    {
        if let Some(explicit) = get_env(CONFIG_PATH_ENV) {
            return Self { path: explicit };
        }

        let base = get_env("XDG_CONFIG_HOME")
            .or_else(|| get_env("HOME").map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            path: base.join("qblock").join("config.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> GameConfig {
        match self.try_load() {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                GameConfig::default()
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "falling back to default config");
                GameConfig::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<GameConfig, ConfigError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice::<GameConfig>(&bytes)?)
    }

    pub fn save(&self, config: &GameConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("qblock-settings-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: GameConfig = serde_json::from_str(r#"{"engine":{"gridSize":6}}"#)
            .expect("config JSON should parse");
        assert_eq!(parsed.engine.grid_size, 6);
        assert_eq!(parsed.engine.initial_score, 640);
        assert_eq!(parsed.engine.initial_moves, 8);
        assert_eq!(parsed.supply, SupplyPolicy::Fixed);
        assert_eq!(parsed.pieces, default_templates());
    }

    #[test]
    fn supply_policy_parses_camel_case() {
        let parsed: GameConfig = serde_json::from_str(r#"{"supply":"replenish"}"#).unwrap();
        assert_eq!(parsed.supply, SupplyPolicy::Replenish);
    }

    #[test]
    fn resolve_prefers_explicit_path() {
        let store = ConfigStore::resolve(|k| match k {
            CONFIG_PATH_ENV => Some(PathBuf::from("/tmp/custom.json")),
            "HOME" => Some(PathBuf::from("/home/player")),
            _ => None,
        });
        assert_eq!(store.path(), Path::new("/tmp/custom.json"));
    }

    #[test]
    fn resolve_uses_xdg_config_home_before_home() {
        let store = ConfigStore::resolve(|k| match k {
            "XDG_CONFIG_HOME" => Some(PathBuf::from("/xdg")),
            "HOME" => Some(PathBuf::from("/home/player")),
            _ => None,
        });
        assert_eq!(store.path(), Path::new("/xdg/qblock/config.json"));
    }

    #[test]
    fn resolve_falls_back_to_working_dir_without_home() {
        let store = ConfigStore::resolve(|_| None);
        assert_eq!(store.path(), Path::new("./qblock/config.json"));
    }

    #[test]
    fn resolve_falls_back_to_home_config_dir() {
        let store = ConfigStore::resolve(|k| match k {
            "HOME" => Some(PathBuf::from("/home/player")),
            _ => None,
        });
        assert_eq!(
            store.path(),
            Path::new("/home/player/.config/qblock/config.json")
        );
    }

    #[test]
    fn save_then_load_keeps_custom_values() {
        let store = ConfigStore::new(temp_path("roundtrip"));
        let mut config = GameConfig::default();
        config.engine.grid_size = 8;
        config.engine.initial_moves = 3;
        config.supply = SupplyPolicy::Replenish;
        config.pieces.truncate(1);

        store.save(&config).unwrap();
        let loaded = store.try_load().unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[test]
    fn unknown_keys_from_older_files_are_ignored() {
        let parsed: GameConfig =
            serde_json::from_str(r#"{"version":7,"engine":{"gridSize":5}}"#).unwrap();
        assert_eq!(parsed.engine.grid_size, 5);
        assert_eq!(parsed.pieces, default_templates());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::new(&path);
        assert!(matches!(store.try_load(), Err(ConfigError::Serialization(_))));
        assert_eq!(store.load(), GameConfig::default());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = ConfigStore::new(temp_path("missing"));
        assert_eq!(store.load(), GameConfig::default());
    }
}
