//! Configuration for the `numtower` binary.
//!
//! Sources, highest precedence first: command-line flags (applied by `main`), environment
//! variables, the first configuration file found, built-in defaults.

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info, warn};
use numtower_runtime::EngineOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "NUMTOWER_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumtowerConfig {
    pub engine: EngineOptions,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Raises `level` to at least `debug`.
    pub debug: bool,
}

impl LoggingConfig {
    /// Filter directive handed to the logging bootstrap. `debug` raises the level to at
    /// least `debug` and never lowers it.
    pub fn directive(&self) -> &'static str {
        if self.debug {
            self.level.max(LogLevel::Debug).as_str()
        } else {
            self.level.as_str()
        }
    }
}

/// Ordered from least to most verbose.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    fn parse(s: &str) -> Option<LogLevel> {
        <LogLevel as ValueEnum>::from_str(s.trim(), true).ok()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the first configuration file found, then apply environment overrides.
    pub fn load() -> Result<NumtowerConfig> {
        let mut config = Self::load_from_files()?;
        Self::apply_environment_variables(&mut config);
        Ok(config)
    }

    /// Load an explicit file, then apply environment overrides.
    pub fn load_with_path(path: &Path) -> Result<NumtowerConfig> {
        let mut config = Self::load_from_file(path)?;
        Self::apply_environment_variables(&mut config);
        Ok(config)
    }

    fn load_from_files() -> Result<NumtowerConfig> {
        for path in Self::find_config_files() {
            if path.is_dir() {
                info!(
                    "Ignoring config directory path (expected file): {}",
                    path.display()
                );
                continue;
            }
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(NumtowerConfig::default())
    }

    fn find_config_files() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(config_path) = env::var(CONFIG_ENV) {
            if !config_path.is_empty() {
                paths.push(PathBuf::from(config_path));
            }
        }

        if let Ok(current_dir) = env::current_dir() {
            for name in [
                ".numtower.toml",
                ".numtower.yaml",
                ".numtower.yml",
                ".numtower.json",
            ] {
                paths.push(current_dir.join(name));
            }
        }

        if let Some(config_dir) = dirs::home_dir().map(|home| home.join(".config/numtower")) {
            paths.push(config_dir.join("config.toml"));
        }

        paths
    }

    pub fn load_from_file(path: &Path) -> Result<NumtowerConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            _ => {
                if let Ok(config) = toml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_yaml::from_str(&content) {
                    config
                } else if let Ok(config) = serde_json::from_str(&content) {
                    config
                } else {
                    return Err(anyhow::anyhow!(
                        "Could not parse config file {} (tried TOML, YAML, JSON)",
                        path.display()
                    ));
                }
            }
        };

        Ok(config)
    }

    fn apply_environment_variables(config: &mut NumtowerConfig) {
        if let Ok(raw) = env::var("NUMTOWER_TOLERANCE") {
            match raw.trim().parse::<f64>() {
                Ok(tol) if tol >= 0.0 => config.engine.equality_tolerance = tol,
                _ => warn!("Ignoring NUMTOWER_TOLERANCE={raw:?}: expected a non-negative number"),
            }
        }
        if let Ok(raw) = env::var("NUMTOWER_ZERO_SNAP") {
            match raw.trim().parse::<f64>() {
                Ok(snap) if snap >= 0.0 => config.engine.zero_snap = snap,
                _ => warn!("Ignoring NUMTOWER_ZERO_SNAP={raw:?}: expected a non-negative number"),
            }
        }
        if let Ok(raw) = env::var("NUMTOWER_LOG_LEVEL") {
            match LogLevel::parse(&raw) {
                Some(level) => config.logging.level = level,
                None => warn!("Ignoring NUMTOWER_LOG_LEVEL={raw:?}"),
            }
        }
        if let Ok(raw) = env::var("NUMTOWER_DEBUG") {
            if let Some(flag) = parse_bool(&raw) {
                config.logging.debug = flag;
            }
        }
    }

    pub fn save_to_file(config: &NumtowerConfig, path: &Path) -> Result<()> {
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(config).context("Failed to serialize config to YAML")?
            }
            Some("json") => serde_json::to_string_pretty(config)
                .context("Failed to serialize config to JSON")?,
            _ => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&NumtowerConfig::default())
            .unwrap_or_else(|_| "# Failed to generate config".to_string())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ENV_VARS: [&str; 4] = [
        "NUMTOWER_TOLERANCE",
        "NUMTOWER_ZERO_SNAP",
        "NUMTOWER_LOG_LEVEL",
        "NUMTOWER_DEBUG",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults() {
        let config = NumtowerConfig::default();
        assert_eq!(config.engine, EngineOptions::default());
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.logging.directive(), "warn");
    }

    #[test]
    fn file_round_trip_in_each_format() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = NumtowerConfig::default();
        config.engine.zero_snap = 1.0e-9;
        config.logging.level = LogLevel::Info;

        for name in ["cfg.toml", "cfg.yaml", "cfg.json"] {
            let path = temp_dir.path().join(name);
            ConfigLoader::save_to_file(&config, &path).unwrap();
            let loaded = ConfigLoader::load_from_file(&path).unwrap();
            assert_eq!(loaded, config, "{name}");
        }
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("numtower.conf");
        fs::write(&path, "[engine]\nequality_tolerance = 0.001\n").unwrap();

        let loaded = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(loaded.engine.equality_tolerance, 0.001);
        assert_eq!(loaded.engine.zero_snap, EngineOptions::default().zero_snap);
        assert_eq!(loaded.logging, LoggingConfig::default());
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config"));
    }

    #[test]
    fn environment_overrides_file() {
        let _lock = ENV_GUARD.lock().unwrap();
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.yaml");
        fs::write(&path, "engine:\n  zero_snap: 0.5\nlogging:\n  level: error\n").unwrap();

        env::set_var("NUMTOWER_ZERO_SNAP", "0.25");
        env::set_var("NUMTOWER_TOLERANCE", "not-a-number");
        env::set_var("NUMTOWER_LOG_LEVEL", "TRACE");
        env::set_var("NUMTOWER_DEBUG", "yes");
        let loaded = ConfigLoader::load_with_path(&path);
        clear_env();

        let loaded = loaded.unwrap();
        assert_eq!(loaded.engine.zero_snap, 0.25);
        assert_eq!(
            loaded.engine.equality_tolerance,
            EngineOptions::default().equality_tolerance
        );
        assert_eq!(loaded.logging.level, LogLevel::Trace);
        assert!(loaded.logging.debug);
        assert_eq!(loaded.logging.directive(), "trace");
    }

    #[test]
    fn debug_flag_only_raises_the_level() {
        let at = |level, debug| LoggingConfig { level, debug }.directive();
        assert_eq!(at(LogLevel::Error, true), "debug");
        assert_eq!(at(LogLevel::Info, true), "debug");
        assert_eq!(at(LogLevel::Trace, true), "trace");
        assert_eq!(at(LogLevel::Trace, false), "trace");
        assert_eq!(at(LogLevel::Error, false), "error");
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
