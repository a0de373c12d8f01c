//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tspdraw/tspdraw.toml`
//! 3. Local config: `<dir>/.tspdraw.toml` (working directory or `-C <dir>`)
//! 4. Environment variables: `TSPDRAW_*` prefix, `__` separates nested keys

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{Region, DEFAULT_ATTEMPTS_PER_POINT};

/// Default region for random points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegionSettings {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Default for RegionSettings {
    fn default() -> Self {
        // 1024x576 drawing frame minus the 150px control panel
        Self {
            x: 0,
            y: 0,
            width: 874,
            height: 576,
        }
    }
}

impl From<RegionSettings> for Region {
    fn from(r: RegionSettings) -> Self {
        Region::new(r.x, r.y, r.width, r.height)
    }
}

/// Raw region for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRegionSettings {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl RegionSettings {
    /// Field-wise overlay: specified fields win, the rest keep `self`.
    pub fn merge(&self, overlay: &RawRegionSettings) -> Self {
        Self {
            x: overlay.x.unwrap_or(self.x),
            y: overlay.y.unwrap_or(self.y),
            width: overlay.width.unwrap_or(self.width),
            height: overlay.height.unwrap_or(self.height),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub step_interval_ms: Option<u64>,
    pub attempts_per_point: Option<u32>,
    pub seed: Option<u64>,
    #[serde(default)]
    pub region: RawRegionSettings,
}

/// Unified configuration for tspdraw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Period of the automatic step driver in milliseconds (default: 1000)
    pub step_interval_ms: u64,
    /// Random sampling attempts allowed per requested point (default: 100)
    pub attempts_per_point: u32,
    /// Fixed seed for random generation, entropy when unset
    pub seed: Option<u64>,
    /// Region used by random generation when none is given
    pub region: RegionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            step_interval_ms: 1000,
            attempts_per_point: DEFAULT_ATTEMPTS_PER_POINT,
            seed: None,
            region: RegionSettings::default(),
        }
    }
}

/// Get the XDG config directory for tspdraw.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tspdraw").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tspdraw.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".tspdraw.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    pub fn region(&self) -> Region {
        self.region.into()
    }

    /// Overlay a raw layer: specified scalars replace, region merges per field.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            step_interval_ms: overlay.step_interval_ms.unwrap_or(self.step_interval_ms),
            attempts_per_point: overlay
                .attempts_per_point
                .unwrap_or(self.attempts_per_point),
            seed: overlay.seed.or(self.seed),
            region: self.region.merge(&overlay.region),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.tspdraw.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/tspdraw/tspdraw.toml`
    /// 3. Local config: `<local_dir>/.tspdraw.toml`
    /// 4. Environment variables: `TSPDRAW_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;

        Ok(current)
    }

    /// Apply TSPDRAW_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TSPDRAW")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_int(&config, "step_interval_ms")? {
            settings.step_interval_ms = val;
        }
        if let Some(val) = env_int(&config, "attempts_per_point")? {
            settings.attempts_per_point = val;
        }
        if let Some(val) = env_int(&config, "seed")? {
            settings.seed = Some(val);
        }
        if let Some(val) = env_int(&config, "region.x")? {
            settings.region.x = val;
        }
        if let Some(val) = env_int(&config, "region.y")? {
            settings.region.y = val;
        }
        if let Some(val) = env_int(&config, "region.width")? {
            settings.region.width = val;
        }
        if let Some(val) = env_int(&config, "region.height")? {
            settings.region.height = val;
        }

        Ok(settings)
    }

    /// Reject values the driver cannot run with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.step_interval_ms == 0 {
            return Err(ApplicationError::Config {
                message: "step_interval_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# tspdraw configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/tspdraw/tspdraw.toml
#   Local:  <dir>/.tspdraw.toml
#   Env:    TSPDRAW_* environment variables, e.g. TSPDRAW_REGION__WIDTH=300

# Period of automatic stepping in milliseconds
# step_interval_ms = 1000

# Random sampling attempts per requested point before giving up
# attempts_per_point = 100

# Fixed seed for reproducible random points
# seed = 42

[region]
# Default rectangle for random points: [x, x+width) x [y, y+height)
# x = 0
# y = 0
# width = 874
# height = 576
"#
        .to_string()
    }

    /// Write the template to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> Result<(), ApplicationError> {
        if path.exists() {
            return Err(ApplicationError::Config {
                message: format!("config already exists: {}", path.display()),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApplicationError::Config {
                message: format!("create {}: {}", parent.display(), e),
            })?;
        }
        std::fs::write(path, Self::template()).map_err(|e| ApplicationError::Config {
            message: format!("write {}: {}", path.display(), e),
        })
    }
}

/// Integer value of `key`, None when unset. A set but unparsable or out of
/// range value is an error.
fn env_int<T: TryFrom<i64>>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get_int(key) {
        Ok(val) => to_int(key, val).map(Some),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("TSPDRAW_{}: {}", key.to_uppercase().replace('.', "__"), e),
        }),
    }
}

fn to_int<T: TryFrom<i64>>(key: &str, val: i64) -> Result<T, ApplicationError> {
    T::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{key}: value {val} out of range"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_default_settings_when_created_then_uses_default_frame() {
        let settings = Settings::default();
        assert_eq!(settings.step_interval_ms, 1000);
        assert_eq!(settings.region(), Region::new(0, 0, 874, 576));
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_merge_region_field_wise() {
        let base = RegionSettings::default();
        let overlay = RawRegionSettings {
            width: Some(100),
            ..Default::default()
        };

        let result = base.merge(&overlay);

        assert_eq!(result.width, 100);
        assert_eq!(result.height, 576);
        assert_eq!(result.x, 0);
    }

    #[test]
    fn test_merge_settings_keeps_unspecified() {
        let base = Settings {
            seed: Some(7),
            ..Default::default()
        };
        let overlay = RawSettings {
            step_interval_ms: Some(250),
            ..Default::default()
        };

        let result = base.merge_with(&overlay);

        assert_eq!(result.step_interval_ms, 250);
        assert_eq!(result.seed, Some(7));
        assert_eq!(result.attempts_per_point, DEFAULT_ATTEMPTS_PER_POINT);
    }

    #[test]
    fn test_template_parses_as_raw_settings() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.step_interval_ms.is_none());
        assert!(raw.region.width.is_none());
    }

    #[test]
    fn test_env_int_distinguishes_unset_from_malformed() {
        let config = Config::builder()
            .set_override("seed", "abc")
            .unwrap()
            .set_override("region.width", "300")
            .unwrap()
            .set_override("attempts_per_point", "-1")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(env_int::<i32>(&config, "region.width").unwrap(), Some(300));
        assert_eq!(env_int::<u64>(&config, "step_interval_ms").unwrap(), None);

        let err = env_int::<u64>(&config, "seed").unwrap_err();
        assert!(err.to_string().contains("TSPDRAW_SEED"), "{err}");
        assert!(env_int::<u32>(&config, "attempts_per_point").is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let settings = Settings {
            step_interval_ms: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
