use std::path::PathBuf;

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing::warn;

use crate::entry::is_zone_abbreviation;

pub const DEFAULT_TIMEZONE: &str = "PST";

/// Runtime settings, read from `MT_*` environment variables.
///
/// `MT_TIMEZONE` sets the literal zone token written into dates,
/// `MT_OUTPUT_DIR` the directory used when no `--output` is given.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub timezone: String,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            timezone: DEFAULT_TIMEZONE.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("timezone", DEFAULT_TIMEZONE)?
        .set_default("output_dir", ".")
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(base_builder()?.add_source(Environment::with_prefix("MT")).build()?)
    }

    fn from_config(cfg: Config) -> Result<Self, ConfigError> {
        let settings: Settings = cfg.try_deserialize()?;
        // The blog server only reads zone abbreviations like PST or CEST.
        if !is_zone_abbreviation(&settings.timezone) {
            return Err(ConfigError::Message(format!(
                "timezone {:?} is not a zone abbreviation",
                settings.timezone
            )));
        }
        Ok(settings)
    }

    /// Like [`Settings::from_env`], but a broken environment yields the defaults.
    pub fn load() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            warn!(error = %e, "bad MT_* settings, using defaults");
            Settings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_timezone(tz: &str) -> Result<Settings, ConfigError> {
        let cfg = base_builder()
            .unwrap()
            .set_override("timezone", tz)
            .unwrap()
            .build()
            .unwrap();
        Settings::from_config(cfg)
    }

    #[test]
    fn defaults_are_pst_and_cwd() {
        let s = Settings::default();
        assert_eq!(s.timezone, "PST");
        assert_eq!(s.output_dir, PathBuf::from("."));
    }

    #[test]
    fn builder_defaults_match_struct_defaults() {
        let cfg = base_builder().unwrap().build().unwrap();
        assert_eq!(Settings::from_config(cfg).unwrap(), Settings::default());
    }

    #[test]
    fn abbreviated_timezones_are_accepted() {
        assert_eq!(with_timezone("UTC").unwrap().timezone, "UTC");
        assert_eq!(with_timezone("CEST").unwrap().timezone, "CEST");
    }

    #[test]
    fn named_timezones_are_rejected() {
        assert!(with_timezone("America/Los_Angeles").is_err());
        assert!(with_timezone("pst").is_err());
        assert!(with_timezone("").is_err());
    }
}
