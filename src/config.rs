//! Runtime settings.
//!
//! Settings come from built-in defaults, an optional TOML file and
//! `THERMWATCH_*` environment variables, in increasing priority. Nested keys
//! use a double underscore (`THERMWATCH_THRESHOLDS__CRITICAL=90`).
//!
//! ```toml
//! log_path = "/var/log/temperature/temperature.log"
//! refresh_secs = 30
//! sensors_command = ["sensors"]
//!
//! [thresholds]
//! warm = 60.0
//! hot = 70.0
//! critical = 80.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::Thresholds;

/// All tunables for probing, logging and display.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sample log written by the cron job.
    pub log_path: PathBuf,
    /// Logging script invoked by cron.
    pub script_path: PathBuf,
    /// Cron file that schedules the script.
    pub cron_path: PathBuf,
    /// Thermal zone file holding millidegrees.
    pub thermal_zone: PathBuf,
    /// Command (program and arguments) printing sensor readings. Used both
    /// by the live sampler and by the installed logging script.
    pub sensors_command: Vec<String>,
    /// Label of the sensors line carrying the CPU temperature.
    pub sensors_label: String,
    /// Poll period for the dashboard, in seconds.
    pub refresh_secs: u64,
    /// Number of trailing log lines the viewer reads.
    pub tail_lines: usize,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("/var/log/temperature/temperature.log"),
            script_path: PathBuf::from("/usr/local/bin/temp_logger.sh"),
            cron_path: PathBuf::from("/etc/cron.d/temperature-logger"),
            thermal_zone: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            sensors_command: vec!["sensors".to_string()],
            sensors_label: "temp1:".to_string(),
            refresh_secs: 30,
            tail_lines: 10_000,
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given and then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, environment())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(env)
            .build()
            .context("Failed to load configuration")?;

        config.try_deserialize().context("Invalid configuration")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

/// `THERMWATCH_*` variables. Scalars are parsed to their field types and
/// `THERMWATCH_SENSORS_COMMAND` is split on spaces into program and arguments.
fn environment() -> Environment {
    Environment::with_prefix("THERMWATCH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(" ")
        .with_list_parse_key("sensors_command")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
log_path = "/tmp/temps.log"
refresh_secs = 5
sensors_command = ["sensors", "-A"]

[thresholds]
critical = 90.0
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.log_path, PathBuf::from("/tmp/temps.log"));
        assert_eq!(settings.refresh_secs, 5);
        assert_eq!(settings.sensors_command, vec!["sensors", "-A"]);
        assert_eq!(settings.thresholds.critical, 90.0);
        // untouched fields keep their defaults
        assert_eq!(settings.thresholds.warm, 60.0);
        assert_eq!(settings.tail_lines, 10_000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().with_extension("missing.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::load_with(
            None,
            env(&[
                ("THERMWATCH_SENSORS_COMMAND", "sensors -A coretemp-isa-0000"),
                ("THERMWATCH_REFRESH_SECS", "5"),
                ("THERMWATCH_LOG_PATH", "/tmp/temps.log"),
                ("THERMWATCH_THRESHOLDS__CRITICAL", "90"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.sensors_command, vec!["sensors", "-A", "coretemp-isa-0000"]);
        assert_eq!(settings.refresh_secs, 5);
        assert_eq!(settings.log_path, PathBuf::from("/tmp/temps.log"));
        assert_eq!(settings.thresholds.critical, 90.0);
        assert_eq!(settings.thresholds.hot, 70.0);
    }

    #[test]
    fn test_single_word_sensors_command_from_environment() {
        let settings =
            Settings::load_with(None, env(&[("THERMWATCH_SENSORS_COMMAND", "sensors")])).unwrap();
        assert_eq!(settings.sensors_command, vec!["sensors"]);
        assert_eq!(settings.sensors_label, "temp1:");
    }

    #[test]
    fn test_environment_beats_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "refresh_secs = 5").unwrap();

        let settings =
            Settings::load_with(Some(file.path()), env(&[("THERMWATCH_REFRESH_SECS", "7")]))
                .unwrap();
        assert_eq!(settings.refresh_secs, 7);
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let settings = Settings {
            refresh_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_secs(1));
    }
}
