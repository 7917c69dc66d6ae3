//! Live temperature sampling.
//!
//! Two independent sources are read for every sample:
//!
//! - the primary source runs a `sensors`-style command and scrapes the
//!   labelled line (`temp1:        +45.0°C`)
//! - the secondary source reads a thermal zone file containing millidegrees
//!
//! The primary source is optional; only a failing secondary source fails the
//! reading.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tokio::process::Command;

use crate::config::Settings;
use crate::data::Reading;

static TEMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+([0-9.]+)°C").expect("valid regex"));

/// Reads the current temperature from both sources.
#[derive(Debug, Clone)]
pub struct Sampler {
    command: Vec<String>,
    label: String,
    thermal_zone: PathBuf,
}

impl Sampler {
    pub fn new<P: AsRef<Path>>(command: Vec<String>, label: &str, thermal_zone: P) -> Self {
        Self {
            command,
            label: label.to_string(),
            thermal_zone: thermal_zone.as_ref().to_path_buf(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.sensors_command.clone(),
            &settings.sensors_label,
            &settings.thermal_zone,
        )
    }

    /// Take one reading. Both sources are read concurrently.
    ///
    /// ```no_run
    /// use thermwatch::Sampler;
    ///
    /// # tokio_test::block_on(async {
    /// let sampler = Sampler::new(
    ///     vec!["sensors".to_string()],
    ///     "temp1:",
    ///     "/sys/class/thermal/thermal_zone0/temp",
    /// );
    /// let reading = sampler.sample().await.unwrap();
    /// println!("{:.1}°C", reading.value());
    /// # });
    /// ```
    pub async fn sample(&self) -> Result<Reading> {
        let (primary, secondary) = tokio::join!(self.read_primary(), self.read_secondary());
        Ok(Reading {
            primary,
            secondary: secondary?,
        })
    }

    async fn read_primary(&self) -> Option<f64> {
        let (program, args) = self.command.split_first()?;
        let output = match Command::new(program).args(args).output().await {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("sensors command unavailable: {} ({})", program, e);
                return None;
            }
        };
        if !output.status.success() {
            tracing::debug!("sensors command exited with {}", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let temp = parse_sensors_output(&stdout, &self.label);
        if temp.is_none() {
            tracing::debug!("no '{}' reading in sensors output", self.label);
        }
        temp
    }

    async fn read_secondary(&self) -> Result<f64> {
        let raw = tokio::fs::read_to_string(&self.thermal_zone)
            .await
            .with_context(|| format!("Failed to read {}", self.thermal_zone.display()))?;
        parse_millidegrees(&raw)
    }
}

/// Extract the temperature from the first line containing `label`.
pub fn parse_sensors_output(output: &str, label: &str) -> Option<f64> {
    let line = output.lines().find(|line| line.contains(label))?;
    let caps = TEMP_RE.captures(line)?;
    caps[1].parse().ok()
}

/// Convert a thermal zone value (integer millidegrees) to °C.
pub fn parse_millidegrees(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let Ok(milli) = trimmed.parse::<i64>() else {
        bail!("Invalid thermal zone value: {:?}", trimmed);
    };
    Ok(milli as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SENSORS_OUTPUT: &str = "\
cpu_thermal-virtual-0
Adapter: Virtual device
temp1:        +47.2°C  (crit = +110.0°C)

rp1_adc-isa-0000
Adapter: ISA adapter
in1:           1.48 V
";

    fn zone(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_parse_sensors_output() {
        assert_eq!(parse_sensors_output(SENSORS_OUTPUT, "temp1:"), Some(47.2));
    }

    #[test]
    fn test_parse_sensors_output_missing_label() {
        assert_eq!(parse_sensors_output(SENSORS_OUTPUT, "temp2:"), None);
        assert_eq!(parse_sensors_output("temp1:  N/A", "temp1:"), None);
    }

    #[test]
    fn test_parse_millidegrees() {
        assert_eq!(parse_millidegrees("45312\n").unwrap(), 45.312);
        assert_eq!(parse_millidegrees("-1500").unwrap(), -1.5);
        assert!(parse_millidegrees("").is_err());
        assert!(parse_millidegrees("warm").is_err());
    }

    #[tokio::test]
    async fn test_sample_both_sources() {
        let file = zone("43100\n");
        let command = vec!["echo".to_string(), "temp1: +45.5°C".to_string()];
        let sampler = Sampler::new(command, "temp1:", file.path());

        let reading = sampler.sample().await.unwrap();
        assert_eq!(reading.primary, Some(45.5));
        assert_eq!(reading.secondary, 43.1);
    }

    #[tokio::test]
    async fn test_missing_sensors_command_is_not_fatal() {
        let file = zone("43100\n");
        let command = vec!["/nonexistent/sensors".to_string()];
        let sampler = Sampler::new(command, "temp1:", file.path());

        let reading = sampler.sample().await.unwrap();
        assert_eq!(reading.primary, None);
        assert_eq!(reading.secondary, 43.1);
    }

    #[tokio::test]
    async fn test_empty_command_skips_primary() {
        let file = zone("50000");
        let sampler = Sampler::new(Vec::new(), "temp1:", file.path());

        let reading = sampler.sample().await.unwrap();
        assert_eq!(reading.primary, None);
        assert_eq!(reading.secondary, 50.0);
    }

    #[tokio::test]
    async fn test_missing_thermal_zone_fails() {
        let sampler = Sampler::new(Vec::new(), "temp1:", "/nonexistent/thermal/temp");
        let err = sampler.sample().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
