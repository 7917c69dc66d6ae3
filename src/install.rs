//! Installation of the cron-driven logging setup.
//!
//! Installing writes three files: a shell script that appends one sample to
//! the log, a cron file running that script every minute, and the log itself
//! with its header line. The process must already be allowed to write the
//! configured paths.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::process::Command;

use crate::config::Settings;
use crate::data::{InstallStatus, LOG_HEADER};

/// Writes and inspects the logging script, cron entry and sample log.
#[derive(Debug, Clone)]
pub struct Installer {
    log_path: PathBuf,
    script_path: PathBuf,
    cron_path: PathBuf,
    thermal_zone: PathBuf,
    sensors_command: Vec<String>,
    sensors_label: String,
}

impl Installer {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            log_path: settings.log_path.clone(),
            script_path: settings.script_path.clone(),
            cron_path: settings.cron_path.clone(),
            thermal_zone: settings.thermal_zone.clone(),
            sensors_command: settings.sensors_command.clone(),
            sensors_label: settings.sensors_label.clone(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    /// Contents of the logging script.
    pub fn script(&self) -> String {
        format!(
            r#"#!/bin/bash
# Temperature Logger
# Appends one CSV sample per run: timestamp,sensors_temp,thermal_temp

LOG_FILE="{log}"
TIMESTAMP=$(date '+%Y-%m-%d %H:%M:%S')

# CPU temperature from sensors (numeric value only, empty when unavailable)
{cpu_temp}

# Thermal zone temperature (reported in millidegrees)
RAW_TEMP=$(cat {zone})
THERMAL_TEMP=$(awk -v raw="$RAW_TEMP" 'BEGIN {{ printf "%.1f", raw / 1000 }}')

echo "$TIMESTAMP,$CPU_TEMP,$THERMAL_TEMP" >> "$LOG_FILE"
"#,
            log = self.log_path.display(),
            cpu_temp = self.cpu_temp_line(),
            zone = self.thermal_zone.display(),
        )
    }

    /// Script line filling `CPU_TEMP` from the configured sensors command.
    fn cpu_temp_line(&self) -> String {
        if self.sensors_command.is_empty() {
            return "CPU_TEMP=\"\"".to_string();
        }
        let command: Vec<String> = self.sensors_command.iter().map(|a| shell_quote(a)).collect();
        format!(
            "CPU_TEMP=$({} 2>/dev/null | grep {} | head -n1 | awk '{{print $2}}' | sed 's/[+°C]//g')",
            command.join(" "),
            shell_quote(&self.sensors_label),
        )
    }

    /// Contents of the cron file.
    pub fn cron_entry(&self) -> String {
        format!(
            "# Temperature logging cron job\n# Runs every minute to collect temperature data\n* * * * * root {}\n",
            self.script_path.display()
        )
    }

    /// Check which parts of the setup are present. Never fails.
    pub fn status(&self) -> InstallStatus {
        let script = self.script_path.to_string_lossy();
        let cron = fs::read_to_string(&self.cron_path)
            .map(|content| content.lines().any(|l| !l.starts_with('#') && l.contains(&*script)))
            .unwrap_or(false);

        InstallStatus {
            script: self.script_path.is_file(),
            cron,
            log: self.log_path.exists(),
        }
    }

    /// Write the script, cron file and log.
    ///
    /// An existing log is kept as is, so reinstalling never loses history.
    pub fn install(&self) -> Result<InstallStatus> {
        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        write_file(&self.script_path, &self.script(), 0o755)?;
        tracing::info!("wrote logging script {}", self.script_path.display());

        write_file(&self.cron_path, &self.cron_entry(), 0o644)?;
        tracing::info!("wrote cron entry {}", self.cron_path.display());

        self.create_log()?;

        Ok(self.status())
    }

    fn create_log(&self) -> Result<()> {
        let file = OpenOptions::new().write(true).create_new(true).open(&self.log_path);
        let mut file = match file {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::info!("keeping existing log {}", self.log_path.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create {}", self.log_path.display()));
            }
        };
        writeln!(file, "{}", LOG_HEADER)?;
        fs::set_permissions(&self.log_path, fs::Permissions::from_mode(0o644))?;
        tracing::info!("created log {}", self.log_path.display());
        Ok(())
    }

    /// Run the logging script once so the log has a first sample.
    pub async fn run_once(&self) -> Result<()> {
        let status = Command::new(&self.script_path)
            .status()
            .await
            .with_context(|| format!("Failed to run {}", self.script_path.display()))?;
        if !status.success() {
            bail!("{} exited with {}", self.script_path.display(), status);
        }
        Ok(())
    }
}

/// Single-quote `arg` for a POSIX shell.
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

fn write_file(path: &Path, contents: &str, mode: u32) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn installer_in(dir: &TempDir) -> Installer {
        Installer::from_settings(&Settings {
            log_path: dir.path().join("log/temperature.log"),
            script_path: dir.path().join("bin/temp_logger.sh"),
            cron_path: dir.path().join("cron.d/temperature-logger"),
            ..Settings::default()
        })
    }

    #[test]
    fn test_status_before_install() {
        let dir = TempDir::new().unwrap();
        let status = installer_in(&dir).status();
        assert_eq!(status, InstallStatus::default());
        assert!(!status.is_installed());
    }

    #[test]
    fn test_install_writes_everything() {
        let dir = TempDir::new().unwrap();
        let installer = installer_in(&dir);

        let status = installer.install().unwrap();
        assert!(status.script && status.cron && status.log);
        assert!(status.is_installed());

        let log = fs::read_to_string(installer.log_path()).unwrap();
        assert_eq!(log, format!("{}\n", LOG_HEADER));

        let mode = fs::metadata(installer.script_path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);

        let cron = fs::read_to_string(dir.path().join("cron.d/temperature-logger")).unwrap();
        assert!(cron.contains("* * * * * root"));
        assert!(cron.contains("temp_logger.sh"));
    }

    #[test]
    fn test_reinstall_keeps_history() {
        let dir = TempDir::new().unwrap();
        let installer = installer_in(&dir);
        installer.install().unwrap();

        let mut log = OpenOptions::new().append(true).open(installer.log_path()).unwrap();
        writeln!(log, "2024-01-01 00:00:00,45.0,42.3").unwrap();

        installer.install().unwrap();
        let content = fs::read_to_string(installer.log_path()).unwrap();
        assert!(content.ends_with("2024-01-01 00:00:00,45.0,42.3\n"));
    }

    #[test]
    fn test_cron_must_reference_script() {
        let dir = TempDir::new().unwrap();
        let installer = installer_in(&dir);
        installer.install().unwrap();

        fs::write(dir.path().join("cron.d/temperature-logger"), "# disabled\n").unwrap();
        let status = installer.status();
        assert!(status.script);
        assert!(!status.cron);
        assert!(!status.is_installed());
    }

    #[test]
    fn test_script_uses_configured_paths() {
        let dir = TempDir::new().unwrap();
        let installer = installer_in(&dir);
        let script = installer.script();

        assert!(script.starts_with("#!/bin/bash\n"));
        assert!(script.contains(&format!("LOG_FILE=\"{}\"", installer.log_path().display())));
        assert!(script.contains("grep 'temp1:'"));
        assert!(script.contains("/sys/class/thermal/thermal_zone0/temp"));
        assert!(script.contains("{print $2}"));
    }

    #[test]
    fn test_script_uses_configured_sensors_command() {
        let dir = TempDir::new().unwrap();
        let installer = Installer::from_settings(&Settings {
            log_path: dir.path().join("temperature.log"),
            sensors_command: ["sensors", "-A", "k10temp-pci-00c3"].map(String::from).to_vec(),
            sensors_label: "Tctl:".to_string(),
            ..Settings::default()
        });
        let script = installer.script();

        assert!(script.contains(
            "CPU_TEMP=$('sensors' '-A' 'k10temp-pci-00c3' 2>/dev/null | grep 'Tctl:'"
        ));
    }

    #[test]
    fn test_script_without_sensors_command_leaves_primary_empty() {
        let dir = TempDir::new().unwrap();
        let installer = Installer::from_settings(&Settings {
            log_path: dir.path().join("temperature.log"),
            sensors_command: Vec::new(),
            ..Settings::default()
        });
        let script = installer.script();

        assert!(script.contains("CPU_TEMP=\"\"\n"));
        assert!(!script.contains("2>/dev/null | grep"));
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("sensors"), "'sensors'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("a b;rm"), "'a b;rm'");
    }

    #[tokio::test]
    async fn test_run_once_without_script_fails() {
        let dir = TempDir::new().unwrap();
        let err = installer_in(&dir).run_once().await.unwrap_err();
        assert!(err.to_string().contains("Failed to run"));
    }
}
