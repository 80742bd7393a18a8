//! Package manager "show" command

use crate::config::schema::PackageConfig;
use crate::error::{StarsError, StarsResult};
use std::process::{Command, Stdio};
use tracing::debug;

/// Describes one installed package as `Key: value` lines
pub trait PackageShow {
    fn show(&self, name: &str) -> StarsResult<String>;
}

/// Runs `pip show <name>` (or the configured equivalent)
#[derive(Debug, Clone)]
pub struct PipShow {
    command: Vec<String>,
}

impl PipShow {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn from_config(config: &PackageConfig) -> Self {
        Self::new(config.show_command.clone())
    }
}

impl Default for PipShow {
    fn default() -> Self {
        Self::from_config(&PackageConfig::default())
    }
}

impl PackageShow for PipShow {
    fn show(&self, name: &str) -> StarsResult<String> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(StarsError::ConfigValue {
                key: "package.show_command",
                reason: "must not be empty".to_string(),
            });
        };

        let command_line = format!("{} {}", self.command.join(" "), name);
        debug!("run: {}", command_line);

        let output = Command::new(program)
            .args(args)
            .arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| StarsError::command_failed(command_line.clone(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} exited with {}: {}", command_line, output.status, stderr.trim());
            return Err(StarsError::PackageNotInstalled {
                name: name.to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        // Older pip versions exit 0 with only a warning on stderr
        if stdout.trim().is_empty() {
            return Err(StarsError::PackageNotInstalled {
                name: name.to_string(),
            });
        }

        Ok(stdout)
    }
}
