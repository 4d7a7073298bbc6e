//! GitHub Actions integration: exported variables and failure annotations.
//!
//! Variables are published by appending to the file named by `GITHUB_ENV`,
//! using the multi-line heredoc form so values may contain any character.

use std::path::PathBuf;

use keymux_core::{EnvExporter, KeymuxError};

/// Whether we are running inside a GitHub Actions job.
pub fn is_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Escape a message for use in a workflow command.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// The `::error::` workflow command that fails the step with a message.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Report a fatal error through the platform and on stderr.
pub fn report_failure(error: &dyn std::error::Error) {
    if is_github_actions() {
        println!("{}", error_annotation(&error.to_string()));
    }
    eprintln!("Error: {error}");
}

/// Render one `GITHUB_ENV` entry.
pub fn env_file_entry(name: &str, value: &str, delimiter: &str) -> Result<String, KeymuxError> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(KeymuxError::ConfigError(format!(
            "Unexpected input: name or value contains the delimiter {delimiter}"
        )));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Exports variables to later job steps.
pub struct ActionsEnv {
    env_file: Option<PathBuf>,
}

impl ActionsEnv {
    /// Export through `env_file`, or print `export` lines when there is none.
    pub fn new(env_file: Option<PathBuf>) -> Self {
        Self {
            env_file: env_file.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

impl EnvExporter for ActionsEnv {
    fn export(&mut self, name: &str, value: &str) -> keymux_core::Result<()> {
        match &self.env_file {
            Some(path) => {
                let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
                let entry = env_file_entry(name, value, &delimiter)?;
                keymux_core::fs::append(path, &entry)?;
                tracing::debug!(name, env_file = %path.display(), "Exported variable");
            }
            None => {
                tracing::warn!(name, "No GITHUB_ENV file; variable is only printed");
                println!("export {name}={value}");
            }
        }
        Ok(())
    }
}
