use std::path::PathBuf;

use thiserror::Error;

use crate::config::{PRIVATE_KEY_INPUT, REPO_MAPPINGS_INPUT};

/// keymux error types
#[derive(Error, Debug)]
pub enum KeymuxError {
    /// A required input was empty or missing
    #[error(
        "The {name} argument is empty. Maybe the secret has not been configured, \
         or you are using a wrong secret name in your workflow file."
    )]
    MissingInput { name: String },

    /// A repo mapping line did not match `host/owner/repo`
    #[error("Invalid {input} format at: {line}")]
    InvalidMapping { input: String, line: String },

    /// Key blocks and repo mappings do not pair up
    #[error(
        "The number of {} arguments ({keys}) and {} ({mappings}) must match.",
        PRIVATE_KEY_INPUT,
        REPO_MAPPINGS_INPUT
    )]
    KeyCountMismatch { keys: usize, mappings: usize },

    /// Two mappings resolve to the same pseudo-hostname
    #[error("Duplicate repo mapping: pseudo-host {pseudo_host} is used more than once")]
    DuplicatePseudoHost { pseudo_host: String },

    /// The private key input contained no key material
    #[error("No private key blocks found in ssh-private-key")]
    NoKeys,

    /// The agent banner could not be parsed into a session
    #[error("ssh-agent banner error: {0}")]
    AgentBanner(String),

    /// A spawned command failed to start or exited unsuccessfully
    #[error("Command `{command}` failed: {message}")]
    Subprocess { command: String, message: String },

    /// A filesystem operation on a known path failed
    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl KeymuxError {
    /// Build a [`KeymuxError::Filesystem`] for the given path.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KeymuxError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Whether the error stems from bad inputs rather than the host environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            KeymuxError::MissingInput { .. }
                | KeymuxError::InvalidMapping { .. }
                | KeymuxError::KeyCountMismatch { .. }
                | KeymuxError::DuplicatePseudoHost { .. }
                | KeymuxError::NoKeys
                | KeymuxError::ConfigError(_)
        )
    }
}

/// Result type alias for keymux operations
pub type Result<T> = std::result::Result<T, KeymuxError>;
