//! Run configuration and well-known paths under `~/.ssh`.

use std::path::PathBuf;

use crate::error::{KeymuxError, Result};

/// Input carrying one or more concatenated PEM private keys.
pub const PRIVATE_KEY_INPUT: &str = "ssh-private-key";
/// Input carrying newline-delimited `host/owner/repo` mappings.
pub const REPO_MAPPINGS_INPUT: &str = "repo-mappings";

/// URL prefix whose `http.<prefix>.extraheader` is cleared on request.
pub const DEFAULT_EXTRA_HEADER_HOST: &str = "https://github.com/";

/// Locations of the SSH client's per-user files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshPaths {
    /// The `.ssh` directory itself
    pub dir: PathBuf,
    /// Client configuration (`config`)
    pub config: PathBuf,
    /// Trust store (`known_hosts`)
    pub known_hosts: PathBuf,
    /// `dir` is `<home>/.ssh` and may be written as `~/.ssh` in client config
    home_relative: bool,
}

impl SshPaths {
    /// Paths rooted at an arbitrary `.ssh` directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            config: dir.join("config"),
            known_hosts: dir.join("known_hosts"),
            dir,
            home_relative: false,
        }
    }

    /// Paths rooted at `<home>/.ssh`, the directory the SSH client reads
    /// by default.
    pub fn in_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home_relative: true,
            ..Self::new(home.into().join(".ssh"))
        }
    }

    /// Paths rooted at `~/.ssh`.
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            KeymuxError::ConfigError("Cannot determine home directory for ~/.ssh".to_string())
        })?;
        Ok(Self::in_home(home))
    }

    /// File name of the identity written for a pseudo-host.
    pub fn key_file_name(pseudo_host: &str) -> String {
        format!("{pseudo_host}.key")
    }

    /// Absolute path of the identity written for a pseudo-host.
    pub fn key_file(&self, pseudo_host: &str) -> PathBuf {
        self.dir.join(Self::key_file_name(pseudo_host))
    }

    /// How client config and reports refer to a pseudo-host's identity.
    ///
    /// Under the home directory this is `~/.ssh/<file>`; any other
    /// directory is spelled out in full so the reference matches the file
    /// that was written.
    pub fn identity_file(&self, pseudo_host: &str) -> String {
        if self.home_relative {
            format!("~/.ssh/{}", Self::key_file_name(pseudo_host))
        } else {
            self.key_file(pseudo_host).display().to_string()
        }
    }
}

/// Everything a single provisioning run needs.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Raw key material, one or more PEM blocks back to back
    pub private_key: String,
    /// Raw mapping text; `None` selects direct-add mode
    pub repo_mappings: Option<String>,
    /// Socket the agent should bind to; `None` lets it choose
    pub auth_sock: Option<PathBuf>,
    /// Clear `http.<extra_header_host>.extraheader` before rewriting
    pub drop_extra_header: bool,
    /// URL prefix of the header override to clear
    pub extra_header_host: String,
    /// Where keys, profiles and fingerprints are written
    pub ssh_paths: SshPaths,
}

impl ProvisionConfig {
    /// Create a config with defaults for everything but the key material.
    pub fn new(private_key: impl Into<String>, ssh_paths: SshPaths) -> Self {
        Self {
            private_key: private_key.into(),
            repo_mappings: None,
            auth_sock: None,
            drop_extra_header: false,
            extra_header_host: DEFAULT_EXTRA_HEADER_HOST.to_string(),
            ssh_paths,
        }
    }

    pub fn with_repo_mappings(mut self, mappings: Option<String>) -> Self {
        self.repo_mappings = mappings;
        self
    }

    pub fn with_auth_sock(mut self, auth_sock: Option<PathBuf>) -> Self {
        self.auth_sock = auth_sock;
        self
    }

    pub fn with_drop_extra_header(mut self, drop: bool) -> Self {
        self.drop_extra_header = drop;
        self
    }

    /// Reject an empty key and fold empty optional inputs into `None`.
    pub fn validate(mut self) -> Result<Self> {
        if self.private_key.trim().is_empty() {
            return Err(KeymuxError::MissingInput {
                name: PRIVATE_KEY_INPUT.to_string(),
            });
        }

        if self
            .repo_mappings
            .as_deref()
            .is_some_and(|m| m.trim().is_empty())
        {
            self.repo_mappings = None;
        }

        if self
            .auth_sock
            .as_deref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.auth_sock = None;
        }

        Ok(self)
    }
}

/// Interpret a boolean-like input: only `true` (any case) is true.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
