//! ssh-agent session bootstrap.
//!
//! `ssh-agent` prints a small shell banner on startup:
//!
//! ```text
//! SSH_AUTH_SOCK=/tmp/ssh-XXXX/agent.123; export SSH_AUTH_SOCK;
//! SSH_AGENT_PID=124; export SSH_AGENT_PID;
//! echo Agent pid 124;
//! ```
//!
//! The two variables are exported for later job steps and kept in an
//! [`AgentSession`] so keys can be added to the same agent.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{KeymuxError, Result};

/// Variable holding the agent's socket path.
pub const AUTH_SOCK_VAR: &str = "SSH_AUTH_SOCK";
/// Variable holding the agent's process id.
pub const AGENT_PID_VAR: &str = "SSH_AGENT_PID";

/// Starts a credential agent and returns its startup banner.
pub trait AgentLauncher {
    /// Launch the agent, bound to `socket` when given.
    fn launch(&self, socket: Option<&Path>) -> Result<String>;
}

/// Publishes variables to the steps that run after this one.
pub trait EnvExporter {
    fn export(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Connection coordinates of a running agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSession {
    pub auth_sock: PathBuf,
    pub pid: u32,
}

fn banner_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(SSH_AUTH_SOCK|SSH_AGENT_PID)=(.*); export (SSH_AUTH_SOCK|SSH_AGENT_PID)")
            .unwrap()
    })
}

/// Extract `VAR=value; export VAR` pairs from an agent banner, in order.
///
/// Lines that do not match, or that export a different name than they
/// assign, are ignored.
pub fn parse_banner(banner: &str) -> Vec<(String, String)> {
    banner
        .lines()
        .filter_map(|line| {
            let caps = banner_regex().captures(line)?;
            if caps[1] != caps[3] {
                return None;
            }
            Some((caps[1].to_string(), caps[2].to_string()))
        })
        .collect()
}

impl AgentSession {
    /// Build a session from banner text without exporting anything.
    pub fn from_banner(banner: &str) -> Result<Self> {
        Self::from_pairs(&parse_banner(banner))
    }

    fn from_pairs(pairs: &[(String, String)]) -> Result<Self> {
        let lookup = |name: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .ok_or_else(|| KeymuxError::AgentBanner(format!("{name} not found in output")))
        };

        let auth_sock = lookup(AUTH_SOCK_VAR)?;
        let pid = lookup(AGENT_PID_VAR)?;
        let pid = pid.parse::<u32>().map_err(|e| {
            KeymuxError::AgentBanner(format!("invalid {AGENT_PID_VAR} '{pid}': {e}"))
        })?;

        Ok(Self {
            auth_sock: PathBuf::from(auth_sock),
            pid,
        })
    }

    /// Launch the agent, export every variable from its banner, and return
    /// the resulting session.
    pub fn start(
        launcher: &dyn AgentLauncher,
        socket: Option<&Path>,
        exporter: &mut dyn EnvExporter,
    ) -> Result<Self> {
        let banner = launcher.launch(socket)?;
        let pairs = parse_banner(&banner);

        for (name, value) in &pairs {
            exporter.export(name, value)?;
        }

        let session = Self::from_pairs(&pairs)?;
        tracing::info!(
            auth_sock = %session.auth_sock.display(),
            pid = session.pid,
            "ssh-agent started"
        );
        Ok(session)
    }

    /// Environment a client needs to talk to this agent.
    pub fn env(&self) -> [(&'static str, String); 2] {
        [
            (AUTH_SOCK_VAR, self.auth_sock.display().to_string()),
            (AGENT_PID_VAR, self.pid.to_string()),
        ]
    }
}
