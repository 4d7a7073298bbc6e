//! keymux core - deploy-key multiplexing for CI jobs
//!
//! Pairs each private key with one `host/owner/repo` mapping, gives every
//! mapping its own pseudo-hostname in the SSH client config, and rewrites
//! git URLs so requests to the real host reach the right identity.

pub mod agent;
pub mod config;
pub mod error;
pub mod fs;
pub mod git;
pub mod keys;
pub mod known_hosts;
pub mod mapping;
pub mod process;
pub mod provision;
pub mod run;

// Re-export commonly used types
pub use agent::{AgentLauncher, AgentSession, EnvExporter};
pub use config::{parse_flag, ProvisionConfig, SshPaths};
pub use error::{KeymuxError, Result};
pub use git::{GitConfig, RewriteRule};
pub use keys::{split_keys, KeyBlock};
pub use mapping::{parse_repo_mappings, RepoMapping};
pub use process::{GitCommand, SshAddCommand, SshAgentCommand};
pub use provision::{KeyLoader, ProvisionPlan, ProvisionReport, Provisioner};
pub use run::{plan_only, run, Ports};

/// keymux version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
