//! CLI command definitions and dispatch.

mod plan;
mod setup;
mod version;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use keymux_core::{parse_flag, ProvisionConfig, SshPaths};

pub use plan::render_plan;

/// keymux: per-repository deploy keys for CI jobs.
#[derive(Parser)]
#[command(name = "keymux", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Start ssh-agent, install keys, and rewrite git URLs
    Setup(setup::SetupArgs),
    /// Validate inputs and show what setup would do
    Plan(plan::PlanArgs),
    /// Show version information
    Version(version::VersionArgs),
}

/// Action inputs shared by `setup` and `plan`.
///
/// Each option falls back to the `INPUT_*` variable the runner sets for the
/// corresponding action input.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// One or more PEM private keys, concatenated
    #[arg(
        long = "ssh-private-key",
        env = "INPUT_SSH-PRIVATE-KEY",
        hide_env_values = true,
        value_name = "PEM"
    )]
    pub private_key: Option<String>,

    /// Newline-separated host/owner/repo lines, one per key
    #[arg(long, env = "INPUT_REPO-MAPPINGS", value_name = "LINES")]
    pub repo_mappings: Option<String>,

    /// Socket path for ssh-agent to bind
    #[arg(long, env = "INPUT_SSH-AUTH-SOCK", value_name = "PATH")]
    pub ssh_auth_sock: Option<PathBuf>,

    /// Clear http.https://github.com/.extraheader ("true" to enable)
    #[arg(
        long,
        env = "INPUT_DROP-EXTRA-HEADER",
        value_name = "BOOL",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_flag_value
    )]
    pub drop_extra_header: bool,

    /// Directory for keys, config and known_hosts (default: ~/.ssh)
    #[arg(long, env = "KEYMUX_SSH_DIR", value_name = "DIR")]
    pub ssh_dir: Option<PathBuf>,
}

fn parse_flag_value(value: &str) -> Result<bool, String> {
    Ok(parse_flag(value))
}

impl InputArgs {
    /// Build the run configuration. Validation happens in the pipeline.
    pub fn into_config(self) -> keymux_core::Result<ProvisionConfig> {
        let ssh_paths = match self.ssh_dir {
            Some(dir) => SshPaths::new(dir),
            None => SshPaths::from_home()?,
        };

        Ok(
            ProvisionConfig::new(self.private_key.unwrap_or_default(), ssh_paths)
                .with_repo_mappings(self.repo_mappings)
                .with_auth_sock(self.ssh_auth_sock)
                .with_drop_extra_header(self.drop_extra_header),
        )
    }
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Setup(args) => setup::execute(args),
        Command::Plan(args) => plan::execute(args),
        Command::Version(args) => version::execute(args),
    }
}
