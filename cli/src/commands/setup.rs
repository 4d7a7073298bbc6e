//! `keymux setup` command: provision deploy keys for the current job.

use std::path::PathBuf;

use clap::Args;
use keymux_core::{GitCommand, Ports, SshAddCommand, SshAgentCommand};

use super::InputArgs;
use crate::actions::ActionsEnv;

#[derive(Args)]
pub struct SetupArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// File receiving exported variables for later steps
    #[arg(long, env = "GITHUB_ENV", value_name = "PATH")]
    pub env_file: Option<PathBuf>,
}

pub fn execute(args: SetupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.inputs.into_config()?;

    let launcher = SshAgentCommand::default();
    let loader = SshAddCommand::default();
    let git = GitCommand::default();
    let mut exporter = ActionsEnv::new(args.env_file);

    let mut ports = Ports {
        launcher: &launcher,
        loader: &loader,
        git: &git,
        exporter: &mut exporter,
    };

    keymux_core::run(&config, &mut ports, &mut std::io::stdout())?;
    Ok(())
}
