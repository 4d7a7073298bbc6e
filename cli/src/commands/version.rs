//! `keymux version` command.

use clap::Args;

#[derive(Args)]
pub struct VersionArgs;

pub fn execute(_args: VersionArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("keymux version {}", keymux_core::VERSION);
    Ok(())
}
