//! The provisioning pipeline.
//!
//! Steps run strictly in order and the first error ends the run. Every
//! input is parsed and checked before the first side effect, so bad
//! configuration never leaves half-written state behind.

use std::io::Write;

use crate::agent::{AgentLauncher, AgentSession, EnvExporter};
use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::git::{self, GitConfig};
use crate::keys::split_keys;
use crate::known_hosts::seed_known_hosts;
use crate::mapping::parse_repo_mappings;
use crate::provision::{KeyLoader, ProvisionPlan, ProvisionReport, Provisioner};

/// The outside world the pipeline writes through.
pub struct Ports<'a> {
    pub launcher: &'a dyn AgentLauncher,
    pub loader: &'a dyn KeyLoader,
    pub git: &'a dyn GitConfig,
    pub exporter: &'a mut dyn EnvExporter,
}

/// Parse and validate all inputs without side effects.
pub fn plan_only(config: &ProvisionConfig) -> Result<ProvisionPlan> {
    build_plan(&config.clone().validate()?)
}

fn build_plan(config: &ProvisionConfig) -> Result<ProvisionPlan> {
    let mappings = match &config.repo_mappings {
        Some(text) => parse_repo_mappings(text)?,
        None => Vec::new(),
    };
    ProvisionPlan::new(split_keys(&config.private_key), mappings)
}

/// Run the full pipeline, writing progress lines to `out`.
pub fn run(
    config: &ProvisionConfig,
    ports: &mut Ports<'_>,
    out: &mut dyn Write,
) -> Result<ProvisionReport> {
    let config = config.clone().validate()?;

    writeln!(out, "Parsing repo mappings")?;
    let plan = build_plan(&config)?;
    let paths = &config.ssh_paths;

    writeln!(out, "Adding GitHub.com keys to {}", paths.known_hosts.display())?;
    seed_known_hosts(paths)?;

    writeln!(out, "Starting ssh-agent")?;
    let session =
        AgentSession::start(ports.launcher, config.auth_sock.as_deref(), ports.exporter)?;

    if config.drop_extra_header {
        writeln!(out, "Dropping any existing http.extraheader git config")?;
        git::drop_extra_header(ports.git, &config.extra_header_host)?;
    }

    for mapping in plan.mappings() {
        writeln!(out, "Adding insteadOf entries in git config for {mapping}")?;
        git::install_rewrites(ports.git, mapping)?;
    }

    writeln!(out, "Adding private key to agent")?;
    let report = Provisioner::new(paths.clone()).apply(&plan, ports.loader, &session)?;

    write!(out, "{report}")?;
    tracing::info!(keys = plan.key_count(), "Provisioning complete");
    Ok(report)
}
