//! `keymux plan` command: validate inputs without touching the system.

use clap::Args;
use keymux_core::git::rewrite_rules;
use keymux_core::{ProvisionPlan, SshPaths};

use super::InputArgs;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

pub fn execute(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.inputs.into_config()?;
    let plan = keymux_core::plan_only(&config)?;
    print!("{}", render_plan(&plan, &config.ssh_paths));
    Ok(())
}

/// Describe a plan: each mapping with its identity file and rewrites.
pub fn render_plan(plan: &ProvisionPlan, paths: &SshPaths) -> String {
    let mut out = String::new();
    match plan {
        ProvisionPlan::Direct(keys) => {
            out.push_str(&format!(
                "No repo mappings; {} key(s) will be added to ssh-agent\n",
                keys.len()
            ));
            for key in keys {
                out.push_str(&format!("  {}\n", key.header()));
            }
        }
        ProvisionPlan::Mapped(pairs) => {
            for (key, mapping) in pairs {
                out.push_str(&format!("{mapping}\n"));
                out.push_str(&format!("  key:      {}\n", key.header()));
                out.push_str(&format!(
                    "  identity: {}\n",
                    paths.identity_file(&mapping.pseudo_host)
                ));
                for rule in rewrite_rules(mapping) {
                    out.push_str(&format!(
                        "  rewrite:  {} -> {}\n",
                        rule.original, rule.replacement
                    ));
                }
            }
        }
    }
    out
}
