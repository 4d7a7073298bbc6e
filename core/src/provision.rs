//! Pairing keys with mappings and writing identities.
//!
//! Provisioning is split in two: [`ProvisionPlan::new`] checks every
//! invariant without touching the system, and [`Provisioner::apply`]
//! performs the writes. A plan that fails to build leaves nothing behind.

use std::fmt;

use crate::agent::AgentSession;
use crate::config::SshPaths;
use crate::error::{KeymuxError, Result};
use crate::fs;
use crate::keys::KeyBlock;
use crate::mapping::{ensure_unique_pseudo_hosts, RepoMapping};

/// Loads keys into a running agent and lists what it holds.
pub trait KeyLoader {
    /// Add one key, supplied as PEM text on the agent client's stdin.
    fn add(&self, session: &AgentSession, key: &str) -> Result<()>;

    /// Human-readable listing of loaded identities.
    fn list(&self, session: &AgentSession) -> Result<String>;
}

/// What will be provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPlan {
    /// Key *i* becomes the identity for mapping *i*
    Mapped(Vec<(KeyBlock, RepoMapping)>),
    /// No mappings: every key goes straight into the agent
    Direct(Vec<KeyBlock>),
}

impl ProvisionPlan {
    /// Pair keys with mappings by position.
    ///
    /// With no mappings every key is loaded into the agent, which then
    /// offers them in turn. With mappings the counts must be equal and
    /// pseudo-hosts unique.
    pub fn new(keys: Vec<KeyBlock>, mappings: Vec<RepoMapping>) -> Result<Self> {
        if keys.is_empty() {
            return Err(KeymuxError::NoKeys);
        }

        if mappings.is_empty() {
            if keys.len() > 1 {
                tracing::info!(
                    keys = keys.len(),
                    "No repo mappings given; loading all keys into ssh-agent"
                );
            }
            return Ok(ProvisionPlan::Direct(keys));
        }

        if keys.len() != mappings.len() {
            return Err(KeymuxError::KeyCountMismatch {
                keys: keys.len(),
                mappings: mappings.len(),
            });
        }
        ensure_unique_pseudo_hosts(&mappings)?;

        Ok(ProvisionPlan::Mapped(keys.into_iter().zip(mappings).collect()))
    }

    /// Mappings covered by the plan, in order. Empty in direct mode.
    pub fn mappings(&self) -> Vec<&RepoMapping> {
        match self {
            ProvisionPlan::Mapped(pairs) => pairs.iter().map(|(_, m)| m).collect(),
            ProvisionPlan::Direct(_) => Vec::new(),
        }
    }

    pub fn key_count(&self) -> usize {
        match self {
            ProvisionPlan::Mapped(pairs) => pairs.len(),
            ProvisionPlan::Direct(keys) => keys.len(),
        }
    }
}

/// What was provisioned, for the closing summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionReport {
    /// Identity file reference for each mapping, as written in client config
    IdentityFiles(Vec<String>),
    /// Output of the agent's key listing
    AgentKeys(String),
}

impl fmt::Display for ProvisionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keys added:")?;
        match self {
            ProvisionReport::IdentityFiles(files) => {
                for file in files {
                    writeln!(f, "{file}")?;
                }
            }
            ProvisionReport::AgentKeys(listing) => {
                write!(f, "{}", listing.trim_end())?;
                if !listing.trim_end().is_empty() {
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

/// The two `Host` stanzas that bind a mapping's synthetic hosts to its key.
pub fn connection_profile(mapping: &RepoMapping, paths: &SshPaths) -> String {
    let identity = paths.identity_file(&mapping.pseudo_host);
    let mut profile = String::new();
    for prefix in ["http", "ssh"] {
        profile.push_str(&format!(
            "\nHost {prefix}.{pseudo}\n    HostName {host}\n    User git\n    IdentityFile {identity}\n    IdentitiesOnly yes\n",
            pseudo = mapping.pseudo_host,
            host = mapping.host,
        ));
    }
    profile
}

/// Writes key files and client config under an `.ssh` directory.
pub struct Provisioner {
    paths: SshPaths,
}

impl Provisioner {
    pub fn new(paths: SshPaths) -> Self {
        Self { paths }
    }

    /// Carry out a plan.
    pub fn apply(
        &self,
        plan: &ProvisionPlan,
        loader: &dyn KeyLoader,
        session: &AgentSession,
    ) -> Result<ProvisionReport> {
        match plan {
            ProvisionPlan::Mapped(pairs) => {
                fs::ensure_private_dir(&self.paths.dir)?;
                let mut files = Vec::with_capacity(pairs.len());
                for (key, mapping) in pairs {
                    self.write_identity(key, mapping)?;
                    files.push(self.paths.identity_file(&mapping.pseudo_host));
                }
                Ok(ProvisionReport::IdentityFiles(files))
            }
            ProvisionPlan::Direct(keys) => {
                for key in keys {
                    loader.add(session, &key.normalized())?;
                    tracing::debug!(key = ?key, "Added key to ssh-agent");
                }
                Ok(ProvisionReport::AgentKeys(loader.list(session)?))
            }
        }
    }

    fn write_identity(&self, key: &KeyBlock, mapping: &RepoMapping) -> Result<()> {
        let key_path = self.paths.key_file(&mapping.pseudo_host);
        fs::write_private(&key_path, &key.normalized())?;
        fs::append(&self.paths.config, &connection_profile(mapping, &self.paths))?;

        tracing::info!(
            mapping = %mapping,
            key_file = %key_path.display(),
            "Wrote identity and connection profile"
        );
        Ok(())
    }
}
