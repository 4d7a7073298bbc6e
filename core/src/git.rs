//! Global git `insteadOf` rules routing repository URLs to pseudo-hosts.

use crate::error::Result;
use crate::mapping::RepoMapping;

/// Writes entries into the global git configuration.
pub trait GitConfig {
    fn set_global(&self, key: &str, value: &str) -> Result<()>;
}

/// A single `url.<replacement>.insteadOf = <original>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// URL prefix as written in remotes and submodules
    pub original: String,
    /// URL git actually contacts
    pub replacement: String,
}

impl RewriteRule {
    /// Config key for this rule.
    pub fn key(&self) -> String {
        format!("url.{}.insteadOf", self.replacement)
    }
}

/// The HTTPS and scp-style rules for one mapping.
///
/// Both forms land on distinct synthetic hosts (`http.` and `ssh.`) that the
/// connection profile binds to the mapping's identity file.
pub fn rewrite_rules(mapping: &RepoMapping) -> [RewriteRule; 2] {
    let path = mapping.path();
    [
        RewriteRule {
            original: format!("https://{}/{}", mapping.host, path),
            replacement: format!("git@http.{}:{}", mapping.pseudo_host, path),
        },
        RewriteRule {
            original: format!("git@{}:{}", mapping.host, path),
            replacement: format!("git@ssh.{}:{}", mapping.pseudo_host, path),
        },
    ]
}

/// Install both rewrite rules for a mapping.
pub fn install_rewrites(git: &dyn GitConfig, mapping: &RepoMapping) -> Result<()> {
    for rule in rewrite_rules(mapping) {
        git.set_global(&rule.key(), &rule.original)?;
        tracing::debug!(
            original = %rule.original,
            replacement = %rule.replacement,
            "Installed git URL rewrite"
        );
    }
    Ok(())
}

/// Config key of the authorization header override for a URL prefix.
pub fn extra_header_key(url_prefix: &str) -> String {
    format!("http.{url_prefix}.extraheader")
}

/// Blank out an `http.<prefix>.extraheader` left by a checkout step so that
/// fetches go through the SSH rewrites instead of a cached token.
pub fn drop_extra_header(git: &dyn GitConfig, url_prefix: &str) -> Result<()> {
    git.set_global(&extra_header_key(url_prefix), "")
}
