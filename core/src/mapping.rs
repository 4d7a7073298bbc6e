//! Parsing of `host/owner/repo` mapping lines.
//!
//! Each mapping gets a pseudo-hostname (`<repo>.<host>`) that exists only
//! so the SSH client can pick a per-repository identity file; it never
//! resolves through DNS.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::REPO_MAPPINGS_INPUT;
use crate::error::{KeymuxError, Result};

/// One repository reachable through its own deploy key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMapping {
    /// Real git host (e.g. `github.com`)
    pub host: String,
    /// Repository owner or organisation
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Synthetic host, `<repo>.<host>`
    pub pseudo_host: String,
}

impl RepoMapping {
    pub fn new(host: &str, owner: &str, repo: &str) -> Self {
        Self {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            pseudo_host: format!("{repo}.{host}"),
        }
    }

    /// `<owner>/<repo>`, the path part shared by every URL form.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}

fn mapping_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Segments end up in ssh `Host` patterns and file names: no whitespace,
    // wildcards or quoting.
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9.-]+)/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap()
    })
}

/// Parse newline-delimited mapping text into mappings, preserving order.
///
/// Lines are trimmed and blank lines skipped. Any other line that is not
/// exactly three non-empty slash-separated segments fails the whole parse,
/// as does a segment with characters outside hostname or repository-name
/// syntax.
pub fn parse_repo_mappings(input: &str) -> Result<Vec<RepoMapping>> {
    let mut mappings = Vec::new();

    for raw in input.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let caps = mapping_regex()
            .captures(line)
            .ok_or_else(|| KeymuxError::InvalidMapping {
                input: REPO_MAPPINGS_INPUT.to_string(),
                line: line.to_string(),
            })?;

        let mapping = RepoMapping::new(&caps[1], &caps[2], &caps[3]);
        tracing::debug!(
            host = %mapping.host,
            owner = %mapping.owner,
            repo = %mapping.repo,
            pseudo_host = %mapping.pseudo_host,
            "Parsed repo mapping"
        );
        mappings.push(mapping);
    }

    Ok(mappings)
}

/// Fail if two mappings share a pseudo-host; their key files would collide.
pub fn ensure_unique_pseudo_hosts(mappings: &[RepoMapping]) -> Result<()> {
    let mut seen = HashSet::new();
    for mapping in mappings {
        if !seen.insert(mapping.pseudo_host.as_str()) {
            return Err(KeymuxError::DuplicatePseudoHost {
                pseudo_host: mapping.pseudo_host.clone(),
            });
        }
    }
    Ok(())
}
