//! Seeding `known_hosts` with published host keys.
//!
//! Without these entries the first `git fetch` over SSH would stop at the
//! host-key prompt, which nobody answers in a CI job.

use crate::config::SshPaths;
use crate::error::Result;
use crate::fs;

/// A single trusted host key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostKey {
    pub host: &'static str,
    pub key_type: &'static str,
    pub key: &'static str,
}

impl HostKey {
    /// The `known_hosts` line for this key, without line breaks.
    pub fn line(&self) -> String {
        format!("{} {} {}", self.host, self.key_type, self.key)
    }
}

/// GitHub's published SSH host keys.
pub const GITHUB_HOST_KEYS: &[HostKey] = &[
    HostKey {
        host: "github.com",
        key_type: "ssh-ed25519",
        key: "AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl",
    },
    HostKey {
        host: "github.com",
        key_type: "ecdsa-sha2-nistp256",
        key: "AAAAE2VjZHNhLXNoYTItbmlzdHAyNTYAAAAIbmlzdHAyNTYAAABBBEmKSENjQEezOmxkZMy7opKgwFB9nkt5YRrYMjNuG5N87uRgg6CLrbo5wAdT/y6v0mKV0U2w0WZ2YB/++Tpockg=",
    },
    HostKey {
        host: "github.com",
        key_type: "ssh-rsa",
        key: "AAAAB3NzaC1yc2EAAAADAQABAAABgQCj7ndNxQowgcQnjshcLrqPEiiphnt+VTTvDP6mHBL9j1aNUkY4Ue1gvwnGLVlOhGeYrnZaMgRK6+PKCUXaDbC7qtbW8gIkhL7aGCsOr/C56SJMy/BCZfxd1nWzAOxSDPgVsmerOBYfNqltV9/hWCqBywINIR+5dIg6JTJ72pcEpEjcYgXkE2YEFXV1JHnsKgbLWNlhScqb2UmyRkQyytRLtL+38TGxkxCflmO+5Z8CSSNY7GidjMIZ7Q4zMjA2n1nGrlTDkzwDCsw+wqFPGQA179cnfGWOWRVruj16z6XyvxvjJwbz0wQZ75XK5tKSb7FNyeIEs4TT4jk+S4dhPeAUC5y+bDYirYgM4GC7uEnztnZyaVWQ7B381AK4Qdrwt51ZqExKbQpTUNn+EjqoTwvqNj4kqx5QUCI0ThS/YkOxJCXmPUWZbhjpCg56i+2aB6CmK2JGhn57K5mj0MNdBXA4/WnwH6XoPWJzK5Nyu2zB3nAZp+S5hpQs+p1vN1/wsjk=",
    },
];

/// Ensure `~/.ssh` exists and append every GitHub host key to `known_hosts`.
///
/// Entries are appended unconditionally; running twice leaves duplicate
/// lines, which ssh treats the same as one.
pub fn seed_known_hosts(paths: &SshPaths) -> Result<()> {
    fs::ensure_private_dir(&paths.dir)?;

    for host_key in GITHUB_HOST_KEYS {
        fs::append(&paths.known_hosts, &format!("\n{}\n", host_key.line()))?;
    }

    tracing::info!(
        path = %paths.known_hosts.display(),
        entries = GITHUB_HOST_KEYS.len(),
        "Seeded known_hosts"
    );
    Ok(())
}
