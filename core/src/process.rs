//! Blocking subprocess implementations of the agent and git ports.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::agent::{AgentLauncher, AgentSession};
use crate::error::{KeymuxError, Result};
use crate::git::GitConfig;
use crate::provision::KeyLoader;

/// Render a command line for error messages.
fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a finished process into its stdout, or a [`KeymuxError::Subprocess`].
fn check_output(command: String, output: Output) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = if stderr.trim().is_empty() {
        output.status.to_string()
    } else {
        format!("{} ({})", stderr.trim(), output.status)
    };
    Err(KeymuxError::Subprocess { command, message })
}

fn spawn_error(command: &str, e: std::io::Error) -> KeymuxError {
    KeymuxError::Subprocess {
        command: command.to_string(),
        message: e.to_string(),
    }
}

/// Launches `ssh-agent` and captures its banner.
#[derive(Debug, Clone)]
pub struct SshAgentCommand {
    program: String,
}

impl Default for SshAgentCommand {
    fn default() -> Self {
        Self {
            program: "ssh-agent".to_string(),
        }
    }
}

impl SshAgentCommand {
    /// Use a different agent binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl AgentLauncher for SshAgentCommand {
    fn launch(&self, socket: Option<&Path>) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        let description = match socket {
            Some(sock) => {
                cmd.arg("-a").arg(sock);
                format!("{} -a {}", self.program, sock.display())
            }
            None => self.program.clone(),
        };

        // The agent forks; the parent exits once the banner is printed.
        let output = cmd
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(&description, e))?;
        check_output(description, output)
    }
}

/// Loads and lists keys through `ssh-add`.
#[derive(Debug, Clone)]
pub struct SshAddCommand {
    program: String,
}

impl Default for SshAddCommand {
    fn default() -> Self {
        Self {
            program: "ssh-add".to_string(),
        }
    }
}

impl SshAddCommand {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, session: &AgentSession) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.envs(session.env());
        cmd
    }
}

impl KeyLoader for SshAddCommand {
    fn add(&self, session: &AgentSession, key: &str) -> Result<()> {
        let description = describe(&self.program, &["-"]);
        let mut child = self
            .command(session)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(&description, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(key.as_bytes()) {
                // ssh-add quit before reading the whole key; its exit status
                // and stderr below say why.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(spawn_error(&description, e)),
                Ok(()) => {}
            }
            // Dropping stdin closes the pipe so ssh-add sees EOF.
        }

        let output = child
            .wait_with_output()
            .map_err(|e| spawn_error(&description, e))?;
        check_output(description, output).map(|_| ())
    }

    fn list(&self, session: &AgentSession) -> Result<String> {
        let description = describe(&self.program, &["-l"]);
        let output = self
            .command(session)
            .arg("-l")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(&description, e))?;
        check_output(description, output)
    }
}

/// Writes global git configuration via `git config --global`.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitCommand {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GitConfig for GitCommand {
    fn set_global(&self, key: &str, value: &str) -> Result<()> {
        let args = ["config", "--global", key, value];
        let description = describe(&self.program, &args);
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(&description, e))?;
        check_output(description, output).map(|_| ())
    }
}
