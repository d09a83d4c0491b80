//! Hands the terminal over to `ssh`.

use std::convert::Infallible;
use std::ffi::OsString;
use std::io;
use std::net::IpAddr;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("could not execute {program}: {source}")]
    Exec { program: String, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct SshLauncher {
    program: String,
    bastion: Option<String>,
    /// Arguments placed before the target address.
    left: Vec<String>,
    /// Arguments placed after it, usually a remote command.
    right: Vec<String>,
}

impl SshLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            bastion: None,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Route the session through `bastion` with a `ProxyCommand`.
    pub fn via(mut self, bastion: Option<String>) -> Self {
        self.bastion = bastion;
        self
    }

    pub fn args(mut self, left: Vec<String>, right: Vec<String>) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// The argument vector, not including the program itself.
    pub fn argv(&self, target: IpAddr) -> Vec<OsString> {
        let mut argv: Vec<OsString> = Vec::new();
        if let Some(bastion) = &self.bastion {
            argv.push("-o".into());
            argv.push(format!("ProxyCommand={} -W %h:%p {bastion}", self.program).into());
        }
        argv.extend(self.left.iter().map(OsString::from));
        argv.push(target.to_string().into());
        argv.extend(self.right.iter().map(OsString::from));
        argv
    }

    fn command(&self, target: IpAddr) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.argv(target));
        command
    }

    /// Replaces the current process with ssh. Only returns on failure.
    #[cfg(unix)]
    pub fn exec(&self, target: IpAddr) -> Result<Infallible, LaunchError> {
        use std::os::unix::process::CommandExt;

        debug!(program = %self.program, argv = ?self.argv(target), "exec");
        let source = self.command(target).exec();
        Err(LaunchError::Exec {
            program: self.program.clone(),
            source,
        })
    }

    /// Runs ssh as a child and exits with its status.
    #[cfg(not(unix))]
    pub fn exec(&self, target: IpAddr) -> Result<Infallible, LaunchError> {
        debug!(program = %self.program, argv = ?self.argv(target), "spawn");
        let status = self
            .command(target)
            .status()
            .map_err(|source| LaunchError::Exec {
                program: self.program.clone(),
                source,
            })?;
        std::process::exit(status.code().unwrap_or(1))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
