pub mod jump;
pub mod watch;

use std::ffi::OsString;

use clap::Parser;

pub const WATCH_MARKER: &str = "@";
const SEPARATOR: &str = "--";

#[derive(Parser, Debug)]
#[command(name = "jumpr")]
#[command(version, about = "Pick a host from the fleet and ssh into it.")]
#[command(override_usage = "jumpr [@] [SSH_ARGS]... [-- REMOTE...]")]
#[command(after_help = "Pass a lone `@` to keep the table refreshing until input closes.")]
pub struct CommandLine {
    /// Extra ssh arguments, placed before the host address
    #[arg(allow_hyphen_values = true, trailing_var_arg = true, value_name = "SSH_ARGS")]
    pub args: Vec<String>,

    /// Everything after the first `--`, placed after the host address
    #[arg(skip)]
    pub remote: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Watch,
    Jump { left: Vec<String>, right: Vec<String> },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::try_parse_split(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Cuts `argv` at the first `--` before clap sees it, so that the part
    /// after the separator reaches ssh untouched.
    pub fn try_parse_split<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
        let (left, right) = match argv.iter().skip(1).position(|arg| arg == SEPARATOR) {
            Some(idx) => (&argv[..=idx], &argv[idx + 2..]),
            None => (&argv[..], &[][..]),
        };

        let mut commands = Self::try_parse_from(left)?;
        commands.remote = right
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        Ok(commands)
    }

    pub fn into_mode(self) -> Mode {
        if self.remote.is_empty() && self.args.len() == 1 && self.args[0] == WATCH_MARKER {
            return Mode::Watch;
        }
        Mode::Jump {
            left: self.args,
            right: self.remote,
        }
    }
}
