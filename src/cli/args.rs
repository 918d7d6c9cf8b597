//! Command-line argument parsing.
//!
//! Turns `std::env::args()` into a [`CliCommand`]. Parsing is positional:
//! the first non-flag word is the command, options follow it.

use crate::error::ConverseError;
use crate::models::OperationalMode;

const USAGE: &str = "\
Usage: converse <command> [options]

Commands:
  list                                    List conversations
  show <id> [--sources]                   Print a conversation
  send <id|new> [--mode <mode>] [--system <prompt>] <text...>
                                          Send a message
  mode <id> [fast|thinking|auto] [--sync] Print or set the mode preference
  version                                 Print the version
  help                                    Print this help";

/// Usage text printed by `help`
pub fn usage() -> &'static str {
    USAGE
}

/// Where a message goes
#[derive(Debug, Clone, PartialEq)]
pub enum SendTarget {
    /// Start a new conversation
    New,
    /// Append to an existing conversation
    Existing(String),
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// List conversations
    List,
    /// Print one conversation
    Show {
        id: String,
        /// Expand every source list
        sources: bool,
    },
    /// Send a message
    Send {
        target: SendTarget,
        text: String,
        /// Mode to select before sending
        mode: Option<OperationalMode>,
        /// System prompt for a new conversation
        system_prompt: Option<String>,
    },
    /// Print or change the mode preference of a conversation
    Mode {
        id: String,
        mode: Option<OperationalMode>,
        /// Also record the mode on the backend
        sync: bool,
    },
}

fn usage_error(message: impl Into<String>) -> ConverseError {
    ConverseError::Usage(message.into())
}

fn parse_mode(value: &str) -> Result<OperationalMode, ConverseError> {
    value
        .to_ascii_lowercase()
        .parse::<OperationalMode>()
        .map_err(|_| usage_error(format!("unknown mode '{}' (expected fast, thinking or auto)", value)))
}

/// Parse command-line arguments.
///
/// The first item is the program name and is skipped.
///
/// # Examples
///
/// ```
/// use converse::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["converse".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ConverseError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);

    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match command.as_str() {
        "--version" | "-V" | "version" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "list" | "ls" => Ok(CliCommand::List),
        "show" => parse_show(args),
        "send" => parse_send(args),
        "mode" => parse_mode_command(args),
        other => Err(usage_error(format!("unknown command '{}'", other))),
    }
}

fn parse_show(args: impl Iterator<Item = String>) -> Result<CliCommand, ConverseError> {
    let mut id = None;
    let mut sources = false;

    for arg in args {
        match arg.as_str() {
            "--sources" | "-s" => sources = true,
            _ if id.is_none() => id = Some(arg),
            _ => return Err(usage_error(format!("unexpected argument '{}'", arg))),
        }
    }

    let id = id.ok_or_else(|| usage_error("show: missing conversation id"))?;
    Ok(CliCommand::Show { id, sources })
}

fn parse_send(mut args: impl Iterator<Item = String>) -> Result<CliCommand, ConverseError> {
    let target = match args.next().as_deref() {
        None => return Err(usage_error("send: missing conversation id or 'new'")),
        Some("new") => SendTarget::New,
        Some(id) => SendTarget::Existing(id.to_string()),
    };

    let mut mode = None;
    let mut system_prompt = None;
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" | "-m" => {
                let value = args
                    .next()
                    .ok_or_else(|| usage_error("--mode needs a value"))?;
                mode = Some(parse_mode(&value)?);
            }
            "--system" => {
                let value = args
                    .next()
                    .ok_or_else(|| usage_error("--system needs a value"))?;
                system_prompt = Some(value);
            }
            "--" => {
                words.extend(args.by_ref());
            }
            _ => words.push(arg),
        }
    }

    if system_prompt.is_some() && target != SendTarget::New {
        return Err(usage_error("--system only applies to new conversations"));
    }

    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(usage_error("send: missing message text"));
    }

    Ok(CliCommand::Send {
        target,
        text,
        mode,
        system_prompt,
    })
}

fn parse_mode_command(args: impl Iterator<Item = String>) -> Result<CliCommand, ConverseError> {
    let mut id = None;
    let mut mode = None;
    let mut sync = false;

    for arg in args {
        match arg.as_str() {
            "--sync" => sync = true,
            _ if id.is_none() => id = Some(arg),
            _ if mode.is_none() => mode = Some(parse_mode(&arg)?),
            _ => return Err(usage_error(format!("unexpected argument '{}'", arg))),
        }
    }

    let id = id.ok_or_else(|| usage_error("mode: missing conversation id"))?;
    if sync && mode.is_none() {
        return Err(usage_error("--sync needs a mode to record"));
    }
    Ok(CliCommand::Mode { id, mode, sync })
}
