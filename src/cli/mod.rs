//! Command-line front end.
//!
//! Each command opens a [`ChatSession`] against the configured backend,
//! performs one action and prints plain text to stdout.
//!
//! # Usage
//!
//! ```ignore
//! use converse::cli::{parse_args, run_command};
//! use converse::config::ClientConfig;
//!
//! let command = parse_args(std::env::args())?;
//! run_command(command, &ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, usage, CliCommand, SendTarget};
pub use version::{version_line, VERSION};

use std::sync::Arc;

use chrono::Utc;

use crate::adapters::FileStore;
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::ConverseResult;
use crate::mode::{ModeCache, ModeResolver};
use crate::models::{OperationalMode, Part};
use crate::session::ChatSession;
use crate::traits::{ChatBackend, KeyValueStore};
use crate::ui::{format_relative_time, lines_to_plain, render_message, MessageViewState};

/// Build the production session and run a command, printing its output.
pub async fn run_command(command: CliCommand, config: &ClientConfig) -> ConverseResult<()> {
    let output = match command {
        CliCommand::Version => version_line(),
        CliCommand::Help => usage().to_string(),
        command => {
            config.validate()?;
            let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.data_dir()));
            let resolver = ModeResolver::new(ModeCache::new(store, config.mode_scope));
            let mut session = ChatSession::new(ApiClient::new(config), resolver);
            execute(command, &mut session).await?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Run a command against an existing session and return what it prints.
pub async fn execute<B: ChatBackend>(
    command: CliCommand,
    session: &mut ChatSession<B>,
) -> ConverseResult<String> {
    match command {
        CliCommand::Version => Ok(version_line()),
        CliCommand::Help => Ok(usage().to_string()),
        CliCommand::List => list(session).await,
        CliCommand::Show { id, sources } => show(session, &id, sources).await,
        CliCommand::Send {
            target,
            text,
            mode,
            system_prompt,
        } => send(session, target, text, mode, system_prompt).await,
        CliCommand::Mode { id, mode, sync } => mode_command(session, &id, mode, sync).await,
    }
}

async fn list<B: ChatBackend>(session: &mut ChatSession<B>) -> ConverseResult<String> {
    let conversations = session.conversations().await?;
    if conversations.is_empty() {
        return Ok("No conversations".to_string());
    }

    let now = Utc::now();
    let rows: Vec<String> = conversations
        .iter()
        .map(|c| {
            let mode = c
                .operational_mode
                .map(|m| m.label())
                .unwrap_or("-");
            format!(
                "{}  {}  [{}]  {}",
                c.id,
                c.title,
                mode,
                format_relative_time(c.updated_at, now)
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

async fn show<B: ChatBackend>(
    session: &mut ChatSession<B>,
    id: &str,
    expand_sources: bool,
) -> ConverseResult<String> {
    session.open(Some(id)).await?;

    let title = session
        .conversation()
        .map(|c| c.title.clone())
        .unwrap_or_default();
    let mut out = vec![format!(
        "{} ({})  mode: {}",
        title,
        id,
        session.mode().label()
    )];

    let now = Utc::now();
    for message in session.ui_messages() {
        let mut state = MessageViewState::new();
        if expand_sources {
            for (index, part) in message.parts.iter().enumerate() {
                if matches!(part, Part::ToolCall(_)) {
                    state.toggle_sources(index);
                }
            }
        }
        out.push(String::new());
        out.push(lines_to_plain(&render_message(&message, &state, now)));
    }

    Ok(out.join("\n"))
}

async fn send<B: ChatBackend>(
    session: &mut ChatSession<B>,
    target: SendTarget,
    text: String,
    mode: Option<OperationalMode>,
    system_prompt: Option<String>,
) -> ConverseResult<String> {
    match &target {
        SendTarget::New => session.open(None).await?,
        SendTarget::Existing(id) => session.open(Some(id.as_str())).await?,
    }
    if let Some(mode) = mode {
        session.select_mode(mode);
    }
    session.set_draft_system_prompt(system_prompt);
    session.set_draft(text);

    match session.send().await? {
        Some(id) => Ok(format!(
            "Sent to conversation {} (mode: {})",
            id,
            session.mode().label()
        )),
        None => Ok("Nothing to send".to_string()),
    }
}

async fn mode_command<B: ChatBackend>(
    session: &mut ChatSession<B>,
    id: &str,
    mode: Option<OperationalMode>,
    sync: bool,
) -> ConverseResult<String> {
    session.open(Some(id)).await?;

    let Some(mode) = mode else {
        return Ok(session.mode().label().to_string());
    };

    session.select_mode(mode);
    if sync {
        session.sync_mode_to_server().await?;
        return Ok(format!("Mode set to {} and recorded on the backend", mode.label()));
    }
    Ok(format!("Mode set to {}", mode.label()))
}
