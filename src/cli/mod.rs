//! Command-line interface for the `maritime` binary.
//!
//! Provides commands for loading vessel CSVs, asking one-off questions and
//! running an interactive terminal chat.

use std::io::{BufRead, Write};

use crate::query::formatter::QueryReply;
use crate::query::router::IntentRouter;
use crate::storage::VesselStore;

/// Available CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliCommand {
    /// Load a vessel CSV into the database.
    Load,
    /// Answer a single question.
    Ask,
    /// Interactive question loop.
    Chat,
    /// Show version information.
    Version,
}

impl std::fmt::Display for CliCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Ask => write!(f, "ask"),
            Self::Chat => write!(f, "chat"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// Parse a CLI command from a string.
pub fn parse_command(cmd: &str) -> Option<CliCommand> {
    match cmd {
        "load" => Some(CliCommand::Load),
        "ask" => Some(CliCommand::Ask),
        "chat" => Some(CliCommand::Chat),
        "version" | "--version" | "-v" => Some(CliCommand::Version),
        _ => None,
    }
}

pub const USAGE: &str = "\
Usage: maritime <command> [args]

Commands:
  load <csv> [db]   Load a vessel CSV into the database
  ask <question>    Answer a single question
  chat              Ask questions interactively ('exit' to quit)
  version           Show version information";

/// Render a reply for the terminal.
pub fn render_reply(reply: &QueryReply) -> String {
    let mut out = reply.response.clone();
    if let Some(follow_up) = &reply.follow_up {
        out.push('\n');
        out.push_str(follow_up);
    }
    if let Some(link) = &reply.download_link {
        out.push_str("\nDownload: ");
        out.push_str(link);
    }
    out
}

/// Read questions from `input` until EOF or `exit`, writing replies to `output`.
pub fn run_chat<R: BufRead, W: Write>(
    router: &IntentRouter,
    store: &dyn VesselStore,
    input: R,
    mut output: W,
) -> std::io::Result<()> {
    writeln!(output, "Welcome to the Maritime Chatbot! Type 'exit' to quit.")?;
    let mut lines = input.lines();
    loop {
        write!(output, "\nAsk a question: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            break;
        }
        if question.is_empty() {
            continue;
        }
        writeln!(output, "{}", render_reply(&router.process(store, question)))?;
    }
    writeln!(output, "Goodbye!")?;
    Ok(())
}
