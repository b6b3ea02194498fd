//! Line-oriented front end: command parsing and plain-text rendering

use std::fmt::Write;
use thiserror::Error;

use crate::core::{QueueStatus, QueueView};
use crate::widget::IgnoredReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based roster position as listed
    Number(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Toggle(Target),
    All,
    Clear,
    Go,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Type a command, or `help`")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("`toggle` needs a name or a number")]
    MissingTarget,

    #[error("No participant number {0}")]
    NoSuchNumber(usize),
}

pub const HELP: &str = "\
Commands:
  list               show participants and the current order
  toggle <name|n>    select or deselect a participant
  all                select everyone
  clear              deselect everyone
  go                 draw a random order
  help               show this text
  quit               leave";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "list" | "ls" | "show" => Ok(Command::List),
        "toggle" | "t" => {
            if rest.is_empty() {
                return Err(CommandError::MissingTarget);
            }
            let target = match rest.parse::<usize>() {
                Ok(number) => Target::Number(number),
                Err(_) => Target::Name(rest.to_string()),
            };
            Ok(Command::Toggle(target))
        }
        "all" => Ok(Command::All),
        "clear" => Ok(Command::Clear),
        "go" | "generate" | "shuffle" => Ok(Command::Go),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Map a target onto a roster name. Names pass through untouched so the
/// widget reports unknown participants itself.
pub fn resolve_target(view: &QueueView, target: &Target) -> Result<String, CommandError> {
    match target {
        Target::Name(name) => Ok(name.clone()),
        Target::Number(number) => number
            .checked_sub(1)
            .and_then(|index| view.participants.get(index))
            .map(|participant| participant.name.clone())
            .ok_or(CommandError::NoSuchNumber(*number)),
    }
}

/// Why `go` did nothing, phrased for the prompt
pub fn ignored_message(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::EmptySelection => "Nothing to shuffle: select at least one person",
        IgnoredReason::AlreadyGenerating => "Still drawing the current order, hang on",
        IgnoredReason::Unmounted => "The queue is closed",
    }
}

pub fn render(view: &QueueView) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Participants ({} of {} selected)",
        view.selected_count, view.roster_size
    );
    for (index, participant) in view.participants.iter().enumerate() {
        let mark = if participant.selected { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {:>2}. {}", index + 1, participant.name);
    }

    let action = match (view.is_generating, view.can_generate) {
        (true, _) => "shuffling...",
        (false, true) => "ready (`go`)",
        (false, false) => "select at least one person to draw an order",
    };
    let _ = writeln!(out, "Generate: {action}");

    let _ = writeln!(out);
    let _ = writeln!(out, "Queue order");
    if view.order.is_empty() {
        let placeholder = match view.status {
            QueueStatus::Generating => "  Drawing a new order...",
            _ => "  No queue generated yet",
        };
        let _ = writeln!(out, "{placeholder}");
    } else {
        for entry in &view.order {
            let marker = if entry.is_next { "  <- next" } else { "" };
            let _ = writeln!(out, "  {:>2}. {}{marker}", entry.position, entry.name);
        }
        if let Some(next) = &view.next {
            let _ = writeln!(out, "  🔥 {next} is next in line!");
        }
    }

    out
}
