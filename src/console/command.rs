use thiserror::Error;

use crate::model::{ItemId, Side};

/// One line of interactive input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Choose(Side),
    ShowRankings,
    Add { title: String, description: String },
    Delete(ItemId),
    Reset,
    /// Reloads items and the pair after a failure.
    Retry,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  a, left, 1              prefer the left item
  b, right, 2             prefer the right item
  v, list                 show current rankings
  add <title> [| <desc>]  add an item
  del <id>                delete an item
  reset                   clear all rankings and start over
  r, retry                reload after an error
  help                    show this help
  q, quit                 leave";

/// Parses a line typed at the ranking prompt. Verbs are case-insensitive.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "a" | "left" | "1" => Ok(Command::Choose(Side::Left)),
        "b" | "right" | "2" => Ok(Command::Choose(Side::Right)),
        "v" | "list" | "rankings" => Ok(Command::ShowRankings),
        "add" => parse_add(rest),
        "del" | "delete" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "del",
                    argument: "an item id",
                });
            }
            Ok(Command::Delete(ItemId::new(rest)))
        }
        "reset" => Ok(Command::Reset),
        "r" | "retry" => Ok(Command::Retry),
        "help" | "h" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb.to_string())),
    }
}

fn parse_add(rest: &str) -> Result<Command, CommandError> {
    let (title, description) = match rest.split_once('|') {
        Some((title, description)) => (title.trim(), description.trim()),
        None => (rest, ""),
    };

    if title.is_empty() {
        return Err(CommandError::MissingArgument {
            command: "add",
            argument: "a title",
        });
    }

    Ok(Command::Add {
        title: title.to_string(),
        description: description.to_string(),
    })
}
