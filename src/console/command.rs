//! Console command parsing.

use std::str::FromStr;
use thiserror::Error;

/// Errors from a single console line. The console reports them and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("empty command")]
    Empty,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("{0} is not connected")]
    NotConnected(String),

    #[error("{0} is already connected")]
    AlreadyConnected(String),
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(String),
    Disconnect(String),
    Join { user: String, group: String },
    Leave { user: String, group: String },
    Members(String),
    Say { user: String, text: String },
    Msg { user: String, to: String, text: String },
    Group { user: String, group: String, text: String },
    History,
    Stats,
    Reset,
    Quit,
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = Args::new(line.trim());
        let Some(name) = args.word() else {
            return Err(ConsoleError::Empty);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "connect" => Self::Connect(args.require("connect", "user")?),
            "disconnect" => Self::Disconnect(args.require("disconnect", "user")?),
            "join" => Self::Join {
                user: args.require("join", "user")?,
                group: args.require("join", "group")?,
            },
            "leave" => Self::Leave {
                user: args.require("leave", "user")?,
                group: args.require("leave", "group")?,
            },
            "members" => Self::Members(args.require("members", "group")?),
            "say" => Self::Say {
                user: args.require("say", "user")?,
                text: args.rest("say")?,
            },
            "msg" => Self::Msg {
                user: args.require("msg", "user")?,
                to: args.require("msg", "recipient")?,
                text: args.rest("msg")?,
            },
            "group" => Self::Group {
                user: args.require("group", "user")?,
                group: args.require("group", "group")?,
                text: args.rest("group")?,
            },
            "history" => Self::History,
            "stats" => Self::Stats,
            "reset" => Self::Reset,
            "quit" | "exit" => Self::Quit,
            other => return Err(ConsoleError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

/// Whitespace tokenizer that can hand back the untouched remainder.
struct Args<'a> {
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn word(&mut self) -> Option<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, rest) = trimmed.split_at(end);
        self.rest = rest;
        Some(word)
    }

    fn require(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<String, ConsoleError> {
        self.word()
            .map(str::to_string)
            .ok_or(ConsoleError::MissingArgument { command, argument })
    }

    fn rest(&mut self, command: &'static str) -> Result<String, ConsoleError> {
        let text = self.rest.trim();
        if text.is_empty() {
            return Err(ConsoleError::MissingArgument {
                command,
                argument: "text",
            });
        }
        self.rest = "";
        Ok(text.to_string())
    }
}
