//! Line-oriented console front end for the hub.
//!
//! Plays the role of the chat server's session layer: it owns one
//! [`ConsoleSession`] per connected user, registers it with the hub, and
//! turns console lines into publish calls.

mod command;
mod roster;
mod session;

pub use command::{Command, ConsoleError};
pub use roster::Roster;
pub use session::ConsoleSession;

use chathub::telemetry::spans;
use chathub::{ChatMessage, Hub, Observer};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Whether the read loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<W> {
    hub: Arc<Hub>,
    roster: Arc<Roster>,
    out: Arc<Mutex<W>>,
    sessions: HashMap<String, Arc<dyn Observer>>,
}

impl<W: Write + Send + 'static> Console<W> {
    pub fn new(hub: Arc<Hub>, roster: Arc<Roster>, out: Arc<Mutex<W>>) -> Self {
        Self {
            hub,
            roster,
            out,
            sessions: HashMap::new(),
        }
    }

    /// Execute commands from `input` until EOF or `quit`.
    ///
    /// Bad lines, including ones that are not valid UTF-8, are reported on
    /// the output and skipped. Only read failures end the loop early.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let result = std::str::from_utf8(&buf)
                .map_err(|_| ConsoleError::InvalidUtf8)
                .and_then(|line| self.execute_line(line));
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => self.print(format_args!("error: {e}")),
            }
        }
        Ok(())
    }

    fn execute_line(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        line.parse::<Command>().and_then(|cmd| self.execute(cmd))
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, ConsoleError> {
        match command {
            Command::Connect(user) => self.connect(user)?,
            Command::Disconnect(user) => self.disconnect(&user)?,
            Command::Join { user, group } => {
                if self.roster.join(&group, &user) {
                    self.print(format_args!("* {user} joined #{group}"));
                }
            }
            Command::Leave { user, group } => {
                if self.roster.leave(&group, &user) {
                    self.print(format_args!("* {user} left #{group}"));
                }
            }
            Command::Members(group) => {
                let members = self.roster.members(&group);
                self.print(format_args!("#{group}: {}", members.join(" ")));
            }
            Command::Say { user, text } => {
                self.require_connected(&user)?;
                self.hub.publish_broadcast(ChatMessage::new(user, text));
            }
            Command::Msg { user, to, text } => {
                self.require_connected(&user)?;
                self.hub.publish_private(ChatMessage::new(user, text), &to);
            }
            Command::Group { user, group, text } => {
                self.require_connected(&user)?;
                self.hub.publish_group(ChatMessage::new(user, text), &group);
            }
            Command::History => {
                for message in self.hub.global_history() {
                    self.print(format_args!("{message}"));
                }
            }
            Command::Stats => {
                let stats = self.hub.stats();
                self.print(format_args!(
                    "observers={} live={} global={} groups={} group_messages={}",
                    stats.observers,
                    stats.live_observers,
                    stats.global_messages,
                    stats.groups,
                    stats.group_messages
                ));
            }
            Command::Reset => {
                // Group membership belongs to the roster, not the hub.
                self.hub.reset();
                self.sessions.clear();
                self.print(format_args!("* hub reset"));
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn connect(&mut self, user: String) -> Result<(), ConsoleError> {
        if self.sessions.contains_key(&user) {
            return Err(ConsoleError::AlreadyConnected(user));
        }
        let _span = spans::session(&user).entered();
        let session: Arc<dyn Observer> =
            Arc::new(ConsoleSession::new(user.clone(), Arc::clone(&self.out)));
        self.hub.register(&session);
        info!("Session connected");
        self.print(format_args!("* {user} connected"));
        self.sessions.insert(user, session);
        Ok(())
    }

    fn disconnect(&mut self, user: &str) -> Result<(), ConsoleError> {
        let session = self
            .sessions
            .remove(user)
            .ok_or_else(|| ConsoleError::NotConnected(user.to_string()))?;
        let _span = spans::session(user).entered();
        self.hub.unregister(&session);
        info!("Session disconnected");
        self.print(format_args!("* {user} disconnected"));
        Ok(())
    }

    fn require_connected(&self, user: &str) -> Result<(), ConsoleError> {
        if self.sessions.contains_key(user) {
            Ok(())
        } else {
            Err(ConsoleError::NotConnected(user.to_string()))
        }
    }

    fn print(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(error = %e, "Failed to write console output");
        }
    }
}
