//! Console session observer.

use chathub::{ChatMessage, Observer};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Writes every delivery as one line to a shared output.
pub struct ConsoleSession<W> {
    username: String,
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send> ConsoleSession<W> {
    pub fn new(username: impl Into<String>, out: Arc<Mutex<W>>) -> Self {
        Self {
            username: username.into(),
            out,
        }
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}") {
            tracing::warn!(user = %self.username, error = %e, "Failed to write delivery");
        }
    }
}

impl<W: Write + Send> Observer for ConsoleSession<W> {
    fn username(&self) -> &str {
        &self.username
    }

    fn incoming_message(&self, message: &ChatMessage) {
        self.write_line(format_args!("{} <- {}", self.username, message));
    }

    fn incoming_group_message(&self, group: &str, message: &ChatMessage) {
        self.write_line(format_args!("{} <- #{} {}", self.username, group, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_delivery() {
        let out = Arc::new(Mutex::new(Vec::new()));
        let session = ConsoleSession::new("amy", Arc::clone(&out));

        session.incoming_message(&ChatMessage::new("bob", "hi"));
        session.incoming_group_message("team", &ChatMessage::new("bob", "standup"));

        let text = String::from_utf8(out.lock().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("amy <- ["));
        assert!(lines[0].ends_with("bob: hi"));
        assert!(lines[1].starts_with("amy <- #team ["));
        assert!(lines[1].ends_with("bob: standup"));
    }
}
