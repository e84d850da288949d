//! In-memory message history.
//!
//! The global log and per-group logs are append-only. Group logs are
//! allocated on the first message addressed to the group.

use crate::message::ChatMessage;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct HistoryStore {
    global: Vec<ChatMessage>,
    groups: HashMap<String, Vec<ChatMessage>>,
}

impl HistoryStore {
    pub fn append_global(&mut self, message: ChatMessage) {
        self.global.push(message);
    }

    pub fn append_group(&mut self, group: &str, message: ChatMessage) {
        match self.groups.get_mut(group) {
            Some(log) => log.push(message),
            None => {
                tracing::debug!(group = %group, "Allocating group history");
                self.groups.insert(group.to_string(), vec![message]);
            }
        }
    }

    pub fn global(&self) -> &[ChatMessage] {
        &self.global
    }

    pub fn group(&self, group: &str) -> Option<&[ChatMessage]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Groups that have received at least one message, sorted by name.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total messages across all group logs.
    pub fn group_message_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.global.clear();
        self.groups.clear();
    }
}
