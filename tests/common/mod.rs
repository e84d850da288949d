//! Shared test fixtures: recording observers and a mutable membership table.

#![allow(dead_code)]

use chathub::{ChatMessage, Hub, HubOptions, MembershipAuthority, Observer, ObserverKind};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Observer that records everything it is sent.
pub struct Recorder {
    name: String,
    kind: ObserverKind,
    direct: Mutex<Vec<ChatMessage>>,
    group: Mutex<Vec<(String, ChatMessage)>>,
}

impl Recorder {
    pub fn new(name: &str) -> Arc<Self> {
        Self::with_kind(name, ObserverKind::Standard)
    }

    pub fn with_kind(name: &str, kind: ObserverKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            kind,
            direct: Mutex::new(Vec::new()),
            group: Mutex::new(Vec::new()),
        })
    }

    /// Contents of direct (broadcast/private) deliveries, in arrival order.
    pub fn direct(&self) -> Vec<String> {
        self.direct
            .lock()
            .iter()
            .map(|m| m.content().to_string())
            .collect()
    }

    /// `(group, content)` of group deliveries, in arrival order.
    pub fn group(&self) -> Vec<(String, String)> {
        self.group
            .lock()
            .iter()
            .map(|(g, m)| (g.clone(), m.content().to_string()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.direct.lock().len() + self.group.lock().len()
    }
}

impl Observer for Recorder {
    fn username(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObserverKind {
        self.kind
    }

    fn incoming_message(&self, message: &ChatMessage) {
        self.direct.lock().push(message.clone());
    }

    fn incoming_group_message(&self, group: &str, message: &ChatMessage) {
        self.group.lock().push((group.to_string(), message.clone()));
    }
}

/// Upcast for the hub's registry API.
pub fn handle(recorder: &Arc<Recorder>) -> Arc<dyn Observer> {
    Arc::clone(recorder) as Arc<dyn Observer>
}

/// Mutable group table that also counts membership queries.
#[derive(Default)]
pub struct Membership {
    groups: RwLock<HashMap<String, HashSet<String>>>,
    queries: Mutex<usize>,
}

impl Membership {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, group: &str, user: &str) {
        self.groups
            .write()
            .entry(group.to_string())
            .or_default()
            .insert(user.to_string());
    }

    pub fn remove(&self, group: &str, user: &str) {
        if let Some(members) = self.groups.write().get_mut(group) {
            members.remove(user);
        }
    }

    pub fn queries(&self) -> usize {
        *self.queries.lock()
    }
}

impl MembershipAuthority for Membership {
    fn is_member(&self, group: &str, username: &str) -> bool {
        *self.queries.lock() += 1;
        self.groups
            .read()
            .get(group)
            .is_some_and(|members| members.contains(username))
    }
}

pub fn hub_with(membership: &Arc<Membership>) -> Hub {
    Hub::new(Arc::clone(membership) as Arc<dyn MembershipAuthority>)
}

pub fn hub_with_options(membership: &Arc<Membership>, options: HubOptions) -> Hub {
    Hub::with_options(Arc::clone(membership) as Arc<dyn MembershipAuthority>, options)
}

pub fn contents(messages: &[ChatMessage]) -> Vec<&str> {
    messages.iter().map(ChatMessage::content).collect()
}
