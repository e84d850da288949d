//! In-memory group roster.
//!
//! Stands in for the chat server's group manager: it owns membership and
//! answers the hub's membership queries. The hub never writes to it.

use chathub::MembershipAuthority;
use dashmap::{DashMap, DashSet};

/// Group name -> member usernames.
#[derive(Debug, Default)]
pub struct Roster {
    groups: DashMap<String, DashSet<String>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `user` to `group`. Returns `false` if already a member.
    pub fn join(&self, group: &str, user: &str) -> bool {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(user.to_string())
    }

    /// Remove `user` from `group`. Empty groups are dropped.
    pub fn leave(&self, group: &str, user: &str) -> bool {
        let removed = self
            .groups
            .get(group)
            .is_some_and(|members| members.remove(user).is_some());
        self.groups.remove_if(group, |_, members| members.is_empty());
        removed
    }

    /// Members of `group`, sorted.
    pub fn members(&self, group: &str) -> Vec<String> {
        let mut members: Vec<String> = self
            .groups
            .get(group)
            .map(|set| set.iter().map(|m| m.key().clone()).collect())
            .unwrap_or_default();
        members.sort();
        members
    }
}

impl MembershipAuthority for Roster {
    fn is_member(&self, group: &str, username: &str) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(username))
    }
}
