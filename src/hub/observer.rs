//! Capabilities the hub consumes from the session layer.
//!
//! The hub never owns sessions or membership data. It talks to them only
//! through the two traits in this module.

use crate::message::ChatMessage;

/// Whether an observer takes part in ambient chat traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObserverKind {
    /// A regular chat client.
    #[default]
    Standard,
    /// A command-only client that only wants the result of its own command.
    /// Never receives broadcasts.
    Ephemeral,
}

/// A registered recipient of hub notifications.
///
/// Implementations are invoked synchronously from whichever thread publishes,
/// so they must be cheap or hand the message off (e.g. to a channel).
pub trait Observer: Send + Sync {
    /// Username identifying this session.
    fn username(&self) -> &str;

    /// Explicit ephemeral marker. Usernames matching the hub's reserved
    /// prefix are treated as ephemeral regardless of this value.
    fn kind(&self) -> ObserverKind {
        ObserverKind::Standard
    }

    /// Called for broadcast and private messages.
    fn incoming_message(&self, message: &ChatMessage);

    /// Called for messages addressed to `group`.
    fn incoming_group_message(&self, group: &str, message: &ChatMessage);
}

/// Answers "is `username` currently a member of `group`?".
///
/// Queried once per registered observer per group publish; the hub caches
/// nothing.
pub trait MembershipAuthority: Send + Sync {
    fn is_member(&self, group: &str, username: &str) -> bool;
}

impl<F> MembershipAuthority for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_member(&self, group: &str, username: &str) -> bool {
        self(group, username)
    }
}

/// Authority that reports no memberships. Used when a hub is built without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMembership;

impl MembershipAuthority for NoMembership {
    fn is_member(&self, _group: &str, _username: &str) -> bool {
        false
    }
}
