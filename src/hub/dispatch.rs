//! Delivery strategies.
//!
//! The hub always selects recipients while holding its lock. The strategy
//! decides whether observers are invoked before or after that lock is
//! released.

use super::observer::Observer;
use crate::message::ChatMessage;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// When observers are invoked relative to the hub lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Deliver while the hub lock is held. Every hub operation is fully
    /// serialized, and a slow observer stalls all other callers.
    #[default]
    Serialized,
    /// Deliver after the lock is released. Deliveries from concurrent
    /// publishes may interleave, and an observer unregistered after the
    /// recipients were selected may still receive that message.
    Snapshot,
}

impl DeliveryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Serialized => "serialized",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which observer callback a publish uses.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Delivery<'a> {
    /// Broadcast and private traffic.
    Direct(&'a ChatMessage),
    Group(&'a str, &'a ChatMessage),
}

impl Delivery<'_> {
    pub(crate) fn deliver_to(&self, recipients: &[Arc<dyn Observer>]) {
        for observer in recipients {
            tracing::trace!(user = %observer.username(), "Delivering");
            match *self {
                Self::Direct(message) => observer.incoming_message(message),
                Self::Group(group, message) => observer.incoming_group_message(group, message),
            }
        }
    }
}
