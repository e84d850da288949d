//! chathub - in-process message distribution hub for chat servers.
//!
//! The [`Hub`] records chat messages and fans them out to registered
//! [`Observer`]s by broadcast, private delivery or group delivery. Group
//! membership is answered by an external [`MembershipAuthority`].

pub mod config;
pub mod hub;
pub mod message;
pub mod telemetry;

pub use hub::{
    DeliveryMode, Hub, HubOptions, HubStats, MembershipAuthority, NoMembership, Observer,
    ObserverKind,
};
pub use message::ChatMessage;
