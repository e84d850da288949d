//! The message hub.
//!
//! A [`Hub`] owns the observer registry and the message history, and fans
//! published messages out to observers in one of three ways:
//!
//! - [`Hub::publish_broadcast`]: recorded in global history, delivered to every
//!   non-ephemeral observer.
//! - [`Hub::publish_private`]: never recorded, delivered to sender and recipient.
//! - [`Hub::publish_group`]: recorded in the group's history, delivered to
//!   observers the [`MembershipAuthority`] reports as members.
//!
//! Every operation runs under a single hub-wide lock. The lock is re-entrant,
//! so an observer may call back into the hub from inside a delivery (for
//! example to unregister itself after its connection died). Registry changes
//! made that way apply from the next publish.

mod dispatch;
mod history;
mod observer;
mod registry;

pub use dispatch::DeliveryMode;
pub use observer::{MembershipAuthority, NoMembership, Observer, ObserverKind};

use crate::message::ChatMessage;
use crate::telemetry::spans;
use dispatch::Delivery;
use history::HistoryStore;
use parking_lot::ReentrantMutex;
use registry::ObserverRegistry;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, info};

/// Username prefix used by command-only clients.
pub const DEFAULT_EPHEMERAL_PREFIX: &str = "android-client_";

/// Tunables for a [`Hub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubOptions {
    /// Observers whose username starts with this prefix never receive
    /// broadcasts. An empty prefix disables the rule.
    pub ephemeral_prefix: String,
    pub delivery: DeliveryMode,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            ephemeral_prefix: DEFAULT_EPHEMERAL_PREFIX.to_string(),
            delivery: DeliveryMode::default(),
        }
    }
}

/// Point-in-time counters, taken under the hub lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HubStats {
    /// Registry entries, duplicates included. Dropped observers are pruned
    /// by the next register, unregister or publish, so this can briefly
    /// count entries that are no longer live.
    pub observers: usize,
    /// Entries whose observer is still alive.
    pub live_observers: usize,
    pub global_messages: usize,
    pub groups: usize,
    pub group_messages: usize,
}

#[derive(Default)]
struct HubState {
    registry: ObserverRegistry,
    history: HistoryStore,
}

pub struct Hub {
    state: ReentrantMutex<RefCell<HubState>>,
    membership: Arc<dyn MembershipAuthority>,
    options: HubOptions,
}

impl Hub {
    /// Create a hub with default options.
    pub fn new(membership: Arc<dyn MembershipAuthority>) -> Self {
        Self::with_options(membership, HubOptions::default())
    }

    pub fn with_options(membership: Arc<dyn MembershipAuthority>, options: HubOptions) -> Self {
        debug!(
            ephemeral_prefix = %options.ephemeral_prefix,
            delivery = %options.delivery,
            "Creating message hub"
        );
        Self {
            state: ReentrantMutex::new(RefCell::new(HubState::default())),
            membership,
            options,
        }
    }

    pub fn options(&self) -> &HubOptions {
        &self.options
    }

    // === Registry ===

    /// Subscribe `observer` to future notifications.
    ///
    /// The hub keeps a weak reference only. Registering the same observer
    /// twice creates two entries, and each entry is notified separately.
    pub fn register(&self, observer: &Arc<dyn Observer>) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.registry.register(observer);
        debug!(
            user = %observer.username(),
            entries = state.registry.len(),
            "Observer registered"
        );
    }

    /// Remove one registration entry for `observer`. No-op if absent.
    pub fn unregister(&self, observer: &Arc<dyn Observer>) {
        let guard = self.state.lock();
        let removed = guard.borrow_mut().registry.unregister(observer);
        debug!(user = %observer.username(), removed, "Observer unregistered");
    }

    /// Clear the registry and all history.
    pub fn reset(&self) {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();
        state.registry.clear();
        state.history.clear();
        info!("Message hub reset");
    }

    // === Publishing ===

    /// Record `message` in global history and deliver it to every registered
    /// observer that is not ephemeral.
    pub fn publish_broadcast(&self, message: ChatMessage) {
        let _span = spans::publish("broadcast", message.sender()).entered();
        let guard = self.state.lock();
        let observers = {
            let mut state = guard.borrow_mut();
            state.history.append_global(message.clone());
            state.registry.live()
        };
        let recipients: Vec<_> = observers
            .into_iter()
            .filter(|observer| !self.is_ephemeral(&**observer))
            .collect();
        debug!(
            sender = %message.sender(),
            recipients = recipients.len(),
            "Broadcast"
        );
        self.deliver(guard, Delivery::Direct(&message), &recipients);
    }

    /// Deliver `message` to the sender's and `recipient`'s observers.
    ///
    /// Private messages are not recorded. A recipient that is not registered
    /// simply gets nothing.
    pub fn publish_private(&self, message: ChatMessage, recipient: &str) {
        let _span = spans::publish("private", message.sender()).entered();
        let guard = self.state.lock();
        let observers = guard.borrow_mut().registry.live();
        let recipients: Vec<_> = observers
            .into_iter()
            .filter(|observer| {
                let user = observer.username();
                user == message.sender() || user == recipient
            })
            .collect();
        debug!(
            sender = %message.sender(),
            to = %recipient,
            recipients = recipients.len(),
            "Private message"
        );
        self.deliver(guard, Delivery::Direct(&message), &recipients);
    }

    /// Record `message` in `group`'s history and deliver it to every
    /// registered observer that is currently a member of `group`.
    pub fn publish_group(&self, message: ChatMessage, group: &str) {
        let _span = spans::publish("group", message.sender()).entered();
        let guard = self.state.lock();
        let observers = {
            let mut state = guard.borrow_mut();
            state.history.append_group(group, message.clone());
            state.registry.live()
        };
        let recipients: Vec<_> = observers
            .into_iter()
            .filter(|observer| self.membership.is_member(group, observer.username()))
            .collect();
        debug!(
            sender = %message.sender(),
            group = %group,
            recipients = recipients.len(),
            "Group message"
        );
        self.deliver(guard, Delivery::Group(group, &message), &recipients);
    }

    // === History ===

    /// Every broadcast message, oldest first.
    pub fn global_history(&self) -> Vec<ChatMessage> {
        let guard = self.state.lock();
        let state = guard.borrow();
        state.history.global().to_vec()
    }

    /// Messages sent to `group`, oldest first. `None` if the group never
    /// received a message.
    pub fn group_history(&self, group: &str) -> Option<Vec<ChatMessage>> {
        let guard = self.state.lock();
        let state = guard.borrow();
        state.history.group(group).map(<[ChatMessage]>::to_vec)
    }

    /// Groups with recorded history, sorted by name.
    pub fn group_names(&self) -> Vec<String> {
        let guard = self.state.lock();
        let state = guard.borrow();
        state.history.group_names()
    }

    pub fn stats(&self) -> HubStats {
        let guard = self.state.lock();
        let state = guard.borrow();
        HubStats {
            observers: state.registry.len(),
            live_observers: state.registry.live_len(),
            global_messages: state.history.global().len(),
            groups: state.history.group_count(),
            group_messages: state.history.group_message_count(),
        }
    }

    // === Internals ===

    fn is_ephemeral(&self, observer: &dyn Observer) -> bool {
        if observer.kind() == ObserverKind::Ephemeral {
            return true;
        }
        let prefix = &self.options.ephemeral_prefix;
        !prefix.is_empty() && observer.username().starts_with(prefix.as_str())
    }

    /// Invoke observers according to the configured [`DeliveryMode`].
    ///
    /// `guard` must be the hub lock taken by the caller, with no `RefCell`
    /// borrow outstanding.
    fn deliver(
        &self,
        guard: parking_lot::ReentrantMutexGuard<'_, RefCell<HubState>>,
        delivery: Delivery<'_>,
        recipients: &[Arc<dyn Observer>],
    ) {
        match self.options.delivery {
            DeliveryMode::Serialized => {
                delivery.deliver_to(recipients);
                drop(guard);
            }
            DeliveryMode::Snapshot => {
                drop(guard);
                delivery.deliver_to(recipients);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Inbox {
        direct: Mutex<Vec<String>>,
        group: Mutex<Vec<(String, String)>>,
    }

    struct TestObserver {
        name: String,
        kind: ObserverKind,
        inbox: Arc<Inbox>,
    }

    impl Observer for TestObserver {
        fn username(&self) -> &str {
            &self.name
        }
        fn kind(&self) -> ObserverKind {
            self.kind
        }
        fn incoming_message(&self, message: &ChatMessage) {
            self.inbox.direct.lock().push(message.content().to_string());
        }
        fn incoming_group_message(&self, group: &str, message: &ChatMessage) {
            self.inbox
                .group
                .lock()
                .push((group.to_string(), message.content().to_string()));
        }
    }

    fn observer(name: &str, kind: ObserverKind) -> (Arc<dyn Observer>, Arc<Inbox>) {
        let inbox = Arc::new(Inbox::default());
        let observer: Arc<dyn Observer> = Arc::new(TestObserver {
            name: name.to_string(),
            kind,
            inbox: Arc::clone(&inbox),
        });
        (observer, inbox)
    }

    fn hub() -> Hub {
        Hub::new(Arc::new(|group: &str, user: &str| group == "team" && user != "outsider"))
    }

    #[test]
    fn explicit_ephemeral_kind_skips_broadcast() {
        let hub = hub();
        let (bot, inbox) = observer("bot", ObserverKind::Ephemeral);
        hub.register(&bot);

        hub.publish_broadcast(ChatMessage::new("alice", "hello"));

        assert!(inbox.direct.lock().is_empty());
        assert_eq!(hub.global_history().len(), 1);
    }

    #[test]
    fn explicit_ephemeral_kind_still_gets_private_and_group() {
        let hub = hub();
        let (bot, inbox) = observer("bot", ObserverKind::Ephemeral);
        hub.register(&bot);

        hub.publish_private(ChatMessage::new("alice", "psst"), "bot");
        hub.publish_group(ChatMessage::new("alice", "standup"), "team");

        assert_eq!(*inbox.direct.lock(), ["psst"]);
        assert_eq!(
            *inbox.group.lock(),
            [("team".to_string(), "standup".to_string())]
        );
    }

    #[test]
    fn empty_prefix_disables_prefix_rule() {
        let options = HubOptions {
            ephemeral_prefix: String::new(),
            ..Default::default()
        };
        let hub = Hub::with_options(Arc::new(NoMembership), options);
        let (client, inbox) = observer("android-client_1", ObserverKind::Standard);
        hub.register(&client);

        hub.publish_broadcast(ChatMessage::new("alice", "hi"));

        assert_eq!(*inbox.direct.lock(), ["hi"]);
    }

    #[test]
    fn custom_prefix_is_honoured() {
        let options = HubOptions {
            ephemeral_prefix: "cli-".to_string(),
            ..Default::default()
        };
        let hub = Hub::with_options(Arc::new(NoMembership), options);
        let (cli, cli_inbox) = observer("cli-42", ObserverKind::Standard);
        let (android, android_inbox) = observer("android-client_1", ObserverKind::Standard);
        hub.register(&cli);
        hub.register(&android);

        hub.publish_broadcast(ChatMessage::new("alice", "hi"));

        assert!(cli_inbox.direct.lock().is_empty());
        assert_eq!(*android_inbox.direct.lock(), ["hi"]);
    }

    #[test]
    fn stats_track_registry_and_history() {
        let hub = hub();
        let (a, _) = observer("a", ObserverKind::Standard);
        let (b, _) = observer("b", ObserverKind::Standard);
        hub.register(&a);
        hub.register(&a);
        hub.register(&b);
        hub.publish_broadcast(ChatMessage::new("a", "1"));
        hub.publish_group(ChatMessage::new("a", "2"), "team");
        hub.publish_group(ChatMessage::new("a", "3"), "other");
        hub.publish_private(ChatMessage::new("a", "4"), "b");
        drop(b);

        assert_eq!(
            hub.stats(),
            HubStats {
                observers: 3,
                live_observers: 2,
                global_messages: 1,
                groups: 2,
                group_messages: 2,
            }
        );
    }

    #[test]
    fn dropped_observer_receives_nothing() {
        let hub = hub();
        let (a, inbox) = observer("a", ObserverKind::Standard);
        hub.register(&a);
        drop(a);

        hub.publish_broadcast(ChatMessage::new("x", "after drop"));

        assert!(inbox.direct.lock().is_empty());
    }

    #[test]
    fn group_names_sorted() {
        let hub = hub();
        hub.publish_group(ChatMessage::new("a", "x"), "zeta");
        hub.publish_group(ChatMessage::new("a", "x"), "alpha");
        assert_eq!(hub.group_names(), ["alpha", "zeta"]);
    }

    #[test]
    fn default_options() {
        let options = HubOptions::default();
        assert_eq!(options.ephemeral_prefix, "android-client_");
        assert_eq!(options.delivery, DeliveryMode::Serialized);
    }
}
