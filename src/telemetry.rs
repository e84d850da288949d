//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Standardized span constructors for hub observability.
pub mod spans {
    use tracing::{Span, debug_span};

    /// Span wrapping one publish call.
    pub fn publish(kind: &'static str, sender: &str) -> Span {
        debug_span!("publish", kind = kind, sender = %sender)
    }

    /// Span for one console session.
    pub fn session(user: &str) -> Span {
        debug_span!("session", user = %user)
    }
}
