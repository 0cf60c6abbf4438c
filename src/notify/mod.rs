//! Reporter notification
//!
//! The claim workflow only produces a `ClaimEmail`; sending it goes through
//! the `Notifier` seam so the relay client can be replaced (queued,
//! retrying, ...) without touching the workflow.

mod dispatch;
mod notifier;
mod relay;

pub use dispatch::NotificationDispatcher;
pub use notifier::{ClaimEmail, Notifier, NotifyOutcome};
pub use relay::RelayNotifier;

#[cfg(test)]
pub(crate) use dispatch::testing;
