use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Relay payload: who to tell, and about which item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEmail {
    pub to_email: String,
    pub item_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered,
    /// The relay answered with a non-success status
    Rejected { status: u16, message: String },
    /// No usable answer (connection, timeout, unreadable body)
    TransportFailed(String),
}

impl NotifyOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotifyOutcome::Delivered)
    }
}

impl std::fmt::Display for NotifyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyOutcome::Delivered => write!(f, "delivered"),
            NotifyOutcome::Rejected { status, message } => {
                write!(f, "rejected by relay ({}): {}", status, message)
            }
            NotifyOutcome::TransportFailed(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

/// One-shot notification of an item's reporter.
///
/// Implementations make a single attempt and report the outcome; they never
/// return errors to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, item_title: &str) -> NotifyOutcome;
}
