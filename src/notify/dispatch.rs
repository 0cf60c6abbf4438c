//! Detached notification dispatch
//!
//! One attempt per call, no retry. The task is never awaited by the claim
//! transition; its outcome is logged and, on failure, handed to `on_failure`.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::notifier::{ClaimEmail, Notifier, NotifyOutcome};

#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Spawn the notification and return immediately.
    ///
    /// Must be called from within a tokio runtime. The handle is only useful
    /// to tests; dropping it does not cancel the task.
    pub fn dispatch_detached<F>(&self, email: ClaimEmail, on_failure: F) -> JoinHandle<NotifyOutcome>
    where
        F: FnOnce(&NotifyOutcome) + Send + 'static,
    {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let outcome = notifier.notify(&email.to_email, &email.item_title).await;
            if outcome.is_delivered() {
                log::info!("Claim notification sent for '{}'", email.item_title);
            } else {
                log::error!(
                    "Failed to send claim notification for '{}': {}",
                    email.item_title,
                    outcome
                );
                on_failure(&outcome);
            }
            outcome
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and answers with a fixed outcome
    pub struct RecordingNotifier {
        pub calls: Mutex<Vec<ClaimEmail>>,
        outcome: NotifyOutcome,
    }

    impl RecordingNotifier {
        pub fn new(outcome: NotifyOutcome) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome,
            })
        }

        pub fn calls(&self) -> Vec<ClaimEmail> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, recipient: &str, item_title: &str) -> NotifyOutcome {
            self.calls.lock().unwrap().push(ClaimEmail {
                to_email: recipient.to_string(),
                item_title: item_title.to_string(),
            });
            self.outcome.clone()
        }
    }
}
