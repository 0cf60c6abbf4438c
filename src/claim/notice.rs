//! User-facing notices (toasts) raised during a claim session

use serde::Serialize;
use std::sync::{Arc, Mutex, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Info,
    Success,
    /// Soft failure; the claim itself is unaffected
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, description: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn claim_successful() -> Self {
        Self::new(
            NoticeKind::Success,
            "Claim successful",
            "You've successfully verified the product code. You can now contact the person who found it.",
        )
    }

    pub fn verification_failed() -> Self {
        Self::new(
            NoticeKind::Info,
            "Verification failed",
            "The product number you entered is incorrect, but you can still contact the owner via email.",
        )
    }

    pub fn item_claimed() -> Self {
        Self::new(
            NoticeKind::Success,
            "Item claimed",
            "You can now contact the owner to claim this item.",
        )
    }

    pub fn notification_failed() -> Self {
        Self::new(
            NoticeKind::Warning,
            "Notification failed",
            "We couldn't notify the item owner, but your claim was successful.",
        )
    }
}

/// Pending notices of one session.
///
/// Background tasks only get a `Weak` handle, so anything they report after
/// the session is closed is dropped.
#[derive(Debug, Clone, Default)]
pub struct NoticeSink {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl NoticeSink {
    pub fn push(&self, notice: Notice) {
        push_locked(&self.inner, notice);
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notice> {
        match self.inner.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn downgrade(&self) -> WeakNoticeSink {
        WeakNoticeSink {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeakNoticeSink {
    inner: Weak<Mutex<Vec<Notice>>>,
}

impl WeakNoticeSink {
    /// Returns false if the session is gone and the notice was discarded
    pub fn push(&self, notice: Notice) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                push_locked(&inner, notice);
                true
            }
            None => false,
        }
    }
}

fn push_locked(inner: &Mutex<Vec<Notice>>, notice: Notice) {
    match inner.lock() {
        Ok(mut pending) => pending.push(notice),
        Err(poisoned) => poisoned.into_inner().push(notice),
    }
}
