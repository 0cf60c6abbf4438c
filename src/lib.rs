//! Back2U Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - claim: Code verification and contact reveal per detail view
//! - notify: Reporter notification through the mail relay
//! - commands: Application operations behind the HTTP surface

use std::sync::Arc;
use std::time::Duration;

pub mod claim;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod notify;
pub mod repository;

use claim::ClaimSessionStore;
use notify::{NotificationDispatcher, Notifier};
use repository::{DbState, ItemRepository};

/// Application state shared across commands
#[derive(Clone)]
pub struct AppState {
    pub item_repo: Arc<ItemRepository>,
    pub claim_sessions: Arc<ClaimSessionStore>,
    pub notifications: NotificationDispatcher,
}

impl AppState {
    pub fn new(db_state: &DbState, notifier: Arc<dyn Notifier>, session_idle: Duration) -> Self {
        Self {
            item_repo: Arc::new(ItemRepository::new(db_state.connection())),
            claim_sessions: Arc::new(ClaimSessionStore::new(session_idle)),
            notifications: NotificationDispatcher::new(notifier),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::{FoundItem, Identity, ItemDraft};
    use crate::notify::testing::RecordingNotifier;
    use crate::notify::NotifyOutcome;
    use crate::repository::{init_db, Repository};
    use std::path::PathBuf;

    pub async fn state_with(outcome: NotifyOutcome) -> (AppState, Arc<RecordingNotifier>) {
        let db_state = init_db(&PathBuf::from(":memory:"))
            .await
            .expect("Failed to init test DB");
        let notifier = RecordingNotifier::new(outcome);
        let state = AppState::new(&db_state, notifier.clone(), Duration::from_secs(60));
        (state, notifier)
    }

    pub fn reporter() -> Identity {
        Identity::authenticated("reporter-1", Some("finder@campus.edu"))
    }

    pub fn draft(title: &str, code: Option<&str>) -> ItemDraft {
        ItemDraft {
            title: title.to_string(),
            category: "Electronics".to_string(),
            found_date: "2024-03-01".to_string(),
            location: "Central Library".to_string(),
            contact_email: "finder@campus.edu".to_string(),
            phone: Some("555-0100".to_string()),
            description: "Left on a study desk".to_string(),
            secret_code: code.map(str::to_string),
            image_url: None,
        }
    }

    pub async fn seed(state: &AppState, title: &str, code: Option<&str>) -> FoundItem {
        let item = FoundItem::from_draft(draft(title, code), &reporter()).unwrap();
        state.item_repo.create(&item).await.unwrap()
    }
}
