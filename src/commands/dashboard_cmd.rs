//! Dashboard Commands
//!
//! A signed-in reporter manages the items listed under their contact email.

use serde::Serialize;

use crate::domain::{DashboardStats, DomainError, FoundItem, Identity, ItemPatch};
use crate::error::ApiError;
use crate::repository::Repository;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub items: Vec<FoundItem>,
    pub stats: DashboardStats,
}

fn signed_in_email(identity: &Identity) -> Result<&str, ApiError> {
    identity.email().ok_or_else(|| {
        DomainError::Unauthorized("Please sign in to manage your items".to_string()).into()
    })
}

/// Fetch `id` and check the identity may manage it
async fn load_owned(state: &AppState, identity: &Identity, id: u32) -> Result<FoundItem, ApiError> {
    signed_in_email(identity)?;
    let item = state
        .item_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::NotFound("Item not found".to_string()))?;
    if !item.is_managed_by(identity) {
        return Err(DomainError::Forbidden("You can only manage items you reported".to_string()).into());
    }
    Ok(item)
}

pub async fn my_items(state: &AppState, identity: &Identity) -> Result<Dashboard, ApiError> {
    let email = signed_in_email(identity)?;
    let items = state.item_repo.list_by_contact_email(email).await?;
    let stats = DashboardStats::from_items(&items);
    Ok(Dashboard { items, stats })
}

/// Flip the returned flag
pub async fn toggle_returned(
    state: &AppState,
    identity: &Identity,
    id: u32,
) -> Result<FoundItem, ApiError> {
    let item = load_owned(state, identity, id).await?;
    let updated = state.item_repo.set_returned(id, !item.is_returned).await?;
    log::info!("Item {} marked returned={}", id, updated.is_returned);
    Ok(updated)
}

pub async fn update_item(
    state: &AppState,
    identity: &Identity,
    id: u32,
    patch: ItemPatch,
) -> Result<FoundItem, ApiError> {
    let mut item = load_owned(state, identity, id).await?;
    patch.apply(&mut item)?;
    Ok(state.item_repo.update(&item).await?)
}

pub async fn delete_item(state: &AppState, identity: &Identity, id: u32) -> Result<(), ApiError> {
    load_owned(state, identity, id).await?;
    state.item_repo.delete(id).await?;
    log::info!("Item {} deleted by its reporter", id);
    Ok(())
}
