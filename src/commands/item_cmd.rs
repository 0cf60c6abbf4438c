//! Listing Commands
//!
//! Report, browse and view found items.

use crate::domain::{
    DomainError, FoundItem, Identity, ItemDetail, ItemDraft, ItemFilter, ItemSummary,
};
use crate::error::{ApiError, DETAIL_LOAD_FAILED};
use crate::repository::{Repository, SearchableRepository};
use crate::AppState;

/// Report a found item
pub async fn report_item(
    state: &AppState,
    reporter: &Identity,
    draft: ItemDraft,
) -> Result<FoundItem, ApiError> {
    let item = FoundItem::from_draft(draft, reporter)?;
    let created = state.item_repo.create(&item).await?;
    log::info!(
        "Item {} reported (code protected: {})",
        created.id,
        created.has_secret_code()
    );
    Ok(created)
}

/// Listing cards matching `filter`, newest first
pub async fn search_items(
    state: &AppState,
    filter: &ItemFilter,
) -> Result<Vec<ItemSummary>, ApiError> {
    let items = state.item_repo.search(filter).await?;
    Ok(items.iter().map(FoundItem::summary).collect())
}

pub async fn get_item_detail(state: &AppState, id: u32) -> Result<ItemDetail, ApiError> {
    Ok(load_item(state, id).await?.detail())
}

/// Fetch an item for the detail page. Storage failures surface as the
/// generic detail-page error.
pub(crate) async fn load_item(state: &AppState, id: u32) -> Result<FoundItem, ApiError> {
    match state.item_repo.find_by_id(id).await {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(DomainError::NotFound("Item not found".to_string()).into()),
        Err(e) => {
            log::error!("Failed to load item {}: {}", id, e);
            Err(DomainError::Internal(DETAIL_LOAD_FAILED.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyOutcome;
    use crate::test_support::{draft, reporter, seed, state_with};

    #[tokio::test]
    async fn test_report_masks_code() {
        let (state, _) = state_with(NotifyOutcome::Delivered).await;

        let item = report_item(&state, &reporter(), draft("Laptop", Some("SN12345678")))
            .await
            .unwrap();
        assert_eq!(item.masked_code.as_deref(), Some("******5678"));
        assert_eq!(item.reported_by.as_deref(), Some("reporter-1"));

        let detail = get_item_detail(&state, item.id).await.unwrap();
        assert!(detail.requires_code);
        assert_eq!(detail.masked_code.as_deref(), Some("******5678"));
    }

    #[tokio::test]
    async fn test_report_empty_code_is_uncoded() {
        let (state, _) = state_with(NotifyOutcome::Delivered).await;

        let item = report_item(&state, &reporter(), draft("Mug", Some("")))
            .await
            .unwrap();
        assert!(!item.has_secret_code());
        assert!(item.masked_code.is_none());
    }

    #[tokio::test]
    async fn test_report_whitespace_code_still_gates() {
        let (state, _) = state_with(NotifyOutcome::Delivered).await;

        let item = report_item(&state, &reporter(), draft("Mug", Some("   ")))
            .await
            .unwrap();
        let detail = get_item_detail(&state, item.id).await.unwrap();
        assert!(detail.requires_code);
        assert_eq!(detail.masked_code.as_deref(), Some("   "));
    }

    #[tokio::test]
    async fn test_report_requires_fields() {
        let (state, _) = state_with(NotifyOutcome::Delivered).await;
        let mut incomplete = draft("Laptop", None);
        incomplete.location = String::new();

        let err = report_item(&state, &reporter(), incomplete).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_search_and_missing_detail() {
        let (state, _) = state_with(NotifyOutcome::Delivered).await;
        seed(&state, "Blue Backpack", None).await;
        seed(&state, "Water Bottle", None).await;

        let filter = ItemFilter {
            query: Some("BACKPACK".to_string()),
            ..Default::default()
        };
        let hits = search_items(&state, &filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Blue Backpack");

        let all = search_items(&state, &ItemFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let err = get_item_detail(&state, 999).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain(DomainError::NotFound(_))));
    }
}
