//! Item Repository Implementation
//!
//! SQLite-backed implementation of Repository<FoundItem> plus the lookups the
//! dashboard needs.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::traits::{Repository, SearchableRepository};
use crate::domain::{
    mask_code, parse_date, Category, DomainError, DomainResult, FoundItem, ItemFilter,
    DEFAULT_DESCRIPTION, DEFAULT_LOCATION, DEFAULT_TITLE,
};

const ITEM_COLUMNS: &str = "id, title, category, location, found_date, description, secret_code, masked_code, reported_by, contact_email, contact_phone, image_url, is_returned, created_at, updated_at";

/// SQLite implementation of the item repository
pub struct ItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Items whose contact email equals `email`, newest first
    pub async fn list_by_contact_email(&self, email: &str) -> DomainResult<Vec<FoundItem>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM found_items WHERE contact_email = ?1 ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(internal)?;
        let rows = stmt.query_map(params![email], row_to_item).map_err(internal)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(internal)
    }

    /// Set the returned flag and hand back the stored item
    pub async fn set_returned(&self, id: u32, returned: bool) -> DomainResult<FoundItem> {
        {
            let conn = self.conn.lock().await;
            let changed = conn
                .execute(
                    "UPDATE found_items SET is_returned = ?1, updated_at = strftime('%s', 'now') WHERE id = ?2",
                    params![returned as i32, id],
                )
                .map_err(internal)?;
            if changed == 0 {
                return Err(DomainError::NotFound(format!("Item {} not found", id)));
            }
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", id)))
    }
}

#[async_trait]
impl Repository<FoundItem> for ItemRepository {
    async fn create(&self, entity: &FoundItem) -> DomainResult<FoundItem> {
        let id = {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO found_items (title, category, location, found_date, description, secret_code, masked_code, reported_by, contact_email, contact_phone, image_url, is_returned, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, COALESCE(?13, strftime('%s', 'now')))",
                params![
                    entity.title,
                    entity.category.as_str(),
                    entity.location,
                    entity.found_date.format("%Y-%m-%d").to_string(),
                    entity.description,
                    entity.secret_code,
                    entity.masked_code,
                    entity.reported_by,
                    entity.contact_email,
                    entity.contact_phone,
                    entity.image_url,
                    entity.is_returned as i32,
                    entity.created_at,
                ],
            )
            .map_err(internal)?;
            conn.last_insert_rowid()
        };

        let id = u32::try_from(id)
            .map_err(|_| DomainError::Internal(format!("Item id {} out of range", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("Item {} vanished after insert", id)))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<FoundItem>> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {} FROM found_items WHERE id = ?1", ITEM_COLUMNS);
        conn.query_row(&sql, params![id], row_to_item)
            .optional()
            .map_err(internal)
    }

    async fn list(&self) -> DomainResult<Vec<FoundItem>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM found_items ORDER BY created_at DESC, id DESC",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql).map_err(internal)?;
        let rows = stmt.query_map([], row_to_item).map_err(internal)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(internal)
    }

    async fn update(&self, entity: &FoundItem) -> DomainResult<FoundItem> {
        {
            let conn = self.conn.lock().await;
            // secret_code, masked_code and reported_by are fixed at creation
            let changed = conn
                .execute(
                    "UPDATE found_items SET title = ?1, category = ?2, location = ?3, found_date = ?4, description = ?5, contact_email = ?6, contact_phone = ?7, image_url = ?8, is_returned = ?9, updated_at = strftime('%s', 'now') WHERE id = ?10",
                    params![
                        entity.title,
                        entity.category.as_str(),
                        entity.location,
                        entity.found_date.format("%Y-%m-%d").to_string(),
                        entity.description,
                        entity.contact_email,
                        entity.contact_phone,
                        entity.image_url,
                        entity.is_returned as i32,
                        entity.id,
                    ],
                )
                .map_err(internal)?;
            if changed == 0 {
                return Err(DomainError::NotFound(format!("Item {} not found", entity.id)));
            }
        }

        self.find_by_id(entity.id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Item {} not found", entity.id)))
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute("DELETE FROM found_items WHERE id = ?1", params![id])
            .map_err(internal)?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Item {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchableRepository<FoundItem> for ItemRepository {
    type Filter = ItemFilter;

    async fn search(&self, filter: &ItemFilter) -> DomainResult<Vec<FoundItem>> {
        let items = self.list().await?;
        Ok(items.into_iter().filter(|item| filter.matches(item)).collect())
    }
}

fn internal(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Convert a database row to FoundItem, substituting defaults for missing
/// descriptive fields
fn row_to_item(row: &Row) -> rusqlite::Result<FoundItem> {
    let text = |idx: usize| -> rusqlite::Result<Option<String>> {
        Ok(row
            .get::<_, Option<String>>(idx)?
            .filter(|s| !s.trim().is_empty()))
    };

    let id: u32 = row.get(0)?;
    let found_date = text(4)?
        .and_then(|d| parse_date(&d).ok())
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    // Codes are compared verbatim, so only an empty value means "no code"
    let raw = |idx: usize| -> rusqlite::Result<Option<String>> {
        Ok(row.get::<_, Option<String>>(idx)?.filter(|s| !s.is_empty()))
    };
    let secret_code = raw(6)?;
    let masked_code = match (&secret_code, raw(7)?) {
        (Some(_), Some(masked)) => Some(masked),
        (Some(code), None) => {
            log::warn!("Item {} has a secret code but no masked code; deriving it", id);
            Some(mask_code(code))
        }
        (None, _) => None,
    };

    Ok(FoundItem {
        id,
        title: text(1)?.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        category: text(2)?
            .map(|c| Category::from_str(&c))
            .unwrap_or_default(),
        location: text(3)?.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        found_date,
        description: text(5)?.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        secret_code,
        masked_code,
        reported_by: text(8)?,
        contact_email: text(9)?,
        contact_phone: text(10)?,
        image_url: text(11)?,
        is_returned: row.get::<_, Option<i64>>(12)?.unwrap_or(0) != 0,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
