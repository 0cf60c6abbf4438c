//! Domain Layer
//!
//! Contains all domain entities and core rules.
//! Nothing in here touches storage, HTTP or the clock beyond `chrono` values.

mod entity;
mod filter;
mod identity;
mod item;
mod masking;

pub use entity::{DomainError, DomainResult, Entity};
pub use filter::{ItemFilter, ALL_CATEGORIES, ALL_LOCATIONS};
pub use identity::Identity;
pub(crate) use item::parse_date;
pub use item::{
    Category, DashboardStats, FoundItem, ItemDetail, ItemDraft, ItemPatch, ItemSummary,
    DEFAULT_DESCRIPTION, DEFAULT_LOCATION, DEFAULT_TITLE, NOT_PROVIDED, PLACEHOLDER_IMAGE,
};
pub use masking::{mask_code, MASK_CHAR, VISIBLE_SUFFIX};
