//! Listing filters for the browse page

use chrono::NaiveDate;
use serde::Deserialize;

use super::item::FoundItem;

/// Sentinel sent by the category dropdown for "no category filter"
pub const ALL_CATEGORIES: &str = "All Categories";
/// Sentinel sent by the location dropdown for "no location filter"
pub const ALL_LOCATIONS: &str = "All Locations";

/// Query-string filters; every absent field matches everything
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
    /// Case-insensitive substring of the title
    #[serde(rename = "q")]
    pub query: Option<String>,
    pub category: Option<String>,
    /// Case-sensitive substring of the location
    pub location: Option<String>,
    /// Exact found date, `YYYY-MM-DD`
    pub date: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &FoundItem) -> bool {
        let matches_search = match self.query.as_deref() {
            Some(q) if !q.is_empty() => item.title.to_lowercase().contains(&q.to_lowercase()),
            _ => true,
        };

        let matches_category = match self.category.as_deref() {
            None | Some("") | Some(ALL_CATEGORIES) => true,
            Some(c) => item.category.as_str() == c,
        };

        let matches_location = match self.location.as_deref() {
            None | Some("") | Some(ALL_LOCATIONS) => true,
            Some(l) => item.location.contains(l),
        };

        let matches_date = match self.date.as_deref() {
            None | Some("") => true,
            Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map(|date| date == item.found_date)
                .unwrap_or(false),
        };

        matches_search && matches_category && matches_location && matches_date
    }
}
