//! Found Item Entity
//!
//! A found item as reported by whoever picked it up, plus the public shapes
//! derived from it (list card, detail page) and the report/edit inputs.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::entity::{DomainError, DomainResult, Entity};
use super::identity::Identity;
use super::masking::mask_code;

pub const DEFAULT_TITLE: &str = "Untitled Item";
pub const DEFAULT_LOCATION: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
/// Rendered for contact fields the reporter left empty
pub const NOT_PROVIDED: &str = "Not provided";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Item category offered on the report form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Electronics,
    Books,
    Clothing,
    Accessories,
    Keys,
    IdsAndCards,
    /// Anything else, including unknown stored values
    #[default]
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Electronics,
        Category::Books,
        Category::Clothing,
        Category::Accessories,
        Category::Keys,
        Category::IdsAndCards,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Books => "Books",
            Category::Clothing => "Clothing",
            Category::Accessories => "Accessories",
            Category::Keys => "Keys",
            Category::IdsAndCards => "IDs & Cards",
            Category::Others => "Others",
        }
    }

    pub fn from_str(s: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from_str(&s)
    }
}

/// A reported found item
///
/// `secret_code` never leaves the backend; only `masked_code` is serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundItem {
    /// Assigned by the repository
    pub id: u32,
    pub title: String,
    pub category: Category,
    pub location: String,
    pub found_date: NaiveDate,
    pub description: String,
    /// Serial/product code only the owner should know
    #[serde(skip_serializing)]
    pub secret_code: Option<String>,
    /// Stored alongside `secret_code`, present iff it is
    pub masked_code: Option<String>,
    /// Identity uid of the reporter
    pub reported_by: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub is_returned: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl FoundItem {
    /// Validate a report and build the item to persist (id 0 until stored)
    pub fn from_draft(draft: ItemDraft, reporter: &Identity) -> DomainResult<Self> {
        let required = [
            &draft.title,
            &draft.category,
            &draft.found_date,
            &draft.location,
            &draft.contact_email,
            &draft.description,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(DomainError::InvalidInput(
                "Please fill in all required fields.".to_string(),
            ));
        }

        let contact_email = draft.contact_email.trim().to_string();
        if !email_pattern().is_match(&contact_email) {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not a valid email address",
                contact_email
            )));
        }

        let found_date = parse_date(draft.found_date.trim())?;

        // Any non-empty code gates contacts, whitespace included; stored as given
        let secret_code = draft.secret_code.filter(|code| !code.is_empty());
        let masked_code = secret_code.as_deref().map(mask_code);

        Ok(Self {
            id: 0,
            title: draft.title.trim().to_string(),
            category: Category::from_str(draft.category.trim()),
            location: draft.location.trim().to_string(),
            found_date,
            description: draft.description.trim().to_string(),
            secret_code,
            masked_code,
            reported_by: reporter.uid().map(str::to_string),
            contact_email: Some(contact_email),
            contact_phone: non_blank(draft.phone),
            image_url: non_blank(draft.image_url),
            is_returned: false,
            created_at: Some(chrono::Utc::now().timestamp()),
            updated_at: None,
        })
    }

    pub fn has_secret_code(&self) -> bool {
        self.secret_code.is_some()
    }

    /// Exact, case-sensitive comparison; no trimming
    pub fn code_matches(&self, candidate: &str) -> bool {
        self.secret_code.as_deref() == Some(candidate)
    }

    /// Only the account whose email is the item's contact email may manage it
    pub fn is_managed_by(&self, identity: &Identity) -> bool {
        match (identity.email(), self.contact_email.as_deref()) {
            (Some(viewer), Some(contact)) => viewer == contact,
            _ => false,
        }
    }

    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            id: self.id,
            title: self.title.clone(),
            image: self.image_or_placeholder(),
            category: self.category,
            location: self.location.clone(),
            date: self.found_date.format(DATE_FORMAT).to_string(),
            is_returned: self.is_returned,
        }
    }

    pub fn detail(&self) -> ItemDetail {
        ItemDetail {
            id: self.id,
            title: self.title.clone(),
            image: self.image_or_placeholder(),
            category: self.category,
            location: self.location.clone(),
            found_date: self.found_date.format(DATE_FORMAT).to_string(),
            description: self.description.clone(),
            masked_code: self.masked_code.clone(),
            requires_code: self.has_secret_code(),
            is_returned: self.is_returned,
        }
    }

    fn image_or_placeholder(&self) -> String {
        self.image_url
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }
}

impl Entity for FoundItem {
    type Id = u32;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Listing card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub category: Category,
    pub location: String,
    pub date: String,
    pub is_returned: bool,
}

/// Public part of the detail page; contact fields go through claim gating
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    pub id: u32,
    pub title: String,
    pub image: String,
    pub category: Category,
    pub location: String,
    pub found_date: String,
    pub description: String,
    pub masked_code: Option<String>,
    pub requires_code: bool,
    pub is_returned: bool,
}

/// Report form input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDraft {
    pub title: String,
    pub category: String,
    pub found_date: String,
    pub location: String,
    pub contact_email: String,
    pub phone: Option<String>,
    pub description: String,
    pub secret_code: Option<String>,
    pub image_url: Option<String>,
}

/// Partial edit from the dashboard. Codes and contact email are not editable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub found_date: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

impl ItemPatch {
    pub fn apply(self, item: &mut FoundItem) -> DomainResult<()> {
        if let Some(title) = self.title {
            item.title = required_text("title", title)?;
        }
        if let Some(category) = self.category {
            item.category = Category::from_str(category.trim());
        }
        if let Some(location) = self.location {
            item.location = required_text("location", location)?;
        }
        if let Some(date) = self.found_date {
            item.found_date = parse_date(date.trim())?;
        }
        if let Some(description) = self.description {
            item.description = required_text("description", description)?;
        }
        if let Some(phone) = self.phone {
            item.contact_phone = non_blank(Some(phone));
        }
        if let Some(image_url) = self.image_url {
            item.image_url = non_blank(Some(image_url));
        }
        Ok(())
    }
}

/// Dashboard counters for a reporter's items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_reported: usize,
    pub total_returned: usize,
    pub active_listings: usize,
}

impl DashboardStats {
    pub fn from_items(items: &[FoundItem]) -> Self {
        let total_returned = items.iter().filter(|i| i.is_returned).count();
        Self {
            total_reported: items.len(),
            total_returned,
            active_listings: items.len() - total_returned,
        }
    }
}

pub(crate) fn parse_date(s: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
        DomainError::InvalidInput(format!("'{}' is not a date (expected YYYY-MM-DD)", s))
    })
}

fn required_text(field: &str, value: String) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ItemDraft {
        ItemDraft {
            title: "Blue Backpack".to_string(),
            category: "Accessories".to_string(),
            found_date: "2024-03-01".to_string(),
            location: "Central Library".to_string(),
            contact_email: "finder@campus.edu".to_string(),
            phone: Some("+91 9876543210".to_string()),
            description: "Has a keychain".to_string(),
            secret_code: Some("SN12345678".to_string()),
            image_url: None,
        }
    }

    fn reporter() -> Identity {
        Identity::authenticated("uid-1", Some("finder@campus.edu"))
    }

    #[test]
    fn test_report_masks_code_once() {
        let item = FoundItem::from_draft(draft(), &reporter()).unwrap();
        assert_eq!(item.secret_code.as_deref(), Some("SN12345678"));
        assert_eq!(item.masked_code.as_deref(), Some("******5678"));
        assert_eq!(item.reported_by.as_deref(), Some("uid-1"));
        assert!(!item.is_returned);
    }

    #[test]
    fn test_empty_code_means_uncoded() {
        let mut d = draft();
        d.secret_code = Some(String::new());
        let item = FoundItem::from_draft(d, &reporter()).unwrap();
        assert!(!item.has_secret_code());
        assert!(item.masked_code.is_none());
    }

    #[test]
    fn test_whitespace_code_is_kept_verbatim() {
        let mut d = draft();
        d.secret_code = Some("    ".to_string());
        let item = FoundItem::from_draft(d, &reporter()).unwrap();
        assert!(item.has_secret_code());
        assert_eq!(item.secret_code.as_deref(), Some("    "));
        assert_eq!(item.masked_code.as_deref(), Some("    "));
        assert!(item.code_matches("    "));
        assert!(!item.code_matches(""));

        let mut d = draft();
        d.secret_code = Some(" SN1234 ".to_string());
        let item = FoundItem::from_draft(d, &reporter()).unwrap();
        assert_eq!(item.secret_code.as_deref(), Some(" SN1234 "));
    }

    #[test]
    fn test_missing_required_field() {
        let mut d = draft();
        d.location = String::new();
        let err = FoundItem::from_draft(d, &reporter()).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("Please fill in all required fields.".to_string())
        );
    }

    #[test]
    fn test_invalid_email_and_date() {
        let mut d = draft();
        d.contact_email = "not-an-email".to_string();
        assert!(matches!(
            FoundItem::from_draft(d, &reporter()),
            Err(DomainError::InvalidInput(_))
        ));

        let mut d = draft();
        d.found_date = "01/03/2024".to_string();
        assert!(matches!(
            FoundItem::from_draft(d, &reporter()),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_code_match_is_exact() {
        let item = FoundItem::from_draft(draft(), &reporter()).unwrap();
        assert!(item.code_matches("SN12345678"));
        assert!(!item.code_matches("sn12345678"));
        assert!(!item.code_matches(" SN12345678"));
        assert!(!item.code_matches(""));
    }

    #[test]
    fn test_secret_not_serialized() {
        let item = FoundItem::from_draft(draft(), &reporter()).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("secretCode").is_none());
        assert_eq!(json["maskedCode"], "******5678");
        assert_eq!(json["category"], "Accessories");
    }

    #[test]
    fn test_category_round_trip_and_fallback() {
        assert_eq!(Category::from_str("IDs & Cards"), Category::IdsAndCards);
        assert_eq!(Category::from_str("Other"), Category::Others);
        assert_eq!(Category::Keys.as_str(), "Keys");
    }

    #[test]
    fn test_management_by_contact_email() {
        let item = FoundItem::from_draft(draft(), &reporter()).unwrap();
        assert!(item.is_managed_by(&reporter()));
        assert!(!item.is_managed_by(&Identity::authenticated("uid-2", Some("x@campus.edu"))));
        assert!(!item.is_managed_by(&Identity::anonymous(Some("uid-1"))));
    }

    #[test]
    fn test_patch_keeps_codes() {
        let mut item = FoundItem::from_draft(draft(), &reporter()).unwrap();
        let patch = ItemPatch {
            title: Some("Black Backpack".to_string()),
            phone: Some(String::new()),
            ..Default::default()
        };
        patch.apply(&mut item).unwrap();
        assert_eq!(item.title, "Black Backpack");
        assert!(item.contact_phone.is_none());
        assert_eq!(item.masked_code.as_deref(), Some("******5678"));

        let blank = ItemPatch {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.apply(&mut item).is_err());
    }

    #[test]
    fn test_dashboard_stats() {
        let mut a = FoundItem::from_draft(draft(), &reporter()).unwrap();
        let b = a.clone();
        a.is_returned = true;
        let stats = DashboardStats::from_items(&[a, b]);
        assert_eq!(stats.total_reported, 2);
        assert_eq!(stats.total_returned, 1);
        assert_eq!(stats.active_listings, 1);
    }
}
