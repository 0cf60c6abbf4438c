//! Reveal gating: what the detail view renders for each claim state

use serde::Serialize;

use super::notice::Notice;
use super::state::{ClaimState, ClaimWorkflow};
use crate::domain::{ItemDetail, NOT_PROVIDED};

pub const REPORTER_NOTICE: &str = "You reported this item. No need to enter the code.";
pub const REJECTION_HINT: &str = "It seems you couldn't verify the code, but you can still claim this item by contacting the owner via email.";
pub const MASKED_CODE_HINT: &str = "The owner must verify the full code to claim this item.";

/// Contact block shown once a claim or a code attempt has happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactBlock {
    pub email: String,
    /// `None` means the phone line is not rendered at all
    pub phone: Option<String>,
}

/// Everything the detail view needs to render the claim panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub item: ItemDetail,
    pub state: ClaimState,
    pub masked_code: Option<String>,
    pub masked_code_hint: Option<&'static str>,
    pub show_code_entry: bool,
    pub show_claim_button: bool,
    pub reporter_notice: Option<&'static str>,
    pub contact: Option<ContactBlock>,
    pub rejection_hint: Option<&'static str>,
    pub notices: Vec<Notice>,
}

impl ClaimView {
    pub fn render(workflow: &ClaimWorkflow, notices: Vec<Notice>) -> Self {
        let item = workflow.item();
        let state = workflow.state();

        // Masked code disappears as soon as anything has been attempted
        let masked_code = match state {
            ClaimState::Locked | ClaimState::ReporterBypass | ClaimState::AwaitingCode => {
                item.masked_code.clone()
            }
            _ => None,
        };

        let email = || {
            item.contact_email
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string())
        };
        let phone = || {
            item.contact_phone
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string())
        };

        // ReporterBypass keeps contacts hidden even though the reporter
        // already knows them; this mirrors long-standing behavior.
        let contact = match state {
            ClaimState::CodeAccepted | ClaimState::ClaimedNoCode => Some(ContactBlock {
                email: email(),
                phone: Some(phone()),
            }),
            ClaimState::CodeRejected => Some(ContactBlock {
                email: email(),
                phone: None,
            }),
            ClaimState::Locked | ClaimState::ReporterBypass | ClaimState::AwaitingCode => None,
        };

        Self {
            item: item.detail(),
            state,
            masked_code_hint: masked_code.as_ref().map(|_| MASKED_CODE_HINT),
            masked_code,
            show_code_entry: matches!(state, ClaimState::AwaitingCode | ClaimState::CodeRejected),
            show_claim_button: state == ClaimState::Locked,
            reporter_notice: (state == ClaimState::ReporterBypass).then_some(REPORTER_NOTICE),
            contact,
            rejection_hint: (state == ClaimState::CodeRejected).then_some(REJECTION_HINT),
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FoundItem, Identity, ItemDraft};

    fn item(code: Option<&str>, phone: Option<&str>) -> FoundItem {
        let draft = ItemDraft {
            title: "Laptop".to_string(),
            category: "Electronics".to_string(),
            found_date: "2024-03-01".to_string(),
            location: "Central Library".to_string(),
            contact_email: "a@x.com".to_string(),
            phone: phone.map(str::to_string),
            description: "Grey".to_string(),
            secret_code: code.map(str::to_string),
            image_url: None,
        };
        FoundItem::from_draft(draft, &Identity::authenticated("reporter", Some("a@x.com")))
            .unwrap()
    }

    fn viewer() -> Identity {
        Identity::anonymous(Some("anon-1"))
    }

    #[test]
    fn test_awaiting_code_hides_contacts() {
        let wf = ClaimWorkflow::mount(item(Some("SN12345678"), Some("555-1111")), &viewer());
        let view = ClaimView::render(&wf, vec![]);

        assert!(view.show_code_entry);
        assert!(!view.show_claim_button);
        assert_eq!(view.masked_code.as_deref(), Some("******5678"));
        assert_eq!(view.masked_code_hint, Some(MASKED_CODE_HINT));
        assert!(view.contact.is_none());
    }

    #[test]
    fn test_rejected_shows_email_only() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678"), Some("555-1111")), &viewer());
        wf.verify("5678").unwrap();
        let view = ClaimView::render(&wf, vec![]);

        assert_eq!(
            view.contact,
            Some(ContactBlock {
                email: "a@x.com".to_string(),
                phone: None,
            })
        );
        assert_eq!(view.rejection_hint, Some(REJECTION_HINT));
        assert!(view.masked_code.is_none());
        assert!(view.show_code_entry);
    }

    #[test]
    fn test_accepted_shows_both() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678"), Some("555-1111")), &viewer());
        wf.verify("SN12345678").unwrap();
        let view = ClaimView::render(&wf, vec![]);

        let contact = view.contact.unwrap();
        assert_eq!(contact.email, "a@x.com");
        assert_eq!(contact.phone.as_deref(), Some("555-1111"));
        assert!(!view.show_code_entry);
        assert!(view.rejection_hint.is_none());
    }

    #[test]
    fn test_uncoded_claim_shows_both_with_placeholder_phone() {
        let mut wf = ClaimWorkflow::mount(item(None, None), &viewer());
        let before = ClaimView::render(&wf, vec![]);
        assert!(before.show_claim_button);
        assert!(before.contact.is_none());
        assert!(before.masked_code.is_none());

        wf.claim().unwrap();
        let after = ClaimView::render(&wf, vec![]);
        let contact = after.contact.unwrap();
        assert_eq!(contact.email, "a@x.com");
        assert_eq!(contact.phone.as_deref(), Some(NOT_PROVIDED));
        assert!(!after.show_claim_button);
    }

    #[test]
    fn test_reporter_bypass_keeps_contacts_hidden() {
        let reporter = Identity::authenticated("reporter", Some("a@x.com"));
        let wf = ClaimWorkflow::mount(item(Some("SN12345678"), Some("555-1111")), &reporter);
        let view = ClaimView::render(&wf, vec![]);

        assert_eq!(view.state, ClaimState::ReporterBypass);
        assert_eq!(view.reporter_notice, Some(REPORTER_NOTICE));
        assert!(!view.show_code_entry);
        assert!(!view.show_claim_button);
        assert!(view.contact.is_none());
        assert_eq!(view.masked_code.as_deref(), Some("******5678"));
    }
}
