//! Claim verification state machine
//!
//! One `ClaimWorkflow` per detail-view mount. It decides which contact
//! fields a viewer may see and emits the reporter notification exactly once,
//! on the transition into `CodeAccepted`. Dispatching that notification is
//! the caller's job.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{FoundItem, Identity};
use crate::notify::ClaimEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClaimState {
    /// Initial; stays here for uncoded items until the viewer claims
    Locked,
    /// Viewer reported the item; no code entry, contacts stay hidden
    ReporterBypass,
    AwaitingCode,
    /// Wrong code; email shown, phone hidden, retries allowed
    CodeRejected,
    CodeAccepted,
    ClaimedNoCode,
}

impl ClaimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimState::Locked => "locked",
            ClaimState::ReporterBypass => "reporterBypass",
            ClaimState::AwaitingCode => "awaitingCode",
            ClaimState::CodeRejected => "codeRejected",
            ClaimState::CodeAccepted => "codeAccepted",
            ClaimState::ClaimedNoCode => "claimedNoCode",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimState::ReporterBypass | ClaimState::CodeAccepted | ClaimState::ClaimedNoCode
        )
    }
}

impl std::fmt::Display for ClaimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimAction {
    VerifyCode,
    Claim,
}

impl std::fmt::Display for ClaimAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimAction::VerifyCode => f.write_str("verify a code"),
            ClaimAction::Claim => f.write_str("claim without a code"),
        }
    }
}

/// Result of the last code comparison in this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verification {
    #[default]
    NotAttempted,
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("cannot {action} while the claim is {state}")]
    InvalidTransition {
        state: ClaimState,
        action: ClaimAction,
    },
}

/// What a user action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: ClaimState,
    pub to: ClaimState,
    /// Set only when entering `CodeAccepted`
    pub notification: Option<ClaimEmail>,
}

pub struct ClaimWorkflow {
    item: FoundItem,
    state: ClaimState,
    candidate_code: String,
    verification: Verification,
}

impl ClaimWorkflow {
    /// Mount the workflow for `viewer` looking at `item`.
    ///
    /// Coded items move straight to `ReporterBypass` or `AwaitingCode`;
    /// uncoded items stay `Locked`.
    pub fn mount(item: FoundItem, viewer: &Identity) -> Self {
        let state = if !item.has_secret_code() {
            ClaimState::Locked
        } else if viewer.is_reporter(item.reported_by.as_deref()) {
            ClaimState::ReporterBypass
        } else {
            ClaimState::AwaitingCode
        };

        log::debug!("Claim workflow for item {} mounted in {}", item.id, state);
        Self {
            item,
            state,
            candidate_code: String::new(),
            verification: Verification::NotAttempted,
        }
    }

    pub fn state(&self) -> ClaimState {
        self.state
    }

    pub fn item(&self) -> &FoundItem {
        &self.item
    }

    pub fn candidate_code(&self) -> &str {
        &self.candidate_code
    }

    pub fn verification(&self) -> Verification {
        self.verification
    }

    pub fn verification_attempted(&self) -> bool {
        self.verification != Verification::NotAttempted
    }

    /// Compare `candidate` with the stored code.
    ///
    /// Allowed from `AwaitingCode` and, any number of times, from
    /// `CodeRejected`. Equality is exact: no trimming, case-sensitive.
    pub fn verify(&mut self, candidate: impl Into<String>) -> Result<Transition, ClaimError> {
        if !matches!(self.state, ClaimState::AwaitingCode | ClaimState::CodeRejected) {
            return Err(ClaimError::InvalidTransition {
                state: self.state,
                action: ClaimAction::VerifyCode,
            });
        }

        self.candidate_code = candidate.into();
        let from = self.state;

        if self.item.code_matches(&self.candidate_code) {
            self.state = ClaimState::CodeAccepted;
            self.verification = Verification::Succeeded;
            log::info!("Claim code verified for item {}", self.item.id);
            Ok(Transition {
                from,
                to: self.state,
                notification: Some(ClaimEmail {
                    to_email: self.item.contact_email.clone().unwrap_or_default(),
                    item_title: self.item.title.clone(),
                }),
            })
        } else {
            self.state = ClaimState::CodeRejected;
            self.verification = Verification::Failed;
            log::info!("Claim code rejected for item {}", self.item.id);
            Ok(Transition {
                from,
                to: self.state,
                notification: None,
            })
        }
    }

    /// Claim an uncoded item. Reveals every contact field with no check.
    pub fn claim(&mut self) -> Result<Transition, ClaimError> {
        if self.state != ClaimState::Locked || self.item.has_secret_code() {
            return Err(ClaimError::InvalidTransition {
                state: self.state,
                action: ClaimAction::Claim,
            });
        }

        self.state = ClaimState::ClaimedNoCode;
        log::info!("Item {} claimed without a code", self.item.id);
        Ok(Transition {
            from: ClaimState::Locked,
            to: self.state,
            notification: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemDraft;

    fn item(code: Option<&str>) -> FoundItem {
        let draft = ItemDraft {
            title: "Laptop".to_string(),
            category: "Electronics".to_string(),
            found_date: "2024-03-01".to_string(),
            location: "Central Library".to_string(),
            contact_email: "a@x.com".to_string(),
            phone: Some("555-1111".to_string()),
            description: "Grey, with stickers".to_string(),
            secret_code: code.map(str::to_string),
            image_url: None,
        };
        let mut item =
            FoundItem::from_draft(draft, &Identity::authenticated("reporter", Some("a@x.com")))
                .unwrap();
        item.id = 7;
        item
    }

    fn stranger() -> Identity {
        Identity::authenticated("someone-else", Some("b@x.com"))
    }

    #[test]
    fn test_mount_states() {
        let coded = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());
        assert_eq!(coded.state(), ClaimState::AwaitingCode);

        let reporter = Identity::authenticated("reporter", Some("a@x.com"));
        let bypass = ClaimWorkflow::mount(item(Some("SN12345678")), &reporter);
        assert_eq!(bypass.state(), ClaimState::ReporterBypass);

        let uncoded = ClaimWorkflow::mount(item(None), &reporter);
        assert_eq!(uncoded.state(), ClaimState::Locked);

        let anonymous = ClaimWorkflow::mount(item(Some("SN12345678")), &Identity::default());
        assert_eq!(anonymous.state(), ClaimState::AwaitingCode);
    }

    #[test]
    fn test_correct_code_accepts_and_emits_one_notification() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());

        let t = wf.verify("SN12345678").unwrap();
        assert_eq!(t.from, ClaimState::AwaitingCode);
        assert_eq!(t.to, ClaimState::CodeAccepted);
        assert_eq!(
            t.notification,
            Some(ClaimEmail {
                to_email: "a@x.com".to_string(),
                item_title: "Laptop".to_string(),
            })
        );
        assert_eq!(wf.verification(), Verification::Succeeded);

        // Terminal: a second verification is refused, so no second email
        assert_eq!(
            wf.verify("SN12345678"),
            Err(ClaimError::InvalidTransition {
                state: ClaimState::CodeAccepted,
                action: ClaimAction::VerifyCode,
            })
        );
    }

    #[test]
    fn test_wrong_code_rejects_and_allows_retry() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());

        let t = wf.verify("5678").unwrap();
        assert_eq!(t.to, ClaimState::CodeRejected);
        assert!(t.notification.is_none());
        assert_eq!(wf.verification(), Verification::Failed);
        assert_eq!(wf.candidate_code(), "5678");

        let t = wf.verify("sn12345678").unwrap();
        assert_eq!(t.from, ClaimState::CodeRejected);
        assert_eq!(t.to, ClaimState::CodeRejected);

        let t = wf.verify("SN12345678").unwrap();
        assert_eq!(t.to, ClaimState::CodeAccepted);
        assert!(t.notification.is_some());
    }

    #[test]
    fn test_empty_candidate_is_compared_literally() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());
        assert_eq!(wf.verify("").unwrap().to, ClaimState::CodeRejected);
        assert!(wf.verification_attempted());
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());
        assert_eq!(wf.verify("SN12345678 ").unwrap().to, ClaimState::CodeRejected);
    }

    #[test]
    fn test_claim_uncoded_item() {
        let mut wf = ClaimWorkflow::mount(item(None), &stranger());
        let t = wf.claim().unwrap();
        assert_eq!(t.to, ClaimState::ClaimedNoCode);
        assert!(t.notification.is_none());

        assert!(wf.claim().is_err());
        assert!(wf.verify("anything").is_err());
    }

    #[test]
    fn test_claim_refused_for_coded_item() {
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &stranger());
        assert_eq!(
            wf.claim(),
            Err(ClaimError::InvalidTransition {
                state: ClaimState::AwaitingCode,
                action: ClaimAction::Claim,
            })
        );
    }

    #[test]
    fn test_reporter_bypass_is_terminal() {
        let reporter = Identity::authenticated("reporter", Some("a@x.com"));
        let mut wf = ClaimWorkflow::mount(item(Some("SN12345678")), &reporter);
        assert!(wf.state().is_terminal());
        assert!(wf.verify("SN12345678").is_err());
        assert!(wf.claim().is_err());
    }
}
