//! Viewer identity
//!
//! Resolved by the identity provider before a request reaches the workflow
//! and passed in explicitly.

/// Who is looking at a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No session, or an anonymous provider session (which still has a uid)
    Anonymous { uid: Option<String> },
    /// Signed-in account
    Authenticated { uid: String, email: Option<String> },
}

impl Default for Identity {
    fn default() -> Self {
        Identity::Anonymous { uid: None }
    }
}

impl Identity {
    pub fn anonymous(uid: Option<&str>) -> Self {
        Identity::Anonymous {
            uid: uid.map(str::to_string),
        }
    }

    pub fn authenticated(uid: &str, email: Option<&str>) -> Self {
        Identity::Authenticated {
            uid: uid.to_string(),
            email: email.map(str::to_string),
        }
    }

    pub fn uid(&self) -> Option<&str> {
        match self {
            Identity::Anonymous { uid } => uid.as_deref(),
            Identity::Authenticated { uid, .. } => Some(uid),
        }
    }

    /// Email of a signed-in account; anonymous sessions never have one
    pub fn email(&self) -> Option<&str> {
        match self {
            Identity::Anonymous { .. } => None,
            Identity::Authenticated { email, .. } => email.as_deref(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous { .. })
    }

    /// Whether this viewer created the item. A missing uid on either side
    /// never matches.
    pub fn is_reporter(&self, reported_by: Option<&str>) -> bool {
        match (self.uid(), reported_by) {
            (Some(viewer), Some(reporter)) => viewer == reporter,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_match() {
        let viewer = Identity::authenticated("u1", Some("a@x.com"));
        assert!(viewer.is_reporter(Some("u1")));
        assert!(!viewer.is_reporter(Some("u2")));
        assert!(!viewer.is_reporter(None));
    }

    #[test]
    fn test_anonymous_without_uid_is_never_reporter() {
        let viewer = Identity::default();
        assert!(viewer.is_anonymous());
        assert!(!viewer.is_reporter(None));
        assert!(!viewer.is_reporter(Some("")));
    }

    #[test]
    fn test_anonymous_session_keeps_uid_but_no_email() {
        let viewer = Identity::anonymous(Some("anon-7"));
        assert!(viewer.is_reporter(Some("anon-7")));
        assert_eq!(viewer.email(), None);
    }
}
