//! Claim session: the state a detail view holds between mount and
//! navigation away. Never persisted.

use std::time::Instant;
use tokio::task::JoinHandle;

use super::notice::{Notice, NoticeSink};
use super::reveal::ClaimView;
use super::state::{ClaimError, ClaimState, ClaimWorkflow, Transition};
use crate::domain::{FoundItem, Identity};
use crate::notify::{NotificationDispatcher, NotifyOutcome};

pub struct ClaimSession {
    workflow: ClaimWorkflow,
    notices: NoticeSink,
    last_seen: Instant,
    pending_notification: Option<JoinHandle<NotifyOutcome>>,
}

impl ClaimSession {
    pub fn open(item: FoundItem, viewer: &Identity) -> Self {
        Self {
            workflow: ClaimWorkflow::mount(item, viewer),
            notices: NoticeSink::default(),
            last_seen: Instant::now(),
            pending_notification: None,
        }
    }

    pub fn workflow(&self) -> &ClaimWorkflow {
        &self.workflow
    }

    pub fn last_seen(&self) -> Instant {
        self.last_seen
    }

    pub(super) fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Render the current state, handing over pending notices
    pub fn view(&mut self) -> ClaimView {
        self.touch();
        ClaimView::render(&self.workflow, self.notices.drain())
    }

    /// Submit a candidate code. On acceptance the reporter notification is
    /// launched in the background; the returned view does not wait for it.
    pub fn verify(
        &mut self,
        candidate: &str,
        dispatcher: &NotificationDispatcher,
    ) -> Result<ClaimView, ClaimError> {
        let transition = self.workflow.verify(candidate)?;
        self.after(transition, dispatcher);
        Ok(self.view())
    }

    pub fn claim(&mut self, dispatcher: &NotificationDispatcher) -> Result<ClaimView, ClaimError> {
        let transition = self.workflow.claim()?;
        self.after(transition, dispatcher);
        Ok(self.view())
    }

    /// Handle of the in-flight notification, if one was sent
    pub fn take_pending_notification(&mut self) -> Option<JoinHandle<NotifyOutcome>> {
        self.pending_notification.take()
    }

    fn after(&mut self, transition: Transition, dispatcher: &NotificationDispatcher) {
        match transition.to {
            ClaimState::CodeAccepted => self.notices.push(Notice::claim_successful()),
            ClaimState::CodeRejected => self.notices.push(Notice::verification_failed()),
            ClaimState::ClaimedNoCode => self.notices.push(Notice::item_claimed()),
            _ => {}
        }

        if let Some(email) = transition.notification {
            let sink = self.notices.downgrade();
            let handle = dispatcher.dispatch_detached(email, move |_| {
                if !sink.push(Notice::notification_failed()) {
                    log::debug!("Claim session closed before notification finished");
                }
            });
            self.pending_notification = Some(handle);
        }
    }
}
