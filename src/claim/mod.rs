//! Claim Layer
//!
//! Code verification, reveal gating and the transient per-view sessions.

mod notice;
mod reveal;
mod session;
mod state;
mod store;

pub use notice::{Notice, NoticeKind, NoticeSink, WeakNoticeSink};
pub use reveal::{ClaimView, ContactBlock, MASKED_CODE_HINT, REJECTION_HINT, REPORTER_NOTICE};
pub use session::ClaimSession;
pub use state::{ClaimAction, ClaimError, ClaimState, ClaimWorkflow, Transition, Verification};
pub use store::ClaimSessionStore;
