//! Commands Layer
//!
//! Application operations that bridge the HTTP handlers to the layers below.

mod claim_cmd;
mod dashboard_cmd;
mod item_cmd;

pub use claim_cmd::*;
pub use dashboard_cmd::*;
pub use item_cmd::*;
