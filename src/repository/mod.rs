//! Repository Layer
//!
//! Data access abstractions and the SQLite implementation.

mod db;
mod item_repo;
mod traits;


pub use db::{init_db, DbState};
pub use item_repo::ItemRepository;
pub use traits::{Repository, SearchableRepository};
