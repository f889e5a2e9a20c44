//! Progress Persistence
//!
//! A single persisted record: the index of the next landmark to activate
//! plus the region currently confirmed active. Progress only counts once
//! it is durable; an unsaved advance is treated as never having happened.

mod errors;
mod memory;
mod state;
mod store;

pub use errors::{ProgressError, ProgressResult};
pub use memory::MemoryProgressStore;
pub use state::ProgressState;
pub use store::{FileProgressStore, ProgressStore};
