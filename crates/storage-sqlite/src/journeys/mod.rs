//! SQLite storage implementation for work-journal entries.

mod model;
mod repository;

pub use model::{JournalEntryChangeset, JournalEntryDB};
pub use repository::JourneyRepository;
