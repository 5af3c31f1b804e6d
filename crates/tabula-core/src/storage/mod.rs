//! Persistence: one JSON record per document in a data directory.

mod record;
mod store;

pub use record::{FileRecord, SheetData};
pub use store::FileStore;
