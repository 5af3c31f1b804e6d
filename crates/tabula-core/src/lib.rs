//! tabula-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Document, DocumentId, FileInfo, Sheet};
pub use error::{Result, TabulaError};
pub use storage::FileStore;

pub use tabula_engine::engine::{Cell, CellRef, EvalResult, Evaluated, evaluate_formula};
