use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use tabula_engine::engine::Cells;

/// Opaque identity of a persisted document, stable across saves.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Mint a fresh id (done once, on a document's first save).
    pub fn new() -> DocumentId {
        DocumentId(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DocumentId(Uuid::parse_str(s)?))
    }
}

/// Layout metadata (column widths, row heights) that the core stores but
/// does not interpret. Round-trips through persistence untouched.
pub type LayoutMap = serde_json::Map<String, serde_json::Value>;

/// A single worksheet: stable id, mutable display name, sparse cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sheet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cells: Cells,
    #[serde(default)]
    pub columns: LayoutMap,
    #[serde(default)]
    pub rows: LayoutMap,
}

impl Sheet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Sheet {
        Sheet {
            id: id.into(),
            name: name.into(),
            cells: Cells::new(),
            columns: LayoutMap::new(),
            rows: LayoutMap::new(),
        }
    }
}

/// Identity and timestamps of a document's persisted counterpart.
#[derive(Clone, Debug)]
pub struct FileInfo {
    pub id: DocumentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) const FIRST_SHEET_ID: &str = "sheet1";
pub(crate) const FIRST_SHEET_NAME: &str = "Sheet1";

/// UI-agnostic document state for the spreadsheet.
///
/// A document is a plain value owned by the calling session; all
/// operations are synchronous and nothing here is shared across threads.
#[derive(Clone, Debug)]
pub struct Document {
    /// Sheets in tab order. Never empty: the last sheet cannot be removed.
    pub sheets: Vec<Sheet>,
    /// Id of the currently shown sheet; always present in `sheets`.
    pub active_sheet: String,
    /// Persisted identity, set on first save or on load.
    pub file: Option<FileInfo>,
    /// Whether content differs from the last persisted snapshot. View-state
    /// changes (switching the active sheet) do not set this.
    pub modified: bool,
}

impl Document {
    /// Create an empty document with one default sheet.
    pub fn new() -> Document {
        Document {
            sheets: vec![Sheet::new(FIRST_SHEET_ID, FIRST_SHEET_NAME)],
            active_sheet: FIRST_SHEET_ID.to_string(),
            file: None,
            modified: false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
