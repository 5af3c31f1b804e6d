//! On-disk record format.
//!
//! A record holds the full document: metadata, every sheet, every cell.
//! Cached formula values are written out but never trusted on the way back
//! in; the loader re-evaluates everything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentId, FileInfo, Sheet};

/// Fixed owner id; multi-user ownership is outside this core.
pub(crate) const DEFAULT_USER_ID: i64 = 1;

/// Sheet collection plus active-sheet pointer, as persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    pub active_sheet: String,
    pub sheets: Vec<Sheet>,
}

/// One persisted document, addressed by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: DocumentId,
    pub name: String,
    pub data: SheetData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: i64,
}

impl FileRecord {
    /// Snapshot a document under the given identity.
    pub(crate) fn snapshot(
        document: &Document,
        id: DocumentId,
        name: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> FileRecord {
        FileRecord {
            id,
            name: name.to_string(),
            data: SheetData {
                active_sheet: document.active_sheet.clone(),
                sheets: document.sheets.clone(),
            },
            created_at,
            updated_at,
            user_id: DEFAULT_USER_ID,
        }
    }

    /// Rebuild an in-memory document from this record, checking the
    /// document invariants the rest of the core relies on. The caller
    /// still re-evaluates all formulas afterwards.
    pub(crate) fn into_document(self) -> Result<Document, String> {
        let FileRecord {
            id,
            name,
            data,
            created_at,
            updated_at,
            ..
        } = self;

        if data.sheets.is_empty() {
            return Err("record contains no sheets".to_string());
        }
        if !data.sheets.iter().any(|s| s.id == data.active_sheet) {
            return Err(format!(
                "active sheet {:?} is not among the record's sheets",
                data.active_sheet
            ));
        }

        Ok(Document {
            sheets: data.sheets,
            active_sheet: data.active_sheet,
            file: Some(FileInfo {
                id,
                name,
                created_at,
                updated_at,
            }),
            modified: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_engine::engine::CellRef;

    fn record_for(document: &Document) -> FileRecord {
        let now = Utc::now();
        FileRecord::snapshot(document, DocumentId::new(), "Test", now, now)
    }

    #[test]
    fn test_record_json_shape() {
        let mut doc = Document::new();
        doc.set_cell_from_input("sheet1", CellRef::parse_a1("A1").unwrap(), "5")
            .unwrap();
        let record = record_for(&doc);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["userId"], 1);
        assert_eq!(json["data"]["activeSheet"], "sheet1");
        assert_eq!(json["data"]["sheets"][0]["id"], "sheet1");
        assert_eq!(json["data"]["sheets"][0]["cells"]["A1"]["value"], "5");
        assert_eq!(json["data"]["sheets"][0]["columns"], serde_json::json!({}));
        assert_eq!(json["data"]["sheets"][0]["rows"], serde_json::json!({}));
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }

    #[test]
    fn test_record_with_no_sheets_is_rejected() {
        let mut record = record_for(&Document::new());
        record.data.sheets.clear();
        assert!(record.into_document().is_err());
    }

    #[test]
    fn test_record_with_dangling_active_sheet_is_rejected() {
        let mut record = record_for(&Document::new());
        record.data.active_sheet = "sheet9".to_string();
        assert!(record.into_document().is_err());
    }

    #[test]
    fn test_into_document_clears_dirty_and_sets_identity() {
        let record = record_for(&Document::new());
        let id = record.id;
        let doc = record.into_document().unwrap();
        assert!(!doc.modified);
        let file = doc.file.expect("loaded documents carry their identity");
        assert_eq!(file.id, id);
        assert_eq!(file.name, "Test");
    }
}
