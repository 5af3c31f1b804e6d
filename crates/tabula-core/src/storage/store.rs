//! File-backed document store.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::record::FileRecord;
use crate::document::{Document, DocumentId, FileInfo};
use crate::error::{Result, TabulaError};

/// Stores one JSON record per document under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<FileStore> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &DocumentId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Persist the document under `name`.
    ///
    /// The first save mints the document's id; later saves reuse it and
    /// keep the original creation timestamp. The record is written to a
    /// temporary file and renamed into place, so a failed save never
    /// leaves a partial record visible. The in-memory document (including
    /// its dirty flag) is only updated after the write succeeds.
    pub fn save(&self, document: &mut Document, name: &str) -> Result<DocumentId> {
        let id = document
            .file
            .as_ref()
            .map(|f| f.id)
            .unwrap_or_else(DocumentId::new);
        let created_at = document
            .file
            .as_ref()
            .map(|f| f.created_at)
            .unwrap_or_else(Utc::now);
        let updated_at = Utc::now();

        let record = FileRecord::snapshot(document, id, name, created_at, updated_at);
        let json = serde_json::to_string(&record).map_err(TabulaError::Encode)?;

        let path = self.record_path(&id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        document.file = Some(FileInfo {
            id,
            name: name.to_string(),
            created_at,
            updated_at,
        });
        document.modified = false;
        Ok(id)
    }

    /// Load a document by id, replacing whatever the caller held in memory.
    ///
    /// Every formula cell in every sheet is re-evaluated; cached values
    /// from the record are never trusted verbatim. The returned document
    /// is not dirty.
    pub fn load(&self, id: &DocumentId) -> Result<Document> {
        let path = self.record_path(id);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(TabulaError::DocumentNotFound(*id));
            }
            Err(err) => return Err(err.into()),
        };

        let record: FileRecord =
            serde_json::from_str(&json).map_err(|err| TabulaError::CorruptRecord {
                path: path.clone(),
                message: err.to_string(),
            })?;
        let mut document = record
            .into_document()
            .map_err(|message| TabulaError::CorruptRecord { path, message })?;

        document.evaluate_all();
        Ok(document)
    }

    /// Enumerate persisted documents as (id, display name) pairs, sorted
    /// by name.
    ///
    /// A record that fails to read or parse is skipped with a warning so
    /// one bad file cannot hide the rest.
    pub fn list(&self) -> Result<Vec<(DocumentId, String)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path) {
                Ok(record) => entries.push((record.id, record.name)),
                Err(err) => log::warn!("Skipping unreadable record {path:?}: {err}"),
            }
        }
        entries.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(entries)
    }
}

fn read_record(path: &Path) -> Result<FileRecord> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|err| TabulaError::CorruptRecord {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
