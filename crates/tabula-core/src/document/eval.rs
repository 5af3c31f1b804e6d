//! Sheet re-evaluation.
//!
//! There is no dependency tracking: any content edit recomputes every
//! formula cell in the affected sheet, and a load recomputes every sheet.
//! O(cells) per edit, and cached values can never go stale.

use tabula_engine::engine::{Cell, evaluate_formula};

use super::state::{Document, Sheet};
use crate::error::Result;

impl Document {
    /// Recompute cached values for every formula cell in one sheet.
    pub fn evaluate_sheet(&mut self, sheet_id: &str) -> Result<()> {
        evaluate_cells(self.sheet_mut(sheet_id)?);
        Ok(())
    }

    /// Recompute cached values across all sheets (used after load, when
    /// persisted caches are not trusted).
    pub fn evaluate_all(&mut self) {
        for sheet in &mut self.sheets {
            evaluate_cells(sheet);
        }
    }
}

/// Two passes: evaluate against a stable view of the sheet, then write the
/// caches back. Aggregation only reads literal cells, so the write-back
/// cannot change an earlier result.
fn evaluate_cells(sheet: &mut Sheet) {
    let results: Vec<_> = sheet
        .cells
        .iter()
        .filter_map(|(cell_ref, cell)| match cell {
            Cell::Formula { text, .. } => {
                Some((*cell_ref, evaluate_formula(text, &sheet.cells).value))
            }
            _ => None,
        })
        .collect();

    for (cell_ref, value) in results {
        if let Some(Cell::Formula { cached, .. }) = sheet.cells.get_mut(&cell_ref) {
            *cached = Some(value);
        }
    }
}
