use tabula_engine::engine::{Cell, CellRef};

use super::state::{Document, Sheet};
use crate::error::{Result, TabulaError};

impl Document {
    /// Look up a sheet by id.
    pub fn sheet(&self, sheet_id: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == sheet_id)
    }

    pub(crate) fn require_sheet(&self, sheet_id: &str) -> Result<&Sheet> {
        self.sheet(sheet_id)
            .ok_or_else(|| TabulaError::SheetNotFound(sheet_id.to_string()))
    }

    pub(crate) fn sheet_mut(&mut self, sheet_id: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.id == sheet_id)
            .ok_or_else(|| TabulaError::SheetNotFound(sheet_id.to_string()))
    }

    /// Get a cell's content. `None` means the cell is empty.
    pub fn get_cell(&self, sheet_id: &str, cell_ref: &CellRef) -> Result<Option<&Cell>> {
        Ok(self.require_sheet(sheet_id)?.cells.get(cell_ref))
    }

    /// The string the grid shows for a cell. Empty cells render as "".
    pub fn display_value(&self, sheet_id: &str, cell_ref: &CellRef) -> Result<String> {
        let sheet = self.require_sheet(sheet_id)?;
        Ok(sheet
            .cells
            .get(cell_ref)
            .map(Cell::display_value)
            .unwrap_or_default())
    }

    /// Set cell contents from input text.
    ///
    /// A leading '=' makes the cell a formula, anything else a literal, and
    /// empty input clears the cell. The previous content is replaced
    /// wholesale, so a cell never holds a literal and a formula at once.
    /// Every formula cell in the sheet is then re-evaluated: there is no
    /// dependency graph, correctness comes from recomputing the whole sheet.
    pub fn set_cell_from_input(
        &mut self,
        sheet_id: &str,
        cell_ref: CellRef,
        input: &str,
    ) -> Result<()> {
        let sheet = self.sheet_mut(sheet_id)?;
        match Cell::from_input(input) {
            Cell::Empty => {
                sheet.cells.remove(&cell_ref);
            }
            cell => {
                sheet.cells.insert(cell_ref, cell);
            }
        }
        self.modified = true;
        self.evaluate_sheet(sheet_id)
    }

    /// Append a new sheet, make it active, and return its id.
    pub fn add_sheet(&mut self) -> String {
        // Sequential numbering, skipping any id that survived a removal.
        let mut n = self.sheets.len() + 1;
        while self.sheets.iter().any(|s| s.id == format!("sheet{n}")) {
            n += 1;
        }
        let id = format!("sheet{n}");
        self.sheets.push(Sheet::new(id.clone(), format!("Sheet{n}")));
        self.active_sheet = id.clone();
        self.modified = true;
        id
    }

    /// Remove a sheet. Removing the last remaining sheet is a no-op.
    /// If the removed sheet was active, the first remaining sheet becomes
    /// active.
    pub fn remove_sheet(&mut self, sheet_id: &str) -> Result<()> {
        self.require_sheet(sheet_id)?;
        if self.sheets.len() <= 1 {
            return Ok(());
        }
        self.sheets.retain(|s| s.id != sheet_id);
        if self.active_sheet == sheet_id {
            self.active_sheet = self.sheets[0].id.clone();
        }
        self.modified = true;
        Ok(())
    }

    /// Rename a sheet. Display name only; the id stays stable.
    pub fn rename_sheet(&mut self, sheet_id: &str, name: &str) -> Result<()> {
        self.sheet_mut(sheet_id)?.name = name.to_string();
        self.modified = true;
        Ok(())
    }

    /// Switch the active sheet. View state only: does not mark the document
    /// dirty.
    pub fn set_active_sheet(&mut self, sheet_id: &str) -> Result<()> {
        self.require_sheet(sheet_id)?;
        self.active_sheet = sheet_id.to_string();
        Ok(())
    }

    /// Sheet (id, name) pairs in tab order.
    pub fn list_sheets(&self) -> Vec<(&str, &str)> {
        self.sheets
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect()
    }

    pub fn active_sheet_id(&self) -> &str {
        &self.active_sheet
    }

    pub fn is_dirty(&self) -> bool {
        self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_engine::engine::EvalResult;

    fn a1() -> CellRef {
        CellRef::parse_a1("A1").unwrap()
    }

    #[test]
    fn test_set_cell_literal_and_display() {
        let mut doc = Document::new();
        doc.set_cell_from_input("sheet1", a1(), "42").unwrap();
        assert_eq!(doc.display_value("sheet1", &a1()).unwrap(), "42");
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_empty_input_clears_cell() {
        let mut doc = Document::new();
        doc.set_cell_from_input("sheet1", a1(), "42").unwrap();
        doc.set_cell_from_input("sheet1", a1(), "  ").unwrap();
        assert_eq!(doc.get_cell("sheet1", &a1()).unwrap(), None);
        assert_eq!(doc.display_value("sheet1", &a1()).unwrap(), "");
    }

    #[test]
    fn test_absent_cell_displays_empty() {
        let doc = Document::new();
        assert_eq!(doc.display_value("sheet1", &a1()).unwrap(), "");
    }

    #[test]
    fn test_unknown_sheet_is_an_error() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.set_cell_from_input("nope", a1(), "1"),
            Err(TabulaError::SheetNotFound(_))
        ));
        assert!(matches!(
            doc.display_value("nope", &a1()),
            Err(TabulaError::SheetNotFound(_))
        ));
        assert!(matches!(
            doc.set_active_sheet("nope"),
            Err(TabulaError::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_formula_replaces_literal_and_vice_versa() {
        let mut doc = Document::new();
        let b1 = CellRef::parse_a1("B1").unwrap();
        doc.set_cell_from_input("sheet1", b1, "5").unwrap();

        doc.set_cell_from_input("sheet1", b1, "=SUM(A1:A1)").unwrap();
        match doc.get_cell("sheet1", &b1).unwrap() {
            Some(Cell::Formula { text, .. }) => assert_eq!(text, "SUM(A1:A1)"),
            other => panic!("expected formula cell, got {other:?}"),
        }
        // No literal survives the switch; the display reflects only the
        // freshly evaluated formula.
        assert_eq!(doc.display_value("sheet1", &b1).unwrap(), "0");

        doc.set_cell_from_input("sheet1", b1, "7").unwrap();
        assert_eq!(
            doc.get_cell("sheet1", &b1).unwrap(),
            Some(&Cell::Literal("7".to_string()))
        );
        assert_eq!(doc.display_value("sheet1", &b1).unwrap(), "7");
    }

    #[test]
    fn test_edit_reevaluates_other_formula_cells() {
        let mut doc = Document::new();
        let b1 = CellRef::parse_a1("B1").unwrap();
        doc.set_cell_from_input("sheet1", b1, "=SUM(A1:A2)").unwrap();
        assert_eq!(doc.display_value("sheet1", &b1).unwrap(), "0");

        doc.set_cell_from_input("sheet1", a1(), "3").unwrap();
        assert_eq!(doc.display_value("sheet1", &b1).unwrap(), "3");

        doc.set_cell_from_input("sheet1", CellRef::parse_a1("A2").unwrap(), "4")
            .unwrap();
        assert_eq!(doc.display_value("sheet1", &b1).unwrap(), "7");
    }

    #[test]
    fn test_unrecognized_formula_displays_its_body() {
        let mut doc = Document::new();
        doc.set_cell_from_input("sheet1", a1(), "=WHAT(A1)").unwrap();
        assert_eq!(doc.display_value("sheet1", &a1()).unwrap(), "WHAT(A1)");
        match doc.get_cell("sheet1", &a1()).unwrap() {
            Some(Cell::Formula { cached, .. }) => {
                assert_eq!(cached, &Some(EvalResult::Text("WHAT(A1)".to_string())));
            }
            other => panic!("expected formula cell, got {other:?}"),
        }
    }

    #[test]
    fn test_add_sheet_becomes_active_and_dirties() {
        let mut doc = Document::new();
        let id = doc.add_sheet();
        assert_eq!(id, "sheet2");
        assert_eq!(doc.active_sheet_id(), "sheet2");
        assert!(doc.is_dirty());
        assert_eq!(
            doc.list_sheets(),
            vec![("sheet1", "Sheet1"), ("sheet2", "Sheet2")]
        );
    }

    #[test]
    fn test_add_sheet_never_reuses_a_surviving_id() {
        let mut doc = Document::new();
        doc.add_sheet(); // sheet2
        doc.add_sheet(); // sheet3
        doc.remove_sheet("sheet2").unwrap();
        let id = doc.add_sheet();
        assert_ne!(id, "sheet3");
        assert_eq!(id, "sheet4");
    }

    #[test]
    fn test_remove_last_sheet_is_a_noop() {
        let mut doc = Document::new();
        doc.remove_sheet("sheet1").unwrap();
        assert_eq!(doc.sheets.len(), 1);
        assert_eq!(doc.active_sheet_id(), "sheet1");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_remove_active_sheet_activates_first() {
        let mut doc = Document::new();
        doc.add_sheet();
        assert_eq!(doc.active_sheet_id(), "sheet2");
        doc.remove_sheet("sheet2").unwrap();
        assert_eq!(doc.active_sheet_id(), "sheet1");
        assert_eq!(doc.sheets.len(), 1);
    }

    #[test]
    fn test_rename_sheet_keeps_id() {
        let mut doc = Document::new();
        doc.rename_sheet("sheet1", "Budget").unwrap();
        assert_eq!(doc.list_sheets(), vec![("sheet1", "Budget")]);
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_set_active_sheet_does_not_dirty() {
        let mut doc = Document::new();
        doc.add_sheet();
        doc.modified = false;
        doc.set_active_sheet("sheet1").unwrap();
        assert_eq!(doc.active_sheet_id(), "sheet1");
        assert!(!doc.is_dirty());
    }
}
