//! Spreadsheet engine API.
//!
//! This module provides the computation side of the spreadsheet:
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`Cell`], [`Cells`] - Cell content model and sparse sheet storage
//! - [`evaluate_formula`] - Formula evaluation against a sheet's cells

mod cell;
mod cell_ref;
mod eval;

pub use cell::{Cell, CellRecord, Cells, FORMULA_PREFIX};
pub use cell_ref::{CellRef, RefParseError};
pub use eval::{EvalResult, Evaluated, evaluate_formula};
