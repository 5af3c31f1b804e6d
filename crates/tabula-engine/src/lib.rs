//! tabula-engine - UI-agnostic spreadsheet computation primitives.

pub mod engine;

pub use engine::{Cell, CellRef, Cells, EvalResult, Evaluated, RefParseError, evaluate_formula};
