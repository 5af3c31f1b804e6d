//! Cell content model.
//!
//! A cell is either a literal the user typed or a formula with an optional
//! cached evaluation result; the two are mutually exclusive by construction.
//! A reference absent from a sheet's map is an empty cell.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell_ref::CellRef;
use super::eval::EvalResult;

/// Prefix that marks cell input as a formula.
pub const FORMULA_PREFIX: char = '=';

/// Content stored in a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "CellRecord", from = "CellRecord")]
pub enum Cell {
    Empty,
    Literal(String),
    /// Formula body without the leading '='. `cached` holds the last
    /// evaluation result; it is refreshed on every content edit in the
    /// sheet and recomputed after every load.
    Formula {
        text: String,
        cached: Option<EvalResult>,
    },
}

impl Cell {
    /// Parse user input into cell content.
    /// - Empty or whitespace-only input -> Empty
    /// - Leading '=' -> Formula (prefix stripped, not yet evaluated)
    /// - Anything else -> Literal
    pub fn from_input(input: &str) -> Cell {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if let Some(body) = trimmed.strip_prefix(FORMULA_PREFIX) {
            return Cell::Formula {
                text: body.to_string(),
                cached: None,
            };
        }

        Cell::Literal(trimmed.to_string())
    }

    /// The string the grid shows for this cell.
    ///
    /// A formula cell without a cached result (not yet evaluated, or its
    /// shape was unrecognized at entry) degrades to showing the formula
    /// itself rather than failing.
    pub fn display_value(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Literal(text) => text.clone(),
            Cell::Formula {
                cached: Some(result),
                ..
            } => result.to_string(),
            Cell::Formula { text, cached: None } => format!("{FORMULA_PREFIX}{text}"),
        }
    }

    /// The editable input form (what the user originally typed).
    pub fn to_input_string(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Literal(text) => text.clone(),
            Cell::Formula { text, .. } => format!("{FORMULA_PREFIX}{text}"),
        }
    }

    /// Literal text usable as aggregation input, if any. Formula and empty
    /// cells never feed aggregates, nor do empty-string literals.
    pub(crate) fn numeric_source(&self) -> Option<&str> {
        match self {
            Cell::Literal(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Sparse cell storage for one sheet, keyed by reference.
pub type Cells = BTreeMap<CellRef, Cell>;

/// Wire form of a cell: loosely-typed optional fields, with the formula
/// persisted including its '=' prefix. A record carrying both `value` and
/// `formula` reads back as a formula cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_value: Option<EvalResult>,
}

impl From<Cell> for CellRecord {
    fn from(cell: Cell) -> CellRecord {
        match cell {
            Cell::Empty => CellRecord {
                value: None,
                formula: None,
                cached_value: None,
            },
            Cell::Literal(text) => CellRecord {
                value: Some(text),
                formula: None,
                cached_value: None,
            },
            Cell::Formula { text, cached } => CellRecord {
                value: None,
                formula: Some(format!("{FORMULA_PREFIX}{text}")),
                cached_value: cached,
            },
        }
    }
}

impl From<CellRecord> for Cell {
    fn from(record: CellRecord) -> Cell {
        if let Some(formula) = record.formula {
            let text = formula
                .strip_prefix(FORMULA_PREFIX)
                .unwrap_or(&formula)
                .to_string();
            return Cell::Formula {
                text,
                cached: record.cached_value,
            };
        }
        match record.value {
            Some(text) => Cell::Literal(text),
            None => Cell::Empty,
        }
    }
}
