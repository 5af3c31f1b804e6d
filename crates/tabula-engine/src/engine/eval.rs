//! Formula parsing and evaluation.
//!
//! The formula language is deliberately tiny: `SUM` over a range or a comma
//! list, `AVERAGE` over a range. Anything else falls back to the formula
//! body as text. Evaluation never fails: cells whose contents do not read
//! as numbers are skipped (and counted), unknown shapes degrade to text.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cell::Cells;
use super::cell_ref::CellRef;

/// The result of evaluating a formula: a numeric aggregate, or the formula
/// body itself when the shape was not recognized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvalResult {
    Number(f64),
    Text(String),
}

impl fmt::Display for EvalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalResult::Number(n) => write!(f, "{n}"),
            EvalResult::Text(s) => f.write_str(s),
        }
    }
}

/// Evaluation outcome plus how many visited cells were dropped because
/// their contents did not parse as a number.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluated {
    pub value: EvalResult,
    pub skipped: usize,
}

impl Evaluated {
    fn number(agg: &Aggregate, value: f64) -> Evaluated {
        Evaluated {
            value: EvalResult::Number(value),
            skipped: agg.skipped,
        }
    }

    fn text(body: &str) -> Evaluated {
        Evaluated {
            value: EvalResult::Text(body.to_string()),
            skipped: 0,
        }
    }
}

/// Evaluate a formula against a sheet's cells.
///
/// Accepts the body with or without its '=' prefix. The supported shapes
/// are `SUM(REF:REF)`, `SUM(REF,REF,...)` and `AVERAGE(REF:REF)`; the
/// comma-list form of AVERAGE is intentionally unsupported and falls
/// through to the text fallback, as does any other unrecognized input.
pub fn evaluate_formula(formula: &str, cells: &Cells) -> Evaluated {
    let body = formula.strip_prefix('=').unwrap_or(formula).trim();

    if let Some(inner) = strip_call(body, "SUM") {
        if inner.contains(':') {
            if let Some(rect) = parse_range(inner) {
                let agg = aggregate(rect, cells);
                return Evaluated::number(&agg, agg.sum);
            }
        } else {
            let agg = aggregate(parse_list(inner).into_iter(), cells);
            return Evaluated::number(&agg, agg.sum);
        }
    }

    if let Some(inner) = strip_call(body, "AVERAGE")
        && inner.contains(':')
        && let Some(rect) = parse_range(inner)
    {
        let agg = aggregate(rect, cells);
        // A range with no numeric cells averages to 0 rather than erroring.
        let mean = if agg.count > 0 {
            agg.sum / agg.count as f64
        } else {
            0.0
        };
        return Evaluated::number(&agg, mean);
    }

    Evaluated::text(body)
}

/// Match `NAME(<inner>)` where the closing parenthesis ends the body.
/// The keyword match is case-sensitive.
fn strip_call<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    body.strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Running numeric aggregate over visited cells.
struct Aggregate {
    sum: f64,
    count: usize,
    skipped: usize,
}

fn aggregate(refs: impl Iterator<Item = CellRef>, cells: &Cells) -> Aggregate {
    let mut agg = Aggregate {
        sum: 0.0,
        count: 0,
        skipped: 0,
    };
    for cell_ref in refs {
        let Some(text) = cells.get(&cell_ref).and_then(|c| c.numeric_source()) else {
            continue;
        };
        match text.trim().parse::<f64>() {
            Ok(n) => {
                agg.sum += n;
                agg.count += 1;
            }
            Err(_) => agg.skipped += 1,
        }
    }
    agg
}

/// Parse "REF:REF" into an iterator over the normalized rectangle: rows and
/// columns are min/max'd independently, so "B3:A1" covers the same cells as
/// "A1:B3". Returns None if either corner is not a valid reference.
fn parse_range(inner: &str) -> Option<impl Iterator<Item = CellRef>> {
    let (start, end) = inner.split_once(':')?;
    let start = CellRef::parse_a1(start.trim())?;
    let end = CellRef::parse_a1(end.trim())?;

    let (row_lo, row_hi) = (start.row.min(end.row), start.row.max(end.row));
    let (col_lo, col_hi) = (start.col.min(end.col), start.col.max(end.col));

    Some((row_lo..=row_hi).flat_map(move |row| (col_lo..=col_hi).map(move |col| CellRef::new(col, row))))
}

/// Parse a comma list of references, each trimmed. An entry that is not a
/// valid reference behaves like an absent cell and is dropped.
fn parse_list(inner: &str) -> Vec<CellRef> {
    inner
        .split(',')
        .filter_map(|part| CellRef::parse_a1(part.trim()))
        .collect()
}
