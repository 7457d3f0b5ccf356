//! Flattens a unit store into CSV rows for spreadsheet review.
//!
//! The blind variant randomizes which translation slot lands in which column
//! per row and returns the applied mapping, so a reviewer's verdicts can be
//! de-blinded afterwards. Also hosts the compact `"source"="target"` text
//! export, which shares the same flattening.

use std::io::Write;

use color_eyre::eyre::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use xliffkit_core::{TransUnit, UnitStore, TARGET_SLOT};

/// Reserved slot name rendering the unit id.
pub const ID_SLOT: &str = "id";
/// Reserved slot name rendering the original-language text.
pub const SOURCE_SLOT: &str = "source";

/// One output column: a header label and the slot it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    pub slot: String,
}

impl Column {
    pub fn new(header: impl Into<String>, slot: impl Into<String>) -> Self {
        Column { header: header.into(), slot: slot.into() }
    }
}

fn cell(unit: &TransUnit, slot: &str) -> String {
    match slot {
        ID_SLOT => unit.id.clone(),
        SOURCE_SLOT => unit.source.clone().unwrap_or_default(),
        other => unit.slot(other).unwrap_or_default().to_string(),
    }
}

/// One row per unit, groups in path order, columns in caller order; absent
/// values render as empty strings.
pub fn to_rows(store: &UnitStore, columns: &[Column]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(store.total_units());
    for group in store.groups() {
        for unit in group.units() {
            rows.push(columns.iter().map(|c| cell(unit, &c.slot)).collect());
        }
    }
    rows
}

pub fn write_csv<W: Write>(writer: W, store: &UnitStore, columns: &[Column]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.header.as_str()))?;
    for row in to_rows(store, columns) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn escape_flat(text: &str) -> String {
    text.replace('\n', "\\n").replace('"', "\\\"")
}

/// Compact `"source"="target"` export, pairs joined by semicolons, for
/// pasting a document's strings into a prompt. Only the first `limit` units
/// in store order are considered; units missing either text are skipped.
/// Returns the number of pairs written.
pub fn write_strings<W: Write>(writer: &mut W, store: &UnitStore, limit: usize) -> Result<usize> {
    let mut written = 0usize;
    for unit in store.groups().flat_map(|g| g.units().iter()).take(limit) {
        let (Some(source), Some(target)) = (unit.source.as_deref(), unit.slot(TARGET_SLOT)) else {
            continue;
        };
        if written > 0 {
            writer.write_all(b";")?;
        }
        write!(writer, "\"{}\"=\"{}\"", escape_flat(source), escape_flat(target))?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Which slot landed in which column for one blind row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlindAssignment {
    pub id: String,
    /// (column header, slot name) pairs in output order.
    pub columns: Vec<(String, String)>,
}

/// Side report of a blind export; serialize and keep it to de-blind results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlindMapping {
    pub rows: Vec<BlindAssignment>,
    /// Units left out because one of the two slots was absent or empty.
    pub skipped: usize,
}

/// Blind-review export: id, source, then the two translation columns with a
/// per-row random slot-to-column assignment. Units missing either slot are
/// skipped — a row with one blank cell would give the blinding away.
pub fn write_blind_csv<W: Write, R: Rng + ?Sized>(
    writer: W,
    store: &UnitStore,
    left: &Column,
    right: &Column,
    rng: &mut R,
) -> Result<BlindMapping> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Id", "Original", left.header.as_str(), right.header.as_str()])?;

    let mut mapping = BlindMapping::default();
    for group in store.groups() {
        for unit in group.units() {
            let a = cell(unit, &left.slot);
            let b = cell(unit, &right.slot);
            if a.trim().is_empty() || b.trim().is_empty() {
                mapping.skipped += 1;
                continue;
            }
            let swap = rng.gen_bool(0.5);
            let (first, second) = if swap { (&b, &a) } else { (&a, &b) };
            let source = cell(unit, SOURCE_SLOT);
            wtr.write_record([unit.id.as_str(), source.as_str(), first.as_str(), second.as_str()])?;

            let (first_slot, second_slot) = if swap {
                (right.slot.clone(), left.slot.clone())
            } else {
                (left.slot.clone(), right.slot.clone())
            };
            mapping.rows.push(BlindAssignment {
                id: unit.id.clone(),
                columns: vec![
                    (left.header.clone(), first_slot),
                    (right.header.clone(), second_slot),
                ],
            });
        }
    }
    wtr.flush()?;
    Ok(mapping)
}
