//! Aggregation of derived columns into report totals.
//!
//! Totals are plain sums over the rows of a table. Null cells are excluded,
//! so a column with no numeric values totals zero.

use crate::table::{Cell, Table};
use crate::FloatValue;
use is_close::is_close;
use serde::{Deserialize, Serialize};

/// A single report total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub column: String,
    pub total: FloatValue,
}

/// Ordered totals of a processed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    entries: Vec<SummaryEntry>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum each of `columns` over `table`.
    ///
    /// Columns that are not in the table are left out of the summary.
    pub fn from_table<S: AsRef<str>>(table: &Table, columns: &[S]) -> Self {
        let mut summary = Self::new();
        for column in columns {
            if let Some(total) = table.column_sum(column.as_ref()) {
                summary.push(column.as_ref(), total);
            }
        }
        summary
    }

    /// Add a total, replacing an existing total with the same name
    pub fn push(&mut self, column: &str, total: FloatValue) {
        match self.entries.iter_mut().find(|e| e.column == column) {
            Some(entry) => entry.total = total,
            None => self.entries.push(SummaryEntry {
                column: column.to_string(),
                total,
            }),
        }
    }

    pub fn get(&self, column: &str) -> Option<FloatValue> {
        self.entries
            .iter()
            .find(|e| e.column == column)
            .map(|e| e.total)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-row table with a column per total
    pub fn to_table(&self) -> Table {
        Table::from_record(
            self.entries
                .iter()
                .map(|e| (e.column.clone(), Cell::from(e.total))),
        )
    }

    /// Check that every total still equals the sum of its column in `table`.
    ///
    /// Totals with no matching column (e.g. totals spanning several columns)
    /// are skipped.
    pub fn reconciles_with(&self, table: &Table) -> bool {
        self.entries.iter().all(|entry| {
            table.column_sum(&entry.column).map_or(true, |sum| {
                is_close!(sum, entry.total)
            })
        })
    }
}

impl<'a> IntoIterator for &'a Summary {
    type Item = &'a SummaryEntry;
    type IntoIter = std::slice::Iter<'a, SummaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
