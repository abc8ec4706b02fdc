//! Column definitions declared by inventory modules.
//!
//! Each module declares the columns it reads and the columns it appends,
//! so a table can be checked before any row is processed.

use crate::errors::{EacvError, EacvResult};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// How a module uses a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Must be present in the input table, otherwise processing is aborted
    Input,
    /// Read when present; dependent derived cells are null when absent
    OptionalInput,
    /// Appended by the module
    Output,
}

/// A named column with its unit and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub unit: String,
    pub role: ColumnRole,
}

impl ColumnDefinition {
    pub fn new(name: &str, unit: &str, role: ColumnRole) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            role,
        }
    }

    pub fn input(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ColumnRole::Input)
    }

    pub fn optional_input(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ColumnRole::OptionalInput)
    }

    pub fn output(name: &str, unit: &str) -> Self {
        Self::new(name, unit, ColumnRole::Output)
    }
}

/// Check that every [`ColumnRole::Input`] column exists in `table`.
///
/// Returns the first missing column as [`EacvError::MissingColumn`].
pub fn verify_inputs(
    module: &str,
    definitions: &[ColumnDefinition],
    table: &Table,
) -> EacvResult<()> {
    match definitions
        .iter()
        .filter(|d| d.role == ColumnRole::Input)
        .find(|d| !table.has_column(&d.name))
    {
        Some(missing) => Err(EacvError::MissingColumn {
            module: module.to_string(),
            column: missing.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Names of the output columns, in declaration order.
pub fn output_names(definitions: &[ColumnDefinition]) -> Vec<&str> {
    definitions
        .iter()
        .filter(|d| d.role == ColumnRole::Output)
        .map(|d| d.name.as_str())
        .collect()
}
