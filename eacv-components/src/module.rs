//! The contract shared by every inventory module.

use eacv_core::columns::{verify_inputs, ColumnDefinition};
use eacv_core::errors::EacvResult;
use eacv_core::reference::ReferenceData;
use eacv_core::summary::Summary;
use eacv_core::table::Table;
use eacv_core::FloatValue;
use std::fmt::Debug;
use tracing::warn;

/// A row-wise emission calculation over an activity table.
///
/// Implementations declare their columns through [`definitions`](Self::definitions)
/// and append their outputs in declaration order in [`process`](Self::process).
/// Input columns are left untouched and row order is preserved.
pub trait InventoryModule: Debug {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Input, optional input and output columns
    fn definitions(&self) -> Vec<ColumnDefinition>;

    /// Append the derived columns to `table`.
    ///
    /// Fails only when a required input column is missing. Missing reference
    /// data and malformed cells degrade the affected values instead.
    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()>;

    /// Columns summed into the report totals
    fn summary_columns(&self) -> Vec<&'static str>;

    fn validate_inputs(&self, table: &Table) -> EacvResult<()> {
        verify_inputs(self.name(), &self.definitions(), table)
    }

    fn summarise(&self, table: &Table) -> Summary {
        Summary::from_table(table, &self.summary_columns())
    }
}

/// Reference value, or zero with a warning when it is missing.
pub(crate) fn or_zero(
    value: Option<FloatValue>,
    module: &str,
    factor: &str,
    key: &str,
) -> FloatValue {
    value.unwrap_or_else(|| {
        warn!(module, factor, key, "Reference factor not found, using 0");
        0.0
    })
}
