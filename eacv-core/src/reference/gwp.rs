//! Global Warming Potentials.

use crate::errors::EacvResult;
use crate::gas::Gas;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GwpRecord {
    pub gas: String,
    #[serde(default, deserialize_with = "reference_number")]
    pub ar6: Option<FloatValue>,
}

/// AR6 100-year GWP per gas.
///
/// Gases absent from the reference file keep the built-in AR6 value
/// ([`Gas::ar6`]), so a lookup always succeeds.
#[derive(Debug, Clone)]
pub struct GwpTable {
    ar6: HashMap<Gas, FloatValue>,
}

impl Default for GwpTable {
    fn default() -> Self {
        Self {
            ar6: Gas::ALL.iter().map(|g| (*g, g.ar6())).collect(),
        }
    }
}

impl GwpTable {
    pub fn from_records(records: impl IntoIterator<Item = GwpRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            match (record.gas.parse::<Gas>(), record.ar6) {
                (Ok(gas), Some(value)) => {
                    table.ar6.insert(gas, value);
                }
                (Ok(gas), None) => debug!(%gas, "Blank GWP, keeping built-in value"),
                (Err(_), _) => debug!(gas = %record.gas, "Ignoring GWP for unsupported gas"),
            }
        }
        table
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<GwpRecord, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<GwpRecord>(path)?))
    }

    /// GWP multiplier converting a mass of `gas` to CO2-equivalent
    pub fn ar6(&self, gas: Gas) -> FloatValue {
        self.ar6.get(&gas).copied().unwrap_or_else(|| gas.ar6())
    }

    /// Combine masses of CO2, CH4 and N2O into CO2-equivalent (same mass unit)
    pub fn co2_equivalent(&self, co2: FloatValue, ch4: FloatValue, n2o: FloatValue) -> FloatValue {
        co2 * self.ar6(Gas::CO2) + ch4 * self.ar6(Gas::CH4) + n2o * self.ar6(Gas::N2O)
    }
}
