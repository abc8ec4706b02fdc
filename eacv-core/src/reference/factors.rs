//! Named scalar factors used by individual modules.

use crate::errors::EacvResult;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRecord {
    pub parameter: String,
    #[serde(default, deserialize_with = "reference_number")]
    pub value: Option<FloatValue>,
}

/// `parameter -> value` table, e.g. the fertilizer or carbonization factors.
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    values: HashMap<String, FloatValue>,
}

impl FactorTable {
    pub fn from_records(records: impl IntoIterator<Item = FactorRecord>) -> Self {
        let mut values = HashMap::new();
        for record in records {
            if let Some(value) = record.value {
                values.entry(normalise_key(&record.parameter)).or_insert(value);
            }
        }
        Self { values }
    }

    /// Build from `(parameter, value)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, FloatValue)>) -> Self {
        Self::from_records(pairs.into_iter().map(|(parameter, value)| FactorRecord {
            parameter: parameter.to_string(),
            value: Some(value),
        }))
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<FactorRecord, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<FactorRecord>(path)?))
    }

    pub fn lookup(&self, parameter: &str) -> Option<FloatValue> {
        let value = self.values.get(&normalise_key(parameter)).copied();
        if value.is_none() {
            debug!(parameter, "No factor found");
        }
        value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_extra_columns() {
        let data = "\
parameter,value,unit,description
n2o_emission_factor,0.0157,kg N2O / kg N,IPCC 2019
calcitic_limestone_factor,0.44,kg CO2 / kg CaCO3,
cao_to_caco3,,,
";
        let table = FactorTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("N2O_EMISSION_FACTOR"), Some(0.0157));
        assert_eq!(table.lookup("cao_to_caco3"), None);
    }

    #[test]
    fn test_from_pairs() {
        let table = FactorTable::from_pairs([("ch4_yield_slope", -0.5), ("ch4_yield_intercept", 0.3)]);
        assert_eq!(table.lookup("ch4_yield_slope"), Some(-0.5));
    }
}
