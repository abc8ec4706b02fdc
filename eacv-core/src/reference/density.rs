//! Fuel densities.

use crate::errors::EacvResult;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub fuel: String,
    /// unit: kg per unit of consumption
    #[serde(default, deserialize_with = "reference_number")]
    pub density: Option<FloatValue>,
}

#[derive(Debug, Clone, Default)]
pub struct DensityTable {
    densities: HashMap<String, FloatValue>,
}

impl DensityTable {
    pub fn from_records(records: impl IntoIterator<Item = Density>) -> Self {
        let mut densities = HashMap::new();
        for record in records {
            if let Some(density) = record.density {
                densities.entry(normalise_key(&record.fuel)).or_insert(density);
            }
        }
        Self { densities }
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<Density, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<Density>(path)?))
    }

    pub fn lookup(&self, fuel: &str) -> Option<FloatValue> {
        let density = self.densities.get(&normalise_key(fuel)).copied();
        if density.is_none() {
            debug!(fuel, "No density found");
        }
        density
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }
}
