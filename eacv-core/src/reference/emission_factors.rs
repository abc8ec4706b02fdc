//! Generic emission factors keyed by substance name.

use crate::errors::EacvResult;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Production footprint of a material or fuel.
///
/// Factors are per unit of the material (see `unit`), in tCO2e. Any field
/// may be blank in the reference file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    pub name: String,
    #[serde(default, deserialize_with = "reference_number")]
    pub fossil_emission_factor: Option<FloatValue>,
    #[serde(default, deserialize_with = "reference_number")]
    pub biogenic_emission_factor: Option<FloatValue>,
    #[serde(default, deserialize_with = "reference_number")]
    pub luc_emission_factor: Option<FloatValue>,
    #[serde(default, deserialize_with = "reference_number")]
    pub biogenic_removal_factor: Option<FloatValue>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Which factor of an [`EmissionFactor`] to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmissionFactorKind {
    Fossil,
    Biogenic,
    Luc,
    BiogenicRemoval,
}

impl EmissionFactorKind {
    /// Column name in the reference file
    pub fn column(&self) -> &'static str {
        match self {
            EmissionFactorKind::Fossil => "fossil_emission_factor",
            EmissionFactorKind::Biogenic => "biogenic_emission_factor",
            EmissionFactorKind::Luc => "luc_emission_factor",
            EmissionFactorKind::BiogenicRemoval => "biogenic_removal_factor",
        }
    }
}

impl EmissionFactor {
    pub fn get(&self, kind: EmissionFactorKind) -> Option<FloatValue> {
        match kind {
            EmissionFactorKind::Fossil => self.fossil_emission_factor,
            EmissionFactorKind::Biogenic => self.biogenic_emission_factor,
            EmissionFactorKind::Luc => self.luc_emission_factor,
            EmissionFactorKind::BiogenicRemoval => self.biogenic_removal_factor,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmissionFactorTable {
    factors: HashMap<String, EmissionFactor>,
}

impl EmissionFactorTable {
    /// Build the table from records.
    ///
    /// Names are normalised; if a name appears more than once the first record is kept.
    pub fn from_records(records: impl IntoIterator<Item = EmissionFactor>) -> Self {
        let mut factors = HashMap::new();
        for record in records {
            let key = normalise_key(&record.name);
            if factors.contains_key(&key) {
                debug!(name = %key, "Duplicate emission factor ignored");
                continue;
            }
            factors.insert(key, record);
        }
        Self { factors }
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<EmissionFactor, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<EmissionFactor>(path)?))
    }

    pub fn get(&self, name: &str) -> Option<&EmissionFactor> {
        let factor = self.factors.get(&normalise_key(name));
        if factor.is_none() {
            debug!(name, "No emission factor found");
        }
        factor
    }

    pub fn lookup(&self, name: &str, kind: EmissionFactorKind) -> Option<FloatValue> {
        self.get(name).and_then(|f| f.get(kind))
    }

    pub fn unit(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.unit.as_deref())
    }

    pub fn source(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.source.as_deref())
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}
