//! Off-road mobile combustion factors.

use crate::errors::EacvResult;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Combustion factors for a fuel burnt in non-road equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffRoadFactors {
    pub fuel_transportation: String,
    /// unit: tCO2/GJ
    #[serde(default, deserialize_with = "reference_number")]
    pub co2_tco2_gj: Option<FloatValue>,
    /// unit: tCH4/GJ
    #[serde(default, deserialize_with = "reference_number")]
    pub ch4_tch4_gj: Option<FloatValue>,
    /// unit: tN2O/GJ
    #[serde(default, deserialize_with = "reference_number")]
    pub n2o_tn2o_gj: Option<FloatValue>,
    /// unit: GJ/m3
    #[serde(default, deserialize_with = "reference_number")]
    pub energy_content_gj_m3: Option<FloatValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffRoadColumn {
    Co2,
    Ch4,
    N2o,
    EnergyContent,
}

impl OffRoadFactors {
    pub fn get(&self, column: OffRoadColumn) -> Option<FloatValue> {
        match column {
            OffRoadColumn::Co2 => self.co2_tco2_gj,
            OffRoadColumn::Ch4 => self.ch4_tch4_gj,
            OffRoadColumn::N2o => self.n2o_tn2o_gj,
            OffRoadColumn::EnergyContent => self.energy_content_gj_m3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OffRoadFactorTable {
    factors: HashMap<String, OffRoadFactors>,
}

impl OffRoadFactorTable {
    pub fn from_records(records: impl IntoIterator<Item = OffRoadFactors>) -> Self {
        let mut factors = HashMap::new();
        for record in records {
            factors
                .entry(normalise_key(&record.fuel_transportation))
                .or_insert(record);
        }
        Self { factors }
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<OffRoadFactors, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<OffRoadFactors>(path)?))
    }

    pub fn lookup(&self, fuel: &str, column: OffRoadColumn) -> Option<FloatValue> {
        let value = self
            .factors
            .get(&normalise_key(fuel))
            .and_then(|f| f.get(column));
        if value.is_none() {
            debug!(fuel, ?column, "No off-road factor found");
        }
        value
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let data = "\
fuel_transportation,co2_tco2_gj,ch4_tch4_gj,n2o_tn2o_gj,energy_content_gj_m3
Gasolina Automotiva ,69.3,0.003,0.0006,32.5
óleo diesel,74.1,0.004,0.0008,35.5
";
        let table = OffRoadFactorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("gasolina automotiva", OffRoadColumn::Co2),
            Some(69.3)
        );
        assert_eq!(
            table.lookup("Óleo Diesel", OffRoadColumn::EnergyContent),
            Some(35.5)
        );
        assert_eq!(table.lookup("biodiesel", OffRoadColumn::Ch4), None);
    }

    #[test]
    fn test_decimal_comma_file() {
        let data = "\
fuel_transportation,co2_tco2_gj,ch4_tch4_gj,n2o_tn2o_gj,energy_content_gj_m3
óleo diesel,\"74,1\",\"0,004\",\"0,0008\",\"35,5\"
biodiesel,-,\"0,003\",,\"33,1\"
";
        let table = OffRoadFactorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.lookup("óleo diesel", OffRoadColumn::Co2), Some(74.1));
        assert_eq!(table.lookup("óleo diesel", OffRoadColumn::N2o), Some(0.0008));
        assert_eq!(table.lookup("biodiesel", OffRoadColumn::Co2), None);
        assert_eq!(table.lookup("biodiesel", OffRoadColumn::EnergyContent), Some(33.1));
    }
}
