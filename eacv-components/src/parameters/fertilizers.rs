//! Fertilizer parameters
//!
//! The emission factors themselves come from the fertilizer factor table of
//! the reference data; these parameters name the table entries and the
//! limestone categories used in the activity spreadsheet.

use eacv_core::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FertilizerParameters {
    /// Conversion of "Quantidade utilizada" to kilograms
    /// unit: kg per reported unit
    /// default: 1000.0 (quantities are reported in tonnes)
    pub quantity_to_kg: FloatValue,

    /// Category label for calcitic limestone (matched case-insensitively)
    /// default: "calcítico"
    pub calcitic_label: String,

    /// Category label for dolomitic limestone (matched case-insensitively)
    /// default: "dolomítico"
    pub dolomitic_label: String,

    /// Factor table entry: kg N2O emitted per kg N applied
    /// default: "n2o_emission_factor"
    pub n2o_emission_factor: String,

    /// Factor table entry: kg CO2 per kg CaCO3-equivalent of calcitic limestone
    /// default: "calcitic_limestone_factor"
    pub calcitic_limestone_factor: String,

    /// Factor table entry: kg CO2 per kg CaCO3-equivalent of dolomitic limestone
    /// default: "dolomitic_limestone_factor"
    pub dolomitic_limestone_factor: String,

    /// Factor table entry: CaCO3-equivalent per unit of CaO content
    /// default: "cao_to_caco3"
    pub cao_to_caco3: String,

    /// Factor table entry: CaCO3-equivalent per unit of MgO content
    /// default: "mgo_to_caco3"
    pub mgo_to_caco3: String,
}

impl Default for FertilizerParameters {
    fn default() -> Self {
        Self {
            quantity_to_kg: 1000.0,
            calcitic_label: "calcítico".to_string(),
            dolomitic_label: "dolomítico".to_string(),
            n2o_emission_factor: "n2o_emission_factor".to_string(),
            calcitic_limestone_factor: "calcitic_limestone_factor".to_string(),
            dolomitic_limestone_factor: "dolomitic_limestone_factor".to_string(),
            cao_to_caco3: "cao_to_caco3".to_string(),
            mgo_to_caco3: "mgo_to_caco3".to_string(),
        }
    }
}
