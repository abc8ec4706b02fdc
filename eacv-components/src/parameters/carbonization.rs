//! Carbonization parameters
//!
//! Constants relating methane released by charcoal kilns to the biogenic
//! CO2 released alongside it.

use eacv_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for charcoal production emissions.
///
/// Biogenic CO2 is derived from the CH4 emitted by the kiln:
///
/// $$CO_2 = \frac{r_{CO_2} \cdot M_{CO_2}}{r_{CH_4} \cdot M_{CH_4}} \cdot CH_4$$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarbonizationParameters {
    /// Numerator coefficient of the kiln CO2/CH4 emission ratio
    /// unit: dimensionless
    /// default: 2.21
    pub co2_release_coefficient: FloatValue,

    /// Denominator coefficient of the kiln CO2/CH4 emission ratio
    /// unit: dimensionless
    /// default: 1.07
    pub ch4_release_coefficient: FloatValue,

    /// unit: g/mol
    /// default: 44.0
    pub co2_molar_mass: FloatValue,

    /// unit: g/mol
    /// default: 16.0
    pub ch4_molar_mass: FloatValue,
}

impl Default for CarbonizationParameters {
    fn default() -> Self {
        Self {
            co2_release_coefficient: 2.21,
            ch4_release_coefficient: 1.07,
            co2_molar_mass: 44.0,
            ch4_molar_mass: 16.0,
        }
    }
}

impl CarbonizationParameters {
    /// Mass of biogenic CO2 per mass of CH4
    pub fn co2_per_ch4(&self) -> FloatValue {
        (self.co2_release_coefficient * self.co2_molar_mass)
            / (self.ch4_release_coefficient * self.ch4_molar_mass)
    }
}
