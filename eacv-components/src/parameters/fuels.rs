//! Fuel blending parameters
//!
//! Automotive gasoline and diesel sold in Brazil are blends with a mandated
//! share of biofuel. The fossil part of a blend is reported as fossil CO2 and
//! the biofuel part as biogenic CO2.

use eacv_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Blend fractions of the regulated fuels.
///
/// The fractions are volumetric and apply to both the combustion factors and
/// the density used to convert consumption to mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelParameters {
    /// Anhydrous ethanol share of automotive gasoline
    /// unit: fraction
    /// default: 0.27
    pub ethanol_fraction: FloatValue,

    /// Biodiesel share of diesel oil
    /// unit: fraction
    /// default: 0.10
    pub biodiesel_fraction: FloatValue,
}

impl Default for FuelParameters {
    fn default() -> Self {
        Self {
            ethanol_fraction: 0.27,
            biodiesel_fraction: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = FuelParameters::default();
        assert!((params.ethanol_fraction - 0.27).abs() < 1e-10);
        assert!((params.biodiesel_fraction - 0.10).abs() < 1e-10);
    }

    #[test]
    fn test_fractions_are_shares() {
        let params = FuelParameters::default();
        for fraction in [params.ethanol_fraction, params.biodiesel_fraction] {
            assert!(
                (0.0..=1.0).contains(&fraction),
                "Blend fraction should be between 0 and 1"
            );
        }
    }
}
