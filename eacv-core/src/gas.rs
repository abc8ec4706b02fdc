//! Greenhouse gas species reported by the inventories.

use crate::normalise_key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A greenhouse gas with a Global Warming Potential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gas {
    CO2,
    CH4,
    N2O,
}

impl Gas {
    pub const ALL: [Gas; 3] = [Gas::CO2, Gas::CH4, Gas::N2O];

    /// 100-year Global Warming Potential from the IPCC Sixth Assessment Report
    pub fn ar6(&self) -> f64 {
        match self {
            Gas::CO2 => 1.0,
            Gas::CH4 => 27.9,
            Gas::N2O => 273.0,
        }
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gas::CO2 => write!(f, "CO2"),
            Gas::CH4 => write!(f, "CH4"),
            Gas::N2O => write!(f, "N2O"),
        }
    }
}

impl FromStr for Gas {
    type Err = String;

    /// Parse a gas from its formula, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_key(s).as_str() {
            "co2" => Ok(Gas::CO2),
            "ch4" => Ok(Gas::CH4),
            "n2o" => Ok(Gas::N2O),
            other => Err(format!("Unknown gas \"{other}\"")),
        }
    }
}
