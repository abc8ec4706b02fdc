//! Run configuration.
//!
//! A TOML file with one optional section per concern:
//!
//! ```toml
//! [reference]
//! directory = "data/lca"
//!
//! [fuels]
//! ethanol_fraction = 0.27
//! biodiesel_fraction = 0.10
//!
//! [carbonization]
//! co2_release_coefficient = 2.21
//!
//! [fertilizers]
//! calcitic_label = "Calcítico"
//! ```
//!
//! Missing sections and keys take their defaults, so an empty file is a
//! valid configuration.

use eacv_components::parameters::{
    CarbonizationParameters, FertilizerParameters, FuelParameters,
};
use eacv_core::errors::{EacvError, EacvResult};
use eacv_core::reference::ReferencePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference: ReferencePaths,
    pub fuels: FuelParameters,
    pub carbonization: CarbonizationParameters,
    pub fertilizers: FertilizerParameters,
}

impl Config {
    pub fn from_toml_str(content: &str) -> EacvResult<Self> {
        toml::from_str(content).map_err(|e| EacvError::InvalidConfig(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| EacvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> EacvResult<String> {
        toml::to_string(self).map_err(|e| EacvError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [reference]
            directory = "/srv/lca"

            [fuels]
            biodiesel_fraction = 0.14
            "#,
        )
        .unwrap();

        assert_eq!(config.reference.directory, PathBuf::from("/srv/lca"));
        assert_eq!(config.reference.gwp, PathBuf::from("gwp.csv"));
        assert_eq!(config.fuels.biodiesel_fraction, 0.14);
        assert_eq!(config.fuels.ethanol_fraction, 0.27);
        assert_eq!(config.carbonization, CarbonizationParameters::default());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_toml_str("[fuels]\nethanol_fraction = \"high\"").unwrap_err();
        assert!(matches!(err, EacvError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_path("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, EacvError::Io { .. }));
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.fertilizers.calcitic_label = "Calcário calcítico".to_string();

        let serialised = config.to_toml_string().unwrap();
        let deserialised = Config::from_toml_str(&serialised).unwrap();
        assert_eq!(deserialised, config);
    }
}
