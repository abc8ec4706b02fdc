//! Reference data store.
//!
//! Static lookup tables joined against activity records: generic emission
//! factors, off-road combustion factors, fuel densities, GWPs, grid factors
//! and the named factors of individual modules.
//!
//! # Loading
//!
//! [`ReferenceData::load`] reads every table once per run from the directory
//! described by [`ReferencePaths`]. The result is passed by reference into
//! each module; nothing is cached between runs.
//!
//! A file that cannot be read or parsed does not abort the run. A warning is
//! logged and the table is left empty, so every lookup against it reports a
//! missing value. The GWP table falls back to the built-in AR6 values instead.
//!
//! # Lookups
//!
//! All keys are normalised with [`normalise_key`](crate::normalise_key) on load
//! and on lookup. Lookups return `Option`: `None` is the missing sentinel and
//! callers decide whether it degrades to zero or null.

mod density;
mod emission_factors;
mod factors;
mod grid;
mod gwp;
mod off_road;

pub use density::{Density, DensityTable};
pub use emission_factors::{EmissionFactor, EmissionFactorKind, EmissionFactorTable};
pub use factors::{FactorRecord, FactorTable};
pub use grid::{GridFactorTable, GridFactors, Month};
pub use gwp::{GwpRecord, GwpTable};
pub use off_road::{OffRoadColumn, OffRoadFactorTable, OffRoadFactors};

use crate::errors::EacvResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Location of the reference files.
///
/// File names are relative to `directory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePaths {
    /// default: data/lca
    pub directory: PathBuf,
    /// default: emission_factors.csv
    pub emission_factors: PathBuf,
    /// default: densities.csv
    pub densities: PathBuf,
    /// default: mobile_combustion_off_road.csv
    pub off_road: PathBuf,
    /// default: gwp.csv
    pub gwp: PathBuf,
    /// default: grid_factors.csv
    pub grid_factors: PathBuf,
    /// default: fertilizer_factors.csv
    pub fertilizer_factors: PathBuf,
    /// default: carbonization_factors.csv
    pub carbonization_factors: PathBuf,
}

impl Default for ReferencePaths {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data/lca"),
            emission_factors: PathBuf::from("emission_factors.csv"),
            densities: PathBuf::from("densities.csv"),
            off_road: PathBuf::from("mobile_combustion_off_road.csv"),
            gwp: PathBuf::from("gwp.csv"),
            grid_factors: PathBuf::from("grid_factors.csv"),
            fertilizer_factors: PathBuf::from("fertilizer_factors.csv"),
            carbonization_factors: PathBuf::from("carbonization_factors.csv"),
        }
    }
}

impl ReferencePaths {
    /// Default file names inside `directory`
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Default::default()
        }
    }

    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.directory.join(file)
    }
}

/// All reference tables of one processing run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub emission_factors: EmissionFactorTable,
    pub off_road: OffRoadFactorTable,
    pub densities: DensityTable,
    pub gwp: GwpTable,
    pub grid: GridFactorTable,
    pub fertilizer_factors: FactorTable,
    pub carbonization_factors: FactorTable,
}

/// Load one table, degrading to its default on failure.
fn load_table<T, F>(paths: &ReferencePaths, file: &Path, loader: F) -> T
where
    T: Default,
    F: FnOnce(&Path) -> EacvResult<T>,
{
    let path = paths.resolve(file);
    match loader(&path) {
        Ok(table) => {
            info!(path = %path.display(), "Loaded reference table");
            table
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not load reference table; its values will be treated as missing"
            );
            T::default()
        }
    }
}

impl ReferenceData {
    /// Load every reference table. Never fails; see the module documentation.
    pub fn load(paths: &ReferencePaths) -> Self {
        Self {
            emission_factors: load_table(paths, &paths.emission_factors, |p| {
                EmissionFactorTable::from_path(p)
            }),
            off_road: load_table(paths, &paths.off_road, |p| OffRoadFactorTable::from_path(p)),
            densities: load_table(paths, &paths.densities, |p| DensityTable::from_path(p)),
            gwp: load_table(paths, &paths.gwp, |p| GwpTable::from_path(p)),
            grid: load_table(paths, &paths.grid_factors, |p| GridFactorTable::from_path(p)),
            fertilizer_factors: load_table(paths, &paths.fertilizer_factors, |p| {
                FactorTable::from_path(p)
            }),
            carbonization_factors: load_table(paths, &paths.carbonization_factors, |p| {
                FactorTable::from_path(p)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::Gas;

    #[test]
    fn test_missing_directory_degrades() {
        let data = ReferenceData::load(&ReferencePaths::in_directory("does/not/exist"));

        assert!(data.emission_factors.is_empty());
        assert!(data.off_road.is_empty());
        assert!(data.densities.is_empty());
        assert!(data.grid.is_empty());
        assert!(data.fertilizer_factors.is_empty());
        assert!(data.carbonization_factors.is_empty());
        assert_eq!(data.gwp.ar6(Gas::N2O), 273.0);
    }

    #[test]
    fn test_paths_resolve() {
        let paths = ReferencePaths::in_directory("/srv/lca");
        assert_eq!(
            paths.resolve(&paths.densities),
            PathBuf::from("/srv/lca/densities.csv")
        );
    }
}
