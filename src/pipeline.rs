//! Processing of one activity table by one inventory module.

use crate::config::Config;
use eacv_components::carbonization::Carbonization;
use eacv_components::energy::ForestryEnergy;
use eacv_components::fertilizers::ForestryFertilizers;
use eacv_components::fuels::ForestryFuels;
use eacv_components::material::{is_matched, MaterialFootprint};
use eacv_components::InventoryModule;
use eacv_core::errors::{EacvError, EacvResult};
use eacv_core::normalise_key;
use eacv_core::reference::ReferenceData;
use eacv_core::summary::Summary;
use eacv_core::table::Table;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// The inventory modules that can process a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ModuleKind {
    Fuels,
    Fertilizers,
    Energy,
    Carbonization,
    Industrial,
    QuartzMining,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 6] = [
        ModuleKind::Fuels,
        ModuleKind::Fertilizers,
        ModuleKind::Energy,
        ModuleKind::Carbonization,
        ModuleKind::Industrial,
        ModuleKind::QuartzMining,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModuleKind::Fuels => "fuels",
            ModuleKind::Fertilizers => "fertilizers",
            ModuleKind::Energy => "energy",
            ModuleKind::Carbonization => "carbonization",
            ModuleKind::Industrial => "industrial",
            ModuleKind::QuartzMining => "quartz-mining",
        }
    }

    /// Instantiate the module with the parameters of `config`
    pub fn build(&self, config: &Config) -> Box<dyn InventoryModule> {
        match self {
            ModuleKind::Fuels => Box::new(ForestryFuels::from_parameters(config.fuels.clone())),
            ModuleKind::Fertilizers => Box::new(ForestryFertilizers::from_parameters(
                config.fertilizers.clone(),
            )),
            ModuleKind::Energy => Box::new(ForestryEnergy::new()),
            ModuleKind::Carbonization => Box::new(Carbonization::from_parameters(
                config.carbonization.clone(),
            )),
            ModuleKind::Industrial => Box::new(MaterialFootprint::industrial()),
            ModuleKind::QuartzMining => Box::new(MaterialFootprint::quartz_mining()),
        }
    }

    fn is_material(&self) -> bool {
        matches!(self, ModuleKind::Industrial | ModuleKind::QuartzMining)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleKind {
    type Err = EacvError;

    /// Accepts the module name with either `-` or `_` as separator
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalise_key(s).replace('_', "-");
        ModuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == key)
            .ok_or_else(|| EacvError::UnknownModule(s.to_string()))
    }
}

/// Augmented table and its totals
#[derive(Debug, Clone)]
pub struct Report {
    pub table: Table,
    pub summary: Summary,
}

/// Run a module over `table`.
///
/// The returned table holds the input columns unchanged, followed by the
/// module's derived columns, in input row order.
pub fn run_module(
    kind: ModuleKind,
    mut table: Table,
    reference: &ReferenceData,
    config: &Config,
) -> EacvResult<Report> {
    let module = kind.build(config);
    module.process(&mut table, reference)?;

    if kind.is_material() {
        let unmatched = table.rows().filter(|row| !is_matched(row)).count();
        if unmatched > 0 {
            warn!(module = %kind, unmatched, "Rows without an emission factor");
        }
    }

    let summary = module.summarise(&table);
    info!(module = %kind, rows = table.len(), totals = summary.len(), "Module finished");
    Ok(Report { table, summary })
}

/// Read `input`, load the reference data named by `config` and run a module.
pub fn run_file(kind: ModuleKind, input: impl AsRef<Path>, config: &Config) -> EacvResult<Report> {
    let table = Table::from_path(input)?;
    let reference = ReferenceData::load(&config.reference);
    run_module(kind, table, &reference, config)
}
