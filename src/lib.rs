//! Greenhouse-gas inventories for steel-industry life-cycle assessment.
//!
//! Activity tables (fuel consumption, fertilizer application, energy use,
//! charcoal production, material flows) are joined against reference
//! emission factors and augmented with emission columns in tCO2e, plus a
//! summary of totals.
//!
//! ```no_run
//! use eacv::{run_file, Config, ModuleKind};
//!
//! let config = Config::from_path("eacv.toml")?;
//! let report = run_file(ModuleKind::Fuels, "fuels.csv", &config)?;
//! for entry in &report.summary {
//!     println!("{}: {}", entry.column, entry.total);
//! }
//! # Ok::<(), eacv::eacv_core::errors::EacvError>(())
//! ```

pub mod config;
pub mod pipeline;

pub use eacv_components;
pub use eacv_core;

pub use config::Config;
pub use pipeline::{run_file, run_module, ModuleKind, Report};
