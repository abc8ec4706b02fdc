//! Inventory modules for the steel-industry life-cycle assessment.
//!
//! Each module reads an activity table, joins its rows against the
//! [`ReferenceData`](eacv_core::reference::ReferenceData) of the run and
//! appends derived emission columns:
//!
//! - [`fuels`]: forestry fuel combustion and production (blended gasoline and diesel)
//! - [`fertilizers`]: liming, nitrogen application and fertilizer production
//! - [`energy`]: monthly energy consumption, grid or other sources
//! - [`carbonization`]: charcoal production
//! - [`material`]: industrial and quartz-mining material footprints
//!
//! # Parameters
//!
//! Modules with fixed constants have a parameters struct in [`parameters`]
//! whose defaults match the reference spreadsheets.

pub mod carbonization;
pub mod energy;
pub mod fertilizers;
pub mod fuels;
pub mod material;
pub mod module;
pub mod parameters;

pub use module::InventoryModule;
