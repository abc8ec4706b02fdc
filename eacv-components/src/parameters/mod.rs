//! Module parameters
//!
//! Fixed constants of the inventory modules. Each struct provides defaults
//! matching the reference spreadsheets and can be overridden from the run
//! configuration.

mod carbonization;
mod fertilizers;
mod fuels;

pub use carbonization::CarbonizationParameters;
pub use fertilizers::FertilizerParameters;
pub use fuels::FuelParameters;
