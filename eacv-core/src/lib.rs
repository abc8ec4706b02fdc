//! Core building blocks for steel-industry greenhouse-gas inventories.
//!
//! - [`table`]: the tabular record model that inventory modules augment
//! - [`io`]: CSV reading and writing of tables
//! - [`reference`]: the reference data store (emission factors, densities, GWP, ...)
//! - [`summary`]: aggregation of derived columns into report totals

pub mod columns;
pub mod errors;
pub mod gas;
pub mod io;
pub mod reference;
pub mod summary;
pub mod table;

/// Floating point type used for all quantities and factors.
pub type FloatValue = f64;

/// Normalise a lookup key: surrounding whitespace removed and lower-cased.
///
/// Reference tables are keyed by normalised names and every lookup normalises
/// its key first, so `"  Óleo Diesel"` and `"óleo diesel"` refer to the same row.
pub fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_key() {
        assert_eq!(normalise_key("  Óleo Diesel "), "óleo diesel");
        assert_eq!(normalise_key("GASOLINA AUTOMOTIVA"), "gasolina automotiva");
        assert_eq!(normalise_key(""), "");
    }
}
