//! Carbonization Module
//!
//! Emissions from converting wood into charcoal in kilns.
//!
//! The methane yield of a kiln is a linear function of its gravimetric yield
//! $y$, scaled by the charcoal produced $P$:
//!
//! $$CH_4 = (a \cdot y + b) \cdot P$$
//!
//! where $a$ and $b$ are `ch4_yield_slope` and `ch4_yield_intercept` from the
//! carbonization factor table. Biogenic CO2 is released in a fixed ratio to the
//! methane (see [`CarbonizationParameters`]), and the biogenic total combines
//! both:
//!
//! $$E_{bio} = \frac{CH_4 \cdot GWP_{CH_4}}{1000} + \frac{CO_{2,bio}}{1000}$$
//!
//! The wood consumed is $P / y$ and has no value for a zero yield.

use crate::module::{or_zero, InventoryModule};
use crate::parameters::CarbonizationParameters;
use eacv_core::columns::ColumnDefinition;
use eacv_core::errors::EacvResult;
use eacv_core::gas::Gas;
use eacv_core::reference::ReferenceData;
use eacv_core::table::Table;
use eacv_core::FloatValue;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CHARCOAL_PRODUCTION: &str = "Produção de Carvão Vegetal";
pub const GRAVIMETRIC_YIELD: &str = "Rendimento Gravimétrico (%)";

pub const WOOD: &str = "Madeira";
pub const CH4_EMISSIONS: &str = "Emissões de CH4 (tCO2e)";
pub const BIOGENIC_CO2_KG: &str = "Emissões CO2 - biogênico (kgCO2)";
pub const BIOGENIC_TOTAL: &str = "Emissões Biogênicas Totais (tCO2e)";

pub const CH4_YIELD_SLOPE: &str = "ch4_yield_slope";
pub const CH4_YIELD_INTERCEPT: &str = "ch4_yield_intercept";

const MODULE: &str = "carbonization";

/// Charcoal kiln emissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Carbonization {
    parameters: CarbonizationParameters,
}

impl Carbonization {
    pub fn new() -> Self {
        Self::from_parameters(CarbonizationParameters::default())
    }

    pub fn from_parameters(parameters: CarbonizationParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &CarbonizationParameters {
        &self.parameters
    }

    /// Wood consumed, `None` for a zero yield
    pub fn wood(&self, production: FloatValue, gravimetric_yield: FloatValue) -> Option<FloatValue> {
        if gravimetric_yield == 0.0 {
            return None;
        }
        Some(production / gravimetric_yield)
    }

    pub fn ch4_emissions(
        &self,
        production: FloatValue,
        gravimetric_yield: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        let factor = |name: &str| {
            or_zero(reference.carbonization_factors.lookup(name), MODULE, name, name)
        };
        (factor(CH4_YIELD_SLOPE) * gravimetric_yield + factor(CH4_YIELD_INTERCEPT)) * production
    }

    pub fn biogenic_co2_kg(&self, ch4: FloatValue) -> FloatValue {
        self.parameters.co2_per_ch4() * ch4
    }

    pub fn biogenic_total(
        &self,
        ch4: FloatValue,
        biogenic_co2_kg: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        ch4 * reference.gwp.ar6(Gas::CH4) / 1000.0 + biogenic_co2_kg / 1000.0
    }
}

impl InventoryModule for Carbonization {
    fn name(&self) -> &'static str {
        MODULE
    }

    fn definitions(&self) -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::input(CHARCOAL_PRODUCTION, "t"),
            ColumnDefinition::input(GRAVIMETRIC_YIELD, "fraction"),
            ColumnDefinition::output(WOOD, "t"),
            ColumnDefinition::output(CH4_EMISSIONS, "CH4"),
            ColumnDefinition::output(BIOGENIC_CO2_KG, "kg CO2"),
            ColumnDefinition::output(BIOGENIC_TOTAL, "t CO2e"),
        ]
    }

    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()> {
        self.validate_inputs(table)?;
        info!(module = MODULE, rows = table.len(), "Calculating carbonization emissions");

        table.derive_number(WOOD, |row| {
            self.wood(row.number(CHARCOAL_PRODUCTION)?, row.number(GRAVIMETRIC_YIELD)?)
        });
        table.derive_number(CH4_EMISSIONS, |row| {
            Some(self.ch4_emissions(
                row.number(CHARCOAL_PRODUCTION)?,
                row.number(GRAVIMETRIC_YIELD)?,
                reference,
            ))
        });
        table.derive_number(BIOGENIC_CO2_KG, |row| {
            row.number(CH4_EMISSIONS).map(|ch4| self.biogenic_co2_kg(ch4))
        });
        table.derive_number(BIOGENIC_TOTAL, |row| {
            Some(self.biogenic_total(
                row.number(CH4_EMISSIONS)?,
                row.number(BIOGENIC_CO2_KG)?,
                reference,
            ))
        });

        Ok(())
    }

    fn summary_columns(&self) -> Vec<&'static str> {
        vec![WOOD, CH4_EMISSIONS, BIOGENIC_CO2_KG, BIOGENIC_TOTAL]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use eacv_core::reference::FactorTable;
    use eacv_core::table::Cell;

    fn reference() -> ReferenceData {
        ReferenceData {
            carbonization_factors: FactorTable::from_pairs([
                (CH4_YIELD_SLOPE, -0.1),
                (CH4_YIELD_INTERCEPT, 0.08),
            ]),
            ..Default::default()
        }
    }

    fn table(rows: &[(f64, f64)]) -> Table {
        Table::from_rows(
            vec![CHARCOAL_PRODUCTION.to_string(), GRAVIMETRIC_YIELD.to_string()],
            rows.iter()
                .map(|(p, y)| vec![Cell::Number(*p), Cell::Number(*y)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_wood() {
        let module = Carbonization::new();
        assert_eq!(module.wood(100.0, 0.25), Some(400.0));
        assert_eq!(module.wood(100.0, 0.0), None);
    }

    #[test]
    fn test_ch4_emissions() {
        let module = Carbonization::new();
        let ch4 = module.ch4_emissions(100.0, 0.3, &reference());
        assert_relative_eq!(ch4, (-0.1 * 0.3 + 0.08) * 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_factors_are_zero() {
        let module = Carbonization::new();
        assert_eq!(module.ch4_emissions(100.0, 0.3, &ReferenceData::default()), 0.0);
    }

    #[test]
    fn test_biogenic_total() {
        let module = Carbonization::new();
        let reference = reference();
        let co2 = module.biogenic_co2_kg(10.0);
        assert_relative_eq!(co2, 10.0 * (2.21 * 44.0) / (1.07 * 16.0), max_relative = 1e-12);
        assert_relative_eq!(
            module.biogenic_total(10.0, co2, &reference),
            10.0 * 27.9 / 1000.0 + co2 / 1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_process_zero_yield() {
        let module = Carbonization::new();
        let mut table = table(&[(100.0, 0.0), (100.0, 0.3)]);
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.cell(0, WOOD), Some(&Cell::Empty));
        assert_relative_eq!(table.number(0, CH4_EMISSIONS).unwrap(), 8.0, max_relative = 1e-12);
        assert_relative_eq!(table.number(1, WOOD).unwrap(), 100.0 / 0.3);
        assert!(table.number(1, BIOGENIC_TOTAL).unwrap() > 0.0);
    }

    #[test]
    fn test_process_blank_production() {
        let module = Carbonization::new();
        let mut table = Table::from_rows(
            vec![CHARCOAL_PRODUCTION.to_string(), GRAVIMETRIC_YIELD.to_string()],
            vec![vec![Cell::Empty, Cell::Number(0.3)]],
        )
        .unwrap();
        module.process(&mut table, &reference()).unwrap();

        for column in module.summary_columns() {
            assert_eq!(table.cell(0, column), Some(&Cell::Empty));
        }
    }

    #[test]
    fn test_summary() {
        let module = Carbonization::new();
        let mut table = table(&[(100.0, 0.25), (50.0, 0.5)]);
        module.process(&mut table, &reference()).unwrap();
        let summary = module.summarise(&table);

        assert_relative_eq!(summary.get(WOOD).unwrap(), 500.0);
        assert!(summary.reconciles_with(&table));
    }
}
