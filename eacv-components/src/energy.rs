//! Forestry Energy Module
//!
//! Monthly emissions from the energy consumed by forestry operations.
//!
//! Each row declares a year, an energy source and up to twelve monthly
//! consumptions (`Consumo - Janeiro` … `Consumo - Dezembro`).
//!
//! - Grid electricity uses the monthly grid factor of the row's year (tCO2/MWh)
//!   and has no biogenic part.
//! - Any other source uses its fossil and biogenic factors from the emission
//!   factor table.
//!
//! $$E_{m} = \frac{C_{m} \cdot EF_{m}}{1000}$$
//!
//! Annual totals sum the months that have a value.

use crate::module::{or_zero, InventoryModule};
use eacv_core::columns::ColumnDefinition;
use eacv_core::errors::EacvResult;
use eacv_core::reference::{EmissionFactorKind, Month, ReferenceData};
use eacv_core::summary::Summary;
use eacv_core::table::{Row, Table};
use eacv_core::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const YEAR: &str = "Ano";
pub const ENERGY_SOURCE: &str = "Fonte de Energia";

pub const TOTAL: &str = "Emissões totais (tCO2e)";
pub const BIOGENIC_TOTAL: &str = "Emissões Biogênicas totais (tCO2e)";
/// Summary entry for the consumption of every month
pub const CONSUMPTION_TOTAL: &str = "Consumo";

const GRID: &str = "grid";
const MODULE: &str = "energy";

pub fn consumption_column(month: Month) -> String {
    format!("Consumo - {}", month.portuguese())
}

pub fn emission_column(month: Month) -> String {
    format!("Emissões tCO2 - {}", month.portuguese())
}

pub fn biogenic_column(month: Month) -> String {
    format!("Emissões Biogênicas tCO2e - {}", month.portuguese())
}

/// Source of the consumed energy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnergySource {
    /// National grid electricity
    Grid,
    /// Any other source, by its normalised emission factor name
    Other(String),
}

impl EnergySource {
    pub fn from_name(name: &str) -> Self {
        match normalise_key(name).as_str() {
            GRID => EnergySource::Grid,
            other => EnergySource::Other(other.to_string()),
        }
    }
}

/// Year column value as a calendar year; fractional years are rejected
fn year_of(row: &Row<'_>) -> Option<i32> {
    row.number(YEAR)
        .filter(|y| y.fract() == 0.0 && y.abs() < FloatValue::from(i32::MAX))
        .map(|y| y as i32)
}

fn source_of(row: &Row<'_>) -> EnergySource {
    EnergySource::from_name(&row.text(ENERGY_SOURCE).unwrap_or_default())
}

/// Grid and fuel-based energy emissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForestryEnergy {}

impl ForestryEnergy {
    pub fn new() -> Self {
        Self {}
    }

    /// Grid emission factor of a month (tCO2/MWh), zero when the year or month is missing
    pub fn grid_factor(&self, year: i32, month: Month, reference: &ReferenceData) -> FloatValue {
        reference.grid.lookup(year, month).unwrap_or_else(|| {
            warn!(
                module = MODULE,
                year,
                month = month.portuguese(),
                "Grid factor not found, using 0"
            );
            0.0
        })
    }

    fn source_factor(
        &self,
        source: &str,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) -> FloatValue {
        or_zero(
            reference.emission_factors.lookup(source, kind),
            MODULE,
            kind.column(),
            source,
        )
    }

    /// Fossil emissions (tCO2) of one month's consumption.
    ///
    /// `year` is only needed for grid electricity; a grid row without a year
    /// has no value.
    pub fn monthly_emission(
        &self,
        source: &EnergySource,
        year: Option<i32>,
        month: Month,
        consumption: FloatValue,
        reference: &ReferenceData,
    ) -> Option<FloatValue> {
        let factor = match source {
            EnergySource::Grid => self.grid_factor(year?, month, reference),
            EnergySource::Other(name) => {
                self.source_factor(name, EmissionFactorKind::Fossil, reference)
            }
        };
        Some(consumption * factor / 1000.0)
    }

    /// Biogenic emissions (tCO2e) of one month's consumption
    pub fn monthly_biogenic(
        &self,
        source: &EnergySource,
        consumption: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        match source {
            EnergySource::Grid => 0.0,
            EnergySource::Other(name) => {
                consumption * self.source_factor(name, EmissionFactorKind::Biogenic, reference)
                    / 1000.0
            }
        }
    }
}

/// Sum of the present values of `columns` in `row`, null when none is present
fn sum_months(row: &Row<'_>, columns: &[String]) -> Option<FloatValue> {
    columns
        .iter()
        .filter_map(|c| row.number(c))
        .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
}

impl InventoryModule for ForestryEnergy {
    fn name(&self) -> &'static str {
        MODULE
    }

    fn definitions(&self) -> Vec<ColumnDefinition> {
        let mut definitions = vec![
            ColumnDefinition::input(YEAR, "year"),
            ColumnDefinition::input(ENERGY_SOURCE, "name"),
        ];
        definitions.extend(
            Month::ALL
                .iter()
                .map(|m| ColumnDefinition::optional_input(&consumption_column(*m), "MWh")),
        );
        for month in Month::ALL {
            definitions.push(ColumnDefinition::output(&emission_column(month), "t CO2"));
            definitions.push(ColumnDefinition::output(&biogenic_column(month), "t CO2e"));
        }
        definitions.push(ColumnDefinition::output(TOTAL, "t CO2e"));
        definitions.push(ColumnDefinition::output(BIOGENIC_TOTAL, "t CO2e"));
        definitions
    }

    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()> {
        self.validate_inputs(table)?;
        info!(module = MODULE, rows = table.len(), "Calculating energy emissions");

        for month in Month::ALL {
            let consumption = consumption_column(month);
            table.derive_number(&emission_column(month), |row| {
                let value = row.number(&consumption)?;
                self.monthly_emission(&source_of(row), year_of(row), month, value, reference)
            });
            table.derive_number(&biogenic_column(month), |row| {
                row.number(&consumption)
                    .map(|value| self.monthly_biogenic(&source_of(row), value, reference))
            });
        }

        let emissions: Vec<String> = Month::ALL.iter().map(|m| emission_column(*m)).collect();
        let biogenic: Vec<String> = Month::ALL.iter().map(|m| biogenic_column(*m)).collect();
        table.derive_number(TOTAL, |row| sum_months(row, &emissions));
        table.derive_number(BIOGENIC_TOTAL, |row| sum_months(row, &biogenic));

        Ok(())
    }

    fn summary_columns(&self) -> Vec<&'static str> {
        vec![TOTAL, BIOGENIC_TOTAL]
    }

    fn summarise(&self, table: &Table) -> Summary {
        let consumption: FloatValue = Month::ALL
            .iter()
            .filter_map(|m| table.column_sum(&consumption_column(*m)))
            .sum();

        let mut summary = Summary::new();
        summary.push(CONSUMPTION_TOTAL, consumption);
        for entry in &Summary::from_table(table, &self.summary_columns()) {
            summary.push(&entry.column, entry.total);
        }
        summary
    }
}
