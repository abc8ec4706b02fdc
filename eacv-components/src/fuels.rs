//! Forestry Fuels Module
//!
//! Emissions of the fuels burnt by forestry equipment, split into the
//! combustion phase (off-road mobile combustion) and the production phase
//! (carbon footprint of producing the fuel).
//!
//! # What This Module Does
//!
//! 1. Combustion: CO2, biogenic CO2, CH4 and N2O per row from the off-road
//!    factors of the fuel and, for blended fuels, of its biofuel component.
//!    The gases are combined into tCO2e with the AR6 GWPs.
//!
//! 2. Production: consumption is converted to mass with a density-weighted
//!    blend, then multiplied by the fossil, biogenic and LUC emission factors
//!    of the carbon-footprint fuel name.
//!
//! # Blended Fuels
//!
//! | Fuel | Blend component | Default fraction |
//! |------|-----------------|------------------|
//! | gasolina automotiva | álcool etílico anidro | 0.27 |
//! | óleo diesel | biodiesel | 0.10 |
//!
//! For a blend with component fraction $f$ and consumption $Q$ (m3 × 1000):
//!
//! $$CO_2 = \frac{Q}{1000} (1 - f) \cdot EF_{CO_2,base} \cdot EC_{base} \cdot 1000$$
//! $$CO_{2,bio} = \frac{Q}{1000} f \cdot EF_{CO_2,comp} \cdot EC_{comp} \cdot 1000$$
//! $$X = \frac{Q}{1000} \left[(1 - f) EF_{X,base} EC_{base} + f \cdot EF_{X,comp} EC_{comp}\right] 1000$$
//!
//! for $X \in \{CH_4, N_2O\}$, where $EF$ is the off-road factor (t/GJ) and
//! $EC$ the energy content (GJ/m3).
//!
//! Acetylene is consumed by mass: it has no combustion emissions here and
//! its consumption is used directly as its mass. Any other fuel has zero
//! combustion emissions and zero mass.
//!
//! # Inputs
//!
//! - `Combustível (Nomenclatura Inv. GEE)` - fuel name in the GHG inventory nomenclature
//! - `Combustível (Nomenclatura Pegada de Carbono)` - fuel name in the emission factor table
//! - `Consumo` - consumption
//!
//! # Outputs
//!
//! See [`ForestryFuels::definitions`](crate::InventoryModule::definitions), in order of calculation.

use crate::module::{or_zero, InventoryModule};
use crate::parameters::FuelParameters;
use eacv_core::columns::ColumnDefinition;
use eacv_core::errors::EacvResult;
use eacv_core::reference::{EmissionFactorKind, GwpTable, OffRoadColumn, ReferenceData};
use eacv_core::table::{Row, Table};
use eacv_core::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const FUEL_INVENTORY_NAME: &str = "Combustível (Nomenclatura Inv. GEE)";
pub const FUEL_FOOTPRINT_NAME: &str = "Combustível (Nomenclatura Pegada de Carbono)";
pub const CONSUMPTION: &str = "Consumo";

pub const ETHANOL_FRACTION: &str = "Fração de Etanol";
pub const BIODIESEL_FRACTION: &str = "Fração de Biodiesel";
pub const CO2_KG: &str = "Emissões CO2 (kgCO2)";
pub const BIOGENIC_CO2_KG: &str = "Emissões CO2 - biogênico (kgCO2)";
pub const CH4_KG: &str = "Emissões CH4 (kgCH4)";
pub const N2O_KG: &str = "Emissões N2O (kgN2O)";
pub const FOSSIL_COMBUSTION: &str = "Emissões Fósseis Combustão (tCO2e)";
pub const BIOGENIC_COMBUSTION: &str = "Emissões Biogênicas Combustão (tCO2e)";
pub const CONSUMPTION_KG: &str = "Consumo (KG)";
pub const PRODUCTION_FOSSIL: &str = "Emissões CO2 Fósseis - Produção (tCO2)";
pub const PRODUCTION_BIOGENIC: &str = "Emissões CO2 Biogênico - Produção (tCO2)";
pub const PRODUCTION_LUC: &str = "Emissões CO2 LUC - Produção (tCO2)";
pub const TOTAL_FOSSIL: &str = "Emissões Fósseis Totais (tCO2e)";
pub const TOTAL_BIOGENIC: &str = "Emissões Biogênicas Totais (tCO2e)";

const GASOLINE: &str = "gasolina automotiva";
const ANHYDROUS_ETHANOL: &str = "álcool etílico anidro";
const DIESEL: &str = "óleo diesel";
const BIODIESEL: &str = "biodiesel";
const ACETYLENE: &str = "acetileno";

const MODULE: &str = "fuels";

/// Fuel named in the GHG inventory nomenclature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fuel {
    /// Automotive gasoline, blended with anhydrous ethanol
    Gasoline,
    /// Diesel oil, blended with biodiesel
    Diesel,
    /// Acetylene, consumed by mass
    Acetylene,
    /// Any other fuel (normalised name)
    Other(String),
}

impl Fuel {
    pub fn from_name(name: &str) -> Self {
        match normalise_key(name).as_str() {
            GASOLINE => Fuel::Gasoline,
            DIESEL => Fuel::Diesel,
            ACETYLENE => Fuel::Acetylene,
            other => Fuel::Other(other.to_string()),
        }
    }

    /// Name of the fuel in the reference tables
    pub fn name(&self) -> &str {
        match self {
            Fuel::Gasoline => GASOLINE,
            Fuel::Diesel => DIESEL,
            Fuel::Acetylene => ACETYLENE,
            Fuel::Other(name) => name.as_str(),
        }
    }
}

/// A fossil fuel blended with a fixed fraction of a biofuel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    /// Reference name of the fossil fuel
    pub base: &'static str,
    /// Reference name of the biofuel
    pub component: &'static str,
    /// Share of the biofuel
    pub fraction: FloatValue,
}

impl Blend {
    /// Weight `base_value` and `component_value` by the blend fractions
    pub fn weigh(&self, base_value: FloatValue, component_value: FloatValue) -> FloatValue {
        (1.0 - self.fraction) * base_value + self.fraction * component_value
    }
}

fn fuel_of(row: &Row<'_>) -> Fuel {
    Fuel::from_name(&row.text(FUEL_INVENTORY_NAME).unwrap_or_default())
}

/// Fuel combustion and production emissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForestryFuels {
    parameters: FuelParameters,
}

impl ForestryFuels {
    /// Create a new fuels module with default parameters
    pub fn new() -> Self {
        Self::from_parameters(FuelParameters::default())
    }

    pub fn from_parameters(parameters: FuelParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &FuelParameters {
        &self.parameters
    }

    /// Blend of a regulated fuel, `None` for pure fuels
    pub fn blend(&self, fuel: &Fuel) -> Option<Blend> {
        match fuel {
            Fuel::Gasoline => Some(Blend {
                base: GASOLINE,
                component: ANHYDROUS_ETHANOL,
                fraction: self.parameters.ethanol_fraction,
            }),
            Fuel::Diesel => Some(Blend {
                base: DIESEL,
                component: BIODIESEL,
                fraction: self.parameters.biodiesel_fraction,
            }),
            Fuel::Acetylene | Fuel::Other(_) => None,
        }
    }

    fn off_road(&self, reference: &ReferenceData, fuel: &str, column: OffRoadColumn) -> FloatValue {
        let factor = match column {
            OffRoadColumn::Co2 => "co2_tco2_gj",
            OffRoadColumn::Ch4 => "ch4_tch4_gj",
            OffRoadColumn::N2o => "n2o_tn2o_gj",
            OffRoadColumn::EnergyContent => "energy_content_gj_m3",
        };
        or_zero(reference.off_road.lookup(fuel, column), MODULE, factor, fuel)
    }

    /// Emission of a species per unit of consumption (/1000) for one fuel
    fn specific_emission(
        &self,
        reference: &ReferenceData,
        fuel: &str,
        column: OffRoadColumn,
    ) -> FloatValue {
        self.off_road(reference, fuel, column)
            * self.off_road(reference, fuel, OffRoadColumn::EnergyContent)
    }

    /// Fossil CO2 from combustion (kg)
    pub fn co2_kg(&self, fuel: &Fuel, consumption: FloatValue, reference: &ReferenceData) -> FloatValue {
        match self.blend(fuel) {
            Some(blend) => {
                (consumption / 1000.0)
                    * (1.0 - blend.fraction)
                    * self.specific_emission(reference, blend.base, OffRoadColumn::Co2)
                    * 1000.0
            }
            None => 0.0,
        }
    }

    /// Biogenic CO2 from combustion of the biofuel component (kg)
    pub fn biogenic_co2_kg(
        &self,
        fuel: &Fuel,
        consumption: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        match self.blend(fuel) {
            Some(blend) => {
                (consumption / 1000.0)
                    * blend.fraction
                    * self.specific_emission(reference, blend.component, OffRoadColumn::Co2)
                    * 1000.0
            }
            None => 0.0,
        }
    }

    fn blended_species_kg(
        &self,
        fuel: &Fuel,
        consumption: FloatValue,
        column: OffRoadColumn,
        reference: &ReferenceData,
    ) -> FloatValue {
        match self.blend(fuel) {
            Some(blend) => {
                let base = self.specific_emission(reference, blend.base, column);
                let component = self.specific_emission(reference, blend.component, column);
                (consumption / 1000.0) * blend.weigh(base, component) * 1000.0
            }
            None => 0.0,
        }
    }

    /// CH4 from combustion (kg)
    pub fn ch4_kg(&self, fuel: &Fuel, consumption: FloatValue, reference: &ReferenceData) -> FloatValue {
        self.blended_species_kg(fuel, consumption, OffRoadColumn::Ch4, reference)
    }

    /// N2O from combustion (kg)
    pub fn n2o_kg(&self, fuel: &Fuel, consumption: FloatValue, reference: &ReferenceData) -> FloatValue {
        self.blended_species_kg(fuel, consumption, OffRoadColumn::N2o, reference)
    }

    /// Fossil combustion emissions (tCO2e)
    ///
    /// $$\frac{CO_2 + CH_4 \cdot GWP_{CH_4} + N_2O \cdot GWP_{N_2O}}{1000}$$
    pub fn combustion_tco2e(
        &self,
        co2_kg: FloatValue,
        ch4_kg: FloatValue,
        n2o_kg: FloatValue,
        gwp: &GwpTable,
    ) -> FloatValue {
        gwp.co2_equivalent(co2_kg, ch4_kg, n2o_kg) / 1000.0
    }

    /// Mass of fuel consumed.
    ///
    /// Blends use the density of each part weighted by the blend fractions,
    /// divided by 1000. Acetylene consumption is already a mass.
    pub fn consumption_kg(
        &self,
        fuel: &Fuel,
        consumption: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        match (fuel, self.blend(fuel)) {
            (_, Some(blend)) => {
                let density = |name: &str| {
                    or_zero(reference.densities.lookup(name), MODULE, "density", name)
                };
                consumption * blend.weigh(density(blend.base), density(blend.component)) / 1000.0
            }
            (Fuel::Acetylene, None) => consumption,
            (_, None) => {
                debug!(fuel = fuel.name(), "Fuel without a mass conversion, using 0");
                0.0
            }
        }
    }

    /// Production-phase emissions (tCO2) of `consumption_kg` of the fuel
    /// named `footprint_name` in the emission factor table
    pub fn production_tco2(
        &self,
        footprint_name: &str,
        consumption_kg: FloatValue,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) -> FloatValue {
        let factor = or_zero(
            reference.emission_factors.lookup(footprint_name, kind),
            MODULE,
            kind.column(),
            footprint_name,
        );
        consumption_kg * factor / 1000.0
    }

    fn derive_production(
        &self,
        table: &mut Table,
        column: &str,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) {
        table.derive_number(column, |row| {
            let consumption_kg = row.number(CONSUMPTION_KG)?;
            let name = row.key(FUEL_FOOTPRINT_NAME).unwrap_or_default();
            Some(self.production_tco2(&name, consumption_kg, kind, reference))
        });
    }
}

impl InventoryModule for ForestryFuels {
    fn name(&self) -> &'static str {
        MODULE
    }

    fn definitions(&self) -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::input(FUEL_INVENTORY_NAME, "name"),
            ColumnDefinition::input(FUEL_FOOTPRINT_NAME, "name"),
            ColumnDefinition::input(CONSUMPTION, "m3 / 1000"),
            ColumnDefinition::output(ETHANOL_FRACTION, "fraction"),
            ColumnDefinition::output(BIODIESEL_FRACTION, "fraction"),
            ColumnDefinition::output(CO2_KG, "kg CO2"),
            ColumnDefinition::output(BIOGENIC_CO2_KG, "kg CO2"),
            ColumnDefinition::output(CH4_KG, "kg CH4"),
            ColumnDefinition::output(N2O_KG, "kg N2O"),
            ColumnDefinition::output(FOSSIL_COMBUSTION, "t CO2e"),
            ColumnDefinition::output(BIOGENIC_COMBUSTION, "t CO2e"),
            ColumnDefinition::output(CONSUMPTION_KG, "kg"),
            ColumnDefinition::output(PRODUCTION_FOSSIL, "t CO2"),
            ColumnDefinition::output(PRODUCTION_BIOGENIC, "t CO2"),
            ColumnDefinition::output(PRODUCTION_LUC, "t CO2"),
            ColumnDefinition::output(TOTAL_FOSSIL, "t CO2e"),
            ColumnDefinition::output(TOTAL_BIOGENIC, "t CO2e"),
        ]
    }

    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()> {
        self.validate_inputs(table)?;
        info!(module = MODULE, rows = table.len(), "Calculating fuel emissions");

        let blend_fraction = |row: &Row<'_>, wanted: Fuel| {
            let fuel = fuel_of(row);
            match self.blend(&fuel) {
                Some(blend) if fuel == wanted => blend.fraction,
                _ => 0.0,
            }
        };
        table.derive_number(ETHANOL_FRACTION, |row| Some(blend_fraction(row, Fuel::Gasoline)));
        table.derive_number(BIODIESEL_FRACTION, |row| Some(blend_fraction(row, Fuel::Diesel)));

        // Combustion
        table.derive_number(CO2_KG, |row| {
            row.number(CONSUMPTION)
                .map(|c| self.co2_kg(&fuel_of(row), c, reference))
        });
        table.derive_number(BIOGENIC_CO2_KG, |row| {
            row.number(CONSUMPTION)
                .map(|c| self.biogenic_co2_kg(&fuel_of(row), c, reference))
        });
        table.derive_number(CH4_KG, |row| {
            row.number(CONSUMPTION)
                .map(|c| self.ch4_kg(&fuel_of(row), c, reference))
        });
        table.derive_number(N2O_KG, |row| {
            row.number(CONSUMPTION)
                .map(|c| self.n2o_kg(&fuel_of(row), c, reference))
        });
        table.derive_number(FOSSIL_COMBUSTION, |row| {
            Some(self.combustion_tco2e(
                row.number(CO2_KG)?,
                row.number(CH4_KG)?,
                row.number(N2O_KG)?,
                &reference.gwp,
            ))
        });
        table.derive_number(BIOGENIC_COMBUSTION, |row| {
            row.number(BIOGENIC_CO2_KG).map(|kg| kg / 1000.0)
        });

        // Production
        table.derive_number(CONSUMPTION_KG, |row| {
            row.number(CONSUMPTION)
                .map(|c| self.consumption_kg(&fuel_of(row), c, reference))
        });
        self.derive_production(table, PRODUCTION_FOSSIL, EmissionFactorKind::Fossil, reference);
        self.derive_production(table, PRODUCTION_BIOGENIC, EmissionFactorKind::Biogenic, reference);
        self.derive_production(table, PRODUCTION_LUC, EmissionFactorKind::Luc, reference);

        // Totals
        table.derive_number(TOTAL_FOSSIL, |row| {
            Some(row.number(PRODUCTION_FOSSIL)? + row.number(FOSSIL_COMBUSTION)?)
        });
        table.derive_number(TOTAL_BIOGENIC, |row| {
            Some(row.number(BIOGENIC_COMBUSTION)? + row.number(PRODUCTION_BIOGENIC)?)
        });

        Ok(())
    }

    fn summary_columns(&self) -> Vec<&'static str> {
        vec![
            CO2_KG,
            BIOGENIC_CO2_KG,
            CH4_KG,
            N2O_KG,
            FOSSIL_COMBUSTION,
            BIOGENIC_COMBUSTION,
            CONSUMPTION_KG,
            PRODUCTION_FOSSIL,
            PRODUCTION_BIOGENIC,
            PRODUCTION_LUC,
            TOTAL_FOSSIL,
            TOTAL_BIOGENIC,
        ]
    }
}
