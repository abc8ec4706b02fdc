//! Forestry Fertilizers Module
//!
//! Emissions from applying fertilizers and limestone to planted forests,
//! plus the production footprint of the products applied.
//!
//! # Use Emissions
//!
//! Liming releases the carbonate of the applied limestone as CO2. The
//! CaCO3-equivalent of a product is derived from its CaO and MgO content:
//!
//! $$CaCO_{3,eq} = (CaO \cdot k_{CaO} + MgO \cdot k_{MgO}) \cdot m$$
//!
//! and is multiplied by the calcitic or dolomitic limestone factor, depending
//! on the declared limestone category. Products of any other category emit no
//! liming CO2.
//!
//! Nitrogen application emits N2O directly:
//!
//! $$N_2O = m \cdot N \cdot EF_{N_2O}$$
//!
//! # Production Emissions
//!
//! The applied mass is multiplied by the fossil, biogenic and LUC factors of
//! the product (`Nome no Estudo`) in the emission factor table.
//!
//! # Factors
//!
//! All constants are read from the fertilizer factor table by the entry names
//! configured in [`FertilizerParameters`]. Missing entries are treated as zero.

use crate::module::{or_zero, InventoryModule};
use crate::parameters::FertilizerParameters;
use eacv_core::columns::ColumnDefinition;
use eacv_core::errors::EacvResult;
use eacv_core::gas::Gas;
use eacv_core::reference::{EmissionFactorKind, ReferenceData};
use eacv_core::table::{Row, Table};
use eacv_core::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const QUANTITY: &str = "Quantidade utilizada";
pub const STUDY_NAME: &str = "Nome no Estudo";
pub const FERTILIZER: &str = "Fertilizante";
pub const NITROGEN_CONTENT: &str = "Teor de Nitrogênio (%)";
pub const CAO_CONTENT: &str = "Teor de CaO (%)";
pub const MGO_CONTENT: &str = "Teor de MgO (%)";
pub const LIMESTONE_TYPE: &str = "Calcário Calcítico ou Dolomítico";

pub const QUANTITY_KG: &str = "Quantidade para cálculo (kg)";
pub const CACO3_EQUIVALENT: &str =
    "Quantidade de equivalência em carbonato de cálcio aplicada (kg)";
pub const NITROGEN_KG: &str = "Quantidade de N aplicada (kg)";
pub const CO2_KG: &str = "Emissões kgCO2";
pub const N2O_KG: &str = "Emissões kgN2O";
pub const USE_TCO2E: &str = "Emissões Uso tCO2e";
pub const PRODUCTION_FOSSIL: &str = "Emissões Fósseis Produção tCO2e";
pub const PRODUCTION_BIOGENIC: &str = "Emissões Biogênicas Produção tCO2e";
pub const PRODUCTION_LUC: &str = "Emissões LUC Produção tCO2e";
pub const TOTAL: &str = "Emissões totais tCO2e";

const MODULE: &str = "fertilizers";

/// Limestone category of an applied product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limestone {
    Calcitic,
    Dolomitic,
    /// Not limestone, or a category without a liming factor
    Unknown,
}

/// Liming, nitrogen and production emissions of fertilizers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForestryFertilizers {
    parameters: FertilizerParameters,
}

impl ForestryFertilizers {
    pub fn new() -> Self {
        Self::from_parameters(FertilizerParameters::default())
    }

    pub fn from_parameters(parameters: FertilizerParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &FertilizerParameters {
        &self.parameters
    }

    /// Classify a limestone category label
    pub fn limestone(&self, label: &str) -> Limestone {
        let label = normalise_key(label);
        if label == normalise_key(&self.parameters.calcitic_label) {
            Limestone::Calcitic
        } else if label == normalise_key(&self.parameters.dolomitic_label) {
            Limestone::Dolomitic
        } else {
            Limestone::Unknown
        }
    }

    fn factor(&self, reference: &ReferenceData, parameter: &str) -> FloatValue {
        or_zero(
            reference.fertilizer_factors.lookup(parameter),
            MODULE,
            parameter,
            parameter,
        )
    }

    /// Applied mass (kg)
    pub fn quantity_kg(&self, quantity: FloatValue) -> FloatValue {
        quantity * self.parameters.quantity_to_kg
    }

    /// CaCO3-equivalent applied (kg)
    pub fn caco3_equivalent(
        &self,
        cao: FloatValue,
        mgo: FloatValue,
        quantity_kg: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        let cao_factor = cao * self.factor(reference, &self.parameters.cao_to_caco3);
        let mgo_factor = mgo * self.factor(reference, &self.parameters.mgo_to_caco3);
        (cao_factor + mgo_factor) * quantity_kg
    }

    /// Liming CO2 (kg)
    pub fn liming_co2_kg(
        &self,
        limestone: Limestone,
        caco3_equivalent: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        match limestone {
            Limestone::Calcitic => {
                caco3_equivalent
                    * self.factor(reference, &self.parameters.calcitic_limestone_factor)
            }
            Limestone::Dolomitic => {
                caco3_equivalent
                    * self.factor(reference, &self.parameters.dolomitic_limestone_factor)
            }
            Limestone::Unknown => 0.0,
        }
    }

    /// Direct N2O from applied nitrogen (kg)
    pub fn n2o_kg(&self, nitrogen_kg: FloatValue, reference: &ReferenceData) -> FloatValue {
        nitrogen_kg * self.factor(reference, &self.parameters.n2o_emission_factor)
    }

    /// Use-phase emissions (tCO2e)
    pub fn use_tco2e(
        &self,
        co2_kg: FloatValue,
        n2o_kg: FloatValue,
        reference: &ReferenceData,
    ) -> FloatValue {
        (co2_kg + n2o_kg * reference.gwp.ar6(Gas::N2O)) / 1000.0
    }

    /// Production emissions (tCO2e) of `quantity_kg` of the product `name`
    pub fn production_tco2e(
        &self,
        name: &str,
        quantity_kg: FloatValue,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) -> FloatValue {
        let factor = or_zero(
            reference.emission_factors.lookup(name, kind),
            MODULE,
            kind.column(),
            name,
        );
        quantity_kg * factor / 1000.0
    }

    fn limestone_of(&self, row: &Row<'_>) -> Limestone {
        row.text(LIMESTONE_TYPE)
            .map_or(Limestone::Unknown, |label| self.limestone(&label))
    }

    fn derive_production(
        &self,
        table: &mut Table,
        column: &str,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) {
        table.derive_number(column, |row| {
            let quantity_kg = row.number(QUANTITY_KG)?;
            let name = row.key(STUDY_NAME).unwrap_or_default();
            Some(self.production_tco2e(&name, quantity_kg, kind, reference))
        });
    }
}

impl InventoryModule for ForestryFertilizers {
    fn name(&self) -> &'static str {
        MODULE
    }

    fn definitions(&self) -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::input(QUANTITY, "t"),
            ColumnDefinition::input(STUDY_NAME, "name"),
            ColumnDefinition::optional_input(FERTILIZER, "name"),
            ColumnDefinition::optional_input(NITROGEN_CONTENT, "fraction"),
            ColumnDefinition::optional_input(CAO_CONTENT, "fraction"),
            ColumnDefinition::optional_input(MGO_CONTENT, "fraction"),
            ColumnDefinition::optional_input(LIMESTONE_TYPE, "category"),
            ColumnDefinition::output(QUANTITY_KG, "kg"),
            ColumnDefinition::output(CACO3_EQUIVALENT, "kg CaCO3"),
            ColumnDefinition::output(NITROGEN_KG, "kg N"),
            ColumnDefinition::output(CO2_KG, "kg CO2"),
            ColumnDefinition::output(N2O_KG, "kg N2O"),
            ColumnDefinition::output(USE_TCO2E, "t CO2e"),
            ColumnDefinition::output(PRODUCTION_FOSSIL, "t CO2e"),
            ColumnDefinition::output(PRODUCTION_BIOGENIC, "t CO2e"),
            ColumnDefinition::output(PRODUCTION_LUC, "t CO2e"),
            ColumnDefinition::output(TOTAL, "t CO2e"),
        ]
    }

    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()> {
        self.validate_inputs(table)?;
        info!(module = MODULE, rows = table.len(), "Calculating fertilizer emissions");

        table.derive_number(QUANTITY_KG, |row| {
            row.number(QUANTITY).map(|q| self.quantity_kg(q))
        });
        table.derive_number(CACO3_EQUIVALENT, |row| {
            Some(self.caco3_equivalent(
                row.number(CAO_CONTENT)?,
                row.number(MGO_CONTENT)?,
                row.number(QUANTITY_KG)?,
                reference,
            ))
        });
        table.derive_number(NITROGEN_KG, |row| {
            Some(row.number(QUANTITY_KG)? * row.number(NITROGEN_CONTENT)?)
        });
        table.derive_number(CO2_KG, |row| match self.limestone_of(row) {
            Limestone::Unknown => Some(0.0),
            limestone => row
                .number(CACO3_EQUIVALENT)
                .map(|caco3| self.liming_co2_kg(limestone, caco3, reference)),
        });
        table.derive_number(N2O_KG, |row| {
            row.number(NITROGEN_KG).map(|n| self.n2o_kg(n, reference))
        });
        table.derive_number(USE_TCO2E, |row| {
            Some(self.use_tco2e(row.number(CO2_KG)?, row.number(N2O_KG)?, reference))
        });

        self.derive_production(table, PRODUCTION_FOSSIL, EmissionFactorKind::Fossil, reference);
        self.derive_production(table, PRODUCTION_BIOGENIC, EmissionFactorKind::Biogenic, reference);
        self.derive_production(table, PRODUCTION_LUC, EmissionFactorKind::Luc, reference);

        table.derive_number(TOTAL, |row| {
            Some(row.number(PRODUCTION_FOSSIL)? + row.number(USE_TCO2E)?)
        });

        Ok(())
    }

    fn summary_columns(&self) -> Vec<&'static str> {
        vec![
            TOTAL,
            PRODUCTION_FOSSIL,
            PRODUCTION_BIOGENIC,
            PRODUCTION_LUC,
            USE_TCO2E,
            CO2_KG,
            N2O_KG,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use eacv_core::reference::{EmissionFactor, EmissionFactorTable, FactorTable};
    use eacv_core::table::Cell;

    fn reference() -> ReferenceData {
        ReferenceData {
            fertilizer_factors: FactorTable::from_pairs([
                ("n2o_emission_factor", 0.0157),
                ("calcitic_limestone_factor", 0.44),
                ("dolomitic_limestone_factor", 0.477),
                ("cao_to_caco3", 1.785),
                ("mgo_to_caco3", 2.48),
            ]),
            emission_factors: EmissionFactorTable::from_records([EmissionFactor {
                name: "calcário".to_string(),
                fossil_emission_factor: Some(8.0),
                biogenic_emission_factor: Some(0.5),
                luc_emission_factor: Some(0.1),
                ..Default::default()
            }]),
            ..Default::default()
        }
    }

    fn columns() -> Vec<String> {
        [
            QUANTITY,
            STUDY_NAME,
            NITROGEN_CONTENT,
            CAO_CONTENT,
            MGO_CONTENT,
            LIMESTONE_TYPE,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect()
    }

    fn row(quantity: f64, name: &str, n: f64, cao: f64, mgo: f64, limestone: &str) -> Vec<Cell> {
        vec![
            Cell::Number(quantity),
            Cell::from(name),
            Cell::Number(n),
            Cell::Number(cao),
            Cell::Number(mgo),
            Cell::from(limestone),
        ]
    }

    #[test]
    fn test_limestone_labels() {
        let module = ForestryFertilizers::new();
        assert_eq!(module.limestone("Calcítico"), Limestone::Calcitic);
        assert_eq!(module.limestone(" DOLOMÍTICO "), Limestone::Dolomitic);
        assert_eq!(module.limestone("Magnesiano"), Limestone::Unknown);
        assert_eq!(module.limestone(""), Limestone::Unknown);
    }

    #[test]
    fn test_caco3_equivalent() {
        let module = ForestryFertilizers::new();
        let value = module.caco3_equivalent(0.3, 0.1, 2000.0, &reference());
        assert_relative_eq!(value, (0.3 * 1.785 + 0.1 * 2.48) * 2000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_liming_uses_category_factor() {
        let module = ForestryFertilizers::new();
        let reference = reference();
        assert_relative_eq!(
            module.liming_co2_kg(Limestone::Calcitic, 100.0, &reference),
            44.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            module.liming_co2_kg(Limestone::Dolomitic, 100.0, &reference),
            47.7,
            max_relative = 1e-12
        );
        assert_eq!(module.liming_co2_kg(Limestone::Unknown, 100.0, &reference), 0.0);
    }

    #[test]
    fn test_use_tco2e() {
        let module = ForestryFertilizers::new();
        assert_relative_eq!(
            module.use_tco2e(1000.0, 1.0, &reference()),
            (1000.0 + 273.0) / 1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_missing_factor_table_is_zero() {
        let module = ForestryFertilizers::new();
        let reference = ReferenceData::default();
        assert_eq!(module.n2o_kg(100.0, &reference), 0.0);
        assert_eq!(module.caco3_equivalent(0.3, 0.1, 2000.0, &reference), 0.0);
    }

    #[test]
    fn test_process_limestone_row() {
        let module = ForestryFertilizers::new();
        let reference = reference();
        let mut table =
            Table::from_rows(columns(), vec![row(2.0, "Calcário", 0.0, 0.3, 0.1, "Calcítico")])
                .unwrap();
        module.process(&mut table, &reference).unwrap();

        assert_eq!(table.number(0, QUANTITY_KG), Some(2000.0));
        let caco3 = (0.3 * 1.785 + 0.1 * 2.48) * 2000.0;
        assert_relative_eq!(table.number(0, CACO3_EQUIVALENT).unwrap(), caco3, max_relative = 1e-12);
        assert_eq!(table.number(0, NITROGEN_KG), Some(0.0));
        assert_relative_eq!(table.number(0, CO2_KG).unwrap(), caco3 * 0.44, max_relative = 1e-12);
        assert_relative_eq!(
            table.number(0, USE_TCO2E).unwrap(),
            caco3 * 0.44 / 1000.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(table.number(0, PRODUCTION_FOSSIL).unwrap(), 16.0);
        assert_relative_eq!(table.number(0, PRODUCTION_BIOGENIC).unwrap(), 1.0);
        assert_relative_eq!(
            table.number(0, TOTAL).unwrap(),
            16.0 + caco3 * 0.44 / 1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_process_nitrogen_row() {
        let module = ForestryFertilizers::new();
        let mut table =
            Table::from_rows(columns(), vec![row(1.0, "NPK 10-10-10", 0.1, 0.0, 0.0, "")])
                .unwrap();
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.number(0, NITROGEN_KG), Some(100.0));
        assert_eq!(table.number(0, CO2_KG), Some(0.0));
        assert_relative_eq!(table.number(0, N2O_KG).unwrap(), 1.57, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_product_has_zero_production() {
        let module = ForestryFertilizers::new();
        let mut table =
            Table::from_rows(columns(), vec![row(1.0, "Produto X", 0.1, 0.0, 0.0, "")]).unwrap();
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.number(0, PRODUCTION_FOSSIL), Some(0.0));
        assert_eq!(table.number(0, PRODUCTION_BIOGENIC), Some(0.0));
        assert_eq!(table.number(0, PRODUCTION_LUC), Some(0.0));
        assert!(table.number(0, N2O_KG).unwrap() > 0.0);
        assert!(table.number(0, TOTAL).is_some());
    }

    #[test]
    fn test_optional_columns_absent() {
        let module = ForestryFertilizers::new();
        let mut table = Table::from_rows(
            vec![QUANTITY.to_string(), STUDY_NAME.to_string()],
            vec![vec![Cell::Number(1.0), Cell::from("Calcário")]],
        )
        .unwrap();
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.cell(0, CACO3_EQUIVALENT), Some(&Cell::Empty));
        assert_eq!(table.cell(0, NITROGEN_KG), Some(&Cell::Empty));
        assert_eq!(table.number(0, CO2_KG), Some(0.0));
        assert_eq!(table.cell(0, TOTAL), Some(&Cell::Empty));
        assert_relative_eq!(table.number(0, PRODUCTION_FOSSIL).unwrap(), 8.0);
    }

    #[test]
    fn test_summary_totals() {
        let module = ForestryFertilizers::new();
        let mut table = Table::from_rows(
            columns(),
            vec![
                row(2.0, "Calcário", 0.0, 0.3, 0.1, "Dolomítico"),
                row(1.0, "Calcário", 0.05, 0.0, 0.0, ""),
            ],
        )
        .unwrap();
        module.process(&mut table, &reference()).unwrap();
        let summary = module.summarise(&table);

        assert_eq!(summary.len(), 7);
        assert_relative_eq!(
            summary.get(TOTAL).unwrap(),
            table.number(0, TOTAL).unwrap() + table.number(1, TOTAL).unwrap()
        );
        assert!(summary.reconciles_with(&table));
    }
}
