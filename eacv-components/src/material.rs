//! Material Footprint Module
//!
//! Emissions embodied in the materials consumed by industrial processes and
//! quartz mining. Each row names a material as it appears in the emission
//! factor table; the row is annotated with the factors found and multiplied
//! by the consumed quantity:
//!
//! $$E_k = Q \cdot EF_k \quad k \in \{fossil, biogenic, removal, LUC\}$$
//!
//! Both inventories use the same calculation and differ only in the column
//! naming the material, see [`MaterialKind`].
//!
//! A blank quantity counts as zero and a blank material name as `-`.
//! Materials missing from the table are reported with zero factors and
//! [`NOT_FOUND`] as source and unit.

use crate::module::{or_zero, InventoryModule};
use eacv_core::columns::ColumnDefinition;
use eacv_core::errors::EacvResult;
use eacv_core::reference::{EmissionFactorKind, ReferenceData};
use eacv_core::table::{Row, Table};
use eacv_core::{normalise_key, FloatValue};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const QUANTITY: &str = "Quantidade";
pub const INDUSTRIAL_NAME: &str = "Nome no Estudo (Ecoinvent)";
pub const QUARTZ_MINING_NAME: &str = "Nome no estudo";

pub const FACTOR_SOURCE: &str = "Fonte do Fator de Emissão";
pub const FOSSIL_FACTOR: &str = "Fator de Emissão Fóssil";
pub const BIOGENIC_FACTOR: &str = "Fator de Emissão Biogênico";
pub const REMOVAL_FACTOR: &str = "Fator de Remoção Biogênica";
pub const LUC_FACTOR: &str = "Fator de Emissão LUC";
pub const FACTOR_UNIT: &str = "Unidade - Fator";
pub const FOSSIL_EMISSIONS: &str = "Emissões Fósseis (tCO2e)";
pub const BIOGENIC_EMISSIONS: &str = "Emissões Biogênicas (tCO2e)";
pub const BIOGENIC_REMOVALS: &str = "Remoções biogênicas (tCO2e)";
pub const LUC_EMISSIONS: &str = "Emissões LUC (tCO2e)";

/// Placeholder for a source or unit missing from the reference data
pub const NOT_FOUND: &str = "Não encontrado";
const BLANK_NAME: &str = "-";

/// Factor columns with the factor each one holds and the emission column it feeds
const FACTORS: [(&str, EmissionFactorKind, &str); 4] = [
    (FOSSIL_FACTOR, EmissionFactorKind::Fossil, FOSSIL_EMISSIONS),
    (BIOGENIC_FACTOR, EmissionFactorKind::Biogenic, BIOGENIC_EMISSIONS),
    (REMOVAL_FACTOR, EmissionFactorKind::BiogenicRemoval, BIOGENIC_REMOVALS),
    (LUC_FACTOR, EmissionFactorKind::Luc, LUC_EMISSIONS),
];

/// Inventory a material table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    Industrial,
    QuartzMining,
}

impl MaterialKind {
    /// Column naming the material
    pub fn name_column(&self) -> &'static str {
        match self {
            MaterialKind::Industrial => INDUSTRIAL_NAME,
            MaterialKind::QuartzMining => QUARTZ_MINING_NAME,
        }
    }

    pub fn module_name(&self) -> &'static str {
        match self {
            MaterialKind::Industrial => "industrial",
            MaterialKind::QuartzMining => "quartz-mining",
        }
    }
}

/// Emission factors and footprint of consumed materials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialFootprint {
    kind: MaterialKind,
}

impl MaterialFootprint {
    pub fn new(kind: MaterialKind) -> Self {
        Self { kind }
    }

    pub fn industrial() -> Self {
        Self::new(MaterialKind::Industrial)
    }

    pub fn quartz_mining() -> Self {
        Self::new(MaterialKind::QuartzMining)
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    /// Normalised material name of a row, `-` when blank
    fn material_of(&self, row: &Row<'_>) -> String {
        row.key(self.kind.name_column())
            .unwrap_or_else(|| BLANK_NAME.to_string())
    }

    pub fn source(&self, material: &str, reference: &ReferenceData) -> String {
        reference
            .emission_factors
            .source(material)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NOT_FOUND)
            .to_string()
    }

    pub fn unit(&self, material: &str, reference: &ReferenceData) -> String {
        reference
            .emission_factors
            .unit(material)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(NOT_FOUND)
            .to_string()
    }

    pub fn factor(
        &self,
        material: &str,
        kind: EmissionFactorKind,
        reference: &ReferenceData,
    ) -> FloatValue {
        or_zero(
            reference.emission_factors.lookup(material, kind),
            self.kind.module_name(),
            kind.column(),
            material,
        )
    }
}

impl InventoryModule for MaterialFootprint {
    fn name(&self) -> &'static str {
        self.kind.module_name()
    }

    fn definitions(&self) -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::input(QUANTITY, "unit of the factor"),
            ColumnDefinition::input(self.kind.name_column(), "name"),
            ColumnDefinition::output(FACTOR_SOURCE, "text"),
            ColumnDefinition::output(FOSSIL_FACTOR, "t CO2e / unit"),
            ColumnDefinition::output(BIOGENIC_FACTOR, "t CO2e / unit"),
            ColumnDefinition::output(REMOVAL_FACTOR, "t CO2e / unit"),
            ColumnDefinition::output(LUC_FACTOR, "t CO2e / unit"),
            ColumnDefinition::output(FACTOR_UNIT, "text"),
            ColumnDefinition::output(FOSSIL_EMISSIONS, "t CO2e"),
            ColumnDefinition::output(BIOGENIC_EMISSIONS, "t CO2e"),
            ColumnDefinition::output(BIOGENIC_REMOVALS, "t CO2e"),
            ColumnDefinition::output(LUC_EMISSIONS, "t CO2e"),
        ]
    }

    fn process(&self, table: &mut Table, reference: &ReferenceData) -> EacvResult<()> {
        self.validate_inputs(table)?;
        info!(module = self.name(), rows = table.len(), "Calculating material footprint");

        table.derive_text(FACTOR_SOURCE, |row| {
            self.source(&self.material_of(row), reference)
        });
        for (column, kind, _) in FACTORS {
            table.derive_number(column, |row| {
                Some(self.factor(&self.material_of(row), kind, reference))
            });
        }
        table.derive_text(FACTOR_UNIT, |row| self.unit(&self.material_of(row), reference));
        for (factor, _, column) in FACTORS {
            table.derive_number(column, |row| {
                Some(row.number_filled(QUANTITY)? * row.number(factor)?)
            });
        }

        Ok(())
    }

    fn summary_columns(&self) -> Vec<&'static str> {
        vec![FOSSIL_EMISSIONS, BIOGENIC_EMISSIONS, BIOGENIC_REMOVALS, LUC_EMISSIONS]
    }
}

/// Whether a row's material was found in the reference data
pub fn is_matched(row: &Row<'_>) -> bool {
    row.text(FACTOR_UNIT)
        .map_or(false, |unit| normalise_key(&unit) != normalise_key(NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use eacv_core::reference::{EmissionFactor, EmissionFactorTable};
    use eacv_core::table::Cell;

    fn reference() -> ReferenceData {
        ReferenceData {
            emission_factors: EmissionFactorTable::from_records([
                EmissionFactor {
                    name: "Explosivo, tovex".to_string(),
                    fossil_emission_factor: Some(1.8),
                    biogenic_emission_factor: Some(0.02),
                    biogenic_removal_factor: Some(-0.01),
                    luc_emission_factor: Some(0.005),
                    unit: Some("tCO2e/t".to_string()),
                    source: Some("Ecoinvent 3.10".to_string()),
                },
                EmissionFactor {
                    name: "Cal virgem".to_string(),
                    fossil_emission_factor: Some(1.2),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        }
    }

    fn material_table(name_column: &str, rows: Vec<(Cell, Cell)>) -> Table {
        Table::from_rows(
            vec![QUANTITY.to_string(), name_column.to_string()],
            rows.into_iter().map(|(q, n)| vec![q, n]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_kinds() {
        assert_eq!(MaterialFootprint::industrial().name(), "industrial");
        assert_eq!(MaterialKind::Industrial.name_column(), INDUSTRIAL_NAME);
        assert_eq!(MaterialKind::QuartzMining.name_column(), QUARTZ_MINING_NAME);
    }

    #[test]
    fn test_process_matched_material() {
        let module = MaterialFootprint::industrial();
        let mut table = material_table(
            INDUSTRIAL_NAME,
            vec![(Cell::Number(10.0), Cell::from("explosivo, TOVEX"))],
        );
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.cell(0, FACTOR_SOURCE), Some(&Cell::from("Ecoinvent 3.10")));
        assert_eq!(table.cell(0, FACTOR_UNIT), Some(&Cell::from("tCO2e/t")));
        assert_relative_eq!(table.number(0, FOSSIL_EMISSIONS).unwrap(), 18.0);
        assert_relative_eq!(table.number(0, BIOGENIC_EMISSIONS).unwrap(), 0.2);
        assert_relative_eq!(table.number(0, BIOGENIC_REMOVALS).unwrap(), -0.1);
        assert_relative_eq!(table.number(0, LUC_EMISSIONS).unwrap(), 0.05);
        assert!(is_matched(&table.row(0).unwrap()));
    }

    #[test]
    fn test_process_unmatched_material() {
        let module = MaterialFootprint::quartz_mining();
        let mut table = material_table(
            QUARTZ_MINING_NAME,
            vec![
                (Cell::Number(3.0), Cell::from("Diesel em trator")),
                (Cell::Number(3.0), Cell::Empty),
            ],
        );
        module.process(&mut table, &reference()).unwrap();

        for row in 0..2 {
            assert_eq!(table.cell(row, FACTOR_SOURCE), Some(&Cell::from(NOT_FOUND)));
            assert_eq!(table.cell(row, FACTOR_UNIT), Some(&Cell::from(NOT_FOUND)));
            assert_eq!(table.number(row, FOSSIL_FACTOR), Some(0.0));
            assert_eq!(table.number(row, FOSSIL_EMISSIONS), Some(0.0));
            assert!(!is_matched(&table.row(row).unwrap()));
        }
    }

    #[test]
    fn test_partial_factors_default_to_zero() {
        let module = MaterialFootprint::industrial();
        let mut table =
            material_table(INDUSTRIAL_NAME, vec![(Cell::Number(2.0), Cell::from("Cal virgem"))]);
        module.process(&mut table, &reference()).unwrap();

        assert_relative_eq!(table.number(0, FOSSIL_EMISSIONS).unwrap(), 2.4);
        assert_eq!(table.number(0, LUC_EMISSIONS), Some(0.0));
        assert_eq!(table.cell(0, FACTOR_SOURCE), Some(&Cell::from(NOT_FOUND)));
    }

    #[test]
    fn test_blank_quantity_is_zero() {
        let module = MaterialFootprint::industrial();
        let mut table = material_table(
            INDUSTRIAL_NAME,
            vec![
                (Cell::Empty, Cell::from("Explosivo, tovex")),
                (Cell::from("dez"), Cell::from("Explosivo, tovex")),
            ],
        );
        module.process(&mut table, &reference()).unwrap();

        assert_eq!(table.number(0, FOSSIL_EMISSIONS), Some(0.0));
        assert_eq!(table.cell(1, FOSSIL_EMISSIONS), Some(&Cell::Empty));
    }

    #[test]
    fn test_wrong_name_column() {
        let module = MaterialFootprint::quartz_mining();
        let mut table = material_table(INDUSTRIAL_NAME, vec![]);
        assert!(module.process(&mut table, &reference()).is_err());
    }

    #[test]
    fn test_summary() {
        let module = MaterialFootprint::industrial();
        let mut table = material_table(
            INDUSTRIAL_NAME,
            vec![
                (Cell::Number(10.0), Cell::from("Explosivo, tovex")),
                (Cell::Number(2.0), Cell::from("Cal virgem")),
            ],
        );
        module.process(&mut table, &reference()).unwrap();
        let summary = module.summarise(&table);

        assert_eq!(summary.len(), 4);
        assert_relative_eq!(summary.get(FOSSIL_EMISSIONS).unwrap(), 20.4, max_relative = 1e-12);
        assert!(summary.reconciles_with(&table));
    }
}
