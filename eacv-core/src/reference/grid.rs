//! Monthly electricity grid emission factors.

use crate::errors::EacvResult;
use crate::io::{read_records, read_records_from_path, reference_number};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month name as used in the spreadsheet headers
    pub fn portuguese(&self) -> &'static str {
        match self {
            Month::January => "Janeiro",
            Month::February => "Fevereiro",
            Month::March => "Março",
            Month::April => "Abril",
            Month::May => "Maio",
            Month::June => "Junho",
            Month::July => "Julho",
            Month::August => "Agosto",
            Month::September => "Setembro",
            Month::October => "Outubro",
            Month::November => "Novembro",
            Month::December => "Dezembro",
        }
    }
}

/// Grid emission factors of one year.
///
/// Monthly factors are in tCO2/MWh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridFactors {
    pub year: i32,
    #[serde(deserialize_with = "reference_number")]
    pub january: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub february: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub march: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub april: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub may: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub june: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub july: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub august: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub september: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub october: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub november: Option<FloatValue>,
    #[serde(deserialize_with = "reference_number")]
    pub december: Option<FloatValue>,
    #[serde(default, deserialize_with = "reference_number")]
    pub avg_annual_factor_tco2_mwh: Option<FloatValue>,
    #[serde(default, deserialize_with = "reference_number")]
    pub avg_annual_factor_tco2_gj: Option<FloatValue>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl GridFactors {
    pub fn month(&self, month: Month) -> Option<FloatValue> {
        match month {
            Month::January => self.january,
            Month::February => self.february,
            Month::March => self.march,
            Month::April => self.april,
            Month::May => self.may,
            Month::June => self.june,
            Month::July => self.july,
            Month::August => self.august,
            Month::September => self.september,
            Month::October => self.october,
            Month::November => self.november,
            Month::December => self.december,
        }
    }
}

/// Grid factors indexed by year
#[derive(Debug, Clone, Default)]
pub struct GridFactorTable {
    years: BTreeMap<i32, GridFactors>,
}

impl GridFactorTable {
    pub fn from_records(records: impl IntoIterator<Item = GridFactors>) -> Self {
        let mut years = BTreeMap::new();
        for record in records {
            years.entry(record.year).or_insert(record);
        }
        Self { years }
    }

    pub fn from_reader<R: Read>(reader: R) -> EacvResult<Self> {
        Ok(Self::from_records(read_records::<GridFactors, _>(reader)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EacvResult<Self> {
        Ok(Self::from_records(read_records_from_path::<GridFactors>(path)?))
    }

    pub fn get(&self, year: i32) -> Option<&GridFactors> {
        self.years.get(&year)
    }

    pub fn lookup(&self, year: i32, month: Month) -> Option<FloatValue> {
        self.get(year).and_then(|f| f.month(month))
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let data = "\
year,january,february,march,april,may,june,july,august,september,october,november,december,avg_annual_factor_tco2_mwh,avg_annual_factor_tco2_gj,notes
2022,0.04,0.05,0.06,0.07,0.08,0.09,0.1,0.11,0.12,0.13,0.14,0.15,0.0426,0.0118,SIN
2023,0.03,,,,,,,,,,,0.02,,,
";
        let table = GridFactorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.years().collect::<Vec<_>>(), vec![2022, 2023]);
        assert_eq!(table.lookup(2022, Month::March), Some(0.06));
        assert_eq!(table.lookup(2023, Month::December), Some(0.02));
        assert_eq!(table.lookup(2023, Month::June), None);
        assert_eq!(table.lookup(2021, Month::January), None);
        assert_eq!(
            table.get(2022).and_then(|f| f.notes.as_deref()),
            Some("SIN")
        );
    }

    #[test]
    fn test_bad_year_row_is_skipped() {
        let data = "\
year,january,february,march,april,may,june,july,august,september,october,november,december
2022,\"0,04\",x,,,,,,,,,,
média,0.05,,,,,,,,,,,
2023,0.03,,,,,,,,,,,
";
        let table = GridFactorTable::from_reader(data.as_bytes()).unwrap();

        assert_eq!(table.years().collect::<Vec<_>>(), vec![2022, 2023]);
        assert_eq!(table.lookup(2022, Month::January), Some(0.04));
        assert_eq!(table.lookup(2022, Month::February), None);
        assert_eq!(table.lookup(2023, Month::January), Some(0.03));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(Month::ALL.len(), 12);
        assert_eq!(Month::March.portuguese(), "Março");
    }
}
