// src/process/normalize.rs

use crate::error::{DashboardError, Result};
use crate::process::convert::coerce_number;
use crate::process::raw_table::{RawRow, RawTable};
use crate::process::schema::{ColumnKind, Field, COLUMNS, MIN_CELLS};
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// Upstream emits an "Oceania" rollup whose continent cell reads
/// "Australia/Oceania", so the continent-duplicate rule misses it.
pub const OCEANIA_ARTIFACT: &str = "Oceania";

/// One reporting unit (country, territory, or the "World" rollup).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CountryRecord {
    /// Identifier as shown upstream; never empty after normalization.
    pub country: String,
    pub continent: String,
    pub population: f64,
    pub total_cases: f64,
    pub new_cases: f64,
    pub total_deaths: f64,
    pub new_deaths: f64,
    pub total_recovered: f64,
    pub new_recovered: f64,
    pub active_cases: f64,
    pub serious_critical: f64,
    pub total_tests: f64,
    pub cases_per_million: f64,
    pub deaths_per_million: f64,
    pub tests_per_million: f64,
}

impl CountryRecord {
    /// Numeric value of `field`, `None` for the text columns.
    pub fn number(&self, field: Field) -> Option<f64> {
        let v = match field {
            Field::Country | Field::Continent => return None,
            Field::TotalCases => self.total_cases,
            Field::NewCases => self.new_cases,
            Field::TotalDeaths => self.total_deaths,
            Field::NewDeaths => self.new_deaths,
            Field::TotalRecovered => self.total_recovered,
            Field::NewRecovered => self.new_recovered,
            Field::ActiveCases => self.active_cases,
            Field::SeriousCritical => self.serious_critical,
            Field::CasesPerMillion => self.cases_per_million,
            Field::DeathsPerMillion => self.deaths_per_million,
            Field::TotalTests => self.total_tests,
            Field::TestsPerMillion => self.tests_per_million,
            Field::Population => self.population,
        };
        Some(v)
    }

    fn set(&mut self, field: Field, raw: &str) {
        let slot = match field {
            Field::Country => {
                self.country = raw.to_string();
                return;
            }
            Field::Continent => {
                self.continent = raw.to_string();
                return;
            }
            Field::TotalCases => &mut self.total_cases,
            Field::NewCases => &mut self.new_cases,
            Field::TotalDeaths => &mut self.total_deaths,
            Field::NewDeaths => &mut self.new_deaths,
            Field::TotalRecovered => &mut self.total_recovered,
            Field::NewRecovered => &mut self.new_recovered,
            Field::ActiveCases => &mut self.active_cases,
            Field::SeriousCritical => &mut self.serious_critical,
            Field::CasesPerMillion => &mut self.cases_per_million,
            Field::DeathsPerMillion => &mut self.deaths_per_million,
            Field::TotalTests => &mut self.total_tests,
            Field::TestsPerMillion => &mut self.tests_per_million,
            Field::Population => &mut self.population,
        };
        debug_assert_eq!(field.kind(), ColumnKind::Numeric);
        *slot = coerce_number(raw);
    }

    /// Map a raw row onto the column schema.
    pub fn from_row(row: &RawRow) -> Result<Self> {
        if row.len() < MIN_CELLS {
            return Err(DashboardError::Parse(format!(
                "row has {} cells, expected at least {}",
                row.len(),
                MIN_CELLS
            )));
        }
        let mut rec = CountryRecord::default();
        for col in COLUMNS.iter() {
            rec.set(col.field, &row.cells[col.position]);
        }
        Ok(rec)
    }
}

/// Whether a row describes a single reporting unit rather than a
/// continent rollup or an empty spacer.
pub fn keep_row(country: &str, continent: &str) -> bool {
    !country.is_empty() && country != continent && country != OCEANIA_ARTIFACT
}

/// Raw table → records, dropping rollup rows. Order is preserved.
#[instrument(level = "debug", skip(table), fields(table_id = %table.table_id, rows = table.rows.len()))]
pub fn normalize(table: &RawTable) -> Result<Vec<CountryRecord>> {
    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let rec = CountryRecord::from_row(row)?;
        if !keep_row(&rec.country, &rec.continent) {
            trace!(country = %rec.country, continent = %rec.continent, "dropping rollup row");
            continue;
        }
        out.push(rec);
    }
    debug!(kept = out.len(), dropped = table.rows.len() - out.len(), "normalized");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, continent: &str, cases: &str, population: &str) -> RawRow {
        let mut cells = vec![String::new(); MIN_CELLS];
        cells[1] = country.into();
        cells[2] = cases.into();
        cells[14] = population.into();
        cells[15] = continent.into();
        RawRow::new(cells)
    }

    fn table(rows: Vec<RawRow>) -> RawTable {
        RawTable {
            table_id: "t".into(),
            rows,
        }
    }

    #[test]
    fn continent_duplicate_is_dropped() {
        let t = table(vec![
            row("World", "All", "100", "1000"),
            row("CountryA", "Asia", "50", "500"),
            row("CountryA", "CountryA", "50", "500"),
        ]);
        let recs = normalize(&t).unwrap();
        let names: Vec<_> = recs.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["World", "CountryA"]);
        assert_eq!(recs[1].continent, "Asia");
    }

    #[test]
    fn oceania_and_blank_rows_are_dropped() {
        let t = table(vec![
            row("Oceania", "Australia/Oceania", "1", "1"),
            row("", "Asia", "1", "1"),
            row("Fiji", "Australia/Oceania", "1", "1"),
        ]);
        let recs = normalize(&t).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].country, "Fiji");
    }

    #[test]
    fn numeric_cells_are_coerced() {
        let t = table(vec![row("Peru", "South America", "+1,234", "N/A")]);
        let rec = &normalize(&t).unwrap()[0];
        assert_eq!(rec.total_cases, 1234.0);
        assert_eq!(rec.population, 0.0);
        assert_eq!(rec.total_tests, 0.0);
        assert_eq!(rec.number(Field::TotalCases), Some(1234.0));
        assert_eq!(rec.number(Field::Country), None);
    }

    #[test]
    fn short_row_is_rejected() {
        let short = RawRow::new(vec!["1".into(); 10]);
        assert!(matches!(
            CountryRecord::from_row(&short),
            Err(DashboardError::Parse(_))
        ));
    }

    #[test]
    fn keep_row_rules() {
        assert!(keep_row("France", "Europe"));
        assert!(keep_row("Diamond Princess", ""));
        assert!(!keep_row("Europe", "Europe"));
        assert!(!keep_row("Oceania", "Australia/Oceania"));
        assert!(!keep_row("", "Asia"));
        assert!(!keep_row("", ""));
    }
}
