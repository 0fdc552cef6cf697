// src/stats/mod.rs

pub mod ratios;

use crate::error::{DashboardError, Result};
use crate::process::schema::{numeric_fields, Field};
use crate::process::CountryRecord;
use serde::Serialize;
use tracing::{debug, instrument, warn};

pub use ratios::{derive_ratios, DerivedRatios};

/// Identifier of the rollup row that carries the headline numbers.
pub const WORLD: &str = "World";

/// Headline numbers read off the "World" row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Headline {
    pub total_cases: f64,
    pub total_deaths: f64,
    pub total_recovered: f64,
}

/// Everything the presenter needs, derived from one normalized table.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// `None` when the page carried no "World" row.
    pub headline: Option<Headline>,
    pub total_tests: f64,
    pub ratios: Vec<DerivedRatios>,
    pub warnings: Vec<String>,
}

pub fn find_world(records: &[CountryRecord]) -> Result<&CountryRecord> {
    records
        .iter()
        .find(|r| r.country == WORLD)
        .ok_or_else(|| DashboardError::Data(format!("no \"{}\" row in table", WORLD)))
}

pub fn headline(records: &[CountryRecord]) -> Result<Headline> {
    let world = find_world(records)?;
    Ok(Headline {
        total_cases: world.total_cases,
        total_deaths: world.total_deaths,
        total_recovered: world.total_recovered,
    })
}

/// Sum of `total_tests` over every record. The "World" row is included, so
/// its tests are counted on top of the per-country figures.
pub fn total_tests(records: &[CountryRecord]) -> f64 {
    records.iter().map(|r| r.total_tests).sum()
}

/// Numeric columns that are zero in every record, usually a sign the
/// upstream layout shifted under the positional schema.
pub fn zero_columns(records: &[CountryRecord]) -> Vec<Field> {
    if records.is_empty() {
        return Vec::new();
    }
    numeric_fields()
        .filter(|&f| records.iter().all(|r| r.number(f) == Some(0.0)))
        .collect()
}

#[instrument(level = "debug", skip(records), fields(records = records.len()))]
pub fn aggregate(records: &[CountryRecord]) -> Aggregates {
    let mut warnings = Vec::new();

    let headline = match headline(records) {
        Ok(h) => Some(h),
        Err(e) => {
            warn!(error = %e, "headline KPIs unavailable");
            warnings.push(e.to_string());
            None
        }
    };

    for field in zero_columns(records) {
        let e = DashboardError::Data(format!("column {} is zero in every row", field.name()));
        warn!(error = %e, "suspicious column");
        warnings.push(e.to_string());
    }

    let ratios = derive_ratios(records);
    let total_tests = total_tests(records);
    debug!(total_tests, plotted = ratios.len(), "aggregated");

    Aggregates {
        headline,
        total_tests,
        ratios,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, tests: f64, population: f64) -> CountryRecord {
        CountryRecord {
            country: country.into(),
            continent: "Europe".into(),
            total_cases: 10.0,
            total_deaths: 1.0,
            total_recovered: 5.0,
            total_tests: tests,
            population,
            ..CountryRecord::default()
        }
    }

    #[test]
    fn total_tests_counts_world_row_too() {
        let recs = vec![rec(WORLD, 300.0, 1000.0), rec("A", 100.0, 10.0), rec("B", 200.0, 20.0)];
        assert_eq!(total_tests(&recs), 600.0);
        assert_eq!(aggregate(&recs).total_tests, 600.0);
    }

    #[test]
    fn headline_comes_from_world_row() {
        let mut world = rec(WORLD, 0.0, 1.0);
        world.total_cases = 1_000.0;
        world.total_deaths = 20.0;
        world.total_recovered = 900.0;
        let recs = vec![rec("A", 0.0, 1.0), world];

        let h = headline(&recs).unwrap();
        assert_eq!(h.total_cases, 1_000.0);
        assert_eq!(h.total_deaths, 20.0);
        assert_eq!(h.total_recovered, 900.0);
    }

    #[test]
    fn missing_world_degrades_with_warning() {
        let recs = vec![rec("A", 5.0, 10.0)];
        assert!(matches!(find_world(&recs), Err(DashboardError::Data(_))));

        let agg = aggregate(&recs);
        assert!(agg.headline.is_none());
        assert_eq!(agg.total_tests, 5.0);
        assert!(agg.warnings.iter().any(|w| w.contains("World")));
    }

    #[test]
    fn all_zero_column_is_reported() {
        let recs = vec![rec(WORLD, 1.0, 1.0), rec("A", 1.0, 1.0)];
        let zeros = zero_columns(&recs);
        assert!(zeros.contains(&Field::NewCases));
        assert!(!zeros.contains(&Field::TotalCases));
        assert!(zero_columns(&[]).is_empty());
    }
}
