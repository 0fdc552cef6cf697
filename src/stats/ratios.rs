use crate::process::CountryRecord;
use serde::Serialize;

/// Per-record percentages used to size plot markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRatios {
    pub country: String,
    pub population: f64,
    pub total_cases: f64,
    pub total_deaths: f64,
    /// total_cases as a percentage of population
    pub cases_per: f64,
    /// total_deaths as a percentage of population
    pub death_per: f64,
}

impl DerivedRatios {
    /// `None` for zero-population records; those are left out of every plot.
    pub fn from_record(rec: &CountryRecord) -> Option<Self> {
        if rec.population == 0.0 {
            return None;
        }
        Some(Self {
            country: rec.country.clone(),
            population: rec.population,
            total_cases: rec.total_cases,
            total_deaths: rec.total_deaths,
            cases_per: rec.total_cases / rec.population * 100.0,
            death_per: rec.total_deaths / rec.population * 100.0,
        })
    }
}

pub fn derive_ratios(records: &[CountryRecord]) -> Vec<DerivedRatios> {
    records.iter().filter_map(DerivedRatios::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_of_population() {
        let rec = CountryRecord {
            country: "A".into(),
            population: 1_000.0,
            total_cases: 50.0,
            total_deaths: 2.0,
            ..CountryRecord::default()
        };
        let r = DerivedRatios::from_record(&rec).unwrap();
        assert!((r.cases_per - 5.0).abs() < 1e-12);
        assert!((r.death_per - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_population_is_excluded() {
        let recs = vec![
            CountryRecord {
                country: "Ship".into(),
                total_cases: 700.0,
                ..CountryRecord::default()
            },
            CountryRecord {
                country: "B".into(),
                population: 10.0,
                ..CountryRecord::default()
            },
        ];
        let ratios = derive_ratios(&recs);
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].country, "B");
    }
}
