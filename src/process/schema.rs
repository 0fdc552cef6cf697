// src/process/schema.rs
//
// Positional contract with the upstream table. A layout change upstream
// should only ever need an edit here.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

/// Every column the statistics table carries, after the rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Country,
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
    TotalRecovered,
    NewRecovered,
    ActiveCases,
    SeriousCritical,
    CasesPerMillion,
    DeathsPerMillion,
    TotalTests,
    TestsPerMillion,
    Population,
    Continent,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Country => "country",
            Field::TotalCases => "total_cases",
            Field::NewCases => "new_cases",
            Field::TotalDeaths => "total_deaths",
            Field::NewDeaths => "new_deaths",
            Field::TotalRecovered => "total_recovered",
            Field::NewRecovered => "new_recovered",
            Field::ActiveCases => "active_cases",
            Field::SeriousCritical => "serious_critical",
            Field::CasesPerMillion => "cases_per_million",
            Field::DeathsPerMillion => "deaths_per_million",
            Field::TotalTests => "total_tests",
            Field::TestsPerMillion => "tests_per_million",
            Field::Population => "population",
            Field::Continent => "continent",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Field::Country | Field::Continent => ColumnKind::Text,
            _ => ColumnKind::Numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Zero-based cell index within the raw `<tr>`.
    pub position: usize,
    pub field: Field,
}

/// Leading cells dropped from every row (the rank column).
pub const SKIPPED_LEADING: usize = 1;

pub const COLUMNS: [Column; 15] = [
    Column { position: 1, field: Field::Country },
    Column { position: 2, field: Field::TotalCases },
    Column { position: 3, field: Field::NewCases },
    Column { position: 4, field: Field::TotalDeaths },
    Column { position: 5, field: Field::NewDeaths },
    Column { position: 6, field: Field::TotalRecovered },
    Column { position: 7, field: Field::NewRecovered },
    Column { position: 8, field: Field::ActiveCases },
    Column { position: 9, field: Field::SeriousCritical },
    Column { position: 10, field: Field::CasesPerMillion },
    Column { position: 11, field: Field::DeathsPerMillion },
    Column { position: 12, field: Field::TotalTests },
    Column { position: 13, field: Field::TestsPerMillion },
    Column { position: 14, field: Field::Population },
    Column { position: 15, field: Field::Continent },
];

/// Rows shorter than this cannot be mapped and are a parse error.
pub const MIN_CELLS: usize = SKIPPED_LEADING + COLUMNS.len();

pub fn numeric_fields() -> impl Iterator<Item = Field> {
    COLUMNS
        .iter()
        .map(|c| c.field)
        .filter(|f| f.kind() == ColumnKind::Numeric)
}
