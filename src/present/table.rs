// src/present/table.rs

use crate::process::CountryRecord;
use crate::stats::WORLD;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const PAGE_SIZE: usize = 25;

/// Prefix of query keys carrying a column filter, e.g. `filter.country=ita`.
pub const FILTER_PREFIX: &str = "filter.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableColumn {
    Continent,
    Country,
    Population,
    TotalTests,
    TotalCases,
    TotalRecovered,
    TotalDeaths,
    ActiveCases,
}

impl TableColumn {
    pub const ALL: [TableColumn; 8] = [
        TableColumn::Continent,
        TableColumn::Country,
        TableColumn::Population,
        TableColumn::TotalTests,
        TableColumn::TotalCases,
        TableColumn::TotalRecovered,
        TableColumn::TotalDeaths,
        TableColumn::ActiveCases,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TableColumn::Continent => "continent",
            TableColumn::Country => "country",
            TableColumn::Population => "population",
            TableColumn::TotalTests => "total_tests",
            TableColumn::TotalCases => "total_cases",
            TableColumn::TotalRecovered => "total_recovered",
            TableColumn::TotalDeaths => "total_deaths",
            TableColumn::ActiveCases => "active_cases",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn is_text(self) -> bool {
        matches!(self, TableColumn::Continent | TableColumn::Country)
    }
}

/// A record projected onto the table's columns, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub continent: String,
    pub country: String,
    pub population: f64,
    pub total_tests: f64,
    pub total_cases: f64,
    pub total_recovered: f64,
    pub total_deaths: f64,
    pub active_cases: f64,
}

impl From<&CountryRecord> for TableRow {
    fn from(r: &CountryRecord) -> Self {
        Self {
            continent: r.continent.clone(),
            country: r.country.clone(),
            population: r.population,
            total_tests: r.total_tests,
            total_cases: r.total_cases,
            total_recovered: r.total_recovered,
            total_deaths: r.total_deaths,
            active_cases: r.active_cases,
        }
    }
}

impl TableRow {
    fn text(&self, col: TableColumn) -> Option<&str> {
        match col {
            TableColumn::Continent => Some(&self.continent),
            TableColumn::Country => Some(&self.country),
            _ => None,
        }
    }

    fn number(&self, col: TableColumn) -> Option<f64> {
        match col {
            TableColumn::Population => Some(self.population),
            TableColumn::TotalTests => Some(self.total_tests),
            TableColumn::TotalCases => Some(self.total_cases),
            TableColumn::TotalRecovered => Some(self.total_recovered),
            TableColumn::TotalDeaths => Some(self.total_deaths),
            TableColumn::ActiveCases => Some(self.active_cases),
            TableColumn::Continent | TableColumn::Country => None,
        }
    }

    fn compare(&self, other: &Self, col: TableColumn) -> Ordering {
        match (self.text(col), other.text(col)) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => self
                .number(col)
                .partial_cmp(&other.number(col))
                .unwrap_or(Ordering::Equal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDataset {
    pub columns: Vec<TableColumn>,
    pub page_size: usize,
    pub rows: Vec<TableRow>,
}

/// Every record except the "World" rollup, in input order.
pub fn build_table(records: &[CountryRecord]) -> TableDataset {
    TableDataset {
        columns: TableColumn::ALL.to_vec(),
        page_size: PAGE_SIZE,
        rows: records
            .iter()
            .filter(|r| r.country != WORLD)
            .map(TableRow::from)
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Case-insensitive substring; the needle is stored lowercased.
    Contains(String),
    Compare(CmpOp, f64),
}

impl ColumnFilter {
    /// Parse the filter text typed under `col`. Text columns match by
    /// substring; numeric columns take an optional comparison operator.
    pub fn parse(col: TableColumn, raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if col.is_text() {
            return Ok(ColumnFilter::Contains(raw.to_lowercase()));
        }

        // two-char operators first so ">=" is not read as ">"
        const OPS: [(&str, CmpOp); 6] = [
            (">=", CmpOp::Ge),
            ("<=", CmpOp::Le),
            ("!=", CmpOp::Ne),
            (">", CmpOp::Gt),
            ("<", CmpOp::Lt),
            ("=", CmpOp::Eq),
        ];
        let (op, rest) = OPS
            .iter()
            .find_map(|(tok, op)| raw.strip_prefix(tok).map(|rest| (*op, rest)))
            .unwrap_or((CmpOp::Eq, raw));

        let value = rest
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid numeric filter {:?} for {}", raw, col.name()))?;
        Ok(ColumnFilter::Compare(op, value))
    }

    fn matches(&self, row: &TableRow, col: TableColumn) -> bool {
        match self {
            ColumnFilter::Contains(needle) => row
                .text(col)
                .map(|t| t.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
            ColumnFilter::Compare(op, rhs) => {
                row.number(col).map(|v| op.holds(v, *rhs)).unwrap_or(false)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// A filter/sort/page request against the table dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableQuery {
    /// Zero-based page index.
    pub page: usize,
    pub sort: Option<(TableColumn, SortDir)>,
    pub filters: Vec<(TableColumn, ColumnFilter)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub rows: Vec<TableRow>,
}

/// Query string of `GET /api/table`: `page`, `sort_by`, `sort_dir`
/// (`asc`/`desc`) and any number of `filter.<column>` entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableParams {
    #[serde(default, deserialize_with = "page_number")]
    pub page: usize,
    pub sort_by: Option<TableColumn>,
    #[serde(default)]
    pub sort_dir: SortDir,
    #[serde(flatten)]
    pub filters: HashMap<String, String>,
}

// With a flattened map every query value is buffered as a string.
fn page_number<'de, D: Deserializer<'de>>(de: D) -> Result<usize, D::Error> {
    let raw = String::deserialize(de)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("invalid page {:?}", raw)))
}

fn column(name: &str) -> Result<TableColumn, String> {
    TableColumn::from_name(name).ok_or_else(|| format!("unknown column {:?}", name))
}

impl TableQuery {
    /// Resolve the `filter.<column>` entries; everything else was already
    /// typed by deserialization.
    pub fn from_params(params: TableParams) -> Result<Self, String> {
        let mut filters = params
            .filters
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(FILTER_PREFIX).map(|name| (name, v)))
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(name, v)| -> Result<(TableColumn, ColumnFilter), String> {
                let col = column(name)?;
                Ok((col, ColumnFilter::parse(col, v)?))
            })
            .collect::<Result<Vec<_>, String>>()?;
        // HashMap order is arbitrary; keep results deterministic
        filters.sort_by_key(|(col, _)| TableColumn::ALL.iter().position(|c| c == col));

        Ok(TableQuery {
            page: params.page,
            sort: params.sort_by.map(|col| (col, params.sort_dir)),
            filters,
        })
    }

    pub fn apply(&self, table: &TableDataset) -> TablePage {
        let mut rows: Vec<&TableRow> = table
            .rows
            .iter()
            .filter(|row| self.filters.iter().all(|(col, f)| f.matches(row, *col)))
            .collect();

        if let Some((col, dir)) = self.sort {
            rows.sort_by(|a, b| {
                let ord = a.compare(b, col);
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }

        let page_size = table.page_size.max(1);
        let total_rows = rows.len();
        TablePage {
            page: self.page,
            page_size,
            total_rows,
            total_pages: total_rows.div_ceil(page_size),
            rows: rows
                .into_iter()
                .skip(self.page.saturating_mul(page_size))
                .take(page_size)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(country: &str, continent: &str, cases: f64) -> CountryRecord {
        CountryRecord {
            country: country.into(),
            continent: continent.into(),
            total_cases: cases,
            population: 1.0,
            ..CountryRecord::default()
        }
    }

    // Query values always arrive as strings, so build the same shape here.
    fn params(pairs: &[(&str, &str)]) -> Result<TableParams, serde_json::Error> {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map))
    }

    fn query(pairs: &[(&str, &str)]) -> Result<TableQuery, String> {
        TableQuery::from_params(params(pairs).map_err(|e| e.to_string())?)
    }

    fn sample() -> TableDataset {
        build_table(&[
            rec(WORLD, "All", 1000.0),
            rec("Italy", "Europe", 300.0),
            rec("India", "Asia", 500.0),
            rec("Spain", "Europe", 200.0),
        ])
    }

    #[test]
    fn world_row_is_not_in_table() {
        let t = sample();
        assert_eq!(t.rows.len(), 3);
        assert!(t.rows.iter().all(|r| r.country != WORLD));
        assert_eq!(t.page_size, 25);
        assert_eq!(t.columns[0], TableColumn::Continent);
        assert_eq!(t.columns[7], TableColumn::ActiveCases);
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let q = query(&[("filter.continent", "EUR")]).unwrap();
        let page = q.apply(&sample());
        let names: Vec<_> = page.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Italy", "Spain"]);
    }

    #[test]
    fn numeric_filter_with_operator_and_sort() {
        let q = query(&[
            ("filter.total_cases", ">= 300"),
            ("sort_by", "total_cases"),
            ("sort_dir", "desc"),
        ])
        .unwrap();
        let page = q.apply(&sample());
        let names: Vec<_> = page.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["India", "Italy"]);
        assert_eq!(page.total_rows, 2);
    }

    #[test]
    fn bare_number_means_equality() {
        assert_eq!(
            ColumnFilter::parse(TableColumn::TotalCases, "200").unwrap(),
            ColumnFilter::Compare(CmpOp::Eq, 200.0)
        );
        assert_eq!(
            ColumnFilter::parse(TableColumn::Population, "!=0").unwrap(),
            ColumnFilter::Compare(CmpOp::Ne, 0.0)
        );
    }

    #[test]
    fn params_deserialize_typed_fields_and_keep_filters() {
        let p = params(&[
            ("page", "2"),
            ("sort_by", "total_deaths"),
            ("filter.country", "ita"),
        ])
        .unwrap();
        assert_eq!(p.page, 2);
        assert_eq!(p.sort_by, Some(TableColumn::TotalDeaths));
        assert_eq!(p.sort_dir, SortDir::Asc);
        assert_eq!(p.filters.get("filter.country").map(String::as_str), Some("ita"));
        assert!(!p.filters.contains_key("page"));

        let q = TableQuery::from_params(p).unwrap();
        assert_eq!(q.sort, Some((TableColumn::TotalDeaths, SortDir::Asc)));
        assert_eq!(q.filters.len(), 1);
    }

    #[test]
    fn empty_params_are_the_default_query() {
        assert_eq!(query(&[]).unwrap(), TableQuery::default());
    }

    #[test]
    fn bad_params_are_rejected() {
        // deserialization
        assert!(params(&[("page", "-1")]).is_err());
        assert!(params(&[("page", "two")]).is_err());
        assert!(params(&[("sort_by", "nope")]).is_err());
        assert!(params(&[("sort_by", "country"), ("sort_dir", "up")]).is_err());
        // filters
        assert!(query(&[("filter.nope", "1")]).is_err());
        assert!(query(&[("filter.total_cases", "lots")]).is_err());
    }

    #[test]
    fn pages_of_twenty_five() {
        let records: Vec<_> = (0..60)
            .map(|i| rec(&format!("C{:02}", i), "Asia", i as f64))
            .collect();
        let table = build_table(&records);

        let first = TableQuery::default().apply(&table);
        assert_eq!(first.rows.len(), 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.rows[0].country, "C00");

        let last = TableQuery { page: 2, ..TableQuery::default() }.apply(&table);
        assert_eq!(last.rows.len(), 10);
        assert_eq!(last.rows[0].country, "C50");

        let past = TableQuery { page: 9, ..TableQuery::default() }.apply(&table);
        assert!(past.rows.is_empty());
        assert_eq!(past.total_rows, 60);
    }
}
