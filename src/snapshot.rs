// src/snapshot.rs

use crate::config::Config;
use crate::error::Result;
use crate::fetch;
use crate::present::{build_kpis, build_table, cases_plot, deaths_plot, KpiBlock, ScatterPlot, TableDataset};
use crate::process::{extract_table, normalize};
use crate::stats::aggregate;
use chrono::{DateTime, Local, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};
use url::Url;

pub const TITLE: &str = "Covid 19 Dashboard";

/// Everything one dashboard render needs, built in a single pass and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub title: &'static str,
    pub source_url: String,
    pub generated_at: DateTime<Utc>,
    /// Local build time as shown in the page header.
    pub last_updated: String,
    pub kpis: KpiBlock,
    pub cases_plot: ScatterPlot,
    pub deaths_plot: ScatterPlot,
    pub table: TableDataset,
    /// Non-fatal data problems found while building.
    pub warnings: Vec<String>,
}

/// Parse → normalize → aggregate → present. Pure apart from reading the clock.
#[instrument(level = "info", skip(html), fields(bytes = html.len()))]
pub fn build_snapshot_from_html(html: &str, table_id: &str, source: &Url) -> Result<DashboardSnapshot> {
    let raw = extract_table(html, table_id)?;
    let records = normalize(&raw)?;
    let agg = aggregate(&records);

    let mut warnings = agg.warnings.clone();
    let kpis = build_kpis(&agg, &mut warnings);

    let now = Local::now();
    let snapshot = DashboardSnapshot {
        title: TITLE,
        source_url: source.to_string(),
        generated_at: now.with_timezone(&Utc),
        last_updated: now.format("%x @ %X").to_string(),
        kpis,
        cases_plot: cases_plot(&agg.ratios),
        deaths_plot: deaths_plot(&agg.ratios),
        table: build_table(&records),
        warnings,
    };

    info!(
        records = records.len(),
        plotted = agg.ratios.len(),
        table_rows = snapshot.table.rows.len(),
        warnings = snapshot.warnings.len(),
        "snapshot built"
    );
    Ok(snapshot)
}

/// One full pipeline run: a single fetch of the configured page, then
/// [`build_snapshot_from_html`].
pub async fn build_snapshot(client: &Client, config: &Config) -> Result<DashboardSnapshot> {
    let html = fetch::fetch_page(client, &config.url).await?;
    build_snapshot_from_html(&html, &config.table_id, &config.url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    const FIXTURE: &str = include_str!("../tests/fixtures/countries.html");

    fn source() -> Url {
        Url::parse("https://example.test/coronavirus/").unwrap()
    }

    fn build() -> DashboardSnapshot {
        build_snapshot_from_html(FIXTURE, "main_table_countries_today", &source()).unwrap()
    }

    #[test]
    fn kpis_from_fixture() {
        let snap = build();
        let shown: Vec<_> = snap.kpis.cards.iter().map(|c| c.display.as_str()).collect();
        // tests: World 5M + USA 2M + Italy 1.5M
        assert_eq!(shown, vec!["1.00M", "20.00K", "900.00K", "8.50M"]);
        assert!(snap.warnings.is_empty(), "{:?}", snap.warnings);
    }

    #[test]
    fn plots_skip_zero_population() {
        let snap = build();
        for plot in [&snap.cases_plot, &snap.deaths_plot] {
            let labels: Vec<_> = plot.points.iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels, vec!["World", "USA", "Italy", "Vatican City"]);
            assert!(plot.points.iter().all(|p| p.x > 0.0));
        }
        let sizes: Vec<_> = snap.cases_plot.points.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![1, 7, 16, 149]);
        let sizes: Vec<_> = snap.deaths_plot.points.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![0, 2, 8, 0]);
    }

    #[test]
    fn table_drops_world_and_rollups() {
        let snap = build();
        let names: Vec<_> = snap.table.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["USA", "Italy", "Diamond Princess", "Vatican City"]);
        assert_eq!(snap.table.rows[0].population, 331_000_000.0);
        assert_eq!(snap.title, TITLE);
        assert_eq!(snap.source_url, "https://example.test/coronavirus/");
    }

    #[test]
    fn wrong_table_id_is_fatal() {
        let err = build_snapshot_from_html(FIXTURE, "yesterday_table", &source()).unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn rebuilding_gives_the_same_data() {
        let (a, b) = (build(), build());
        assert_eq!(a.kpis, b.kpis);
        assert_eq!(a.table, b.table);
        assert_eq!(a.cases_plot, b.cases_plot);
    }
}
