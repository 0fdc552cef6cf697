// src/server/page.rs
//
// Server-rendered shell for the dashboard. KPI cards are rendered by the
// template; the plots are drawn by plotly.js from the embedded snapshot and
// the table pages through `/api/table`.

use crate::error::{DashboardError, Result};
use crate::snapshot::DashboardSnapshot;
use handlebars::Handlebars;
use serde::Serialize;

pub const PAGE_TEMPLATE: &str = "dashboard";
const PAGE_SOURCE: &str = include_str!("templates/dashboard.hbs");
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

#[derive(Serialize)]
struct PageContext<'a> {
    snapshot: &'a DashboardSnapshot,
    with_logo: bool,
    plotly_src: &'static str,
    cases_json: String,
    deaths_json: String,
    columns_json: String,
}

/// Template registry holding the dashboard page. Strict mode turns a
/// misspelled field into a render error instead of an empty string.
pub fn registry() -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars
        .register_template_string(PAGE_TEMPLATE, PAGE_SOURCE)
        .map_err(|e| DashboardError::Template(e.to_string()))?;
    Ok(handlebars)
}

/// JSON safe to drop inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|e| DashboardError::Template(format!("serializing page data: {}", e)))
}

pub fn render(
    handlebars: &Handlebars<'static>,
    snap: &DashboardSnapshot,
    with_logo: bool,
) -> Result<String> {
    let ctx = PageContext {
        snapshot: snap,
        with_logo,
        plotly_src: PLOTLY_CDN,
        cases_json: script_json(&snap.cases_plot)?,
        deaths_json: script_json(&snap.deaths_plot)?,
        columns_json: script_json(&snap.table.columns)?,
    };
    handlebars
        .render(PAGE_TEMPLATE, &ctx)
        .map_err(|e| DashboardError::Template(e.to_string()))
}
