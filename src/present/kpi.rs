use crate::present::format::kpi_card_format;
use crate::stats::Aggregates;
use serde::Serialize;
use tracing::warn;

/// Shown in place of a value the data could not supply.
pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub id: &'static str,
    pub label: &'static str,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiBlock {
    pub cards: Vec<KpiCard>,
}

impl KpiCard {
    fn new(id: &'static str, label: &'static str, value: Option<f64>, warnings: &mut Vec<String>) -> Self {
        let display = match value.map(kpi_card_format) {
            Some(Ok(s)) => s,
            Some(Err(e)) => {
                warn!(card = id, error = %e, "cannot format KPI");
                warnings.push(e.to_string());
                UNAVAILABLE.to_string()
            }
            None => UNAVAILABLE.to_string(),
        };
        Self {
            id,
            label,
            value,
            display,
        }
    }
}

/// The four headline cards. Formatting failures are appended to `warnings`.
pub fn build_kpis(agg: &Aggregates, warnings: &mut Vec<String>) -> KpiBlock {
    let h = agg.headline;
    KpiBlock {
        cards: vec![
            KpiCard::new("conf-ind", "Confirmed Cases", h.map(|h| h.total_cases), warnings),
            KpiCard::new("death-ind", "Death Cases", h.map(|h| h.total_deaths), warnings),
            KpiCard::new("recov-ind", "Recovered", h.map(|h| h.total_recovered), warnings),
            KpiCard::new("test-ind", "Total Tested", Some(agg.total_tests), warnings),
        ],
    }
}
