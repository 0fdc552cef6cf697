use crate::stats::DerivedRatios;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Linear,
    Log,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: &'static str,
    #[serde(rename = "type")]
    pub axis_type: AxisType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Marker size, truncated toward zero.
    pub size: i64,
    /// Hover label.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPlot {
    pub id: &'static str,
    pub title: &'static str,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub colorscale: &'static str,
    pub points: Vec<ScatterPoint>,
}

const POPULATION_AXIS: Axis = Axis {
    title: "Population",
    axis_type: AxisType::Log,
};

fn scatter(
    ratios: &[DerivedRatios],
    point: impl Fn(&DerivedRatios) -> (f64, f64),
) -> Vec<ScatterPoint> {
    ratios
        .iter()
        .map(|r| {
            let (y, size) = point(r);
            ScatterPoint {
                x: r.population,
                y,
                size: size as i64,
                label: r.country.clone(),
            }
        })
        .collect()
}

/// Total cases against population; marker size is `cases_per × 100`.
pub fn cases_plot(ratios: &[DerivedRatios]) -> ScatterPlot {
    ScatterPlot {
        id: "total-cases-vs-population",
        title: "Total Cases vs Population",
        x_axis: POPULATION_AXIS,
        y_axis: Axis {
            title: "Total Cases",
            axis_type: AxisType::Log,
        },
        colorscale: "Viridis",
        points: scatter(ratios, |r| (r.total_cases, r.cases_per * 100.0)),
    }
}

/// Total deaths against population; marker size is `death_per × 1000`.
pub fn deaths_plot(ratios: &[DerivedRatios]) -> ScatterPlot {
    ScatterPlot {
        id: "total-death-vs-population",
        title: "Total Death vs Population",
        x_axis: POPULATION_AXIS,
        y_axis: Axis {
            title: "Total Death",
            axis_type: AxisType::Log,
        },
        colorscale: "Hot",
        points: scatter(ratios, |r| (r.total_deaths, r.death_per * 1000.0)),
    }
}
