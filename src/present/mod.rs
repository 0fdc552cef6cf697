// src/present/mod.rs
pub mod format;
pub mod kpi;
pub mod plots;
pub mod table;

pub use format::kpi_card_format;
pub use kpi::{build_kpis, KpiBlock, KpiCard};
pub use plots::{cases_plot, deaths_plot, ScatterPlot, ScatterPoint};
pub use table::{
    build_table, TableColumn, TableDataset, TablePage, TableParams, TableQuery, TableRow,
};
