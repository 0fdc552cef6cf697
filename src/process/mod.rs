// src/process/mod.rs
pub mod convert;
pub mod extract;
pub mod normalize;
pub mod raw_table;
pub mod schema;
pub mod utils;

pub use convert::coerce_number;
pub use extract::extract_table;
pub use normalize::{keep_row, normalize, CountryRecord};
pub use raw_table::{RawRow, RawTable};
pub use schema::{Column, ColumnKind, Field, COLUMNS};
