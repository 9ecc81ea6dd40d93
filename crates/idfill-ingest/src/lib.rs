//! Import pipeline: comma-separated person rows into the record store, in committed batches.

mod error;
mod importer;
pub mod rows;

pub use error::IngestError;
pub use importer::{progress_pct, ImportReport, Importer};
pub use rows::{parse_row, split_rows, ColumnMap, ImportSpec};
