// File I/O operations

pub mod batch;
pub mod csv;
pub mod xlsx;

use std::path::Path;

use colorqc_core::{AggregateTable, ExtractError};

pub use batch::{BatchLoader, BatchReport, FileOutcome, RunSummary};
pub use xlsx::ExportResult;

/// Write the aggregate table, choosing the format from the extension:
/// `.csv` and `.tsv` write delimited text, anything else writes XLSX.
pub fn write_aggregate(table: &AggregateTable, path: &Path) -> Result<ExportResult, ExtractError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("csv") => crate::csv::export(table, path),
        Some("tsv") => crate::csv::export_tsv(table, path),
        _ => xlsx::export(table, path),
    }
}
