// CSV export of the aggregate table

use std::path::Path;
use std::time::Instant;

use colorqc_core::{AggregateTable, ExtractError};

use crate::xlsx::ExportResult;

/// Write the header row followed by every data row. Missing cells become
/// empty fields; numbers use their shortest display form.
pub fn export(table: &AggregateTable, path: &Path) -> Result<ExportResult, ExtractError> {
    export_with_delimiter(table, path, b',')
}

pub fn export_tsv(table: &AggregateTable, path: &Path) -> Result<ExportResult, ExtractError> {
    export_with_delimiter(table, path, b'\t')
}

fn export_with_delimiter(
    table: &AggregateTable,
    path: &Path,
    delimiter: u8,
) -> Result<ExportResult, ExtractError> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| ExtractError::write(path, e))?;

    if table.column_count() > 0 {
        writer
            .write_record(table.headers())
            .map_err(|e| ExtractError::write(path, e))?;
        result.cells_exported += table.column_count();
    }

    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        result.cells_exported += row.iter().filter(|c| !c.is_missing()).count();
        writer
            .write_record(&record)
            .map_err(|e| ExtractError::write(path, e))?;
    }

    writer.flush().map_err(|e| ExtractError::write(path, e))?;

    result.rows_exported = table.row_count();
    result.columns_exported = table.column_count();
    result.export_duration_ms = start_time.elapsed().as_millis();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorqc_core::{Cell, Table, PART_NUMBER_HEADER};

    fn sample() -> Table {
        Table::new(
            vec![PART_NUMBER_HEADER.into(), "DE".into(), "DELTA E".into()],
            vec![
                vec!["PN-1".into(), 0.25.into(), Cell::Empty],
                vec![Cell::Number(4021.0), Cell::Empty, "PASS, RECHECK".into()],
            ],
        )
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = export(&sample(), &path).unwrap();
        assert_eq!(result.rows_exported, 2);
        assert_eq!(result.cells_exported, 3 + 4);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "PART NUMBER,DE,DELTA E\nPN-1,0.25,\n4021,,\"PASS, RECHECK\"\n"
        );
    }

    #[test]
    fn test_export_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");

        export_tsv(&sample(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("PART NUMBER\tDE\tDELTA E\n"));
    }

    #[test]
    fn test_export_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        export(&Table::empty(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
