// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: first worksheet only, values only, bounded to a column window.
// Export: the aggregate table as a single worksheet with a bold header row.

use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use colorqc_core::{AggregateTable, Cell, ExtractError, Sheet};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::debug;

/// Name of the single worksheet in exported files.
pub const SHEET_NAME: &str = "Color Data";

/// Maximum dimensions of an exported sheet
const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Import the first worksheet of an Excel file (xlsx, xls, xlsb, ods).
///
/// Cells keep their absolute sheet position: row 0 is the sheet's first row
/// even when the used range starts lower. Columns past `column_window` are
/// dropped.
pub fn import(path: &Path, column_window: usize) -> Result<Sheet, ExtractError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| ExtractError::read(path, format!("failed to open Excel file: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExtractError::read(path, "Excel file contains no sheets"))?
        .map_err(|e| ExtractError::read(path, format!("failed to read first sheet: {e}")))?;

    // Range start offset (data may not begin at A1)
    let (data_start_row, data_start_col) = range.start().unwrap_or((0, 0));
    let data_start_col = data_start_col as usize;

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); data_start_row as usize];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; data_start_col.min(column_window)];
        cells.extend(
            row.iter()
                .take(column_window.saturating_sub(data_start_col))
                .map(cell_from_data),
        );
        rows.push(cells);
    }

    let sheet = Sheet::new(rows, column_window);
    debug!(path = %path.display(), rows = sheet.height(), "imported sheet");
    Ok(sheet)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        // Kept as the Excel serial number
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// Result of an Excel export operation
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Data rows written (header excluded)
    pub rows_exported: usize,
    /// Columns written
    pub columns_exported: usize,
    /// Non-empty cells written, header included
    pub cells_exported: usize,
    /// Export duration in milliseconds
    pub export_duration_ms: u128,
}

impl ExportResult {
    /// Returns a summary message suitable for display
    pub fn summary(&self) -> String {
        format!(
            "{} row{}, {} column{}",
            self.rows_exported,
            if self.rows_exported == 1 { "" } else { "s" },
            self.columns_exported,
            if self.columns_exported == 1 { "" } else { "s" },
        )
    }
}

/// Export the aggregate table to an XLSX file.
///
/// An empty table still produces a valid workbook with one blank sheet.
pub fn export(table: &AggregateTable, path: &Path) -> Result<ExportResult, ExtractError> {
    let start_time = Instant::now();
    let mut result = ExportResult::default();

    if table.row_count() + 1 > MAX_ROWS || table.column_count() > MAX_COLS {
        return Err(ExtractError::write(
            path,
            format!(
                "table of {}x{} exceeds Excel limits",
                table.row_count(),
                table.column_count()
            ),
        ));
    }

    let mut xlsx_workbook = XlsxWorkbook::new();
    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| ExtractError::write(path, format!("failed to create sheet: {e}")))?;

    result.cells_exported = export_cells(table, worksheet)
        .map_err(|e| ExtractError::write(path, e))?;
    result.rows_exported = table.row_count();
    result.columns_exported = table.column_count();

    xlsx_workbook
        .save(path)
        .map_err(|e| ExtractError::write(path, format!("failed to save XLSX file: {e}")))?;

    result.export_duration_ms = start_time.elapsed().as_millis();
    debug!(path = %path.display(), summary = %result.summary(), "exported xlsx");
    Ok(result)
}

/// Write header and data cells. Returns the number of cells written.
fn export_cells(table: &AggregateTable, worksheet: &mut Worksheet) -> Result<usize, String> {
    let header_format = Format::new().set_bold();
    let mut cells_exported = 0;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| format!("failed to write header '{}': {}", header, e))?;
        cells_exported += 1;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row32 = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col16 = col as u16;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(row32, col16, s),
                Cell::Number(n) => worksheet.write_number(row32, col16, *n),
                Cell::Bool(b) => worksheet.write_boolean(row32, col16, *b),
            };
            written.map_err(|e| format!("failed to write cell ({}, {}): {}", row32, col, e))?;
            cells_exported += 1;
        }
    }

    Ok(cells_exported)
}
