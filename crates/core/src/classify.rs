use tracing::debug;

use crate::labels::ColorTestNames;
use crate::layout::LayoutPolicy;
use crate::model::{Cell, ResultTable, Sheet, PART_NUMBER_HEADER};

/// A retained column: its position in the normalized sheet and the label
/// that qualified it.
#[derive(Debug, Clone, PartialEq)]
struct LabeledColumn {
    col: usize,
    label: String,
}

/// Finds the color test columns of a normalized sheet.
#[derive(Debug, Clone)]
pub struct Classifier {
    names: ColorTestNames,
    layout: LayoutPolicy,
}

impl Classifier {
    pub fn new(names: ColorTestNames, layout: LayoutPolicy) -> Self {
        Self { names, layout }
    }

    pub fn names(&self) -> &ColorTestNames {
        &self.names
    }

    pub fn layout(&self) -> &LayoutPolicy {
        &self.layout
    }

    /// Reshape a normalized sheet into a result table.
    ///
    /// A column is kept when one of its candidate label cells is a known
    /// color test, even if all of its result cells are blank. The header is
    /// the label found at the earliest candidate position. Result rows that
    /// are blank across every kept column are dropped. Every output row
    /// starts with `part_number`.
    ///
    /// Returns an empty table when no column qualifies or no row remains.
    pub fn classify(&self, sheet: &Sheet, part_number: &Cell) -> ResultTable {
        let label_block: Vec<&[Cell]> = self.layout.label_rows(sheet).collect();
        let value_block: Vec<&[Cell]> = self.layout.value_rows(sheet).collect();

        let columns: Vec<LabeledColumn> = (0..sheet.width())
            .filter_map(|col| {
                self.label_for(&label_block, col)
                    .map(|label| LabeledColumn { col, label: label.to_string() })
            })
            .collect();

        if columns.is_empty() {
            debug!("no color test columns found");
            return ResultTable::empty();
        }

        // Rows are padded to the sheet width, so indexing by col is in range.
        let rows: Vec<Vec<Cell>> = value_block
            .iter()
            .filter(|row| columns.iter().any(|c| !row[c.col].is_missing()))
            .map(|row| {
                std::iter::once(part_number.clone())
                    .chain(columns.iter().map(|c| row[c.col].to_present()))
                    .collect()
            })
            .collect();

        if rows.is_empty() {
            debug!(columns = columns.len(), "color test labels without results");
            return ResultTable::empty();
        }

        let headers: Vec<String> = std::iter::once(PART_NUMBER_HEADER.to_string())
            .chain(columns.into_iter().map(|c| c.label))
            .collect();

        debug!(columns = headers.len() - 1, rows = rows.len(), "classified color test columns");
        ResultTable::new(headers, rows)
    }

    /// First recognized label among the candidate positions of `col`.
    fn label_for<'s>(&self, label_block: &[&'s [Cell]], col: usize) -> Option<&'s str> {
        self.layout.label_positions.iter().find_map(|&pos| {
            label_block
                .get(pos)
                .copied()
                .and_then(|row| row.get(col))
                .and_then(|cell| self.names.match_cell(cell))
        })
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ColorTestNames::default(), LayoutPolicy::default())
    }
}
