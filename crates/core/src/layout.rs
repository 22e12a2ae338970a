use serde::Deserialize;

use crate::error::ExtractError;
use crate::model::{Cell, Sheet};

/// Geometry of one instrument's quality-control card.
///
/// The default describes the current instrument: four boilerplate rows,
/// then label/result row pairs, with a label allowed in any of the first
/// three label rows of a column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutPolicy {
    /// Leading metadata rows removed by normalization.
    pub header_rows: usize,
    /// Rows per label/result group.
    pub row_stride: usize,
    /// Offset of the label row within each group.
    pub label_phase: usize,
    /// Offset of the result row within each group.
    pub value_phase: usize,
    /// Label rows (indices into the label block) searched for a test name,
    /// in priority order.
    pub label_positions: Vec<usize>,
    /// Number of leading columns read from each file.
    pub column_window: usize,
    /// (row, col) of the part number in the raw sheet.
    pub part_number_cell: (usize, usize),
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            header_rows: 4,
            row_stride: 2,
            label_phase: 0,
            value_phase: 1,
            label_positions: vec![0, 1, 2],
            column_window: 16,
            part_number_cell: (0, 1),
        }
    }
}

impl LayoutPolicy {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.row_stride == 0 {
            return Err(ExtractError::Config("layout.row_stride must be at least 1".into()));
        }
        if self.label_phase >= self.row_stride || self.value_phase >= self.row_stride {
            return Err(ExtractError::Config(format!(
                "layout phases must be below row_stride {} (label_phase={}, value_phase={})",
                self.row_stride, self.label_phase, self.value_phase
            )));
        }
        if self.label_positions.is_empty() {
            return Err(ExtractError::Config("layout.label_positions must not be empty".into()));
        }
        if self.column_window == 0 {
            return Err(ExtractError::Config("layout.column_window must be at least 1".into()));
        }
        if self.part_number_cell.1 >= self.column_window {
            return Err(ExtractError::Config(format!(
                "layout.part_number_cell column {} is outside the {}-column window",
                self.part_number_cell.1, self.column_window
            )));
        }
        Ok(())
    }

    /// Fewest raw rows that still leave one row after the header block.
    pub fn min_rows(&self) -> usize {
        self.header_rows + 1
    }

    /// Label rows of a normalized sheet, re-indexed from 0.
    pub fn label_rows<'s>(&self, sheet: &'s Sheet) -> impl Iterator<Item = &'s [Cell]> + 's {
        sheet.rows().skip(self.label_phase).step_by(self.row_stride.max(1))
    }

    /// Result rows of a normalized sheet, re-indexed from 0.
    pub fn value_rows<'s>(&self, sheet: &'s Sheet) -> impl Iterator<Item = &'s [Cell]> + 's {
        sheet.rows().skip(self.value_phase).step_by(self.row_stride.max(1))
    }

    /// Part number cell of a raw (not yet normalized) sheet.
    pub fn part_number<'s>(&self, raw: &'s Sheet) -> &'s Cell {
        let (row, col) = self.part_number_cell;
        raw.get(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize) -> Sheet {
        Sheet::from_rows((0..rows).map(|r| vec![Cell::Number(r as f64)]).collect())
    }

    #[test]
    fn default_validates() {
        assert!(LayoutPolicy::default().validate().is_ok());
        assert_eq!(LayoutPolicy::default().min_rows(), 5);
    }

    #[test]
    fn zero_stride_rejected() {
        let layout = LayoutPolicy { row_stride: 0, ..Default::default() };
        let err = layout.validate().unwrap_err();
        assert!(err.to_string().contains("row_stride"));
    }

    #[test]
    fn phase_outside_stride_rejected() {
        let layout = LayoutPolicy { value_phase: 2, ..Default::default() };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn part_number_outside_window_rejected() {
        let layout = LayoutPolicy { column_window: 1, ..Default::default() };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn label_and_value_rows_alternate() {
        let sheet = numbered(5);
        let layout = LayoutPolicy::default();
        let labels: Vec<f64> = layout.label_rows(&sheet).map(|r| r[0].as_number().unwrap()).collect();
        let values: Vec<f64> = layout.value_rows(&sheet).map(|r| r[0].as_number().unwrap()).collect();
        assert_eq!(labels, vec![0.0, 2.0, 4.0]);
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn stride_three_layout() {
        let sheet = numbered(7);
        let layout = LayoutPolicy { row_stride: 3, value_phase: 2, ..Default::default() };
        let values: Vec<f64> = layout.value_rows(&sheet).map(|r| r[0].as_number().unwrap()).collect();
        assert_eq!(values, vec![2.0, 5.0]);
    }
}
