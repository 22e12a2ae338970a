use crate::error::ExtractError;
use crate::layout::LayoutPolicy;
use crate::model::{Cell, Sheet};

/// Canonical form used for label matching: trimmed and upper-cased.
pub fn canonicalize(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Canonicalize text cells; every other cell passes through unchanged.
pub fn normalize_cell(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(canonicalize(s)),
        other => other.clone(),
    }
}

/// Drop the header block of a raw sheet and canonicalize its text.
///
/// Rows are re-indexed from 0 and the column width is kept. Fails with
/// `MalformedInput` when nothing would remain after the header block.
pub fn normalize(raw: &Sheet, layout: &LayoutPolicy) -> Result<Sheet, ExtractError> {
    let required = layout.min_rows();
    if raw.height() < required {
        return Err(ExtractError::MalformedInput {
            rows: raw.height(),
            required,
        });
    }

    let rows = raw
        .rows()
        .skip(layout.header_rows)
        .map(|row| row.iter().map(normalize_cell).collect())
        .collect();

    Ok(Sheet::new(rows, raw.width()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(rows: Vec<Vec<Cell>>) -> Sheet {
        Sheet::from_rows(rows)
    }

    fn boilerplate() -> Vec<Vec<Cell>> {
        vec![
            vec!["Part".into(), "pn-100".into()],
            vec!["Customer".into(), "Acme".into()],
            vec![],
            vec!["Test".into(), "Spec".into()],
        ]
    }

    #[test]
    fn drops_header_block_and_reindexes() {
        let mut rows = boilerplate();
        rows.push(vec![" de ".into(), "dl".into()]);
        rows.push(vec![1.23.into(), Cell::Empty]);

        let sheet = normalize(&raw(rows), &LayoutPolicy::default()).unwrap();
        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.get(0, 0), &Cell::from("DE"));
        assert_eq!(sheet.get(0, 1), &Cell::from("DL"));
        assert_eq!(sheet.get(1, 0), &Cell::Number(1.23));
        assert_eq!(sheet.get(1, 1), &Cell::Empty);
    }

    #[test]
    fn keeps_width_of_raw_sheet() {
        let mut rows = boilerplate();
        rows[0].resize(16, Cell::Empty);
        rows.push(vec!["DE".into()]);

        let sheet = normalize(&raw(rows), &LayoutPolicy::default()).unwrap();
        assert_eq!(sheet.width(), 16);
    }

    #[test]
    fn non_text_cells_pass_through() {
        let mut rows = boilerplate();
        rows.push(vec![Cell::Number(-0.5), Cell::Bool(false), Cell::Empty]);

        let sheet = normalize(&raw(rows), &LayoutPolicy::default()).unwrap();
        assert_eq!(sheet.row(0).unwrap(), &[Cell::Number(-0.5), Cell::Bool(false), Cell::Empty]);
    }

    #[test]
    fn four_rows_is_malformed() {
        let err = normalize(&raw(boilerplate()), &LayoutPolicy::default()).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedInput { rows: 4, required: 5 }));
    }

    #[test]
    fn input_is_not_mutated() {
        let mut rows = boilerplate();
        rows.push(vec![" de ".into()]);
        let input = raw(rows);
        let before = input.clone();
        let _ = normalize(&input, &LayoutPolicy::default()).unwrap();
        assert_eq!(input, before);
    }

    fn arb_cell() -> impl Strategy<Value = Cell> {
        prop_oneof![
            Just(Cell::Empty),
            "[ a-zA-Z.\t]{0,8}".prop_map(Cell::Text),
            (-1.0e6f64..1.0e6).prop_map(Cell::Number),
            any::<bool>().prop_map(Cell::Bool),
        ]
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            rows in prop::collection::vec(prop::collection::vec(arb_cell(), 0..6), 5..12)
        ) {
            let layout = LayoutPolicy { header_rows: 0, ..Default::default() };
            let once = normalize(&raw(rows), &layout).unwrap();
            let twice = normalize(&once, &layout).unwrap();
            prop_assert_eq!(&once, &twice);

            for row in once.rows() {
                for cell in row {
                    if let Cell::Text(s) = cell {
                        prop_assert_eq!(s, &canonicalize(s));
                    }
                }
            }
        }
    }
}
