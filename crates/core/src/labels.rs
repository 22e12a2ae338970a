use std::collections::BTreeSet;

use crate::model::Cell;
use crate::normalize::canonicalize;

/// Labels the instrument has been seen to use for color tests.
/// A blank label also occurs in the field but carries no meaning.
pub const DEFAULT_COLOR_TESTS: &[&str] = &[
    "DE", "DELTA E", "DL", "B", "L", "A", "DA", "COLOR", "DB", "D.L", "D.A", "D.B",
];

/// Closed set of recognized color test labels, stored canonicalized
/// (trimmed, upper-case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTestNames {
    names: BTreeSet<String>,
}

impl ColorTestNames {
    /// Blank entries are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|n| canonicalize(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Exact membership. Callers are expected to pass normalized text.
    pub fn contains(&self, label: &str) -> bool {
        self.names.contains(label)
    }

    /// The cell's text if it is a recognized label.
    pub fn match_cell<'c>(&self, cell: &'c Cell) -> Option<&'c str> {
        cell.as_text().filter(|t| self.contains(t))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for ColorTestNames {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_TESTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_instrument_labels() {
        let names = ColorTestNames::default();
        assert_eq!(names.len(), DEFAULT_COLOR_TESTS.len());
        assert!(names.contains("DELTA E"));
        assert!(names.contains("D.B"));
        assert!(!names.contains("de"));
        assert!(!names.contains(""));
    }

    #[test]
    fn custom_names_are_canonicalized() {
        let names = ColorTestNames::new([" gloss ", "haze", "  "]);
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["GLOSS", "HAZE"]);
    }

    #[test]
    fn only_text_cells_match() {
        let names = ColorTestNames::default();
        assert_eq!(names.match_cell(&Cell::from("DL")), Some("DL"));
        assert_eq!(names.match_cell(&Cell::from("DX")), None);
        assert_eq!(names.match_cell(&Cell::Number(1.0)), None);
        assert_eq!(names.match_cell(&Cell::Empty), None);
    }
}
