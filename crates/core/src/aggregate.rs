use std::collections::HashMap;

use crate::model::{AggregateTable, Cell, ResultTable};

/// Concatenate result tables, aligning columns by header.
///
/// Headers appear in first-seen order. A table that repeats a header maps
/// its k-th occurrence onto the aggregate's k-th column of that name. Cells
/// for columns a table lacks are `Empty`. Empty tables contribute nothing.
pub fn concat<'a, I>(tables: I) -> AggregateTable
where
    I: IntoIterator<Item = &'a ResultTable>,
{
    let mut headers: Vec<String> = Vec::new();
    let mut slots: HashMap<(String, usize), usize> = HashMap::new();
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for table in tables {
        if table.is_empty() {
            continue;
        }

        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mapping: Vec<usize> = table
            .headers()
            .iter()
            .map(|header| {
                let occurrence = seen.entry(header.as_str()).or_insert(0);
                let key = (header.clone(), *occurrence);
                *occurrence += 1;
                *slots.entry(key).or_insert_with(|| {
                    headers.push(header.clone());
                    headers.len() - 1
                })
            })
            .collect();

        for row in table.rows() {
            let mut out = vec![Cell::Empty; headers.len()];
            for (cell, &slot) in row.iter().zip(&mapping) {
                out[slot] = cell.clone();
            }
            rows.push(out);
        }
    }

    AggregateTable::new(headers, rows)
}
