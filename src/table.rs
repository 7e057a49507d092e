//! Year x indicator table produced by a fetch.

use std::collections::BTreeMap;

/// Rows are years (ascending, unique), columns are indicator labels.
///
/// Built once by [`crate::reshape::reshape`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MacroTable {
    years: Vec<i32>,
    columns: Vec<String>,
    /// `cells[row][col]`
    cells: Vec<Vec<Option<f64>>>,
}

impl MacroTable {
    /// Assemble a table, sorting rows by year. Returns `None` when the shape is
    /// inconsistent or a year is repeated.
    pub fn new(
        years: Vec<i32>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> Option<Self> {
        if years.len() != cells.len() || cells.iter().any(|r| r.len() != columns.len()) {
            return None;
        }
        let mut rows: Vec<(i32, Vec<Option<f64>>)> = years.into_iter().zip(cells).collect();
        rows.sort_by_key(|(y, _)| *y);
        if rows.windows(2).any(|w| w[0].0 == w[1].0) {
            return None;
        }
        let (years, cells): (Vec<i32>, Vec<Vec<Option<f64>>>) = rows.into_iter().unzip();
        Some(Self {
            years,
            columns,
            cells,
        })
    }

    /// Rows keyed by year; each row must have one cell per column.
    pub(crate) fn from_rows(columns: Vec<String>, rows: BTreeMap<i32, Vec<Option<f64>>>) -> Self {
        debug_assert!(rows.values().all(|r| r.len() == columns.len()));
        let (years, cells): (Vec<i32>, Vec<Vec<Option<f64>>>) = rows.into_iter().unzip();
        Self {
            years,
            columns,
            cells,
        }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Option<f64>])> + '_ {
        self.years
            .iter()
            .copied()
            .zip(self.cells.iter().map(|r| r.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn get(&self, year: i32, label: &str) -> Option<f64> {
        let col = self.column_index(label)?;
        let row = self.years.binary_search(&year).ok()?;
        self.cells[row][col]
    }

    /// `(year, value)` pairs of one column, missing cells included.
    pub fn column(&self, label: &str) -> Option<Vec<(i32, Option<f64>)>> {
        let col = self.column_index(label)?;
        Some(self.rows().map(|(y, r)| (y, r[col])).collect())
    }

    /// Sub-table with the requested columns, in the requested order. Unknown labels are
    /// skipped; rows with no value left are dropped.
    pub fn select<S: AsRef<str>>(&self, labels: &[S]) -> MacroTable {
        let idx: Vec<usize> = labels
            .iter()
            .filter_map(|l| self.column_index(l.as_ref()))
            .collect();
        let columns = idx.iter().map(|&i| self.columns[i].clone()).collect();
        let mut years = Vec::new();
        let mut cells = Vec::new();
        for (y, row) in self.rows() {
            let picked: Vec<Option<f64>> = idx.iter().map(|&i| row[i]).collect();
            if picked.iter().any(Option::is_some) {
                years.push(y);
                cells.push(picked);
            }
        }
        MacroTable {
            years,
            columns,
            cells,
        }
    }
}

/// Display a cell with two decimals, blank when missing.
pub fn format_cell(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.2}", x),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MacroTable {
        MacroTable::new(
            vec![2012, 2010, 2011],
            vec!["A".into(), "B".into()],
            vec![
                vec![Some(3.0), None],
                vec![Some(1.0), Some(10.0)],
                vec![None, None],
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_sorts_rows_by_year() {
        let t = sample();
        assert_eq!(t.years(), &[2010, 2011, 2012]);
        assert_eq!(t.get(2012, "A"), Some(3.0));
        assert_eq!(t.get(2010, "B"), Some(10.0));
        assert_eq!(t.get(2011, "A"), None);
        assert_eq!(t.get(1999, "A"), None);
    }

    #[test]
    fn new_rejects_bad_shapes_and_duplicate_years() {
        assert!(MacroTable::new(vec![2010], vec!["A".into()], vec![]).is_none());
        assert!(MacroTable::new(vec![2010], vec!["A".into()], vec![vec![]]).is_none());
        assert!(
            MacroTable::new(
                vec![2010, 2010],
                vec!["A".into()],
                vec![vec![Some(1.0)], vec![Some(2.0)]]
            )
            .is_none()
        );
    }

    #[test]
    fn select_reorders_and_drops_empty_rows() {
        let t = sample().select(&["B", "missing"]);
        assert_eq!(t.columns(), &["B".to_string()]);
        assert_eq!(t.years(), &[2010]);
    }

    #[test]
    fn format_cell_uses_two_decimals() {
        assert_eq!(format_cell(Some(1234.5678)), "1234.57");
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(f64::NAN)), "");
    }
}
