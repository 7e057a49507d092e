use crate::table::MacroTable;

/// Summary statistics for one table column.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub label: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics per column, in column order.
pub fn column_summary(table: &MacroTable) -> Vec<Summary> {
    let mut out = Vec::new();
    for (col, label) in table.columns().iter().enumerate() {
        let mut vals: Vec<f64> = Vec::new();
        let mut missing = 0usize;
        for (_, row) in table.rows() {
            match row[col] {
                Some(v) => vals.push(v),
                None => missing += 1,
            }
        }
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            label: label.clone(),
            count,
            missing,
            min,
            max,
            mean,
            median,
        });
    }
    out
}
