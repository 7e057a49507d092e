//! Pivot raw chunks into a [`MacroTable`].

use crate::catalog::LabelMap;
use crate::error::{DashboardError, Result};
use crate::fetcher::RawChunk;
use crate::table::MacroTable;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Combine chunks into one year x label table.
///
/// Columns follow chunk order, then indicator order inside each chunk. Every indicator a
/// chunk asked for gets a column, even when the provider had no values for it. Codes
/// missing from `labels` are ignored. Several observations for the same (year, label)
/// are averaged. Years without a single value are dropped.
pub fn reshape(chunks: &[RawChunk], labels: &LabelMap) -> Result<MacroTable> {
    if chunks.is_empty() {
        return Err(DashboardError::EmptyInput);
    }

    let mut columns: Vec<String> = Vec::new();
    let mut col_by_code: HashMap<&str, usize> = HashMap::new();
    for chunk in chunks {
        for code in &chunk.indicators {
            let Some(label) = labels.get(code) else {
                debug!("no label for indicator {code}, skipping");
                continue;
            };
            if col_by_code.contains_key(code.as_str()) {
                continue;
            }
            let idx = match columns.iter().position(|c| c == label) {
                Some(i) => i,
                None => {
                    columns.push(label.clone());
                    columns.len() - 1
                }
            };
            col_by_code.insert(code.as_str(), idx);
        }
    }

    // (sum, count) per cell
    let mut acc: BTreeMap<i32, Vec<(f64, u32)>> = BTreeMap::new();
    for chunk in chunks {
        for p in &chunk.points {
            let (Some(&col), Some(v)) = (col_by_code.get(p.indicator_id.as_str()), p.value) else {
                continue;
            };
            if !v.is_finite() {
                continue;
            }
            let row = acc
                .entry(p.year)
                .or_insert_with(|| vec![(0.0, 0); columns.len()]);
            row[col].0 += v;
            row[col].1 += 1;
        }
    }

    let rows: BTreeMap<i32, Vec<Option<f64>>> = acc
        .into_iter()
        .map(|(year, cells)| {
            let row = cells
                .into_iter()
                .map(|(sum, n)| (n > 0).then(|| sum / n as f64))
                .collect();
            (year, row)
        })
        .collect();

    Ok(MacroTable::from_rows(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataPoint;

    fn point(code: &str, year: i32, value: Option<f64>) -> DataPoint {
        DataPoint {
            indicator_id: code.into(),
            indicator_name: code.into(),
            country_id: "IN".into(),
            country_name: "India".into(),
            country_iso3: "IND".into(),
            year,
            value,
        }
    }

    fn labels() -> LabelMap {
        [("A", "Alpha"), ("B", "Beta"), ("C", "Gamma")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            reshape(&[], &labels()),
            Err(DashboardError::EmptyInput)
        ));
    }

    #[test]
    fn pivots_renames_and_sorts() {
        let chunks = vec![
            RawChunk {
                index: 0,
                indicators: vec!["A".into(), "B".into()],
                points: vec![
                    point("A", 2012, Some(3.0)),
                    point("A", 2010, Some(1.0)),
                    point("B", 2010, Some(5.0)),
                    point("B", 2012, None),
                ],
            },
            RawChunk {
                index: 1,
                indicators: vec!["C".into()],
                points: vec![point("C", 2011, Some(7.5))],
            },
        ];
        let t = reshape(&chunks, &labels()).unwrap();
        assert_eq!(t.columns(), &["Alpha", "Beta", "Gamma"].map(String::from));
        assert_eq!(t.years(), &[2010, 2011, 2012]);
        assert_eq!(t.get(2010, "Alpha"), Some(1.0));
        assert_eq!(t.get(2010, "Beta"), Some(5.0));
        assert_eq!(t.get(2011, "Gamma"), Some(7.5));
        assert_eq!(t.get(2012, "Beta"), None);
    }

    #[test]
    fn duplicate_observations_are_averaged() {
        let chunks = vec![RawChunk {
            index: 0,
            indicators: vec!["A".into()],
            points: vec![point("A", 2010, Some(1.0)), point("A", 2010, Some(3.0))],
        }];
        let t = reshape(&chunks, &labels()).unwrap();
        assert_eq!(t.get(2010, "Alpha"), Some(2.0));
    }

    #[test]
    fn unknown_codes_are_ignored_and_all_missing_years_dropped() {
        let chunks = vec![RawChunk {
            index: 0,
            indicators: vec!["A".into(), "ZZZ".into()],
            points: vec![
                point("ZZZ", 2010, Some(1.0)),
                point("A", 2011, None),
                point("A", 2012, Some(4.0)),
            ],
        }];
        let t = reshape(&chunks, &labels()).unwrap();
        assert_eq!(t.columns(), &["Alpha".to_string()]);
        assert_eq!(t.years(), &[2012]);
    }

    #[test]
    fn requested_indicator_without_values_keeps_its_column() {
        let chunks = vec![RawChunk {
            index: 0,
            indicators: vec!["A".into(), "B".into()],
            points: vec![point("A", 2015, Some(1.0)), point("B", 2015, None)],
        }];
        let t = reshape(&chunks, &labels()).unwrap();
        assert_eq!(t.columns().len(), 2);
        assert_eq!(t.column("Beta").unwrap(), vec![(2015, None)]);
    }
}
