//! Export a [`MacroTable`] to Excel, CSV or JSON, and read an exported workbook back.

use crate::error::{DashboardError, Result};
use crate::table::MacroTable;
use anyhow::{Context, anyhow};
use calamine::{Data, Reader, Xlsx, open_workbook};
use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// MIME type offered with the spreadsheet download.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const SHEET_NAME: &str = "Macro Indicators";

const YEAR_HEADER: &str = "year";

/// `WorldBank_MacroData_<Country_Name>.xlsx`
pub fn export_file_name(country_name: &str) -> String {
    format!("WorldBank_MacroData_{}.xlsx", country_name.replace(' ', "_"))
}

/// Save the table as a single-sheet workbook: a `year` column followed by one column per
/// label, numbers shown with two decimals.
pub fn save_xlsx<P: AsRef<Path>>(table: &MacroTable, path: P) -> Result<()> {
    let path = path.as_ref();
    write_xlsx(table, path).map_err(|e| DashboardError::export(path, format!("{e:#}")))
}

fn write_xlsx(table: &MacroTable, path: &Path) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let two_decimals = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    sheet.write_string_with_format(0, 0, YEAR_HEADER, &header)?;
    for (c, label) in table.columns().iter().enumerate() {
        let col = (c + 1) as u16;
        sheet.write_string_with_format(0, col, label.as_str(), &header)?;
        sheet.set_column_width(col, (label.len() as f64).clamp(12.0, 40.0))?;
    }
    for (r, (year, row)) in table.rows().enumerate() {
        let r = (r + 1) as u32;
        sheet.write_number(r, 0, year)?;
        for (c, v) in row.iter().enumerate() {
            if let Some(v) = v {
                sheet.write_number_with_format(r, (c + 1) as u16, *v, &two_decimals)?;
            }
        }
    }
    sheet.set_freeze_panes(1, 1)?;

    workbook
        .save(path)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Read a workbook written by [`save_xlsx`].
pub fn load_xlsx<P: AsRef<Path>>(path: P) -> Result<MacroTable> {
    let path = path.as_ref();
    read_xlsx(path).map_err(|e| DashboardError::export(path, format!("{e:#}")))
}

fn read_xlsx(path: &Path) -> anyhow::Result<MacroTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context("open workbook")?;
    let range = workbook
        .worksheet_range(SHEET_NAME)
        .with_context(|| format!("read sheet {SHEET_NAME}"))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| anyhow!("empty sheet"))?;
    if header.first().map(|c| c.to_string()).as_deref() != Some(YEAR_HEADER) {
        return Err(anyhow!("first header cell must be `{YEAR_HEADER}`"));
    }
    let columns: Vec<String> = header[1..].iter().map(|c| c.to_string()).collect();

    let mut years = Vec::new();
    let mut cells = Vec::new();
    for (i, row) in rows.enumerate() {
        let year = match row.first() {
            Some(Data::Float(f)) => *f as i32,
            Some(Data::Int(n)) => *n as i32,
            other => return Err(anyhow!("row {}: bad year cell {:?}", i + 2, other)),
        };
        let values = (1..=columns.len())
            .map(|c| match row.get(c) {
                Some(Data::Float(f)) => Ok(Some(*f)),
                Some(Data::Int(n)) => Ok(Some(*n as f64)),
                Some(Data::Empty) | None => Ok(None),
                Some(other) => Err(anyhow!("row {}: non-numeric cell {:?}", i + 2, other)),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        years.push(year);
        cells.push(values);
    }

    MacroTable::new(years, columns, cells).ok_or_else(|| anyhow!("inconsistent table in workbook"))
}

/// Guard against spreadsheet formula injection: text cells starting with `=`, `+`, `-`
/// or `@` get a leading single quote.
fn csv_safe(s: &str) -> String {
    if s.starts_with(['=', '+', '-', '@']) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

/// Save as CSV: header `year,<labels...>`, empty field for missing cells.
pub fn save_csv<P: AsRef<Path>>(table: &MacroTable, path: P) -> Result<()> {
    let path = path.as_ref();
    write_csv(table, path).map_err(|e| DashboardError::export(path, format!("{e:#}")))
}

fn write_csv(table: &MacroTable, path: &Path) -> anyhow::Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec![YEAR_HEADER.to_string()];
    header.extend(table.columns().iter().map(|c| csv_safe(c)));
    wtr.write_record(&header)?;
    for (year, row) in table.rows() {
        let mut rec = vec![year.to_string()];
        rec.extend(row.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save as a pretty JSON array of row objects: `{"year": 2010, "<label>": value|null, ...}`.
pub fn save_json<P: AsRef<Path>>(table: &MacroTable, path: P) -> Result<()> {
    let path = path.as_ref();
    write_json(table, path).map_err(|e| DashboardError::export(path, format!("{e:#}")))
}

fn write_json(table: &MacroTable, path: &Path) -> anyhow::Result<()> {
    let records: Vec<Value> = table
        .rows()
        .map(|(year, row)| {
            let mut obj = Map::new();
            obj.insert(YEAR_HEADER.into(), Value::from(year));
            for (label, v) in table.columns().iter().zip(row) {
                obj.insert(label.clone(), v.map(Value::from).unwrap_or(Value::Null));
            }
            Value::Object(obj)
        })
        .collect();
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&records)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_replaces_spaces() {
        assert_eq!(
            export_file_name("United States"),
            "WorldBank_MacroData_United_States.xlsx"
        );
        assert_eq!(export_file_name("India"), "WorldBank_MacroData_India.xlsx");
    }

    #[test]
    fn csv_safe_prefixes_formula_starters() {
        assert_eq!(csv_safe("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(csv_safe("@foo"), "'@foo");
        assert_eq!(csv_safe("Gini index"), "Gini index");
    }
}
