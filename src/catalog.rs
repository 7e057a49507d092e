//! The fixed indicator set shown on the dashboard.
//!
//! Order matters: chunks are cut from this list front to back, so it also fixes the
//! column order of every table.

use std::collections::HashMap;

/// A World Bank indicator code and the label used as a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Indicator {
    pub code: &'static str,
    pub label: &'static str,
}

const fn ind(code: &'static str, label: &'static str) -> Indicator {
    Indicator { code, label }
}

pub const INDICATORS: [Indicator; 17] = [
    ind("NY.GDP.MKTP.CD", "GDP (current US$)"),
    ind("NY.GDP.PCAP.CD", "GDP per capita (current US$)"),
    ind("SP.URB.TOTL.IN.ZS", "Urban population (% of total population)"),
    ind("NE.TRD.GNFS.ZS", "Merchandise trade (% of GDP)"),
    ind("EG.IMP.CONS.ZS", "Energy imports, net (% of energy use)"),
    ind("SL.UEM.TOTL.ZS", "Unemployment, total (% of labor force)"),
    ind("SP.DYN.LE00.IN", "Life expectancy at birth (years)"),
    ind("MS.MIL.XPND.GD.ZS", "Military expenditure (% of GDP)"),
    ind("GC.TAX.TOTL.GD.ZS", "Tax revenue (% of GDP)"),
    ind("FS.AST.PRVT.GD.ZS", "Domestic credit to private sector (% of GDP)"),
    ind("SI.POV.GINI", "Gini index"),
    ind("FB.AST.NPER.ZS", "Bank non-performing loans to total gross loans (%)"),
    ind("CM.MKT.TRAD.GD.ZS", "Stocks traded, total value (% of GDP)"),
    ind("BX.TRF.PWKR.DT.GD.ZS", "Personal remittances received (% of GDP)"),
    ind(
        "FR.INR.LNDP",
        "Interest rate spread (lending rate minus deposit rate, %)",
    ),
    ind("BN.CAB.XOKA.GD.ZS", "Current account balance (% of GDP)"),
    ind("EG.USE.ELEC.KH.PC", "Electric power consumption (kWh per capita)"),
];

/// Series charted right after a fetch.
pub const DEFAULT_CHART_SERIES: [&str; 3] = [
    "GDP (current US$)",
    "GDP per capita (current US$)",
    "Unemployment, total (% of labor force)",
];

/// Code -> label lookup used when renaming pivot columns.
pub type LabelMap = HashMap<String, String>;

pub fn label_map(indicators: &[Indicator]) -> LabelMap {
    indicators
        .iter()
        .map(|i| (i.code.to_string(), i.label.to_string()))
        .collect()
}

pub fn codes(indicators: &[Indicator]) -> Vec<String> {
    indicators.iter().map(|i| i.code.to_string()).collect()
}

pub fn labels(indicators: &[Indicator]) -> Vec<String> {
    indicators.iter().map(|i| i.label.to_string()).collect()
}
