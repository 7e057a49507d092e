use serde::{Deserialize, Serialize};

/// How to specify dates in API queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSpec {
    /// Single year like 2020
    Year(i32),
    /// Inclusive range like 2000..=2020
    Range { start: i32, end: i32 },
}

impl DateSpec {
    pub fn to_query_param(&self) -> String {
        match *self {
            DateSpec::Year(y) => y.to_string(),
            DateSpec::Range { start, end } => format!("{}:{}", start, end),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        match *self {
            DateSpec::Year(y) => y == year,
            DateSpec::Range { start, end } => (start..=end).contains(&year),
        }
    }
}

/// Metadata section returned by the API (position 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub page: u32,
    pub pages: u32,
    #[serde(deserialize_with = "de_u32_from_string_or_number")]
    pub per_page: u32,
    pub total: u32,
}

/// `per_page` arrives as `"50"` on some endpoints and `50` on others.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeName {
    pub id: String,
    pub value: String,
}

/// Raw observation from the indicator endpoint (position 1 array).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub indicator: CodeName,
    pub country: CodeName,
    pub countryiso3code: String,
    pub date: String,
    pub value: Option<f64>,
}

/// Tidy observation (one row = one country, indicator, year).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataPoint {
    pub indicator_id: String,
    pub indicator_name: String,
    pub country_id: String, // typically ISO2
    pub country_name: String,
    pub country_iso3: String,
    pub year: i32,
    pub value: Option<f64>,
}

impl From<Entry> for DataPoint {
    fn from(e: Entry) -> Self {
        let year = e.date.parse::<i32>().unwrap_or(0);
        Self {
            indicator_id: e.indicator.id,
            indicator_name: e.indicator.value,
            country_id: e.country.id,
            country_name: e.country.value,
            country_iso3: e.countryiso3code,
            year,
            value: e.value,
        }
    }
}

/// Raw record from the `country` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryEntry {
    pub id: String,
    #[serde(rename = "iso2Code")]
    pub iso2_code: String,
    pub name: String,
    pub region: CodeName,
}

/// Region value the API uses for regional and income aggregates.
pub const AGGREGATES_REGION: &str = "Aggregates";

/// A selectable economy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    /// Code passed to the indicator endpoint.
    pub iso2_code: String,
    pub iso3_code: String,
    pub region: String,
}

impl Country {
    pub fn is_aggregate(&self) -> bool {
        self.region == AGGREGATES_REGION
    }
}

impl From<CountryEntry> for Country {
    fn from(e: CountryEntry) -> Self {
        Self {
            name: e.name.trim().to_string(),
            iso2_code: e.iso2_code,
            iso3_code: e.id,
            region: e.region.value.trim().to_string(),
        }
    }
}
