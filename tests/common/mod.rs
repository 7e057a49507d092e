#![allow(dead_code)]

use anyhow::{Result, anyhow};
use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use wbi_macro::models::{Country, DataPoint, DateSpec};
use wbi_macro::{DashboardConfig, Provider};

/// In-memory provider with scripted failures.
///
/// Values are `year + position of the code in the request`, so tests can predict cells.
pub struct ScriptedProvider {
    pub countries: Vec<Country>,
    /// A request containing any of these codes always fails.
    pub failing: HashSet<String>,
    /// Every request fails this many times before succeeding.
    pub flaky_failures: u32,
    /// Country list loads fail this many times before succeeding.
    pub country_failures: AtomicU32,
    /// Years the provider has observations for, regardless of the requested range.
    pub years: RangeInclusive<i32>,
    pub country_calls: AtomicUsize,
    pub requests: Mutex<Vec<Vec<String>>>,
    pub attempts: Mutex<HashMap<Vec<String>, u32>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            countries: sample_countries(),
            failing: HashSet::new(),
            flaky_failures: 0,
            country_failures: AtomicU32::new(0),
            years: 2010..=2023,
            country_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            attempts: Mutex::new(HashMap::new()),
        }
    }
}

impl ScriptedProvider {
    pub fn failing<I: IntoIterator<Item = &'static str>>(codes: I) -> Self {
        Self {
            failing: codes.into_iter().map(String::from).collect(),
            ..Default::default()
        }
    }

    pub fn request_sizes(&self) -> Vec<usize> {
        self.requests.lock().unwrap().iter().map(|r| r.len()).collect()
    }
}

impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn countries(&self) -> Result<Vec<Country>> {
        self.country_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.country_failures.load(Ordering::SeqCst);
        if left > 0 {
            self.country_failures.store(left - 1, Ordering::SeqCst);
            return Err(anyhow!("country endpoint timed out"));
        }
        Ok(self.countries.clone())
    }

    fn download(
        &self,
        country_code: &str,
        indicators: &[String],
        _date: DateSpec,
    ) -> Result<Vec<DataPoint>> {
        self.requests.lock().unwrap().push(indicators.to_vec());

        if indicators.iter().any(|c| self.failing.contains(c)) {
            return Err(anyhow!("HTTP 502 Bad Gateway"));
        }
        let mut attempts = self.attempts.lock().unwrap();
        let seen = attempts.entry(indicators.to_vec()).or_insert(0);
        *seen += 1;
        if *seen <= self.flaky_failures {
            return Err(anyhow!("connection reset"));
        }

        let mut out = Vec::new();
        for (pos, code) in indicators.iter().enumerate() {
            for year in self.years.clone() {
                out.push(point(country_code, code, year, Some(year as f64 + pos as f64)));
            }
        }
        Ok(out)
    }
}

pub fn point(country: &str, code: &str, year: i32, value: Option<f64>) -> DataPoint {
    DataPoint {
        indicator_id: code.into(),
        indicator_name: code.into(),
        country_id: country.into(),
        country_name: country.into(),
        country_iso3: country.into(),
        year,
        value,
    }
}

pub fn country(name: &str, iso2: &str, iso3: &str, region: &str) -> Country {
    Country {
        name: name.into(),
        iso2_code: iso2.into(),
        iso3_code: iso3.into(),
        region: region.into(),
    }
}

pub fn sample_countries() -> Vec<Country> {
    vec![
        country("Kenya", "KE", "KEN", "Sub-Saharan Africa"),
        country("World", "1W", "WLD", "Aggregates"),
        country("India", "IN", "IND", "South Asia"),
        country("Euro area", "XC", "EMU", "Aggregates"),
        country("Brazil", "BR", "BRA", "Latin America & Caribbean"),
    ]
}

/// Defaults with no pause between attempts.
pub fn fast_config() -> DashboardConfig {
    DashboardConfig {
        retry_delay: Duration::ZERO,
        ..Default::default()
    }
}
