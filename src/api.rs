//! Synchronous client for the **World Bank Indicators API (v2)**.
//!
//! Two endpoints are used: `country/{code}/indicator/{codes}` for observations and
//! `country` for the directory of economies. Both are paginated; pages are walked until
//! the metadata says we have them all.
//!
//! ### Notes
//! - The API sometimes serializes `per_page` as a **string**; we accept both string/number.
//! - When requesting **multiple indicators** at once, the API requires a `source` parameter
//!   (`source=2` for WDI). The client sends its source on every request, so one call to
//!   [`Client::fetch`] is always one paginated request.
//! - Each request is attempted exactly once; [`crate::fetcher`] retries whole chunks.
//!
//! Typical usage:
//! ```no_run
//! # use wbi_macro::{Client, DateSpec};
//! let client = Client::default();
//! let rows = client.fetch(
//!     "IN",
//!     &["NY.GDP.MKTP.CD".into(), "SL.UEM.TOTL.ZS".into()],
//!     Some(DateSpec::Range { start: 2010, end: 2023 }),
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::models::{Country, CountryEntry, DataPoint, DateSpec, Entry, Meta};
use crate::provider::Provider;
use anyhow::{Context, Result, bail};
use log::debug;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";

/// World Development Indicators.
pub const WDI_SOURCE: u32 = 2;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    /// Source id sent with every indicator request.
    pub source: u32,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, WDI_SOURCE).expect("reqwest client build")
    }
}

// Allow -, _, . unescaped in codes (common for indicator ids)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc_join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(|s| percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string())
        .collect::<Vec<_>>()
        .join(";")
}

impl Client {
    pub fn new(base_url: impl Into<String>, source: u32) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("wbi_macro/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            source,
            http,
        })
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().context("send request")?;
        let status = resp.status();
        if !status.is_success() {
            bail!("request failed with HTTP {}", status);
        }
        resp.json().context("decode json")
    }

    /// Walk every page of a list endpoint and decode the records of each page.
    fn get_all_pages<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        // Safety cap to avoid pathological jobs
        let max_pages = 1000u32;

        let mut page = 1u32;
        let mut out: Vec<T> = Vec::new();
        loop {
            if page > max_pages {
                bail!("page limit exceeded ({})", max_pages);
            }
            let page_url = format!("{}&page={}", url, page);
            let v: Value = self
                .get_json(&page_url)
                .with_context(|| format!("GET {}", page_url))?;

            // [Meta, [record, ...]] on success, a "message" object in position 0 on error.
            let arr = v.as_array().ok_or_else(|| {
                anyhow::anyhow!("unexpected response shape: not a top-level array")
            })?;
            if arr.is_empty() {
                bail!("unexpected response: empty array");
            }
            if arr[0].get("message").is_some() {
                bail!("world bank api error: {}", arr[0]);
            }

            let meta: Meta = serde_json::from_value(arr[0].clone()).context("parse meta")?;
            // An empty result set comes back as `[meta, null]`.
            match arr.get(1) {
                Some(records) if !records.is_null() => {
                    let records: Vec<T> =
                        serde_json::from_value(records.clone()).context("parse records")?;
                    out.extend(records);
                }
                _ => {}
            }

            if page >= meta.pages {
                break;
            }
            page += 1;
        }
        Ok(out)
    }

    /// First-page URL for all `indicators` of one country as a single request.
    fn indicator_url(
        &self,
        country: &str,
        indicators: &[String],
        date: Option<DateSpec>,
    ) -> String {
        let mut url = format!(
            "{}/country/{}/indicator/{}?format=json&per_page=1000&source={}",
            self.base_url,
            enc_join([country]),
            enc_join(indicators.iter().map(|s| s.as_str())),
            self.source
        );
        if let Some(d) = date {
            url.push_str(&format!("&date={}", d.to_query_param()));
        }
        url
    }

    /// Fetch observations of `indicators` for one country in one request.
    ///
    /// - `country`: ISO2 (e.g., "IN") or ISO3 (e.g., "IND") code.
    /// - `indicators`: e.g., "NY.GDP.MKTP.CD". Several are sent together, which the API
    ///   only accepts with a `source` (see [`WDI_SOURCE`]).
    /// - `date`: A single year or inclusive range.
    pub fn fetch(
        &self,
        country: &str,
        indicators: &[String],
        date: Option<DateSpec>,
    ) -> Result<Vec<DataPoint>> {
        if country.trim().is_empty() {
            bail!("country code required");
        }
        if indicators.is_empty() {
            bail!("at least one indicator code required");
        }

        let url = self.indicator_url(country, indicators, date);
        let entries: Vec<Entry> = self.get_all_pages(&url)?;
        Ok(entries.into_iter().map(DataPoint::from).collect())
    }

    /// Fetch every economy known to the API, aggregates included.
    pub fn fetch_countries(&self) -> Result<Vec<Country>> {
        let url = format!("{}/country?format=json&per_page=1000", self.base_url);
        let entries: Vec<CountryEntry> = self.get_all_pages(&url)?;
        Ok(entries.into_iter().map(Country::from).collect())
    }
}

impl Provider for Client {
    fn name(&self) -> &str {
        "world_bank"
    }

    fn countries(&self) -> Result<Vec<Country>> {
        self.fetch_countries()
    }

    fn download(
        &self,
        country_code: &str,
        indicators: &[String],
        date: DateSpec,
    ) -> Result<Vec<DataPoint>> {
        self.fetch(country_code, indicators, Some(date))
    }
}
