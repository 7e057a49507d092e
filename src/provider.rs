//! The seam between the dashboard and whatever serves indicator data.
//!
//! [`crate::Client`] implements it against the live World Bank API; tests drive the
//! fetcher and directory through scripted implementations.

use crate::models::{Country, DataPoint, DateSpec};
use anyhow::Result;

pub trait Provider: Send + Sync {
    /// Human-readable name used in log lines.
    fn name(&self) -> &str;

    /// Every economy the provider knows, aggregates included.
    fn countries(&self) -> Result<Vec<Country>>;

    /// Observations for `indicators` in one country over `date`, as one request.
    fn download(
        &self,
        country_code: &str,
        indicators: &[String],
        date: DateSpec,
    ) -> Result<Vec<DataPoint>>;
}

impl<P: Provider + ?Sized> Provider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn countries(&self) -> Result<Vec<Country>> {
        (**self).countries()
    }

    fn download(
        &self,
        country_code: &str,
        indicators: &[String],
        date: DateSpec,
    ) -> Result<Vec<DataPoint>> {
        (**self).download(country_code, indicators, date)
    }
}
