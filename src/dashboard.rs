//! Orchestration behind both front ends: resolve the selected country, fetch the catalog
//! in chunks, and pivot the result.

use crate::catalog::{self, DEFAULT_CHART_SERIES, INDICATORS, Indicator};
use crate::config::DashboardConfig;
use crate::directory::CountryDirectory;
use crate::error::{DashboardError, Result};
use crate::fetcher::{self, ChunkFailure, FetchProgress};
use crate::models::Country;
use crate::provider::Provider;
use crate::reshape::reshape;
use crate::storage;
use crate::table::MacroTable;
use log::{error, info, warn};

/// Country to preselect when it exists in the directory.
pub const DEFAULT_COUNTRY: &str = "India";

/// What one fetch produced.
#[derive(Debug)]
pub struct FetchReport {
    pub country: Country,
    pub table: MacroTable,
    /// Chunks that exhausted their attempts; their indicators are missing from `table`.
    pub failures: Vec<ChunkFailure>,
    pub requested_chunks: usize,
}

impl FetchReport {
    pub fn export_file_name(&self) -> String {
        storage::export_file_name(&self.country.name)
    }

    /// Default chart selection, restricted to columns the table actually has.
    pub fn default_chart_series(&self) -> Vec<String> {
        DEFAULT_CHART_SERIES
            .iter()
            .filter(|s| self.table.column_index(s).is_some())
            .map(|s| s.to_string())
            .collect()
    }
}

pub struct Dashboard<P> {
    directory: CountryDirectory<P>,
    indicators: Vec<Indicator>,
    config: DashboardConfig,
}

impl<P: Provider> Dashboard<P> {
    pub fn new(provider: P, config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            directory: CountryDirectory::new(provider),
            indicators: INDICATORS.to_vec(),
            config,
        })
    }

    /// Replace the indicator catalog. Chunking and column labels follow the new list.
    pub fn with_indicators(mut self, indicators: Vec<Indicator>) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn directory(&self) -> &CountryDirectory<P> {
        &self.directory
    }

    pub fn countries(&self) -> Result<&[Country]> {
        self.directory.list_countries()
    }

    /// Fetch with the dashboard's own configuration.
    pub fn fetch_country(&self, name: &str, progress: &dyn FetchProgress) -> Result<FetchReport> {
        self.fetch_country_with(name, &self.config, progress)
    }

    /// Fetch the whole catalog for the country called `name`.
    ///
    /// Fails with `NotFound` for an unknown name and `EmptyResult` when no chunk could be
    /// fetched. Partially failed fetches succeed and list their failures in the report.
    /// Only the range, chunking and retry fields of `config` apply here: the endpoint and
    /// source id belong to the provider this dashboard was built with.
    pub fn fetch_country_with(
        &self,
        name: &str,
        config: &DashboardConfig,
        progress: &dyn FetchProgress,
    ) -> Result<FetchReport> {
        config.validate()?;
        let country = self.directory.resolve(name)?.clone();
        info!(
            "fetching {} indicators for {} ({}) {}-{}",
            self.indicators.len(),
            country.name,
            country.iso2_code,
            config.start_year,
            config.end_year
        );

        let codes = catalog::codes(&self.indicators);
        let outcome = fetcher::fetch(
            self.directory.provider(),
            &country.iso2_code,
            &codes,
            config,
            progress,
        );
        let requested_chunks = outcome.requested();
        if outcome.is_total_failure() {
            error!("no data could be fetched for {}", country.name);
            return Err(DashboardError::EmptyResult {
                country: country.name,
            });
        }
        for failure in &outcome.failures {
            warn!("{} missing from table: {failure}", country.name);
        }

        let table = reshape(&outcome.chunks, &catalog::label_map(&self.indicators))?;
        Ok(FetchReport {
            country,
            table,
            failures: outcome.failures,
            requested_chunks,
        })
    }
}
