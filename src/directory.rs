//! Country directory: the list behind the country selector.
//!
//! Loaded from the provider on first use and kept for the lifetime of the directory.
//! A failed load is not cached, so the next call asks the provider again.

use crate::error::{DashboardError, Result};
use crate::models::Country;
use crate::provider::Provider;
use log::info;
use std::sync::{Mutex, OnceLock};

pub struct CountryDirectory<P> {
    provider: P,
    cache: OnceLock<Vec<Country>>,
    // Serialises the first load so two callers never both hit the provider.
    load_lock: Mutex<()>,
}

impl<P: Provider> CountryDirectory<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Non-aggregate economies sorted by name.
    pub fn list_countries(&self) -> Result<&[Country]> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }

        let all = self
            .provider
            .countries()
            .map_err(|e| DashboardError::provider("load country list", &e))?;
        let total = all.len();
        let countries = selectable(all);
        info!(
            "loaded {} countries from {} ({} aggregates dropped)",
            countries.len(),
            self.provider.name(),
            total - countries.len()
        );
        Ok(self.cache.get_or_init(|| countries))
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Look up a country by its display name.
    pub fn resolve(&self, name: &str) -> Result<&Country> {
        self.list_countries()?
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DashboardError::NotFound {
                name: name.to_string(),
            })
    }

    /// Position of `preferred` in the list, or 0 when it is absent.
    pub fn default_index(&self, preferred: &str) -> Result<usize> {
        Ok(self
            .list_countries()?
            .iter()
            .position(|c| c.name == preferred)
            .unwrap_or(0))
    }
}

/// Drop aggregates and sort by display name.
pub fn selectable(countries: Vec<Country>) -> Vec<Country> {
    let mut out: Vec<Country> = countries.into_iter().filter(|c| !c.is_aggregate()).collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(name: &str, region: &str) -> Country {
        Country {
            name: name.into(),
            iso2_code: name[..2].to_uppercase(),
            iso3_code: name[..3].to_uppercase(),
            region: region.into(),
        }
    }

    #[test]
    fn selectable_filters_and_sorts() {
        let out = selectable(vec![
            c("Zambia", "Sub-Saharan Africa"),
            c("World", "Aggregates"),
            c("Albania", "Europe & Central Asia"),
            c("Euro area", "Aggregates"),
        ]);
        let names: Vec<_> = out.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Albania", "Zambia"]);
    }
}
