//! Fetch settings shared by the CLI and the GUI.
//!
//! The endpoint (base URL and source id) is not part of this: it is fixed when the
//! [`crate::Client`] is built, and every fetch goes through that client.

use crate::error::{DashboardError, Result};
use crate::models::DateSpec;
use crate::retry::RetryPolicy;
use std::time::Duration;

/// Earliest and latest year accepted for a query.
pub const YEAR_BOUNDS: (i32, i32) = (1960, 2030);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// Indicators per provider request.
    pub chunk_size: usize,
    /// Attempts per chunk, first one included.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            start_year: 2010,
            end_year: 2023,
            chunk_size: 5,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = YEAR_BOUNDS;
        if self.start_year > self.end_year {
            return Err(DashboardError::InvalidConfig(
                "start year cannot be later than end year".into(),
            ));
        }
        if self.start_year < lo || self.end_year > hi {
            return Err(DashboardError::InvalidConfig(format!(
                "years should be between {lo} and {hi}"
            )));
        }
        if self.chunk_size == 0 {
            return Err(DashboardError::InvalidConfig(
                "chunk size must be at least 1".into(),
            ));
        }
        if self.max_retries == 0 {
            return Err(DashboardError::InvalidConfig(
                "at least one attempt per chunk is required".into(),
            ));
        }
        Ok(())
    }

    pub fn date_spec(&self) -> DateSpec {
        if self.start_year == self.end_year {
            DateSpec::Year(self.start_year)
        } else {
            DateSpec::Range {
                start: self.start_year,
                end: self.end_year,
            }
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let c = DashboardConfig::default();
        assert_eq!((c.start_year, c.end_year), (2010, 2023));
        assert_eq!(c.chunk_size, 5);
        assert_eq!(c.max_retries, 3);
        assert_eq!(c.retry_delay, Duration::from_secs(5));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let base = DashboardConfig::default();
        let cases = [
            DashboardConfig {
                start_year: 2020,
                end_year: 2010,
                ..base.clone()
            },
            DashboardConfig {
                start_year: 1950,
                ..base.clone()
            },
            DashboardConfig {
                end_year: 2040,
                ..base.clone()
            },
            DashboardConfig {
                chunk_size: 0,
                ..base.clone()
            },
            DashboardConfig {
                max_retries: 0,
                ..base.clone()
            },
        ];
        for c in cases {
            assert!(
                matches!(c.validate(), Err(DashboardError::InvalidConfig(_))),
                "{c:?}"
            );
        }
    }

    #[test]
    fn single_year_is_sent_as_plain_year() {
        let c = DashboardConfig {
            start_year: 2015,
            end_year: 2015,
            ..Default::default()
        };
        assert_eq!(c.date_spec(), DateSpec::Year(2015));
        assert_eq!(
            DashboardConfig::default().date_spec().to_query_param(),
            "2010:2023"
        );
    }
}
