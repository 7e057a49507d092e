//! Chunked indicator download with per-chunk retry.
//!
//! The indicator list is cut into consecutive groups of `chunk_size`; each group is one
//! provider request. A group that keeps failing is recorded and skipped: the remaining
//! groups are still requested, in order.

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::DataPoint;
use crate::provider::Provider;
use crate::retry::retry;
use log::{debug, error, info, warn};
use std::fmt;

/// Observations returned by one successful provider request.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChunk {
    /// Position of the group in the partition.
    pub index: usize,
    pub indicators: Vec<String>,
    pub points: Vec<DataPoint>,
}

/// A group that exhausted its attempts.
#[derive(Debug)]
pub struct ChunkFailure {
    pub index: usize,
    pub indicators: Vec<String>,
    pub attempts: u32,
    pub last_error: DashboardError,
}

impl fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to fetch [{}] after {} attempts: {}",
            self.indicators.join(", "),
            self.attempts,
            self.last_error
        )
    }
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub chunks: Vec<RawChunk>,
    pub failures: Vec<ChunkFailure>,
}

impl FetchOutcome {
    /// Number of groups that were requested.
    pub fn requested(&self) -> usize {
        self.chunks.len() + self.failures.len()
    }

    /// Every group failed; callers treat this as "no data".
    pub fn is_total_failure(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Observer for fetch progress. All methods default to no-ops.
pub trait FetchProgress {
    fn on_chunk_start(&self, _index: usize, _total: usize, _indicators: &[String]) {}

    fn on_attempt_failed(
        &self,
        _index: usize,
        _attempt: u32,
        _error: &DashboardError,
        _will_retry: bool,
    ) {
    }

    fn on_chunk_done(&self, _index: usize, _total: usize, _succeeded: bool) {}
}

impl FetchProgress for () {}

pub fn chunk_count(indicators: usize, chunk_size: usize) -> usize {
    indicators.div_ceil(chunk_size.max(1))
}

/// Consecutive groups of `chunk_size`; the last one may be shorter.
pub fn partition(indicators: &[String], chunk_size: usize) -> Vec<&[String]> {
    indicators.chunks(chunk_size.max(1)).collect()
}

/// Download `indicators` for one country, group by group.
pub fn fetch<P: Provider + ?Sized>(
    provider: &P,
    country_code: &str,
    indicators: &[String],
    config: &DashboardConfig,
    progress: &dyn FetchProgress,
) -> FetchOutcome {
    let date = config.date_spec();
    let policy = config.retry_policy();
    let groups = partition(indicators, config.chunk_size);
    let total = groups.len();
    let mut outcome = FetchOutcome::default();

    for (index, group) in groups.into_iter().enumerate() {
        progress.on_chunk_start(index, total, group);
        let context = format!("indicators [{}] for {}", group.join(", "), country_code);

        let attempted = retry(
            policy,
            |attempt, err: &DashboardError, will_retry| {
                if will_retry {
                    warn!(
                        "error fetching {context} (attempt {attempt}/{}): {err}. Retrying in {}s...",
                        policy.max_attempts,
                        policy.delay.as_secs_f64()
                    );
                }
                progress.on_attempt_failed(index, attempt, err, will_retry);
            },
            |_| {
                provider
                    .download(country_code, group, date)
                    .map_err(|e| DashboardError::provider(context.clone(), &e))
            },
        );

        match attempted.result {
            Ok(points) => {
                let received = points.len();
                let points: Vec<DataPoint> =
                    points.into_iter().filter(|p| date.contains(p.year)).collect();
                if points.len() < received {
                    debug!(
                        "dropped {} out-of-range observations for {context}",
                        received - points.len()
                    );
                }
                outcome.chunks.push(RawChunk {
                    index,
                    indicators: group.to_vec(),
                    points,
                });
                progress.on_chunk_done(index, total, true);
            }
            Err(last_error) => {
                let failure = ChunkFailure {
                    index,
                    indicators: group.to_vec(),
                    attempts: attempted.attempts,
                    last_error,
                };
                error!("{failure}");
                outcome.failures.push(failure);
                progress.on_chunk_done(index, total, false);
            }
        }
    }

    info!(
        "fetched {}/{} chunks for {} from {}",
        outcome.chunks.len(),
        total,
        country_code,
        provider.name()
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("IND.{i}")).collect()
    }

    #[test]
    fn chunk_count_is_ceiling_division() {
        assert_eq!(chunk_count(17, 5), 4);
        assert_eq!(chunk_count(15, 5), 3);
        assert_eq!(chunk_count(0, 5), 0);
        assert_eq!(chunk_count(1, 5), 1);
        for n in 0..40 {
            for c in 1..8 {
                assert_eq!(partition(&codes(n), c).len(), chunk_count(n, c));
            }
        }
    }

    #[test]
    fn partition_keeps_order_and_shortens_last_group() {
        let all = codes(17);
        let groups = partition(&all, 5);
        let sizes: Vec<_> = groups.iter().map(|g| g.len()).collect();
        assert_eq!(sizes, [5, 5, 5, 2]);
        let flat: Vec<String> = groups.concat();
        assert_eq!(flat, all);
    }
}
