//! wbi_macro
//!
//! A country macro dashboard on top of the World Bank Indicators API. Pairs with the
//! `wbi-macro` CLI and the `wbi-macro-gui` desktop app.
//!
//! ### Features
//! - Country directory (aggregates filtered out, memoized per process)
//! - Chunked download of a fixed 17-indicator catalog with bounded per-chunk retry
//! - Pivot into a year x indicator table
//! - Export to Excel (`.xlsx`), CSV or JSON; line charts to SVG/PNG
//!
//! ### Example
//! ```no_run
//! use wbi_macro::{Client, Dashboard, DashboardConfig};
//!
//! let dashboard = Dashboard::new(Client::default(), DashboardConfig::default())?;
//! let report = dashboard.fetch_country("India", &())?;
//! for failure in &report.failures {
//!     eprintln!("warning: {failure}");
//! }
//! wbi_macro::storage::save_xlsx(&report.table, report.export_file_name())?;
//! wbi_macro::viz::plot_table(
//!     &report.table,
//!     &report.default_chart_series(),
//!     "trends.svg",
//!     1000,
//!     600,
//!     "Key Trends",
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod reshape;
pub mod retry;
pub mod stats;
pub mod storage;
pub mod table;
pub mod viz;

pub use api::Client;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, FetchReport};
pub use error::DashboardError;
pub use models::{Country, DataPoint, DateSpec};
pub use provider::Provider;
pub use table::MacroTable;
