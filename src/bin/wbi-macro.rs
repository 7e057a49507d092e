use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use wbi_macro::api::WDI_SOURCE;
use wbi_macro::catalog::INDICATORS;
use wbi_macro::fetcher::FetchProgress;
use wbi_macro::table::format_cell;
use wbi_macro::{Client, Dashboard, DashboardConfig, DashboardError};
use wbi_macro::{stats, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "wbi-macro",
    version,
    about = "Fetch, tabulate, chart & export World Bank macro indicators for one country"
)]
struct Cli {
    /// API base URL.
    #[arg(long, global = true, default_value = wbi_macro::api::DEFAULT_BASE_URL)]
    base_url: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable countries (aggregates excluded).
    Countries(CountriesArgs),
    /// List the indicator catalog.
    Indicators,
    /// Fetch the catalog for one country (and optionally export, plot, and print stats).
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct CountriesArgs {
    /// Only show countries whose region contains this text (case-insensitive).
    #[arg(long)]
    region: Option<String>,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Xlsx,
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Country display name as listed by `countries` (e.g., "India", "United States").
    #[arg(short, long, default_value = wbi_macro::dashboard::DEFAULT_COUNTRY)]
    country: String,
    /// First year (inclusive).
    #[arg(long, default_value_t = 2010)]
    start: i32,
    /// Last year (inclusive).
    #[arg(long, default_value_t = 2023)]
    end: i32,
    /// Indicators per request.
    #[arg(long, default_value_t = 5)]
    chunk_size: usize,
    /// Attempts per chunk.
    #[arg(long, default_value_t = 3)]
    retries: u32,
    /// Seconds to wait between attempts.
    #[arg(long, default_value_t = 5)]
    retry_delay: u64,
    /// Save the table to a file. A directory gets the default export file name.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format. If omitted, inferred from --out extension (xlsx by default).
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Column label to chart; repeat for several. Defaults to GDP, GDP per capita, unemployment.
    #[arg(long = "series")]
    series: Vec<String>,
    /// Locale for chart tick labels (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Print per-indicator statistics to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Do not print the table.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

/// Chunk progress on stderr.
struct StderrProgress;

impl FetchProgress for StderrProgress {
    fn on_chunk_start(&self, index: usize, total: usize, indicators: &[String]) {
        eprintln!("[{}/{}] {}", index + 1, total, indicators.join(", "));
    }

    fn on_attempt_failed(
        &self,
        _index: usize,
        attempt: u32,
        error: &DashboardError,
        will_retry: bool,
    ) {
        if will_retry {
            eprintln!("  attempt {attempt} failed: {error}. Retrying...");
        }
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Countries(args) => cmd_countries(&cli.base_url, args),
        Command::Indicators => {
            cmd_indicators();
            Ok(())
        }
        Command::Fetch(args) => cmd_fetch(&cli.base_url, args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_countries(base_url: &str, args: CountriesArgs) -> Result<()> {
    let client = Client::new(base_url, WDI_SOURCE)?;
    let dashboard = Dashboard::new(client, DashboardConfig::default())?;
    let filter = args.region.map(|r| r.to_lowercase());
    for c in dashboard.countries()? {
        if let Some(f) = &filter
            && !c.region.to_lowercase().contains(f)
        {
            continue;
        }
        println!("{}\t{}\t{}\t{}", c.name, c.iso2_code, c.iso3_code, c.region);
    }
    Ok(())
}

fn cmd_indicators() {
    for i in INDICATORS.iter() {
        println!("{}\t{}", i.code, i.label);
    }
}

fn cmd_fetch(base_url: &str, args: FetchArgs) -> Result<()> {
    let config = DashboardConfig {
        start_year: args.start,
        end_year: args.end,
        chunk_size: args.chunk_size,
        max_retries: args.retries,
        retry_delay: Duration::from_secs(args.retry_delay),
    };
    let client = Client::new(base_url, WDI_SOURCE)?;
    let dashboard = Dashboard::new(client, config)?;
    let report = dashboard.fetch_country(&args.country, &StderrProgress)?;

    for failure in &report.failures {
        eprintln!("warning: {failure}");
    }
    eprintln!(
        "Fetched {}/{} chunks for {}",
        report.requested_chunks - report.failures.len(),
        report.requested_chunks,
        report.country.name
    );

    let table = &report.table;
    if !args.quiet {
        println!("year\t{}", table.columns().join("\t"));
        for (year, row) in table.rows() {
            let cells: Vec<String> = row.iter().map(|v| format_cell(*v)).collect();
            println!("{}\t{}", year, cells.join("\t"));
        }
    }

    if let Some(out) = args.out.as_ref() {
        let path = if out.is_dir() {
            out.join(report.export_file_name())
        } else {
            out.clone()
        };
        let fmt = match args.format {
            Some(OutFormat::Xlsx) => "xlsx".to_string(),
            Some(OutFormat::Csv) => "csv".to_string(),
            Some(OutFormat::Json) => "json".to_string(),
            None => path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("xlsx")
                .to_ascii_lowercase(),
        };
        match fmt.as_str() {
            "xlsx" => storage::save_xlsx(table, &path)?,
            "csv" => storage::save_csv(table, &path)?,
            "json" => storage::save_json(table, &path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", table.years().len(), path.display());
    }

    if let Some(plot_path) = args.plot.as_ref() {
        let series = if args.series.is_empty() {
            report.default_chart_series()
        } else {
            args.series.clone()
        };
        viz::plot_table_locale(
            table,
            &series,
            plot_path,
            1000,
            600,
            viz::DEFAULT_TITLE,
            &args.locale,
        )?;
        eprintln!("Wrote plot to {}", plot_path.display());
    }

    if args.stats {
        for s in stats::column_summary(table) {
            println!(
                "{}  count={} missing={}  min={} max={} mean={} median={}",
                s.label,
                s.count,
                s.missing,
                fmt_opt(s.min),
                fmt_opt(s.max),
                fmt_opt(s.mean),
                fmt_opt(s.median)
            );
        }
    }

    Ok(())
}
