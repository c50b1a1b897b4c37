//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive session (the default), a one-shot statistics
//! command, a raw trip pager and a listing of the configured city files.

mod prompt;

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_explorer::{
    analyzers::report::Report,
    config::CityConfig,
    error::QueryError,
    filters::{City, Query},
    loader::load_city,
    output::{append_record, print_pretty, render_page, render_report, to_json},
    paginator::Paginator,
    table::Table,
};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::prompt::Prompter;

/// Prompts share the terminal, so stderr only shows warnings by default.
const STDERR_LOG_DEFAULT: &str = "warn";

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the per-city CSV files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON file overriding the CSV path of individual cities
    #[arg(long, global = true)]
    city_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer prompts for city, month and day, then browse statistics and trips
    Explore,
    /// Compute statistics for one city without prompting
    Stats {
        /// chicago, new york city or washington
        #[arg(short, long)]
        city: String,

        /// all, or january through june
        #[arg(short, long, default_value = "all")]
        month: String,

        /// all, or monday through sunday
        #[arg(short, long, default_value = "all")]
        day: String,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print one page of raw trip records
    Trips {
        #[arg(short, long)]
        city: String,

        #[arg(short, long, default_value = "all")]
        month: String,

        #[arg(short, long, default_value = "all")]
        day: String,

        /// 1-based page number, five trips per page
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// List the configured city files
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(STDERR_LOG_DEFAULT.parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = city_config(cli.data_dir, cli.city_config)?;

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            explore(&config, Prompter::new(stdin.lock(), stdout.lock()))?;
        }
        Commands::Stats {
            city,
            month,
            day,
            json,
            output,
        } => {
            let (query, table) = query_table(&config, &city, &month, &day)?;
            let view = table.view().filter(&query.filters());
            let report = Report::compute(&view, &query);
            print_pretty(&report);

            let mut stdout = io::stdout().lock();
            if json {
                writeln!(stdout, "{}", to_json(&report)?)?;
            } else {
                render_report(&mut stdout, &report)?;
            }

            if let Some(path) = output {
                append_record(&path, &report.summary())?;
                info!(path = %path.display(), "Summary appended");
            }
        }
        Commands::Trips {
            city,
            month,
            day,
            page,
        } => {
            let (query, table) = query_table(&config, &city, &month, &day)?;
            let view = table.view().filter(&query.filters());

            let mut stdout = io::stdout().lock();
            match Paginator::new(&view).nth(page.saturating_sub(1)) {
                Some(p) => render_page(&mut stdout, &p, view.schema())?,
                None => writeln!(
                    stdout,
                    "No page {page}: the selection has {} trips",
                    view.len()
                )?,
            }
        }
        Commands::Cities => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "Data directory: {}", config.data_dir().display())?;
            for (city, path) in config.iter() {
                let status = if path.exists() { "ok" } else { "missing" };
                writeln!(
                    stdout,
                    "{:<14} {:<8} {}",
                    city.key(),
                    status,
                    path.display()
                )?;
            }
        }
    }

    Ok(())
}

/// Builds the city → file mapping from flags, falling back to
/// `BIKESHARE_DATA_DIR` and `BIKESHARE_CITY_CONFIG`.
fn city_config(data_dir: Option<PathBuf>, overrides: Option<PathBuf>) -> Result<CityConfig> {
    let data_dir = data_dir
        .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let config = CityConfig::new(data_dir);

    match overrides.or_else(|| std::env::var_os("BIKESHARE_CITY_CONFIG").map(PathBuf::from)) {
        Some(path) => Ok(config
            .with_overrides_from(&path)
            .with_context(|| format!("loading city config {}", path.display()))?),
        None => Ok(config),
    }
}

/// Loads a city's table. Load failures abort the current query only.
fn load(config: &CityConfig, city: City) -> Result<Table, QueryError> {
    Ok(load_city(config, city)?)
}

/// Validates the filters before touching the file, then loads the city.
fn query_table(
    config: &CityConfig,
    city: &str,
    month: &str,
    day: &str,
) -> Result<(Query, Table), QueryError> {
    let query = Query::parse(city, month, day)?;
    let table = load(config, query.city)?;
    Ok((query, table))
}

/// Interactive loop: ask for filters, show statistics, page through trips,
/// then offer to start over.
#[tracing::instrument(skip_all)]
fn explore<R: BufRead, W: Write>(config: &CityConfig, mut prompter: Prompter<R, W>) -> Result<()> {
    loop {
        writeln!(prompter.output(), "Hello! Let's explore some US bikeshare data.")?;

        let (Some(city), Some(month), Some(day)) =
            (prompter.ask_city()?, prompter.ask_month()?, prompter.ask_day()?)
        else {
            return Ok(());
        };
        writeln!(prompter.output(), "{}", "-".repeat(40))?;

        let query = Query { city, month, day };
        match load(config, city) {
            Ok(table) => {
                let view = table.view().filter(&query.filters());
                info!(city = %city, month = %month, day = %day, rows = view.len(), "Query ready");

                let report = Report::compute(&view, &query);
                render_report(prompter.output(), &report)?;

                let mut pager = Paginator::new(&view);
                let mut question = "Would you like to see individual trip data? Type 'yes' or 'no': \n";
                while pager.has_more() && prompter.ask_yes_no(question)? {
                    if let Some(page) = pager.next_page() {
                        render_page(prompter.output(), &page, view.schema())?;
                    }
                    question = "Would you like to see 5 more trips? Type 'yes' or 'no': \n";
                }
            }
            Err(e) => {
                error!(error = %e, "Query aborted");
                writeln!(prompter.output(), "Could not load data for {city}: {e}")?;
            }
        }

        if !prompter.ask_yes_no("\nDo you want to restart? Enter yes or no.\n")? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    const WASHINGTON: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type
2017-03-06 08:00:00,2017-03-06 08:10:00,600,A,B,Subscriber
2017-03-06 09:00:00,2017-03-06 09:05:00,300,A,C,Customer
2017-04-03 09:00:00,2017-04-03 09:05:00,300,B,C,Customer
";

    fn data_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("washington.csv"), WASHINGTON).unwrap();
        dir
    }

    fn run(dir: &Path, input: &str) -> String {
        let mut out = Vec::new();
        explore(
            &CityConfig::new(dir),
            Prompter::new(input.as_bytes(), &mut out),
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_invalid_filter_rejected_before_load() {
        let config = CityConfig::new(env::temp_dir().join("bikeshare_explorer_no_such_dir"));

        let err = query_table(&config, "washington", "july", "all").unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter(_)));

        let err = query_table(&config, "washington", "all", "all").unwrap_err();
        assert!(matches!(err, QueryError::Load(_)));
    }

    #[test]
    fn test_query_table_loads_selection() {
        let dir = data_dir("bikeshare_explorer_test_query_table");
        let (query, table) =
            query_table(&CityConfig::new(&dir), "washington", "march", "monday").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.view().filter(&query.filters()).len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_stderr_log_default_is_valid_directive() {
        assert!(
            STDERR_LOG_DEFAULT
                .parse::<tracing_subscriber::filter::Directive>()
                .is_ok()
        );
    }

    #[test]
    fn test_explore_session_with_paging() {
        let dir = data_dir("bikeshare_explorer_test_explore");
        let text = run(&dir, "washington\nmarch\nall\nyes\nno\n");

        assert!(text.contains("Most common start hour for All in the month March is: 8"));
        assert!(text.contains("No Birth Year and Gender information for Washington"));
        assert!(text.contains("Individual trip data, traveler 2"));
        assert!(!text.contains("traveler 3"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explore_reports_missing_file_and_restarts() {
        let dir = data_dir("bikeshare_explorer_test_missing");
        let text = run(&dir, "chicago\nall\nall\nyes\nwashington\nall\nmonday\nno\nno\n");

        assert!(text.contains("Could not load data for Chicago"));
        assert!(text.contains("Most popular month is: March"));
        assert_eq!(text.matches("Hello!").count(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }
}
