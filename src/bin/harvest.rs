//! Command-line host for patent collection.
//!
//! Tracing goes to stderr; the report goes to stdout.

use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use patent_harvest::{compose_query, report, timestamped_dir, BackendChoice, HarvestConfig};
use patent_search::{
    CollectError, Collector, DownloadEvent, GooglePatentsBackend, PatentsViewBackend, Source,
    StaticPageProvider, UsptoSearchBackend,
};
use tracing_subscriber::EnvFilter;

/// Collect patents for a query and download their PDFs.
#[derive(Parser)]
#[command(name = "patent-harvest", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sources to query (overrides the config file).
    #[arg(short, long, value_enum)]
    backend: Option<BackendChoice>,

    /// Maximum results per source (overrides the config file).
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Output directory (default: timestamped directory in the working directory).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Industry vertical, e.g. "cordless vacuum cleaners".
    #[arg(long, default_value = "")]
    industry: String,

    /// Company name, e.g. "Dyson".
    #[arg(long, default_value = "")]
    company: String,

    /// Free-text query. Takes precedence over --industry/--company.
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("patent_harvest=info,patent_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => HarvestConfig::from_file(path)?,
        None => {
            let default_path = HarvestConfig::default_config_path();
            if default_path.exists() {
                HarvestConfig::from_file(&default_path)?
            } else {
                HarvestConfig::default()
            }
        }
    };

    let query = if cli.query.is_empty() {
        compose_query(&cli.industry, &cli.company)
    } else {
        cli.query.join(" ")
    };
    let choice = cli.backend.unwrap_or(config.search.backend);
    let max_results = cli.max_results.unwrap_or(config.search.max_results);
    let out_dir = cli
        .out_dir
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| {
            timestamped_dir(
                std::path::Path::new("."),
                &config.output.prefix,
                chrono::Local::now(),
            )
        });

    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("  {msg} [{bar:30}] {pos}/{len}") {
        bar.set_style(style);
    }
    let bar_events = bar.clone();

    let collect_config = config.collect_config();
    let mut collector = Collector::new(collect_config.clone())?.with_progress(Box::new(
        move |event| match event {
            DownloadEvent::PhaseStarted { total } => bar_events.set_length(total as u64),
            DownloadEvent::Started { url } => bar_events.set_message(url),
            DownloadEvent::Finished { .. } => bar_events.inc(1),
        },
    ));

    // The provider outlives every backend borrowing it and is dropped on
    // every exit path below.
    let provider = StaticPageProvider::new(collector.client().clone());
    let client = collector.client().clone();
    let sources: Vec<Source<'_, StaticPageProvider>> = match choice {
        BackendChoice::GooglePatents => vec![Source::GooglePatents(GooglePatentsBackend::new(
            &provider,
            &collect_config,
        ))],
        BackendChoice::PatentsView => vec![Source::PatentsView(PatentsViewBackend::new(
            client,
            &collect_config,
        ))],
        BackendChoice::Uspto => vec![Source::UsptoSearch(UsptoSearchBackend::new(
            client,
            &collect_config,
        ))],
        BackendChoice::All => vec![
            Source::GooglePatents(GooglePatentsBackend::new(&provider, &collect_config)),
            Source::PatentsView(PatentsViewBackend::new(client.clone(), &collect_config)),
            Source::UsptoSearch(UsptoSearchBackend::new(client, &collect_config)),
        ],
    };

    tracing::info!(?choice, max_results, out_dir = %out_dir.display(), "starting collection");
    println!("Collecting patents for: {query}");
    let result = collector
        .run_many(&query, &sources, max_results, &out_dir)
        .await;
    bar.finish_and_clear();

    match result {
        Ok(summary) => {
            print!("{}", report::render_summary(&summary));
            Ok(())
        }
        Err(CollectError::InvalidQuery(_)) => {
            eprintln!("Please enter an industry vertical or company name.");
            anyhow::bail!("no query given")
        }
        Err(e) => Err(e.into()),
    }
}
