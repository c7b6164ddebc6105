mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use meteogram_core::{AppError, Config};
use meteogram_forecast::share::{initial_location, share_query};
use meteogram_forecast::{
    locate_current, ForecastPipeline, GeocodingClient, HistoryStore, HttpPageScraper, Location,
    SearchDebouncer, SearchOutcome, SqliteKeyValueStore, UnsupportedGeolocation,
};

use crate::terminal::{format_locations, TerminalRenderer};

type Pipeline = ForecastPipeline<HttpPageScraper, SqliteKeyValueStore>;

#[derive(Debug, Parser)]
#[command(name = "meteogram", about = "Multi-day forecast graphs for any location")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for a place; `--pick N` loads the forecast for result N
    Search {
        query: Vec<String>,
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Search as you type: every stdin line replaces the pending query
    Lookup,
    /// Load the forecast for coordinates, a share link, or the most recent location
    Forecast {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long)]
        name: Option<String>,
        /// Query string of a share link, e.g. "lat=40.0150&lon=-105.2705&name=Boulder"
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        link: Option<String>,
    },
    /// Load the forecast for the current position
    Here,
    /// Show or edit recent locations
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Print a share link for the most recent location
    Link,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    List,
    Remove { index: usize },
    Rename { index: usize, name: Vec<String> },
}

struct Services {
    config: Config,
    pipeline: Pipeline,
    geocoder: GeocodingClient,
}

impl Services {
    fn build(config: Config) -> Result<Self> {
        let store = SqliteKeyValueStore::open(config.history_database_path())
            .map_err(AppError::from)
            .context("Failed to open history store")?;
        let history = HistoryStore::open(store, &config.history);

        let scraper = HttpPageScraper::new(&config.forecast)
            .map_err(AppError::from)
            .context("Failed to create forecast client")?;
        let pipeline = ForecastPipeline::from_config(&config.forecast, scraper, history);

        let geocoder = GeocodingClient::new(&config.geocoding)
            .map_err(AppError::from)
            .context("Failed to create geocoding client")?;

        Ok(Self {
            config,
            pipeline,
            geocoder,
        })
    }

    async fn show_forecast(&self, location: Location) {
        let mut renderer = TerminalRenderer::new(std::io::stdout().lock());
        self.pipeline.load_forecast(location, &mut renderer).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    meteogram_core::init()?;
    let cli = Cli::parse();

    let (config, _) = Config::load_validated(cli.config.as_deref())?;
    let services = Services::build(config)?;

    match cli.command {
        Command::Search { query, pick } => search(&services, &query.join(" "), pick).await,
        Command::Lookup => lookup(services).await,
        Command::Forecast {
            lat,
            lon,
            name,
            link,
        } => {
            let location = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(match name {
                    Some(name) => Location::new(name, lat, lon),
                    None => Location::from_coordinates(lat, lon),
                }),
                _ => initial_location(link.as_deref(), &services.pipeline.history()),
            };
            let location = location.context("No location given and no recent locations saved")?;
            services.show_forecast(location).await;
            Ok(())
        }
        Command::Here => {
            let location = locate_current(&UnsupportedGeolocation, &services.geocoder)
                .await
                .map_err(|e| anyhow::anyhow!(AppError::from(e).user_message()))?;
            services.show_forecast(location).await;
            Ok(())
        }
        Command::History { action } => history(&services, action.unwrap_or(HistoryAction::List)),
        Command::Link => {
            let location = initial_location(None, &services.pipeline.history())
                .context("No recent locations saved")?;
            println!("?{}", share_query(&location));
            Ok(())
        }
    }
}

async fn search(services: &Services, query: &str, pick: Option<usize>) -> Result<()> {
    let outcome = SearchOutcome::from_result(services.geocoder.search(query.trim()).await);

    let hits = match outcome {
        SearchOutcome::Found(hits) => hits,
        other => {
            println!("{}", other.message().unwrap_or_default());
            return Ok(());
        }
    };

    match pick {
        Some(n) => {
            let location = n
                .checked_sub(1)
                .and_then(|i| hits.get(i))
                .cloned()
                .with_context(|| format!("No result {} (found {})", n, hits.len()))?;
            services.show_forecast(location).await;
        }
        None => print!("{}", format_locations(&hits, None)),
    }
    Ok(())
}

async fn lookup(services: Services) -> Result<()> {
    let debouncer = Arc::new(SearchDebouncer::from_config(&services.config.geocoding));
    let geocoder = services.geocoder.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = Vec::new();

    if std::io::stdin().is_terminal() {
        eprintln!("Type a place name; results appear after a short pause.");
    }

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let debouncer = debouncer.clone();
        let geocoder = geocoder.clone();
        searches.push(tokio::spawn(async move {
            if let Some(query) = debouncer.submit(&line).await {
                let outcome = SearchOutcome::from_result(geocoder.search(&query).await);
                match outcome {
                    SearchOutcome::Found(hits) => {
                        print!("{}", format_locations(&hits, None));
                    }
                    other => println!("{}", other.message().unwrap_or_default()),
                }
            }
        }));
    }

    for search in searches {
        search.await.context("Search task failed")?;
    }
    Ok(())
}

fn history(services: &Services, action: HistoryAction) -> Result<()> {
    let pipeline = &services.pipeline;
    let to_index = |n: usize| n.checked_sub(1).context("History entries are numbered from 1");

    match action {
        HistoryAction::List => {
            let entries = pipeline.history();
            if entries.is_empty() {
                println!("No recent locations");
            } else {
                print!("{}", format_locations(&entries, entries.first()));
            }
        }
        HistoryAction::Remove { index } => {
            let removed = pipeline
                .remove_history(to_index(index)?)
                .with_context(|| format!("No history entry {}", index))?;
            println!("Removed {}", removed.name);
        }
        HistoryAction::Rename { index, name } => {
            match pipeline.rename_history(to_index(index)?, &name.join(" ")) {
                Some(renamed) => println!("Renamed to {}", renamed.name),
                None => println!("Nothing renamed"),
            }
        }
    }
    Ok(())
}
