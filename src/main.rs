use agendarr::config::Config;
use agendarr::lidarr::LidarrClient;
use agendarr::observer::{GigObserver, ObserverSet};
use agendarr::sources::SongkickSource;
use agendarr::{logging, CalendarFeed, Gig, RunController};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "agendarr")]
#[command(about = "Concert agenda aggregator for Lidarr music libraries")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List artist names known to the Lidarr library
    Artists,
    /// Discover upcoming gigs and print an iCalendar feed to stdout
    Agenda {
        /// Country filters (comma-separated, matched as location suffixes)
        #[arg(short, long)]
        countries: Option<String>,
        /// Artist names (comma-separated); defaults to the full library
        #[arg(short, long)]
        names: Option<String>,
    },
}

fn split_list(arg: Option<String>) -> Vec<String> {
    arg.map(|list| {
        list.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Stands in for the socket transport of the web dashboard: incremental
/// finds surface in the log instead.
struct TraceObserver;

impl GigObserver for TraceObserver {
    fn gig_found(&self, gig: &Gig) -> agendarr::Result<()> {
        info!(
            "  gig: {} @ {} ({})",
            gig.artist,
            gig.venue.as_deref().unwrap_or("TBA"),
            gig.starts_at.format("%Y-%m-%d")
        );
        Ok(())
    }

    fn search_exhausted(&self) -> agendarr::Result<()> {
        info!("  search exhausted, nothing new found");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Artists => {
            let lidarr = LidarrClient::new(&config.lidarr)?;
            for name in lidarr.artist_names().await? {
                println!("{}", name);
            }
        }
        Commands::Agenda { countries, names } => {
            let countries = split_list(countries);
            let mut names = split_list(names);
            if names.is_empty() {
                let lidarr = LidarrClient::new(&config.lidarr)?;
                names = lidarr.artist_names().await?;
            }

            let source = Arc::new(SongkickSource::new(&config.source));
            let observers = Arc::new(ObserverSet::new());
            observers.subscribe(Arc::new(TraceObserver));

            let controller = Arc::new(RunController::new(source, observers));
            let feed = CalendarFeed::new(controller);
            let ical = feed.agenda(&countries, &names).await?;
            println!("{}", ical);
        }
    }

    Ok(())
}
