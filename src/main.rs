#![warn(clippy::pedantic)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

use concertio::client::DEFAULT_LOCATION;
use concertio::client::DashboardClient;
use concertio::client::SearchCriteria;
use concertio::config::Config;
use concertio::export;
use concertio::geo::GeoPoint;
use concertio::model::Event;
use concertio::model::Genre;
use concertio::proxy;
use concertio::view;
use concertio::view::SortKey;
use concertio::view::ViewState;

#[derive(Parser)]
#[command(name = "concertio", about = "Search a live event catalog and chart what's playing nearby")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the credential-injecting proxy in front of the catalog API
    Serve,
    /// Search the catalog and render the table, chart, and suggestions
    Search(SearchArgs),
    /// Fetch one event through the proxy and print its full detail
    Detail {
        /// Upstream event identifier
        id: String,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Restrict to one genre (Pop, Rock, Rap, Hip-Hop, Electronic, Jazz,
    /// Country, Classical, Alternative)
    #[arg(long)]
    genre: Option<Genre>,
    /// Free-text artist keyword forwarded to the catalog search
    #[arg(long, default_value = "")]
    artist: String,
    /// Keep only events featuring this exact attraction name
    #[arg(long)]
    select_artist: Option<String>,
    /// Your latitude; both coordinates default to the capital-area fallback
    #[arg(long, requires = "lon")]
    lat: Option<f64>,
    /// Your longitude
    #[arg(long, requires = "lat")]
    lon: Option<f64>,
    /// Sort column: date or distance
    #[arg(long)]
    sort: Option<SortKey>,
    /// Sort descending instead of ascending
    #[arg(long)]
    desc: bool,
    /// Table page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Also export the result set as CSV to this path
    #[arg(long, value_name = "PATH", num_args = 0..=1,
          default_missing_value = export::CSV_FILE_NAME)]
    csv: Option<PathBuf>,
    /// Pause between detail calls, in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve => proxy::serve(&config).await,
        Command::Search(args) => run_search(&config, args).await,
        Command::Detail { id } => run_detail(&config, &id).await,
    }
}

async fn run_search(config: &Config, args: SearchArgs) -> anyhow::Result<()> {
    let location = match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => GeoPoint { latitude, longitude },
        _ => DEFAULT_LOCATION,
    };
    let criteria = SearchCriteria {
        genre: args.genre,
        artist: args.artist,
        selected_artist: args.select_artist,
    };

    let client = DashboardClient::new(config.api_url.clone(), config.public_api_key.clone())
        .with_detail_delay(Duration::from_millis(args.delay_ms));
    let outcome = client.search(&criteria, location).await?;

    // CSV reflects the authoritative set before any sort or pagination.
    if let Some(path) = &args.csv {
        export::write_csv(&outcome.events, path)?;
        println!("Exported {} events to {}", outcome.events.len(), path.display());
    }

    if !outcome.artist_names.is_empty() {
        println!("Artists in these results: {}", outcome.artist_names.join(", "));
        println!();
    }

    print_chart(&view::top_attractions(&outcome.events));

    let mut view_state = ViewState::new();
    if let Some(key) = args.sort {
        view_state.toggle_sort(key);
        if args.desc {
            view_state.toggle_sort(key);
        }
    }
    view_state.set_page(args.page);

    let mut sorted = outcome.events.clone();
    view::apply_sort(&mut sorted, &view_state, location);
    print_table(&sorted, &view_state);

    Ok(())
}

async fn run_detail(config: &Config, id: &str) -> anyhow::Result<()> {
    let client = DashboardClient::new(config.api_url.clone(), config.public_api_key.clone());
    let event = client.event_detail(id).await?;

    println!("{}", event.name().as_deref().unwrap_or("—"));
    println!("  Venue:       {}", event.venue_name().unwrap_or("—"));
    println!("  Location:    {}", event.city_state().as_deref().unwrap_or("—"));
    let when = event
        .start_datetime()
        .map_or_else(|| "N/A".to_string(), |dt| dt.format("%A, %B %e, %Y %l:%M %p").to_string());
    println!("  Date & Time: {when}");
    if let Some(image) = event.image_url() {
        println!("  Image:       {image}");
    }
    match event.url().as_deref() {
        Some(url) => println!("  Buy Tickets: {url}"),
        None => println!("  Buy Tickets: unavailable"),
    }
    Ok(())
}

fn print_chart(buckets: &[view::ChartBucket]) {
    if buckets.is_empty() {
        return;
    }
    println!("Top Artists in Your Area");
    let widest = buckets.iter().map(|b| b.name.len()).max().unwrap_or(0);
    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(1);
    for bucket in buckets {
        let bar = "#".repeat((bucket.count * 40).div_ceil(max_count));
        println!("  {:widest$}  {bar} {}", bucket.name, bucket.count);
    }
    println!();
}

fn print_table(sorted: &[Event], state: &ViewState) {
    let page = view::page_slice(sorted, state.page());
    println!(
        "{:<40} {:<12} {:<28} {:<28}",
        "Name", "Date", "City", "Venue"
    );
    for event in page {
        println!(
            "{:<40} {:<12} {:<28} {:<28}",
            truncate(event.name().as_deref().unwrap_or("—"), 40),
            event.local_date().unwrap_or("—"),
            truncate(&event.city_state().unwrap_or_else(|| "—".to_string()), 28),
            truncate(event.venue_name().unwrap_or("—"), 28),
        );
    }
    if let Some((first, last)) = view::page_bounds(sorted.len(), state.page()) {
        println!();
        println!(
            "Showing {first}-{last} of {} events (page {}/{})",
            sorted.len(),
            state.page(),
            view::page_count(sorted.len())
        );
    } else {
        println!("No events to show.");
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
