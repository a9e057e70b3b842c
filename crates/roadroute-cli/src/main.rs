use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadroute_cli::output::{location_rows, render_enhanced, render_locations, render_stats};
use roadroute_cli::terminal::ColorPalette;
use roadroute_lib::{
    plan_route, Error as LibError, NetworkSource, RoadNetwork, RouteRenderMode, RouteRequest,
    RouteSummary,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Shortest road routes between named locations")]
struct Cli {
    /// Locations CSV (name,latitude,longitude,region). Defaults to $ROADROUTE_LOCATIONS.
    #[arg(long, global = true)]
    locations: Option<PathBuf>,

    /// Roads CSV (from,to,distance_km). Defaults to $ROADROUTE_ROADS.
    #[arg(long, global = true)]
    roads: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Enhanced, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the shortest route between two location names.
    Route {
        /// Origin location name.
        #[arg(long = "from")]
        from: String,
        /// Destination location name.
        #[arg(long = "to")]
        to: String,
    },
    /// List every location in the network.
    Locations,
    /// Show location and road counts.
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Tagged, colored route listing.
    Enhanced,
    /// Plain text summary.
    Text,
    /// Minimal `+`/`|`/`-` path.
    Basic,
    /// Pretty-printed JSON.
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let network = load(cli.locations.as_deref(), cli.roads.as_deref())?;
    let palette = if cli.no_color || cli.format != OutputFormat::Enhanced {
        ColorPalette::plain()
    } else {
        ColorPalette::detect()
    };

    match &cli.command {
        Command::Route { from, to } => handle_route(&network, from, to, cli.format, &palette),
        Command::Locations => handle_locations(&network, cli.format, &palette),
        Command::Stats => handle_stats(&network, cli.format),
    }
}

fn load(locations: Option<&Path>, roads: Option<&Path>) -> Result<RoadNetwork> {
    let source = NetworkSource::resolve(locations, roads)
        .context("failed to resolve the road network source")?;
    source.load().with_context(|| match &source {
        NetworkSource::BuiltIn => "failed to build the built-in network".to_string(),
        NetworkSource::Csv { locations, roads } => format!(
            "failed to load road network from {} and {}",
            locations.display(),
            roads.display()
        ),
    })
}

fn handle_route(
    network: &RoadNetwork,
    from: &str,
    to: &str,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let plan = plan_route(network, &RouteRequest::new(from, to))?;
    let summary = RouteSummary::from_plan(network, &plan)?;

    let rendered = match format {
        OutputFormat::Enhanced => render_enhanced(&summary, palette),
        OutputFormat::Text => summary.render(RouteRenderMode::PlainText)?,
        OutputFormat::Basic => summary.render(RouteRenderMode::Basic)?,
        OutputFormat::Json => summary.render(RouteRenderMode::Json)? + "\n",
    };
    print!("{rendered}");
    Ok(())
}

fn handle_locations(
    network: &RoadNetwork,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let rows = location_rows(network);
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_locations(&rows, palette));
    }
    Ok(())
}

fn handle_stats(network: &RoadNetwork, format: OutputFormat) -> Result<()> {
    let stats = network.stats();
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_stats(&stats));
    }
    Ok(())
}

fn report_error(err: &anyhow::Error) {
    // Only query-time lookups get the friendly form; loader errors keep their context.
    let top_level = err.chain().count() == 1;
    if let (true, Some(LibError::UnknownLocation { name, suggestions })) =
        (top_level, err.downcast_ref::<LibError>())
    {
        eprintln!("Unknown location '{name}'.");
        match suggestions.as_slice() {
            [] => {}
            [only] => eprintln!("Did you mean '{only}'?"),
            many => eprintln!(
                "Did you mean one of: {}?",
                many.iter()
                    .map(|s| format!("'{s}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
        return;
    }
    eprintln!("Error: {err:#}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
