use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::warn;

use flightview::config::Config;
use flightview::derive::SortOrder;
use flightview::error::ViewerError;
use flightview::logging::{init_logging, Verbosity};
use flightview::render::{self, OutputMode};
use flightview::state::ViewerState;
use flightview::{format, session};

#[derive(Parser)]
#[command(
    name = "flightview",
    about = "Filter, sort and page through flight offers from the terminal",
    version,
    after_help = "\
Examples:
  flightview view
  flightview view --source data/flights.json --order duration
  flightview view --stops 0 --min-price 20000 --max-price 60000
  flightview view --airline SU1,AF --json --pretty
  flightview facets
  flightview browse

Agent-optimized:
  flightview view --compact --pages 2
  flightview mcp"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Config file [default: flightview.toml]")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output (-vv for trace)")]
    verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Show filtered and sorted flight offers",
        long_about = "Load the flight document once, apply the filters and ordering, and print\n\
            the first page of matching offers. Empty airline and stop selections mean\n\
            no restriction.",
        after_help = "\
Examples:
  Cheapest first:   flightview view
  Most expensive:   flightview view --order price-desc
  Nonstop only:     flightview view --stops 0
  Price range:      flightview view --min-price 20000 --max-price 60000
  By airline:       flightview view --airline SU1,AF
  Two pages:        flightview view --pages 2
  JSON output:      flightview view --json --pretty"
    )]
    View(ViewArgs),
    #[command(about = "List the airlines and stop counts present in the data")]
    Facets(FacetsArgs),
    #[command(about = "Browse interactively (one command per line; type help)")]
    Browse(BrowseArgs),
    #[command(about = "Start MCP server for AI agents (stdio transport)")]
    Mcp(SourceArgs),
}

#[derive(clap::Args)]
struct SourceArgs {
    #[arg(
        short, long,
        value_name = "PATH|URL",
        help = "Flight document to load",
        long_help = "Path or http(s) URL of the flight document, shaped as \
            { result: { flights: [...] } }. Overrides source.location from the config."
    )]
    source: Option<String>,
}

#[derive(clap::Args)]
struct ViewArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(
        long,
        value_name = "UID,...",
        value_delimiter = ',',
        help = "Keep only these carrier airline ids (repeatable or comma-separated)"
    )]
    airline: Vec<String>,

    #[arg(
        long,
        value_name = "N,...",
        value_delimiter = ',',
        help = "Keep only these total stop counts (0 = nonstop)"
    )]
    stops: Vec<u32>,

    #[arg(long, value_name = "AMOUNT", help = "Lowest single-passenger price")]
    min_price: Option<String>,

    #[arg(long, value_name = "AMOUNT", help = "Highest single-passenger price (capped at 1000000)")]
    max_price: Option<String>,

    #[arg(
        long,
        value_name = "ORDER",
        help = "Ordering [price-asc, price-desc, duration]"
    )]
    order: Option<String>,

    #[arg(long, default_value = "1", value_name = "N", help = "Number of pages to reveal")]
    pages: usize,

    #[arg(long, help = "Print the filter panel before the results")]
    filters: bool,

    #[arg(long, help = "One-line-per-offer output (recommended for scripts and AI agents)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

#[derive(clap::Args)]
struct FacetsArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long, help = "Output as JSON")]
    json: bool,
}

#[derive(clap::Args)]
struct BrowseArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long, help = "One-line-per-offer output")]
    compact: bool,
}

fn error_code(err: &ViewerError) -> i32 {
    match err {
        ViewerError::Validation(_) | ViewerError::Config(_) => 2,
        ViewerError::Timeout | ViewerError::ConnectionFailed(_) | ViewerError::ProxyError(_) => 3,
        ViewerError::HttpStatus(_) => 5,
        ViewerError::NotFound(_)
        | ViewerError::Io(_)
        | ViewerError::JsonParse(_)
        | ViewerError::UnexpectedShape(_) => 6,
    }
}

fn error_kind(err: &ViewerError) -> &'static str {
    match err {
        ViewerError::NotFound(_) => "not_found",
        ViewerError::Io(_) => "io_error",
        ViewerError::Timeout => "timeout",
        ViewerError::ConnectionFailed(_) => "connection_failed",
        ViewerError::ProxyError(_) => "proxy_error",
        ViewerError::HttpStatus(_) => "http_error",
        ViewerError::JsonParse(_) => "parse_error",
        ViewerError::UnexpectedShape(_) => "unexpected_shape",
        ViewerError::Config(_) => "config_error",
        ViewerError::Validation(_) => "validation_error",
    }
}

fn die(err: &ViewerError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{json}");
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn parse_price(flag: &str, value: &str) -> Result<Decimal, ViewerError> {
    Decimal::from_str(value.trim())
        .map_err(|_| ViewerError::Validation(format!("{flag} must be a number, got \"{value}\"")))
}

fn output_mode(compact: bool, json: bool, pretty: bool) -> OutputMode {
    if json || pretty {
        OutputMode::Json { pretty }
    } else if compact {
        OutputMode::Compact
    } else {
        OutputMode::Table
    }
}

fn source_of<'a>(args: &'a SourceArgs, config: &'a Config) -> &'a str {
    args.source.as_deref().unwrap_or(&config.source.location)
}

fn apply_view_args(mut state: ViewerState, args: &ViewArgs) -> Result<ViewerState, ViewerError> {
    let mut filter = state.filter().clone();
    filter.airlines.extend(args.airline.iter().map(|a| a.trim().to_string()));
    filter.stops.extend(args.stops.iter().copied());
    if let Some(ref min) = args.min_price {
        filter.min_price = flightview::derive::clamp_price(parse_price("--min-price", min)?);
    }
    if let Some(ref max) = args.max_price {
        filter.max_price = flightview::derive::clamp_price(parse_price("--max-price", max)?);
    }
    state = state.with_filter(filter);

    if let Some(ref order) = args.order {
        state = state.with_order(SortOrder::from_str_loose(order)?);
    }
    if args.pages == 0 {
        return Err(ViewerError::Validation("--pages must be at least 1".into()));
    }
    Ok(state)
}

fn warn_unknown_selections(state: &mut ViewerState) {
    let filter = state.filter().clone();
    for uid in &filter.airlines {
        if !state.airlines().iter().any(|a| &a.uid == uid) {
            warn!(airline = %uid, "no offers from this airline");
        }
    }
    for stops in &filter.stops {
        if !state.stops().contains(stops) {
            warn!(stops, "no offers with this stop count");
        }
    }
}

async fn run_view(args: ViewArgs, config: &Config) {
    let mode = output_mode(args.compact, args.json, args.pretty);
    let json_mode = matches!(mode, OutputMode::Json { .. });

    let mut state = match apply_view_args(config.initial_state(), &args) {
        Ok(s) => s,
        Err(e) => die(&e, json_mode),
    };

    let source = source_of(&args.source, config);
    if let Err(e) = flightview::load_into(&mut state, source, &config.fetch_options()).await {
        die(&e, json_mode);
    }
    warn_unknown_selections(&mut state);

    for _ in 1..args.pages {
        if !state.show_more() {
            break;
        }
    }

    if args.filters && !json_mode {
        print!("{}", render::render_filters(&mut state));
    }

    match render::render_page(&mut state, mode) {
        Ok(out) => println!("{out}"),
        Err(e) => die(&ViewerError::Io(e.to_string()), json_mode),
    }
}

async fn run_facets(args: FacetsArgs, config: &Config) {
    let mut state = config.initial_state();
    let source = source_of(&args.source, config);
    if let Err(e) = flightview::load_into(&mut state, source, &config.fetch_options()).await {
        die(&e, args.json);
    }

    let facets = state.facets().clone();
    if args.json {
        let json = serde_json::json!({
            "airlines": facets.airlines,
            "stops": facets.stops,
        });
        println!("{json}");
        return;
    }

    println!("Авиакомпании:");
    for airline in &facets.airlines {
        println!("  {} [{}]", airline.caption, airline.uid);
    }
    println!("Пересадки:");
    for stops in &facets.stops {
        println!("  {} [{stops}]", format::stops_label(*stops));
    }
}

async fn run_browse(args: BrowseArgs, config: &Config) {
    let mode = output_mode(args.compact, false, false);
    let mut state = config.initial_state();
    let source = source_of(&args.source, config);

    // The session shows the failure itself and stays usable.
    let _ = flightview::load_into(&mut state, source, &config.fetch_options()).await;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = session::run(&mut state, stdin.lock(), &mut stdout, mode) {
        die(&ViewerError::Io(e.to_string()), false);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    let json_mode = matches!(&cli.command, Commands::View(a) if a.json || a.pretty)
        || matches!(&cli.command, Commands::Facets(a) if a.json);
    let config = match Config::load_from(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => die(&e, json_mode),
    };

    match cli.command {
        Commands::View(args) => run_view(args, &config).await,
        Commands::Facets(args) => run_facets(args, &config).await,
        Commands::Browse(args) => run_browse(args, &config).await,
        Commands::Mcp(args) => {
            let source = source_of(&args, &config).to_string();
            if let Err(e) = flightview::mcp::run(&source, &config.fetch_options()).await {
                die(&e, false);
            }
        }
    }
}
