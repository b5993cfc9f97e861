//! # forno-quote
//!
//! Prices Forno orders from the command line.
//!
//! ## Startup Sequence
//! ```text
//! 1. Parse arguments
//! 2. Initialize tracing (stderr, default filter or RUST_LOG)
//! 3. Load QuoteConfig (defaults → quote.toml → FORNO_* env)
//! 4. Swap in the configured log filter
//! 5. Run the command, print JSON on stdout
//! ```
//!
//! Tracing starts before the config is read so events from loading it are
//! not lost.
//!
//! Exit status is 0 on success, 1 when `check` finds problems, and non-zero
//! with a message on stderr for any error.

mod cli;
mod config;
mod error;

use std::io::{self, Read, Write};
use std::path::Path;

use forno_core::order::{price_order, Menu, OrderRequest};
use forno_core::validation::{parse_discount_input, validate_discount_input};
use forno_core::{calculate_final_price, discount_rules};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use cli::{Cli, Command, STDIN, USAGE};
use config::{MenuFormat, QuoteConfig, DEFAULT_LOG_FILTER};
use error::{QuoteError, QuoteResult};

/// Swaps the active log filter once the config is known.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() -> Result<(), QuoteError> {
    let args: Vec<String> = std::env::args().collect();
    let cli = Cli::parse(&args)?;

    if cli.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let filter_handle = init_tracing();
    let config = QuoteConfig::load(cli.config_path)?;
    if let Some(handle) = filter_handle {
        apply_log_filter(&handle, &config.logging.filter);
    }
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Rules => print_json(&discount_rules(), config.output.pretty),
        Command::Check(source) => {
            let problems = check(&source)?;
            let valid = problems.is_empty();
            print_json(&json!({ "valid": valid, "problems": problems }), config.output.pretty)?;
            if !valid {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Evaluate(source) => {
            let result = evaluate(&source)?;
            print_json(&result, config.output.pretty)
        }
        Command::Order(source) => {
            let menu_path = config.menu_path().ok_or(QuoteError::MenuNotConfigured)?;
            let menu = load_menu(menu_path)?;
            let quote = quote_order(&menu, &source)?;
            print_json(&quote, config.output.pretty)
        }
        Command::Help => Ok(()),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=forno_core=trace` - Show floor clamping in the evaluator
/// - Default: the configured filter (`info,forno=debug`)
///
/// Logs go to stderr; stdout carries only the JSON result. Returns a handle
/// for the configured filter, or `None` when `RUST_LOG` fixed the filter.
fn init_tracing() -> Option<FilterHandle> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => {
            build_subscriber(filter, io::stderr).0.init();
            None
        }
        Err(_) => {
            let (subscriber, handle) =
                build_subscriber(EnvFilter::new(DEFAULT_LOG_FILTER), io::stderr);
            subscriber.init();
            Some(handle)
        }
    }
}

fn build_subscriber<W>(
    filter: EnvFilter,
    make_writer: W,
) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(make_writer));
    (subscriber, handle)
}

fn apply_log_filter(handle: &FilterHandle, configured: &str) {
    if let Err(e) = handle.reload(EnvFilter::new(configured)) {
        warn!(error = %e, "Could not apply configured log filter");
    }
}

// =============================================================================
// Commands
// =============================================================================

fn check(source: &str) -> QuoteResult<Vec<String>> {
    let draft = read_json(source)?;
    let problems = validate_discount_input(&draft);
    info!(source, problems = problems.len(), "Discount input checked");
    Ok(problems)
}

fn evaluate(source: &str) -> QuoteResult<forno_core::DiscountResult> {
    let draft = read_json(source)?;
    let input = parse_discount_input(&draft)?;
    let result = calculate_final_price(&input)?;
    info!(
        source,
        discount = result.discount_applied.map(|kind| kind.name()).unwrap_or("none"),
        "Discount evaluated"
    );
    Ok(result)
}

fn quote_order(menu: &Menu, source: &str) -> QuoteResult<forno_core::PriceCalculation> {
    let text = read_source(source)?;
    let request: OrderRequest =
        serde_json::from_str(&text).map_err(|e| QuoteError::json(origin(source), e))?;
    let quote = price_order(menu, &request)?;
    info!(
        source,
        lines = quote.lines.len(),
        total = %quote.total(),
        "Order quoted"
    );
    Ok(quote)
}

// =============================================================================
// I/O Helpers
// =============================================================================

fn origin(source: &str) -> &str {
    if source == STDIN {
        "stdin"
    } else {
        source
    }
}

fn read_source(source: &str) -> QuoteResult<String> {
    if source == STDIN {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| QuoteError::Read {
                path: "stdin".into(),
                source: e,
            })?;
        return Ok(text);
    }

    std::fs::read_to_string(source).map_err(|e| QuoteError::Read {
        path: source.into(),
        source: e,
    })
}

fn read_json(source: &str) -> QuoteResult<Value> {
    let text = read_source(source)?;
    serde_json::from_str(&text).map_err(|e| QuoteError::json(origin(source), e))
}

/// Reads a menu file; the extension picks the format.
fn load_menu(path: &Path) -> QuoteResult<Menu> {
    let text = std::fs::read_to_string(path).map_err(|e| QuoteError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let menu: Menu = match MenuFormat::of(path) {
        Some(MenuFormat::Json) => serde_json::from_str(&text).map_err(|e| e.to_string()),
        _ => toml::from_str(&text).map_err(|e| e.to_string()),
    }
    .map_err(|message| QuoteError::Menu {
        path: path.to_path_buf(),
        message,
    })?;

    debug!(?path, pizzas = menu.len(), "Menu loaded");
    Ok(menu)
}

fn print_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> QuoteResult<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| QuoteError::Output(e.to_string()))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text).map_err(|e| QuoteError::Output(e.to_string()))
}
