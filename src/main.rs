// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr as _};
use folio_order::logging::{
    default_log_dir, init_logging, parse_rotation, LogConfig, LOG_FILENAME,
};
use folio_order::{
    insert_item, list_items, load_user_config, load_user_config_from, move_item, remove_item,
    repair_collection, ApplyReport, CachedStore, Collection, FlowOutcome, HttpStore, NoopCache,
    OrderableItem, ResponseCache, TtlCache, UserConfig,
};
use serde_json::{Map, Value};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Folio Order - keeps the admin collections of the portfolio site contiguously ordered
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the content API (overrides `[api] base_url`)
    #[arg(long, env = "FOLIO_API_URL")]
    api_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "FOLIO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config file (default: ~/.folio/config.toml)
    #[arg(long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Bypass the read cache regardless of `[cache] enabled`
    #[arg(long)]
    no_cache: bool,

    /// Enable JSON log format (for log aggregation)
    #[arg(long, env = "FOLIO_LOG_JSON", default_value = "false")]
    log_json: bool,

    /// Log rotation period: daily, hourly, or never
    #[arg(long, env = "FOLIO_LOG_ROTATION", default_value = "daily")]
    log_rotation: String,

    /// Custom log directory (default: ~/.folio/logs)
    #[arg(long, env = "FOLIO_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a collection sorted by order
    List {
        #[arg(value_enum)]
        collection: Collection,
    },
    /// Create an item at a position, shifting the items after it
    Insert {
        #[arg(value_enum)]
        collection: Collection,
        /// Position of the new item (clamped to 1..=N+1)
        #[arg(long, allow_hyphen_values = true)]
        order: i64,
        /// Item fields as a JSON object, without `_id` or `order`
        #[arg(long, default_value = "{}")]
        fields: String,
    },
    /// Move an item to a new position
    Move {
        #[arg(value_enum)]
        collection: Collection,
        id: String,
        /// Target position (clamped to 1..=N)
        #[arg(long, allow_hyphen_values = true)]
        order: i64,
    },
    /// Delete an item and close the gap
    Delete {
        #[arg(value_enum)]
        collection: Collection,
        id: String,
    },
    /// Renumber a collection to 1..=N
    Repair {
        #[arg(value_enum)]
        collection: Collection,
    },
}

/// An explicit `--config` must load; only the default file falls back.
fn load_config(explicit: Option<&Path>) -> Result<UserConfig> {
    match explicit {
        Some(path) => load_user_config_from(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display())),
        None => Ok(load_user_config().unwrap_or_else(|e| {
            warn!("Failed to load user config, using defaults: {e}");
            UserConfig::default()
        })),
    }
}

fn build_store(args: &Args, config: &UserConfig) -> Result<CachedStore<HttpStore>> {
    let base_url = args
        .api_url
        .clone()
        .or_else(|| config.api.base_url.clone())
        .ok_or_else(|| {
            eyre!("No API base URL: pass --api-url, set FOLIO_API_URL, or set [api] base_url")
        })?;
    let endpoints = config.resolved_endpoints()?;
    let http = HttpStore::new(&base_url, args.token.clone(), endpoints, config.timeout())?;

    let cache: Arc<dyn ResponseCache> = if config.cache.enabled && !args.no_cache {
        Arc::new(TtlCache::new(config.cache_ttl()))
    } else {
        Arc::new(NoopCache)
    };
    info!(
        base_url = %base_url,
        authenticated = http.is_authenticated(),
        "Using content API"
    );
    Ok(CachedStore::new(http, cache))
}

fn parse_fields(raw: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(raw).wrap_err("--fields must be a JSON object")
}

fn print_items(items: &[OrderableItem]) -> Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", serde_json::to_string_pretty(items)?)?;
    Ok(())
}

fn report_failures(report: &ApplyReport) {
    if report.is_clean() {
        return;
    }
    eprintln!(
        "Warning: {} of {} order updates failed; run `repair` to renumber the collection.",
        report.failed.len(),
        report.attempted()
    );
    for failed in &report.failed {
        eprintln!("  {}: {}", failed.update, failed.error);
    }
}

fn print_outcome(outcome: &FlowOutcome) -> Result<()> {
    report_failures(&outcome.report);
    print_items(&outcome.items)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre error hooks for colored error output
    color_eyre::install()?;

    let args = Args::parse();

    let log_dir = args
        .log_dir
        .as_ref()
        .map_or_else(default_log_dir, PathBuf::from);
    let log_file = log_dir.join(LOG_FILENAME);
    let log_config = LogConfig {
        log_dir,
        json_format: args.log_json,
        rotation: parse_rotation(&args.log_rotation),
        ..Default::default()
    };

    if let Err(e) = init_logging(&log_config) {
        eprintln!("Error: Failed to initialize logging: {e}");
        eprintln!("Logs: {}", log_file.display());
        return Err(e);
    }

    let config = load_config(args.config.as_deref())?;
    let store = build_store(&args, &config)?;

    match &args.command {
        Command::List { collection } => {
            let items = list_items(&store, *collection).await?;
            print_items(&items)?;
        }
        Command::Insert {
            collection,
            order,
            fields,
        } => {
            let fields = parse_fields(fields)?;
            let outcome = insert_item(&store, *collection, fields, *order).await?;
            print_outcome(&outcome)?;
        }
        Command::Move {
            collection,
            id,
            order,
        } => {
            let outcome = move_item(&store, *collection, id, *order).await?;
            print_outcome(&outcome)?;
        }
        Command::Delete { collection, id } => {
            let outcome = remove_item(&store, *collection, id).await?;
            print_outcome(&outcome)?;
        }
        Command::Repair { collection } => {
            let outcome = repair_collection(&store, *collection).await?;
            print_outcome(&outcome)?;
        }
    }

    Ok(())
}
