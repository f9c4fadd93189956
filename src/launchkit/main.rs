use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use launchkit::api::{ConfigAction, LaunchApi};
use launchkit::attribute::Attribute;
use launchkit::bookmark::paths::HOME_ENV;
use launchkit::bookmark::{
    BookmarkItem, BookmarkStore, JsonCodec, StoreEnv, StoreKind, StorePaths, StoreRegistry,
};
use launchkit::commands::ListedItem;
use launchkit::config::LaunchConfig;
use launchkit::error::{LaunchError, Result};
use launchkit::monitor::PollMonitor;
use launchkit::network::SysfsNetworkSource;
use launchkit::status::StatusFetcher;
use launchkit::tile::NetworkTile;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod args;
mod cli;
use args::{Cli, Commands};
use cli::print::{
    print_config, print_grid, print_items, print_items_json, print_messages, print_store_info,
};

const LOG_ENV: &str = "LAUNCHKIT_LOG";
const NETWORK_TIMEOUT: Duration = Duration::from_secs(5);

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: LaunchApi,
    monitor: Rc<PollMonitor>,
    kind: StoreKind,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List { search, json }) => handle_list(&ctx, search, json),
        Some(Commands::Add {
            uri,
            title,
            mime_type,
            app,
        }) => handle_add(&ctx, uri, title, mime_type, app),
        Some(Commands::Remove { uris }) => handle_remove(&ctx, uris),
        Some(Commands::Reorder { uris }) => handle_reorder(&ctx, uris),
        Some(Commands::Where) => handle_where(&ctx),
        Some(Commands::Grid) => handle_grid(&ctx),
        Some(Commands::Move { uri, bin }) => handle_move(&ctx, uri, bin),
        Some(Commands::Watch { interval_ms, polls }) => handle_watch(&ctx, interval_ms, polls),
        Some(Commands::Network { root, follow }) => handle_network(&ctx, &root, follow),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_list(&ctx, None, false),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home).join("config"));
    }
    let proj_dirs = ProjectDirs::from("org", "launchkit", "launchkit")
        .ok_or_else(|| LaunchError::Api("Could not determine config dir".into()))?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let kind: StoreKind = cli.store.parse()?;
    let config_dir = config_dir()?;
    let config = LaunchConfig::load(&config_dir).unwrap_or_else(|e| {
        tracing::warn!(dir = %config_dir.display(), error = %e, "could not load config, using defaults");
        LaunchConfig::default()
    });

    let monitor = Rc::new(PollMonitor::new());
    let env = StoreEnv {
        paths: StorePaths::from_env()?,
        settings: Rc::new(config.to_settings()),
        monitor: monitor.clone(),
        codec: Rc::new(JsonCodec),
    };
    let api = LaunchApi::new(StoreRegistry::new(env), config, config_dir);

    Ok(AppContext { api, monitor, kind })
}

fn handle_list(ctx: &AppContext, search: Option<String>, json: bool) -> Result<()> {
    let result = ctx.api.list_items(ctx.kind, search.as_deref())?;
    if json {
        print_items_json(&result.listed_items)?;
    } else {
        print_items(&result.listed_items);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(
    ctx: &AppContext,
    uri: String,
    title: Option<String>,
    mime_type: Option<String>,
    app: Option<Vec<String>>,
) -> Result<()> {
    let mut item = BookmarkItem::new(uri);
    if let Some(title) = title {
        item = item.with_title(title);
    }
    if let Some(mime_type) = mime_type {
        item = item.with_mime_type(mime_type);
    }
    if let Some([name, exec]) = app.as_deref() {
        item = item.with_app(name.as_str(), exec.as_str());
    }

    let result = ctx.api.add_item(ctx.kind, item)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: &AppContext, uris: Vec<String>) -> Result<()> {
    let result = ctx.api.remove_items(ctx.kind, &uris)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_reorder(ctx: &AppContext, uris: Vec<String>) -> Result<()> {
    let result = ctx.api.reorder_items(ctx.kind, &uris)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_where(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.locate_store(ctx.kind)?;
    if let Some(info) = &result.store_info {
        print_store_info(info);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_grid(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.show_grid(ctx.kind)?;
    if let Some(grid) = &result.grid {
        print_grid(grid);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_move(ctx: &AppContext, uri: String, bin: usize) -> Result<()> {
    let result = ctx.api.move_item(ctx.kind, &uri, bin)?;
    print_messages(&result.messages);
    if let Some(grid) = &result.grid {
        print_grid(grid);
    }
    Ok(())
}

fn handle_watch(ctx: &AppContext, interval_ms: u64, polls: Option<u64>) -> Result<()> {
    let store = ctx.api.store(ctx.kind);
    print_store_items(&store);

    let weak = Rc::downgrade(&store);
    let _subscription = store.connect_items_changed(move |_| {
        if let Some(store) = weak.upgrade() {
            println!("{}", "-- changed --".cyan());
            print_store_items(&store);
        }
    });

    let interval = Duration::from_millis(interval_ms);
    let mut done = 0;
    while polls.map_or(true, |max| done < max) {
        std::thread::sleep(interval);
        ctx.monitor.poll();
        done += 1;
    }
    Ok(())
}

fn print_store_items(store: &BookmarkStore) {
    let listed: Vec<ListedItem> = store
        .items()
        .into_iter()
        .enumerate()
        .map(|(i, item)| ListedItem {
            position: i + 1,
            item,
        })
        .collect();
    print_items(&listed);
}

fn handle_network(ctx: &AppContext, root: &Path, follow: Option<u32>) -> Result<()> {
    let link = Attribute::new(None);
    let tile = NetworkTile::new(&link);
    let source = Arc::new(SysfsNetworkSource::new(root));

    let Some(rounds) = follow else {
        let fetcher = StatusFetcher::start(source, link)?;
        fetcher.wait_and_pump(NETWORK_TIMEOUT);
        print_network(&tile);
        return Ok(());
    };

    let interval = ctx.api.status_refresh();
    let fetcher = StatusFetcher::start_with_interval(source, link, Some(interval))?;
    fetcher.wait_and_pump(NETWORK_TIMEOUT);
    print_network(&tile);

    let mut last = (tile.label().value(), tile.label().status());
    for _ in 1..rounds {
        std::thread::sleep(interval);
        fetcher.pump();
        fetcher.wait_and_pump(NETWORK_TIMEOUT);
        let current = (tile.label().value(), tile.label().status());
        if current != last {
            print_network(&tile);
            last = current;
        }
    }
    Ok(())
}

fn print_network(tile: &NetworkTile) {
    if tile.label().status().is_visible() {
        println!("{}", tile.label().value().green());
    } else {
        println!("{}", "No active network link".yellow());
    }
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let result = ctx.api.config_action(action)?;
    if let Some(config) = &result.config {
        if result.messages.is_empty() {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
