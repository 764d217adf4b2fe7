//! Terminal renderer for the resolved family tree.
//!
//! # Responsibility
//! - Pick a row source from flags and config, then load through core.
//! - Print the tree, a search hit, a detail view or diagnostics.
//!
//! Exit codes: `0` ok, `1` nothing found, `2` invalid family data,
//! `3` configuration or setup failure.

mod cli;
mod render;

use cli::{Cli, Command};
use log::info;
use silsilah_core::{
    init_logging, search_members, AppConfig, AppState, DataSource, FixtureSource,
    JsonFileSource, LoadError, PublishOutcome, RemoteSource, TreeLoader,
};
use std::process::ExitCode;

const SEARCH_LIST_LIMIT: usize = 50;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(3)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let config = AppConfig::load(&cli.config)
        .map_err(|err| err.to_string())?
        .with_env_overrides();

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.dir.clone());
    if let Some(dir) = log_dir {
        let level = cli.log_level.as_deref().unwrap_or(config.logging.level.as_str());
        let dir = if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .map_err(|err| err.to_string())?
                .join(dir)
        };
        init_logging(level, &dir).map_err(|err| err.to_string())?;
    }

    let loader = build_loader(&cli, &config)?;
    let mut state = AppState::new();
    match state.store().refresh(&loader).await {
        Ok(PublishOutcome::Published(ticket)) => {
            info!(
                "event=cli_load module=cli status=ok ticket={}",
                ticket.value()
            );
        }
        Ok(PublishOutcome::Stale { .. }) => return Err("tree load was superseded".to_string()),
        Err(LoadError::Resolution(err)) => {
            eprintln!("invalid family data: {err}");
            return Ok(ExitCode::from(2));
        }
        Err(err @ LoadError::Acquisition(_)) => return Err(err.to_string()),
    }
    let Some(snapshot) = state.store().current() else {
        return Err("no tree published".to_string());
    };
    let loaded = &snapshot.loaded;
    if loaded.origin.is_fallback() {
        eprintln!("warning: {}", render::render_origin(&loaded.origin));
    }

    let code = match cli.command {
        Command::Tree { spouses } => {
            if spouses != state.show_spouses() {
                state.toggle_spouses();
            }
            print!(
                "{}",
                render::render_tree(&loaded.resolution.tree, state.show_spouses())
            );
            ExitCode::SUCCESS
        }
        Command::Search { query, all: true } => {
            let hits = search_members(&loaded.resolution.tree, &query, SEARCH_LIST_LIMIT);
            if hits.is_empty() {
                eprintln!("no member matches `{query}`");
                ExitCode::from(1)
            } else {
                for node in hits {
                    println!("{} [{}]", node.record().titled_name(), node.id());
                }
                ExitCode::SUCCESS
            }
        }
        Command::Search { query, all: false } => match state.highlight_search(&query) {
            Some(detail) => {
                print!("{}", render::render_detail(&detail));
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("no member matches `{query}`");
                ExitCode::from(1)
            }
        },
        Command::Detail { id } => match state.select(&id) {
            Some(detail) => {
                print!("{}", render::render_detail(&detail));
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("no member with id `{id}`");
                ExitCode::from(1)
            }
        },
        Command::Check => {
            print!("{}", render::render_check(loaded));
            ExitCode::SUCCESS
        }
        Command::Watch { max_refreshes } => {
            print!("{}", render::render_tree(&loaded.resolution.tree, false));
            watch(&state, &loader, &config, max_refreshes).await
        }
    };
    Ok(code)
}

/// Refreshes until `max_refreshes` is reached, printing the tree when it changes.
async fn watch(
    state: &AppState,
    loader: &TreeLoader,
    config: &AppConfig,
    max_refreshes: Option<u32>,
) -> ExitCode {
    let interval = config.source.refresh_interval();
    let mut refreshes = 0u32;
    while max_refreshes.map_or(true, |max| refreshes < max) {
        tokio::time::sleep(interval).await;
        refreshes += 1;

        let previous = state.store().current();
        match state.store().refresh(loader).await {
            Ok(PublishOutcome::Published(_)) => {}
            Ok(PublishOutcome::Stale { .. }) => continue,
            Err(err) => {
                eprintln!("refresh failed, keeping previous tree: {err}");
                continue;
            }
        }
        let Some(current) = state.store().current() else {
            continue;
        };
        let changed = previous.map_or(true, |previous| {
            previous.loaded.resolution != current.loaded.resolution
        });
        if changed {
            println!("--- refresh {} ---", current.ticket.value());
            print!("{}", render::render_tree(&current.loaded.resolution.tree, false));
        }
    }
    ExitCode::SUCCESS
}

fn build_loader(cli: &Cli, config: &AppConfig) -> Result<TreeLoader, String> {
    if cli.source.fixture {
        return Ok(TreeLoader::new(Box::new(FixtureSource)));
    }
    if let Some(path) = &cli.source.file {
        return Ok(TreeLoader::new(Box::new(JsonFileSource::new(path))));
    }

    let url = cli
        .source
        .url
        .as_deref()
        .or_else(|| config.source.script_url());
    let Some(url) = url else {
        return Ok(TreeLoader::fixture_only());
    };
    let source: Box<dyn DataSource> = Box::new(
        RemoteSource::new(url, config.source.timeout()).map_err(|err| err.to_string())?,
    );
    Ok(TreeLoader::new(source))
}
