mod api;
mod app;
mod config;
mod event;
mod scaffold;
mod testgen;
mod tools;
mod track;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::client::{SpecClient, canonical_data_url, parse_canonical_data};
use api::types::CanonicalData;
use app::App;
use config::Config;
use event::EventHandler;
use scaffold::Specification;
use testgen::literal::MapStyle;
use track::TrackConfig;

/// Create a Rust track exercise, generating its tests from the canonical
/// data in problem-specifications when there is any.
#[derive(Parser, Debug)]
#[command(name = "init-exercise", version, about, long_about = None)]
struct Cli {
    /// Name (slug) of the exercise to create
    name: String,

    /// Don't create the exercise. Useful when just updating config.json
    #[arg(long)]
    dont_create_exercise: bool,

    /// Don't update config.json. Useful when you don't yet have a sense of
    /// exercise difficulty
    #[arg(long)]
    dont_update_config: bool,

    /// Use the maplit crate to improve readability of tests with lots of map literals
    #[arg(long)]
    use_maplit: bool,

    /// Read canonical data from this file instead of fetching it
    #[arg(long, value_name = "FILE")]
    canonical_data: Option<PathBuf>,

    /// Root of the track repository (defaults to the enclosing git checkout)
    #[arg(long, value_name = "DIR")]
    track_dir: Option<PathBuf>,

    /// Remember --track-dir and --use-maplit in the config file
    #[arg(long)]
    save_config: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "init_exercise=info",
        1 => "init_exercise=debug",
        _ => "init_exercise=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(dir) = &cli.track_dir {
        config.track_dir = Some(dir.display().to_string());
    }
    config.use_maplit |= cli.use_maplit;
    if cli.save_config {
        let path = Config::config_path().context("Could not find home directory")?;
        config.save_to(&path)?;
        info!(path = %path.display(), "saved settings");
    }

    let track = match config.expanded_track_dir() {
        Some(dir) => dir,
        None => tools::track_root_from_git(&std::env::current_dir()?)?,
    };

    if !cli.dont_create_exercise {
        create_exercise(&cli, &config, &track).await?;
    }

    if !cli.dont_update_config {
        update_track_config(&cli.name, &track).await?;
    }

    Ok(())
}

async fn create_exercise(cli: &Cli, config: &Config, track: &Path) -> Result<()> {
    let (data, url) = load_canonical_data(cli, config).await?;
    let spec = data.as_ref().map(|data| Specification { data, url: &url });
    let map_style = if config.use_maplit {
        MapStyle::Maplit
    } else {
        MapStyle::Insert
    };

    let tests = scaffold::scaffold_exercise(track, &cli.name, spec.as_ref(), map_style)?;
    info!(path = %tests.display(), "wrote test suite");

    let configlet = tools::find_configlet(track, config.configlet.as_deref())?;
    tools::generate_readme(track, &configlet, &cli.name, data.is_some())
}

async fn load_canonical_data(cli: &Cli, config: &Config) -> Result<(Option<CanonicalData>, String)> {
    if let Some(path) = &cli.canonical_data {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let data = parse_canonical_data(&body)
            .with_context(|| format!("Invalid canonical data in {}", path.display()))?;
        check_exercise_name(&data, &cli.name);
        return Ok((Some(data), canonical_data_url(&config.spec_base_url, &cli.name)));
    }

    let client = SpecClient::new(&config.spec_base_url)?;
    let url = client.canonical_data_url(&cli.name);
    let data = match client.fetch_canonical_data(&cli.name).await {
        Ok(data) => {
            if let Some(data) = &data {
                check_exercise_name(data, &cli.name);
            }
            data
        }
        Err(e) => {
            warn!("{e:#}");
            None
        }
    };
    Ok((data, url))
}

fn check_exercise_name(data: &CanonicalData, name: &str) {
    if let Some(exercise) = data.exercise.as_deref().filter(|exercise| *exercise != name) {
        warn!(exercise, name, "canonical data names a different exercise");
    }
}

async fn update_track_config(exercise: &str, track: &Path) -> Result<()> {
    let config = TrackConfig::load(&TrackConfig::path_in(track))?;
    if config.contains_slug(exercise) {
        anyhow::bail!("{exercise} is already listed in config.json");
    }

    let mut terminal = ratatui::init();
    let mut events = EventHandler::new();
    let mut app = App::new(exercise, config);

    let result = app.run(&mut terminal, &mut events).await;

    ratatui::restore();
    result?;

    match app.placed {
        Some(slug) => {
            app.track.save()?;
            info!(exercise = %slug, "updated config.json");
        }
        None => info!("config.json left unchanged"),
    }
    Ok(())
}
