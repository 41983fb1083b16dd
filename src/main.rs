//! Command-line entry point for season forecasting
//!
//! Loads a league definition and configuration, replays the history,
//! simulates the remaining fixtures and prints the projected standings.

use anyhow::Result;
use clap::Parser;
use season_forecast::config::{validate_config, ForecastConfig, ReplayPolicy};
use season_forecast::league::LeagueDefinition;
use season_forecast::{Forecaster, LeagueForecast};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Season Forecast - rating replay and Monte Carlo championship odds
#[derive(Parser)]
#[command(
    name = "season-forecast",
    version,
    about = "Replay match results into team ratings and simulate the rest of the season",
    long_about = "Season Forecast rates every team from its historical results with a \
                 capped points-exchange rule, predicts win probabilities for the remaining \
                 fixtures and estimates each team's championship probability by simulating \
                 the season many times."
)]
struct Args {
    /// League definition path
    #[arg(
        short = 'L',
        long,
        value_name = "FILE",
        help = "Path to the league definition (TOML format)"
    )]
    league: PathBuf,

    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Trial count override
    #[arg(short, long, value_name = "N", help = "Override number of simulated seasons")]
    trials: Option<u64>,

    /// Seed override
    #[arg(short, long, value_name = "SEED", help = "Override base random seed")]
    seed: Option<u64>,

    /// Run trials on a single thread
    #[arg(long, help = "Run trials sequentially instead of on the thread pool")]
    sequential: bool,

    /// Skip invalid historical records
    #[arg(long, help = "Skip invalid historical records instead of aborting")]
    skip_invalid: bool,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Print JSON instead of tables
    #[arg(long, help = "Print the full forecast as JSON")]
    json: bool,

    /// Dry run mode (validate inputs and exit)
    #[arg(long, help = "Validate configuration, replay history and check fixtures, then exit")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file or environment and CLI arguments
fn load_config(args: &Args) -> Result<ForecastConfig> {
    let mut config = if let Some(config_path) = &args.config {
        ForecastConfig::from_file(config_path)?
    } else {
        ForecastConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(trials) = args.trials {
        config.simulation.trials = trials;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if args.sequential {
        config.simulation.parallel = false;
    }
    if args.skip_invalid {
        config.simulation.replay_policy = ReplayPolicy::SkipInvalid;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Display run information
fn display_startup_banner(config: &ForecastConfig, league: &LeagueDefinition) {
    info!("Season Forecast v{}", season_forecast::VERSION);
    info!("   Service: {}", config.service.name);
    info!(
        "   Teams: {}, history: {}, fixtures: {}",
        league.teams.len(),
        league.history.len(),
        league.fixtures.len()
    );
    info!(
        "   Initial rating: {}, logistic scale: {}",
        config.rating.initial_rating, config.rating.logistic_scale
    );
    info!(
        "   Home advantage: {} (same group: {})",
        config.rating.home_advantage.standard, config.rating.home_advantage.reduced
    );
    info!(
        "   Trials: {}, seed: {}, parallel: {}",
        config.simulation.trials, config.simulation.seed, config.simulation.parallel
    );
}

fn print_forecast(forecast: &LeagueForecast) {
    println!("Current Ratings:");
    for (position, (team, rating)) in forecast.standings.iter().enumerate() {
        println!("{:>3}. {:<24} {:>8.2}", position + 1, team, rating);
    }

    if !forecast.fixture_probabilities.is_empty() {
        println!();
        println!("Fixture Win Probabilities:");
        for fixture in &forecast.fixture_probabilities {
            println!(
                "  {} vs {} ({}): {:.2}% / {:.2}%",
                fixture.team_a,
                fixture.team_b,
                fixture.home,
                fixture.team_a_win * 100.0,
                fixture.team_b_win() * 100.0
            );
        }
    }

    println!();
    println!(
        "Championship Win Probabilities ({} trials):",
        forecast.championship.completed_trials
    );
    for (team, probability) in forecast.championship.ranked() {
        println!("  {}: {:.2}%", team, probability * 100.0);
    }

    if !forecast.replay.skipped.is_empty() {
        println!();
        println!("Skipped historical records:");
        for failure in &forecast.replay.skipped {
            println!("  #{}: {}", failure.index, failure.reason);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let league = match LeagueDefinition::from_file(&args.league) {
        Ok(league) => league,
        Err(e) => {
            error!("Failed to load league: {:#}", e);
            std::process::exit(1);
        }
    };

    display_startup_banner(&config, &league);

    let forecaster = Forecaster::new(config, Arc::new(league.team_groups()))?;

    if args.dry_run {
        match forecaster.validate_league(&league) {
            Ok(report) => {
                info!(
                    applied = report.applied,
                    skipped = report.skipped.len(),
                    "Configuration and league validation successful"
                );
                return Ok(());
            }
            Err(e) => {
                error!("League validation failed: {:#}", e);
                std::process::exit(1);
            }
        }
    }

    let forecast = match forecaster.run_league(&league) {
        Ok(forecast) => forecast,
        Err(e) => {
            error!("Forecast failed: {:#}", e);
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print_forecast(&forecast);
    }

    Ok(())
}
