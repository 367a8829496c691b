use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_stats::calculate::{
    aggregate_history, aggregate_votes, all_win_percentages, champion_positions,
    count_prior_appearances, diagnose, finalist_positions, formatted_history,
    historical_win_rate_since, opponent_of, position_stats_since, BracketMatch,
};
use bracket_stats::config::AppConfig;
use bracket_stats::models::{string_field, to_position_id, Dataset, Position, Round, POSITIONS};
use bracket_stats::storage::read_dataset;
use bracket_stats::view::{win_rate_text, BracketView, Report, ViewMode, ViewOptions};

#[derive(Parser)]
#[command(name = "bracket-stats")]
#[command(about = "Per-position vote and win-rate statistics for bracket tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tournament dataset (JSON)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a view mode: latest, predictor, champions, finalists or a year
    Show {
        /// Defaults to view.default_mode from the config
        mode: Option<String>,
    },

    /// Show one tournament's bracket
    Bracket {
        /// Tournament year (default: latest with participants)
        #[arg(long)]
        year: Option<String>,
    },

    /// Vote totals and matchup percentages over all years
    Predictor,

    /// Quarters starting slots of each year's champion
    Champions,

    /// Quarters starting slots of each year's runner-up
    Finalists,

    /// Vote history for a position
    History {
        /// Position id (e.g. wqp3) or slot key
        position: String,
    },

    /// Historical win rate of a position before a year
    WinRate {
        position: String,

        #[arg(long)]
        year: String,
    },

    /// Per-year breakdown behind a position's win rate
    PositionStats {
        position: String,

        #[arg(long)]
        year: String,
    },

    /// Count a participant's prior quarters appearances
    Appearances {
        name: String,

        #[arg(long)]
        year: String,
    },

    /// Find the match between two participants in a year
    Matchup {
        first: String,
        second: String,

        #[arg(long)]
        year: String,
    },

    /// List every bracket position
    Positions,

    /// List matches skipped as malformed
    Diagnose,

    /// Full JSON report of every aggregate
    Report,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_position(input: &str) -> Result<&'static Position> {
    match Position::by_id(to_position_id(input.trim())) {
        Some(position) => Ok(position),
        None => bail!("Unknown position: {} (see `bracket-stats positions`)", input),
    }
}

fn base_year_for<'a>(config: &'a AppConfig, dataset: &'a Dataset) -> Result<&'a str> {
    config
        .stats
        .base_year
        .as_deref()
        .or_else(|| dataset.base_year())
        .context("Dataset has no tournaments")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data_file) = &cli.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let (text_layer, json_layer) = if cli.json_logs {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::debug!("Starting bracket-stats v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Positions = cli.command {
        return print_positions(cli.json);
    }

    let dataset = read_dataset(&config.data_file)
        .with_context(|| format!("Failed to load {}", config.data_file.display()))?;
    let tournaments = &dataset.tournaments;

    let options = ViewOptions {
        uppercase_names: config.view.uppercase_names,
        base_year: config.stats.base_year.clone(),
    };

    match cli.command {
        Commands::Show { mode } => {
            let mode = match mode {
                Some(mode) => mode.parse()?,
                None => config.default_view_mode()?,
            };
            println!("{}", BracketView::new(&dataset, options).with_mode(mode).render());
        }

        Commands::Bracket { year } => {
            let mode = year.map(ViewMode::Year).unwrap_or(ViewMode::Latest);
            let view = BracketView::new(&dataset, options).with_mode(mode);
            if cli.json {
                print_json(&view.tournament())?;
            } else {
                println!("{}", view.render());
            }
        }

        Commands::Predictor => {
            if cli.json {
                let totals = aggregate_votes(tournaments);
                print_json(&json!({
                    "vote_totals": totals,
                    "win_percentages": all_win_percentages(&totals),
                }))?;
            } else {
                let view = BracketView::new(&dataset, options).with_mode(ViewMode::Predictor);
                println!("{}", view.render());
            }
        }

        Commands::Champions => {
            if cli.json {
                print_json(&champion_positions(tournaments))?;
            } else {
                let view = BracketView::new(&dataset, options).with_mode(ViewMode::Champions);
                println!("{}", view.render());
            }
        }

        Commands::Finalists => {
            if cli.json {
                print_json(&finalist_positions(tournaments))?;
            } else {
                let view = BracketView::new(&dataset, options).with_mode(ViewMode::Finalists);
                println!("{}", view.render());
            }
        }

        Commands::History { position } => {
            let position = resolve_position(&position)?;
            let history = aggregate_history(tournaments);
            if cli.json {
                print_json(&history.get(position.id))?;
            } else {
                println!("=== Vote History: {} ===", position.id);
                println!("{}", formatted_history(position.id, &history));
            }
        }

        Commands::WinRate { position, year } => {
            let position = resolve_position(&position)?;
            let base_year = base_year_for(&config, &dataset)?;
            let rate = historical_win_rate_since(position.id, tournaments, &year, base_year);
            if cli.json {
                print_json(&rate)?;
            } else {
                match rate {
                    Some(rate) => println!("{}: {}", position.id, win_rate_text(&rate)),
                    None => println!(
                        "{}: no historical data before {} (base year {})",
                        position.id, year, base_year
                    ),
                }
            }
        }

        Commands::PositionStats { position, year } => {
            let position = resolve_position(&position)?;
            let base_year = base_year_for(&config, &dataset)?;
            let stats = position_stats_since(position.id, tournaments, &year, base_year);
            if cli.json {
                print_json(&stats)?;
            } else {
                match stats {
                    Some(stats) => {
                        println!("=== Position Stats: {} before {} ===\n", stats.position, year);
                        for d in &stats.details {
                            println!(
                                "  {}  {:<24} {:>3}-{:<3} {}{}",
                                d.year,
                                d.participant,
                                d.participant_score,
                                d.opponent_score,
                                d.full_score,
                                if d.is_winner { " ✓" } else { "" }
                            );
                        }
                        println!(
                            "\n  {} matches, {}/{} votes, {}% win rate",
                            stats.match_count, stats.position_votes, stats.total_votes, stats.win_rate
                        );
                    }
                    None => println!(
                        "{}: no historical data before {} (base year {})",
                        position.id, year, base_year
                    ),
                }
            }
        }

        Commands::Appearances { name, year } => {
            let prior = count_prior_appearances(&name, tournaments, &year);
            if cli.json {
                print_json(&json!({ "name": name, "year": year, "prior_appearances": prior }))?;
            } else {
                println!("{} appeared in {} other tournaments (excluding {})", name, prior, year);
            }
        }

        Commands::Matchup {
            first,
            second,
            year,
        } => {
            let Some(tournament) = dataset.find(&year) else {
                bail!("No tournament for {}", year);
            };
            let Some(at) = tournament.find_match(&first, &second) else {
                println!("{} and {} did not meet in {}", first, second, year);
                return Ok(());
            };

            if cli.json {
                print_json(at.raw)?;
            } else {
                let winner = string_field(at.raw, "winner").unwrap_or("unknown");
                let score = string_field(at.raw, "score").unwrap_or("-");
                let (first_votes, second_votes) = match BracketMatch::parse_at(&at) {
                    Ok(parsed) => (parsed.score_for(&first), parsed.score_for(&second)),
                    Err(_) => (None, None),
                };
                let side = at.side.map(|s| format!("{} ", s)).unwrap_or_default();
                println!("=== {} {}{} ===", year, side, at.round.label());
                for (name, votes) in [(&first, first_votes), (&second, second_votes)] {
                    match votes {
                        Some(votes) => println!("  {}: {} votes", name, votes),
                        None => println!("  {}: -", name),
                    }
                }
                println!("  Score: {}  Winner: {}", score, winner);
            }
        }

        Commands::Diagnose => {
            let issues = diagnose(tournaments);
            if cli.json {
                print_json(&issues)?;
            } else if issues.is_empty() {
                println!("No malformed matches");
            } else {
                println!("=== Malformed Matches ({}) ===\n", issues.len());
                for issue in &issues {
                    println!("  {}", issue);
                }
                tracing::warn!("{} matches excluded from aggregation", issues.len());
            }
        }

        Commands::Report => {
            print_json(&Report::build(&dataset))?;
        }

        // Printed before the dataset is loaded.
        Commands::Positions => {}
    }

    Ok(())
}

fn print_positions(as_json: bool) -> Result<()> {
    if as_json {
        let positions: Vec<_> = POSITIONS
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "slot_key": p.slot_key,
                    "info": p.info(),
                    "opponent": opponent_of(p.id),
                })
            })
            .collect();
        return print_json(&positions);
    }

    println!("=== Positions ===");
    for p in &POSITIONS {
        let region = if p.round == Round::Finals {
            "-".to_string()
        } else {
            p.side.to_string()
        };
        println!(
            "  {:<6} {:<24} {:<5} {:<26} vs {}",
            p.id,
            p.slot_key,
            region,
            p.round.label(),
            opponent_of(p.id).unwrap_or("-")
        );
    }
    Ok(())
}
