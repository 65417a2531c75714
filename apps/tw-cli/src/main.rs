use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tw_config::{ReplayReport, ScenarioResult};
use tw_core::TwError;
use tw_engine::{Tracker, UpgradeOption};

#[derive(Parser)]
#[command(name = "tw-cli")]
#[command(about = "Trackway CLI - 18xx tile-laying rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and references
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Replay a scenario's actions and print the game log
    Play {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Print the replay report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tiles that could be laid on a hex, with their legal rotations
    Tiles {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        /// Hex name, e.g. H2
        hex: String,
        /// Entity laying the tile (defaults to the scenario's current entity)
        #[arg(short, long)]
        entity: Option<String>,
        /// Print the options as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ScenarioResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Play {
            scenario_path,
            json,
        } => cmd_play(&scenario_path, json),
        Commands::Tiles {
            scenario_path,
            hex,
            entity,
            json,
        } => cmd_tiles(&scenario_path, &hex, entity.as_deref(), json),
    }
}

fn cmd_validate(scenario_path: &Path) -> ScenarioResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = tw_config::load(scenario_path)?;
    tw_config::build(&scenario)?;
    println!(
        "✓ Scenario is valid ({} hexes, {} tiles, {} actions)",
        scenario.hexes.len(),
        scenario.tiles.len(),
        scenario.actions.len()
    );
    Ok(())
}

fn cmd_play(scenario_path: &Path, json: bool) -> ScenarioResult<()> {
    let mut loaded = tw_config::open(scenario_path)?;
    let report = tw_config::replay(&mut loaded)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Scenario: {}", loaded.name);
    print_report(&report);
    Ok(())
}

fn print_report(report: &ReplayReport) {
    for line in &report.log {
        println!("  {line}");
    }

    let rejected: Vec<_> = report.rejected().collect();
    if rejected.is_empty() {
        println!("✓ All {} actions applied", report.outcomes.len());
    } else {
        println!(
            "{} of {} actions rejected:",
            rejected.len(),
            report.outcomes.len()
        );
        for outcome in rejected {
            if let Some(reason) = &outcome.rejected {
                println!("  [{}] {}", outcome.index, reason);
            }
        }
    }
    println!(
        "Round: {} laid, upgraded: {}",
        report.round.num_laid_track, report.round.upgraded_track
    );
}

#[derive(Serialize)]
struct TileChoices<'a> {
    hex: &'a str,
    entity: &'a str,
    options: &'a [UpgradeOption],
}

fn cmd_tiles(
    scenario_path: &Path,
    hex_name: &str,
    entity: Option<&str>,
    json: bool,
) -> ScenarioResult<()> {
    let loaded = tw_config::open(scenario_path)?;
    let state = &loaded.state;

    let entity = match entity {
        Some(sym) => state.entities.by_sym(sym).ok_or_else(|| TwError::NotFound {
            what: "Entity",
            name: sym.to_string(),
        })?,
        None => {
            let id = state
                .current_entity
                .ok_or_else(|| TwError::config("scenario has no current entity, pass --entity"))?;
            state.entity(id)?
        }
    };
    let hex = state
        .map
        .hex_by_name(hex_name)
        .ok_or_else(|| TwError::NotFound {
            what: "Hex",
            name: hex_name.to_string(),
        })?;

    let tracker = Tracker::new(loaded.rules.as_ref());
    let options = tracker.upgradeable_tiles(state, entity.id, hex.id)?;

    if json {
        let choices = TileChoices {
            hex: hex_name,
            entity: &entity.sym,
            options: &options,
        };
        println!("{}", serde_json::to_string_pretty(&choices)?);
        return Ok(());
    }

    if options.is_empty() {
        println!("No tiles can be laid on {hex_name} by {}", entity.name);
        return Ok(());
    }
    println!("Tiles {} can lay on {hex_name}:", entity.name);
    for option in &options {
        let rotations: Vec<String> = option.rotations.iter().map(u8::to_string).collect();
        println!("  {} (rotations {})", option.name, rotations.join(", "));
    }
    Ok(())
}

