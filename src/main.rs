//! lairkeep - bestiary listing and encounter tracking from the command line

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lairkeep::bestiary::{self, BestiaryLoad};
use lairkeep::combat::{self, Combatant, Encounter, RechargeRoll};
use lairkeep::Config;

/// Monster statblocks and initiative tracking
#[derive(Parser, Debug)]
#[command(name = "lairkeep", version, about = "Monster statblocks and initiative tracking")]
struct Args {
    /// Encounter snapshot file (overrides configuration)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Bestiary document (overrides configuration)
    #[arg(long, global = true)]
    bestiary: Option<PathBuf>,

    /// Seed for dice rolls (overrides configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one JSON row per monster in a bestiary document
    List {
        /// Bestiary document (defaults to --bestiary / configuration)
        path: Option<PathBuf>,
    },

    /// Manage the saved encounter
    #[command(subcommand)]
    Encounter(EncounterCommand),
}

#[derive(Subcommand, Debug)]
enum EncounterCommand {
    /// Start the demo encounter
    New,
    /// Show round and turn order
    Show,
    /// Advance to the next turn
    Next,
    /// Damage a combatant
    Damage { name: String, amount: u32 },
    /// Heal a combatant, up to max HP
    Heal { name: String, amount: u32 },
    /// Set a combatant's HP directly
    SetHp {
        name: String,
        #[arg(allow_hyphen_values = true)]
        hp: i32,
    },
    /// Use an action
    Use { name: String, action: String },
    /// Add monsters from the bestiary
    Add {
        monster: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Fixed initiative instead of d20 + DEX
        #[arg(long, allow_hyphen_values = true)]
        initiative: Option<i32>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(path) = args.snapshot.clone() {
        config.snapshot_path = path;
    }
    if let Some(path) = args.bestiary.clone() {
        config.bestiary_path = Some(path);
    }
    if let Some(seed) = args.seed {
        config.rng_seed = Some(seed);
    }

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with(
            args.log_json
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!args.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match args.command {
        Command::List { path } => {
            let path = path
                .or_else(|| config.bestiary_path.clone())
                .context("no bestiary given: pass a path or set bestiary_path")?;
            list(&path)
        }
        Command::Encounter(cmd) => run_encounter(cmd, &config, &mut rng),
    }
}

fn read_bestiary(path: &Path) -> Result<BestiaryLoad> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading bestiary {}", path.display()))?;
    let doc: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("decoding bestiary {}", path.display()))?;
    Ok(bestiary::load_bestiary(&doc)?)
}

fn list(path: &Path) -> Result<()> {
    let load = read_bestiary(path)?;
    for row in bestiary::rows(&load.statblocks) {
        println!("{}", serde_json::to_string(&row)?);
    }
    for failure in &load.failures {
        eprintln!(
            "skipped record {} ({}): {}",
            failure.index,
            failure.name.as_deref().unwrap_or("unnamed"),
            failure.error
        );
    }
    Ok(())
}

fn load_encounter(path: &Path) -> Result<Encounter> {
    Encounter::load(path).with_context(|| format!("loading encounter {}", path.display()))
}

fn run_encounter(cmd: EncounterCommand, config: &Config, rng: &mut StdRng) -> Result<()> {
    let path = config.snapshot_path.as_path();

    let encounter = match cmd {
        EncounterCommand::New => {
            let encounter = combat::default_encounter();
            info!(path = %path.display(), "starting demo encounter");
            encounter
        }
        EncounterCommand::Show => {
            show(&load_encounter(path)?);
            return Ok(());
        }
        EncounterCommand::Next => {
            let mut encounter = load_encounter(path)?;
            let rolls = encounter.next_turn_with(rng);
            report_recharges(&encounter.current().name, &rolls);
            encounter
        }
        EncounterCommand::Damage { name, amount } => {
            let mut encounter = load_encounter(path)?;
            println!("{}", encounter.take_damage(&name, amount)?);
            encounter
        }
        EncounterCommand::Heal { name, amount } => {
            let mut encounter = load_encounter(path)?;
            println!("{}", encounter.heal(&name, amount)?);
            encounter
        }
        EncounterCommand::SetHp { name, hp } => {
            let mut encounter = load_encounter(path)?;
            println!("{}", encounter.update_hp(&name, hp)?);
            encounter
        }
        EncounterCommand::Use { name, action } => {
            let mut encounter = load_encounter(path)?;
            encounter.trigger_action(&name, &action)?;
            println!("{} used {}", name, action);
            encounter
        }
        EncounterCommand::Add {
            monster,
            count,
            initiative,
        } => {
            if count == 0 {
                bail!("--count must be at least 1");
            }
            let bestiary_path = config
                .bestiary_path
                .as_deref()
                .context("no bestiary configured: pass --bestiary or set bestiary_path")?;
            let load = read_bestiary(bestiary_path)?;
            let parsed = load
                .find(&monster)
                .with_context(|| format!("{} not found in {}", monster, bestiary_path.display()))?;
            let template = combat::StatBlock::from_bestiary(parsed);

            let encounter = load_encounter(path)?;
            let mut added = Vec::new();
            for name in fresh_names(&encounter, &template.name, count) {
                let mut combatant = Combatant::from_template(name, &template);
                match initiative {
                    Some(init) => combatant.set_initiative(init),
                    None => {
                        combatant.roll_initiative_with(rng);
                    }
                }
                println!("added {}", combatant);
                added.push(combatant);
            }
            encounter.with_added(added)?
        }
    };

    encounter
        .save(path)
        .with_context(|| format!("saving encounter {}", path.display()))?;
    show(&encounter);
    Ok(())
}

/// "Goblin A", "Goblin B", ... skipping names already in the encounter
fn fresh_names(encounter: &Encounter, base: &str, count: u32) -> Vec<String> {
    (0u32..)
        .map(|i| match char::from_u32('A' as u32 + i) {
            Some(letter) if i < 26 => format!("{} {}", base, letter),
            _ => format!("{} {}", base, i + 1),
        })
        .filter(|name| encounter.index_of(name).is_none())
        .take(count as usize)
        .collect()
}

fn report_recharges(name: &str, rolls: &[RechargeRoll]) {
    for roll in rolls {
        let outcome = if roll.recovered { "recharged" } else { "still spent" };
        println!("{}: {} rolled {}, {}", name, roll.action, roll.roll, outcome);
    }
}

fn show(encounter: &Encounter) {
    print!("{}", encounter);
    let current = encounter.current();
    println!();
    println!("Current: {}", current);
    println!("  {}", current.statblock);
    for action in current.statblock.all_actions() {
        println!("  - {}", action);
    }
    let previous: Vec<&str> = encounter.previous().iter().map(|c| c.name.as_str()).collect();
    let upcoming: Vec<&str> = encounter.upcoming().iter().map(|c| c.name.as_str()).collect();
    println!("Acted: {}", previous.join(", "));
    println!("Upcoming: {}", upcoming.join(", "));
}
