//! Skirmish demo
//! Two AI factions race for rigs on an ASCII map

use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use hydroq_ai::ai::{AiController, CycleOutcome, RigEvent};
use hydroq_ai::core::{load_profile, Faction, Result};
use hydroq_ai::map::{GameMap, GridWorld};

const DEFAULT_MAP: &str = "\
B.....~~~~~~~~~~~~.U
......~~~~~~~~~~~~..
..U...~~~~~~~~~~~~..
~~~~~~~~~~..~~~~~~~~
~~~~~~~~~~.U~~~~~~~~
~~~~~~~~~~..~~~~~~~~
..U...~~~~~~~~~~~~..
......~~~~~~~~~~~~U.
U.....~~~~~~~~~~~~.R
";

/// Skirmish - two UCT controllers compete for rigs
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run a headless skirmish between two AI factions")]
struct Args {
    /// ASCII map file (built-in map when omitted)
    #[arg(long)]
    map: Option<PathBuf>,

    /// AI profile for BLUE (data/ai_profiles/<name>.toml)
    #[arg(long, default_value = "default")]
    blue: String,

    /// AI profile for RED
    #[arg(long, default_value = "aggressive")]
    red: String,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 5_000)]
    ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,

    /// Workers finish one bridge tile per faction every N ticks
    #[arg(long, default_value_t = 25)]
    build_every: u64,

    /// Override both profiles' search seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Debug, Default, Serialize)]
struct FactionSummary {
    profile: String,
    rigs: usize,
    dispatched: u32,
    discarded: u32,
    idle_cycles: u32,
    bridges_built: u32,
}

#[derive(Debug, Serialize)]
struct SkirmishSummary {
    ticks: u64,
    unclaimed_left: usize,
    blue: FactionSummary,
    red: FactionSummary,
    captures: Vec<RigEvent>,
    final_map: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hydroq_ai=info")),
        )
        .init();

    let args = Args::parse();

    let text = match &args.map {
        Some(path) => fs::read_to_string(path)?,
        None => DEFAULT_MAP.to_string(),
    };
    let mut world = GridWorld::from_ascii(&text)?;

    let mut controllers = Vec::new();
    for (faction, profile) in [(Faction::Blue, &args.blue), (Faction::Red, &args.red)] {
        let mut config = load_profile(profile)?;
        if let Some(seed) = args.seed {
            config.search.seed = seed;
        }
        controllers.push(AiController::new(faction, config));
    }

    let mut summaries = [
        FactionSummary {
            profile: args.blue.clone(),
            ..FactionSummary::default()
        },
        FactionSummary {
            profile: args.red.clone(),
            ..FactionSummary::default()
        },
    ];
    let mut captures = Vec::new();

    tracing::info!(
        "Skirmish on {}x{} map: {} vs {}",
        world.width,
        world.height,
        args.blue,
        args.red
    );

    for tick in 0..args.ticks {
        let now = tick * args.tick_ms;

        for (controller, summary) in controllers.iter_mut().zip(summaries.iter_mut()) {
            match controller.process_tick(&mut world, tick, now) {
                CycleOutcome::Dispatched { .. } => summary.dispatched += 1,
                CycleOutcome::Discarded { .. } => summary.discarded += 1,
                CycleOutcome::Idle(_) => summary.idle_cycles += 1,
                CycleOutcome::Skipped | CycleOutcome::Kept(_) => {}
            }
        }

        if args.build_every > 0 && tick % args.build_every == 0 {
            for (faction, summary) in [Faction::Blue, Faction::Red]
                .into_iter()
                .zip(summaries.iter_mut())
            {
                if let Some(&mark) = world.bridge_marks(faction).first() {
                    if world.complete_bridge(mark) {
                        summary.bridges_built += 1;
                    }
                }
            }

            for event in settle_captures(&mut world) {
                tracing::info!("Tick {}: {:?}", tick, event);
                for controller in controllers.iter_mut() {
                    controller.handle_event(&mut world, &event);
                }
                captures.push(event);
            }
        }
    }

    for (faction, summary) in [Faction::Blue, Faction::Red]
        .into_iter()
        .zip(summaries.iter_mut())
    {
        summary.rigs = world.rigs_of_faction(faction).len();
    }

    let [blue, red] = summaries;
    let summary = SkirmishSummary {
        ticks: args.ticks,
        unclaimed_left: world.rigs_of_faction(Faction::None).len(),
        blue,
        red,
        captures,
        final_map: world.to_ascii(),
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        "text" => print_text(&summary),
        other => {
            eprintln!("Unknown format '{}', defaulting to text", other);
            print_text(&summary);
        }
    }

    Ok(())
}

/// Hand each rig to the faction whose attractor sits on or next to it.
///
/// A rig both factions reach in the same pass stays with its owner.
fn settle_captures(world: &mut GridWorld) -> Vec<RigEvent> {
    let mut claims = Vec::new();
    for rig in world.rigs() {
        let mut claimants = [Faction::Blue, Faction::Red].into_iter().filter(|f| {
            world.attractors(*f).iter().any(|a| {
                a.position == rig.position || a.position.manhattan(&rig.position) == 1
            })
        });
        if let (Some(faction), None) = (claimants.next(), claimants.next()) {
            if faction != rig.owner {
                claims.push((rig.position, faction));
            }
        }
    }

    claims
        .into_iter()
        .filter_map(|(pos, faction)| world.capture_rig(pos, faction))
        .collect()
}

fn print_text(summary: &SkirmishSummary) {
    println!("Skirmish Result");
    println!("===============");
    println!("Ticks: {}", summary.ticks);
    for (name, faction) in [("BLUE", &summary.blue), ("RED", &summary.red)] {
        println!(
            "{} ({}): {} rigs, {} tasks, {} discarded, {} idle cycles, {} bridges",
            name,
            faction.profile,
            faction.rigs,
            faction.dispatched,
            faction.discarded,
            faction.idle_cycles,
            faction.bridges_built
        );
    }
    println!("Unclaimed left: {}", summary.unclaimed_left);
    println!("Captures: {}", summary.captures.len());
    println!();
    print!("{}", summary.final_map);
}
