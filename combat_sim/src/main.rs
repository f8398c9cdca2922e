//! combat_sim - plays out a seeded encounter between two automated actors
//!
//! Both sides pick spells with the weighted random policy, so the same seed and
//! content always produce the same fight.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use combat_core::config::{load_constants, load_effect_configs, load_spell_configs};
use combat_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "combat_sim", about = "Simulate a turn-meter encounter")]
struct Args {
    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Spell table (TOML); the bundled table is used when omitted
    #[arg(long)]
    spells: Option<PathBuf>,

    /// Effect definitions (TOML)
    #[arg(long)]
    effects: Option<PathBuf>,

    /// Combat constants (TOML)
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Player level
    #[arg(long, default_value_t = 5)]
    player_level: u32,

    /// Enemy level
    #[arg(long, default_value_t = 5)]
    enemy_level: u32,

    /// Give up after this many decisions
    #[arg(long, default_value_t = 1000)]
    max_actions: usize,

    /// Print turn meter updates too
    #[arg(short, long)]
    verbose: bool,

    /// Print the final outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combat_sim=info,combat_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let spells = match &args.spells {
        Some(path) => load_spell_configs(path)?,
        None => default_spell_table(),
    };
    let effects = match &args.effects {
        Some(path) => load_effect_configs(path)?,
        None => default_effect_registry(),
    };
    let constants = match &args.constants {
        Some(path) => load_constants(path)?,
        None => CombatConstants::default(),
    };
    info!(spells = spells.len(), effects = effects.len(), seed = args.seed, "content loaded");

    let env = CombatEnv {
        spells: &spells,
        effects: &effects,
        constants: &constants,
    };
    let mut state = CombatState::new(
        env,
        mage(args.player_level, &constants),
        brute(args.enemy_level, &constants),
        mage_book(),
        brute_book(),
        ChaCha8Rng::seed_from_u64(args.seed),
    );

    let verbose = args.verbose;
    let quiet = args.json;
    state.subscribe(move |event| {
        if quiet {
            return;
        }
        match event {
            CombatEvent::TurnMeterChanged { .. } if !verbose => {}
            CombatEvent::EnemyDecisionRequested | CombatEvent::SpellQueued { .. } if !verbose => {}
            _ => println!("{event}"),
        }
    });

    let policy = WeightedRandomPolicy::default();
    let mut decisions = 0;
    loop {
        match state.run()? {
            SchedulerStep::Finished => break,
            SchedulerStep::AwaitingPlayerInput => {
                state.choose_action(Side::Player, &policy)?;
            }
            SchedulerStep::AwaitingEnemyDecision => {
                state.choose_enemy_action(&policy)?;
            }
        }
        decisions += 1;
        if decisions >= args.max_actions {
            bail!("no winner after {} decisions", args.max_actions);
        }
    }

    let outcome = state.outcome();
    info!(
        winner = ?outcome.winner,
        turns = outcome.total_turns(),
        decisions,
        "encounter finished"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }

    Ok(())
}

fn mage(level: u32, constants: &CombatConstants) -> Actor {
    let base = BaseStats {
        strength: 8.0,
        agility: 12.0,
        intellect: 18.0,
        vitality: 12.0,
        spirit: 14.0,
    };
    Actor::new(ActorIdentity::new(Side::Player, "Mage", level), base, &constants.derived)
}

fn brute(level: u32, constants: &CombatConstants) -> Actor {
    let base = BaseStats {
        strength: 18.0,
        agility: 8.0,
        intellect: 4.0,
        vitality: 16.0,
        spirit: 6.0,
    };
    let identity = ActorIdentity::new(Side::Enemy, "Brute", level).with_tier(Tier::Elite);
    Actor::new(identity, base, &constants.derived)
}

fn mage_book() -> SpellBook {
    let mut book = SpellBook::new();
    book.learn_weighted("basic_attack", 1, 1.0);
    book.learn_weighted("fireball", 2, 3.0);
    book.learn_weighted("frostbolt", 1, 2.0);
    book.learn_weighted("heal", 1, 1.0);
    book.learn_weighted("arcane_focus", 1, 1.0);
    book.learn_weighted("siphon", 1, 1.0);
    book
}

fn brute_book() -> SpellBook {
    let mut book = SpellBook::new();
    book.learn_weighted("basic_attack", 1, 1.0);
    book.learn_weighted("rend", 2, 2.0);
    book.learn_weighted("shield_bash", 1, 1.0);
    book.learn_weighted("war_cry", 1, 1.0);
    book
}
