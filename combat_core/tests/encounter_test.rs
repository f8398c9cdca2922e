//! Integration test: Load content -> Build actors -> Fight to the end
//!
//! Drives complete encounters with the bundled content and a seeded RNG, checking
//! resource and meter bounds on every event.

use combat_core::engine::TURN_THRESHOLD;
use combat_core::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAX_DECISIONS: usize = 2000;

/// Helper to print a separator
fn separator(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", title);
    println!("{}\n", "=".repeat(60));
}

fn hero(constants: &CombatConstants) -> Actor {
    let base = BaseStats {
        strength: 14.0,
        agility: 12.0,
        intellect: 16.0,
        vitality: 12.0,
        spirit: 10.0,
    };
    Actor::new(ActorIdentity::new(Side::Player, "Hero", 4), base, &constants.derived)
}

fn ogre(constants: &CombatConstants) -> Actor {
    let base = BaseStats {
        strength: 18.0,
        agility: 6.0,
        intellect: 4.0,
        vitality: 16.0,
        spirit: 6.0,
    };
    let identity = ActorIdentity::new(Side::Enemy, "Ogre", 4).with_tier(Tier::Elite);
    Actor::new(identity, base, &constants.derived)
}

fn hero_book() -> SpellBook {
    let mut book = SpellBook::new();
    book.learn_weighted("basic_attack", 1, 1.0);
    book.learn_weighted("fireball", 2, 3.0);
    book.learn_weighted("frostbolt", 1, 2.0);
    book.learn_weighted("heal", 1, 1.0);
    book.learn_weighted("arcane_focus", 1, 1.0);
    book
}

fn ogre_book() -> SpellBook {
    let mut book = SpellBook::new();
    book.learn_weighted("rend", 2, 2.0);
    book.learn_weighted("shield_bash", 1, 1.0);
    book.learn_weighted("war_cry", 1, 1.0);
    book
}

/// Fight until someone wins or the decision cap is reached; returns every event
fn fight(seed: u64) -> (Vec<CombatEvent>, Option<Side>) {
    let spells = default_spell_table();
    let effects = default_effect_registry();
    let constants = CombatConstants::default();
    let env = CombatEnv {
        spells: &spells,
        effects: &effects,
        constants: &constants,
    };

    let mut state = CombatState::new(
        env,
        hero(&constants),
        ogre(&constants),
        hero_book(),
        ogre_book(),
        ChaCha8Rng::seed_from_u64(seed),
    );
    let log = state.events_mut().recorder();
    let policy = WeightedRandomPolicy::default();

    for _ in 0..MAX_DECISIONS {
        match state.run().expect("scheduler failed") {
            SchedulerStep::Finished => break,
            SchedulerStep::AwaitingPlayerInput => {
                state.choose_action(Side::Player, &policy).expect("player choice failed");
            }
            SchedulerStep::AwaitingEnemyDecision => {
                state.choose_enemy_action(&policy).expect("enemy choice failed");
            }
        }
        for side in Side::all() {
            let actor = state.actor(*side);
            assert!((0..=actor.max_hp()).contains(&actor.hp()));
            assert!((0..=actor.max_mana()).contains(&actor.mana()));
            assert!((0.0..=TURN_THRESHOLD).contains(&actor.turn_meter()));
        }
    }

    let events = log.borrow().clone();
    (events, state.winner())
}

#[test]
fn test_full_encounter() {
    separator("Encounter: Hero vs Ogre");
    let (events, winner) = fight(42);
    for event in &events {
        if let CombatEvent::Log(line) = event {
            println!("  {}", line);
        }
    }

    let winner = winner.expect("encounter did not finish");
    println!("\n  Winner: {}", winner);

    let ended: Vec<&CombatEvent> = events
        .iter()
        .filter(|e| matches!(e, CombatEvent::CombatEnded { .. }))
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(events.last(), Some(&CombatEvent::CombatEnded { winner }));

    for event in &events {
        match event {
            CombatEvent::HpChanged { hp, max_hp, .. } => assert!(*hp >= 0 && hp <= max_hp),
            CombatEvent::ManaChanged { mana, max_mana, .. } => assert!(*mana >= 0 && mana <= max_mana),
            CombatEvent::TurnMeterChanged { player, enemy } => {
                assert!((0.0..=TURN_THRESHOLD).contains(player));
                assert!((0.0..=TURN_THRESHOLD).contains(enemy));
            }
            _ => {}
        }
    }
}

#[test]
fn test_same_seed_same_encounter() {
    let (first, first_winner) = fight(7);
    let (second, second_winner) = fight(7);
    assert_eq!(first_winner, second_winner);
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_all_finish() {
    for seed in 0..10 {
        let (_, winner) = fight(seed);
        assert!(winner.is_some(), "seed {} did not finish", seed);
    }
}

#[test]
fn test_buff_expiry_restores_modifiers() {
    let spells = default_spell_table();
    let effects = default_effect_registry();
    let mut constants = CombatConstants::default();
    constants.damage.variance_percent = 0.0;
    let env = CombatEnv {
        spells: &spells,
        effects: &effects,
        constants: &constants,
    };

    let mut book = SpellBook::new();
    book.learn("arcane_focus", 1);
    book.learn("basic_attack", 1);
    let mut enemy_book = SpellBook::new();
    enemy_book.learn("basic_attack", 1);

    let mut state = CombatState::new(
        env,
        hero(&constants),
        ogre(&constants),
        book,
        enemy_book,
        ChaCha8Rng::seed_from_u64(3),
    );
    let before = state.actor(Side::Player).modifiers().clone();
    let policy = WeightedRandomPolicy::default();
    let basic = SpellId::from("basic_attack");

    assert!(state.try_use_spell(&SpellId::from("arcane_focus")));
    // every return to player input after this point is one hero turn spent
    let mut hero_turns = 0;
    loop {
        match state.run().unwrap() {
            SchedulerStep::Finished => return,
            SchedulerStep::AwaitingEnemyDecision => {
                state.choose_enemy_action(&policy).unwrap();
            }
            SchedulerStep::AwaitingPlayerInput => {
                let hero = state.actor(Side::Player);
                if hero_turns == 0 {
                    assert!(hero.effects().has_effect(&EffectId::from("empower")));
                    assert_ne!(hero.modifiers(), &before);
                }
                // empower lasts three more hero turns
                if hero_turns == 3 {
                    assert!(!hero.effects().has_effect(&EffectId::from("empower")));
                    assert_eq!(hero.modifiers(), &before);
                    break;
                }
                assert!(state.try_use_spell(&basic));
                hero_turns += 1;
            }
        }
    }
}
