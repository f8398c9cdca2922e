//! Turn scheduler - Continuous-time turn meters
//!
//! Both meters fill at their actor's action speed. Each step advances time just
//! far enough for the nearer actor to reach the threshold, so a faster actor may
//! act several times before a slower one acts once.

use crate::types::Side;

/// Meter value at which an actor acts
pub const TURN_THRESHOLD: f64 = 100.0;

/// Meters this close to the threshold are snapped onto it
pub const SNAP_EPSILON: f64 = 1e-3;

/// Floor applied to every action speed
pub const MIN_ACTION_SPEED: f64 = 1.0;

/// Why the scheduler loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStep {
    /// The player has no queued action
    AwaitingPlayerInput,
    /// The enemy has no queued action
    AwaitingEnemyDecision,
    /// One side is dead
    Finished,
}

/// Result of one meter advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterAdvance {
    pub player: f64,
    pub enemy: f64,
    /// Time that passed, in meter units per speed
    pub elapsed: f64,
    /// Who reached the threshold; the player when both did
    pub ready: Option<Side>,
}

fn time_to_threshold(meter: f64, speed: f64) -> f64 {
    (TURN_THRESHOLD - meter).max(0.0) / speed.max(MIN_ACTION_SPEED)
}

fn snap(meter: f64) -> f64 {
    if meter >= TURN_THRESHOLD - SNAP_EPSILON {
        TURN_THRESHOLD
    } else {
        meter.max(0.0)
    }
}

/// Advance both meters by the time the nearer actor needs to reach the threshold
pub fn advance_meters(player_meter: f64, player_speed: f64, enemy_meter: f64, enemy_speed: f64) -> MeterAdvance {
    let player_speed = player_speed.max(MIN_ACTION_SPEED);
    let enemy_speed = enemy_speed.max(MIN_ACTION_SPEED);
    let player_time = time_to_threshold(player_meter, player_speed);
    let enemy_time = time_to_threshold(enemy_meter, enemy_speed);
    let elapsed = player_time.min(enemy_time);

    let mut player = snap(player_meter + player_speed * elapsed);
    let mut enemy = snap(enemy_meter + enemy_speed * elapsed);
    // the nearer actor lands exactly on the threshold
    if player_time <= elapsed {
        player = TURN_THRESHOLD;
    }
    if enemy_time <= elapsed {
        enemy = TURN_THRESHOLD;
    }

    let ready = if player >= TURN_THRESHOLD {
        Some(Side::Player)
    } else if enemy >= TURN_THRESHOLD {
        Some(Side::Enemy)
    } else {
        None
    };

    MeterAdvance {
        player,
        enemy,
        elapsed,
        ready,
    }
}
