//! Kaiju Shooter - simulation core for a vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, projectiles, collisions, stages)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and rule-check errors
//!
//! Rendering and input devices live outside this crate. They feed
//! [`sim::Controls`] in and read [`sim::Snapshot`] out once per frame.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{RuleCode, RuleViolation, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Durations are in frames at [`consts::TICK_RATE`], distances in pixels.
pub mod consts {
    /// Assumed display refresh rate driving the simulation (frames per second)
    pub const TICK_RATE: f32 = 60.0;

    /// Play area dimensions (origin top-left, +y down)
    pub const ARENA_WIDTH: f32 = 480.0;
    pub const ARENA_HEIGHT: f32 = 640.0;
    /// Enemy point bullets are culled this far outside the play area
    pub const BOUNDS_PADDING: f32 = 6.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 10.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance of the spawn point above the bottom edge
    pub const PLAYER_START_OFFSET: f32 = 55.0;
    /// Frames between primary shots
    pub const PLAYER_SHOOT_COOLDOWN: i32 = 8;
    /// Frames of invulnerability after taking a hit (~3 s)
    pub const INVINCIBLE_TICKS: u32 = 180;

    /// Player bullets
    pub const BULLET_SIZE: f32 = 6.0;
    pub const BULLET_SPEED: f32 = 10.0;

    /// Enemy bullets
    pub const ENEMY_BULLET_SIZE: f32 = 6.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;
    /// Heading blend per frame for homing shots (0 = never turns, 1 = snaps)
    pub const HOMING_TURN_RATE: f32 = 0.08;
    /// Frames a homing shot lives before fizzling
    pub const HOMING_LIFE: u32 = 300;

    /// Enemy defaults (drifters and the base of stage scaling)
    pub const ENEMY_SIZE: f32 = 28.0;
    pub const ENEMY_SPEED: f32 = 2.5;
    /// Shoot rate for trickle-spawned drifters (frames)
    pub const DRIFTER_SHOOT_RATE: i32 = 80;

    /// Run structure
    pub const MAX_STAGES: u32 = 6;
    /// Weak kills within a stage that summon the boss
    pub const BOSS_TRIGGER_KILLS: u32 = 50;

    /// Resources
    pub const START_HEARTS: u8 = 3;
    pub const MAX_HEARTS: u8 = 5;
    pub const START_STARS: u8 = 3;
    pub const MAX_STARS: u8 = 3;
    /// Every Nth cumulative kill restores a heart
    pub const HEART_REGEN_KILLS: u32 = 20;
    /// Every Nth cumulative kill restores a star
    pub const STAR_REGEN_KILLS: u32 = 30;

    /// Scoring
    pub const WEAK_KILL_SCORE: u64 = 100;
    pub const BOSS_KILL_SCORE: u64 = 1000;

    /// Nova beams (player special)
    pub const NOVA_BEAM_COUNT: usize = 41;
    /// Total fan angle of one nova cast (radians)
    pub const NOVA_SPREAD: f32 = std::f32::consts::PI * 0.9;
    pub const NOVA_BEAM_WIDTH: f32 = 10.0;
    /// Frames a nova beam persists (~2 s)
    pub const NOVA_BEAM_LIFE: u32 = 120;
    /// Damage per second a nova beam deals to a boss
    pub const BEAM_DPS: f32 = 10.0;
    /// Fraction of boss max HP one nova beam may deal in total
    pub const BEAM_BOSS_CAP_FRACTION: f32 = 0.25;

    /// Boss enrage (one-way, at half HP)
    pub const ENRAGE_HP_FRACTION: f32 = 0.5;
    pub const ENRAGE_ATTACK_STEP: u8 = 2;
    pub const ENRAGE_DENSITY_MULT: f32 = 1.6;
    pub const ENRAGE_RATE_STEP: i32 = 8;
    pub const MIN_BOSS_SHOOT_RATE: i32 = 8;
    /// Highest defined boss attack selector
    pub const MAX_ATTACK_TYPE: u8 = 7;

    /// Trickle spawning of drifters outside boss fights
    pub const SPAWN_INTERVAL_MIN: u32 = 60;
    pub const SPAWN_INTERVAL_JITTER: f32 = 40.0;
    /// Trickle timer countdown per frame outside boss fights
    pub const SPAWN_TIMER_STEP: f32 = 2.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Velocity vector of the given speed along `angle`
#[inline]
pub fn heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

/// Bearing (radians) from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
