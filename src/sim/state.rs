//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; subsystems
//! receive it by `&mut` and never keep references between ticks.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::input::NovaLatch;
use super::ledger::Ledger;
use super::stage::{self, StageDirector, StagePhase};
use crate::consts::*;
use crate::error::{RuleCode, RuleViolation};
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Hearts ran out; the simulation is frozen
    GameOver,
    /// Final boss defeated and the field is empty; the run is won
    Cleared,
}

/// Stable enemy identifier, assigned in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub radius: f32,
    /// Frames until the next primary shot is allowed
    pub shoot_cooldown: i32,
    /// Frames of damage immunity remaining
    pub invincible_ticks: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - PLAYER_START_OFFSET),
            radius: PLAYER_SIZE / 2.0,
            shoot_cooldown: 0,
            invincible_ticks: 0,
        }
    }
}

impl Player {
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }
}

/// A player bullet
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Bullet {
    pub const RADIUS: f32 = BULLET_SIZE / 2.0;
}

/// A boss laser: a fixed segment that damages for its whole lifetime
#[derive(Debug, Clone)]
pub struct LaserBeam {
    pub origin: Vec2,
    /// Direction of the beam (radians)
    pub angle: f32,
    /// Half-thickness used by the hit test
    pub width: f32,
    pub length: f32,
    /// Frames remaining
    pub life: u32,
}

impl LaserBeam {
    /// Far end of the beam segment
    pub fn end(&self) -> Vec2 {
        self.origin + crate::heading(self.angle, self.length)
    }
}

/// Anything an enemy fires at the player
#[derive(Debug, Clone)]
pub enum EnemyShot {
    /// Constant-velocity bullet
    Straight { pos: Vec2, vel: Vec2 },
    /// Bullet that steers toward the player every frame
    Homing {
        pos: Vec2,
        vel: Vec2,
        /// Speed magnitude fixed at spawn
        speed: f32,
        /// Frames remaining
        life: u32,
    },
    /// Sustained boss laser
    Laser(LaserBeam),
}

impl EnemyShot {
    pub const RADIUS: f32 = ENEMY_BULLET_SIZE / 2.0;

    /// Center of a point bullet (lasers have no single position)
    pub fn point(&self) -> Option<Vec2> {
        match self {
            Self::Straight { pos, .. } | Self::Homing { pos, .. } => Some(*pos),
            Self::Laser(_) => None,
        }
    }

    pub fn is_laser(&self) -> bool {
        matches!(self, Self::Laser(_))
    }
}

/// One ray of a player nova cast
#[derive(Debug, Clone)]
pub struct NovaBeam {
    pub origin: Vec2,
    pub angle: f32,
    pub length: f32,
    pub width: f32,
    /// Frames remaining
    pub life: u32,
    /// Cumulative damage this beam has dealt to each boss
    pub damage_dealt: HashMap<EnemyId, f32>,
}

impl NovaBeam {
    pub fn new(origin: Vec2, angle: f32, length: f32) -> Self {
        Self {
            origin,
            angle,
            length,
            width: NOVA_BEAM_WIDTH,
            life: NOVA_BEAM_LIFE,
            damage_dealt: HashMap::new(),
        }
    }

    /// Far end of the beam segment
    pub fn end(&self) -> Vec2 {
        self.origin + crate::heading(self.angle, self.length)
    }
}

/// Boss-only state
#[derive(Debug, Clone)]
pub struct BossState {
    /// Attack selector, 1..=7 (anything else fires the fallback spread)
    pub attack_type: u8,
    /// Scales shot count and spread of every pattern
    pub density_scale: f32,
    /// Set once at half HP, never cleared
    pub enraged: bool,
    /// Hover altitude
    pub target_y: f32,
    /// Accumulator for rotating patterns
    pub spiral_angle: f32,
}

#[derive(Debug, Clone)]
pub enum EnemyKind {
    Weak,
    Boss(BossState),
}

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Descent speed (pixels per frame)
    pub speed: f32,
    /// Decorative spin
    pub angle: f32,
    pub rotation_speed: f32,
    /// Frames until the next shot
    pub shoot_cooldown: i32,
    /// Frames between shots
    pub shoot_rate: i32,
    /// Per-instance offset of the horizontal sway
    pub sway_phase: f32,
    /// Constant sideways drift factor (drifters only)
    pub drift: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossState> {
        match &self.kind {
            EnemyKind::Boss(b) => Some(b),
            EnemyKind::Weak => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossState> {
        match &mut self.kind {
            EnemyKind::Boss(b) => Some(b),
            EnemyKind::Weak => None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// All randomness in the run flows through this generator
    pub rng: Pcg32,
    /// Balance knobs for this run
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Player bullets in flight
    pub bullets: Vec<Bullet>,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Enemy bullets, homing shots and lasers
    pub enemy_shots: Vec<EnemyShot>,
    /// Player nova beams
    pub novas: Vec<NovaBeam>,
    /// Score, hearts, stars and kill counters
    pub ledger: Ledger,
    /// Stage progression
    pub director: StageDirector,
    /// Edge detector for the nova command
    pub nova_latch: NovaLatch,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Next enemy ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new run; stage 1 starts immediately
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ledger: Ledger::new(&tuning),
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_shots: Vec::new(),
            novas: Vec::new(),
            director: StageDirector::default(),
            nova_latch: NovaLatch::default(),
            events: Vec::new(),
            next_id: 1,
        };

        stage::start_stage(&mut state, 1);

        state
    }

    /// Reinitialize every piece of run state and begin stage 1
    pub fn reset(&mut self) {
        *self = Self::with_tuning(self.seed, self.tuning.clone());
        log::info!("Run reset (seed {})", self.seed);
    }

    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == GamePhase::Cleared
    }

    pub fn boss_alive(&self) -> bool {
        self.director.boss_alive()
    }

    /// The current boss, if one is on the field
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }

    /// Verify the state invariants hold
    pub fn check_rules(&self) -> Result<(), RuleViolation> {
        let fail = |rule| {
            Err(RuleViolation {
                tick: self.time_ticks,
                rule,
            })
        };

        if self.ledger.hearts > self.ledger.max_hearts() {
            return fail(RuleCode::HeartsRange);
        }
        if self.ledger.stars > self.ledger.max_stars() {
            return fail(RuleCode::StarsRange);
        }
        if self.director.stage == 0 || self.director.stage > self.tuning.max_stages + 1 {
            return fail(RuleCode::StageRange);
        }

        let p = self.player.pos;
        let r = self.player.radius;
        if p.x < r || p.x > ARENA_WIDTH - r || p.y < r || p.y > ARENA_HEIGHT - r {
            return fail(RuleCode::PlayerBounds);
        }

        for enemy in &self.enemies {
            if enemy.hp > enemy.max_hp {
                return fail(RuleCode::EnemyHpRange);
            }
            // Dead enemies are removed within the pass that kills them
            if !enemy.is_boss() && enemy.hp <= 0.0 {
                return fail(RuleCode::EnemyHpRange);
            }
        }
        if self.enemies.windows(2).any(|w| w[0].id >= w[1].id) {
            return fail(RuleCode::EnemyIdOrder);
        }

        let bosses = self.enemies.iter().filter(|e| e.is_boss()).count();
        let fighting = self.director.phase == StagePhase::BossFight;
        if bosses > 1 || (bosses == 1) != fighting {
            return fail(RuleCode::BossFlagConsistency);
        }

        if (self.ledger.hearts == 0) != self.is_game_over() {
            return fail(RuleCode::GameOverConsistency);
        }

        Ok(())
    }
}
