//! Stage progression
//!
//! Each stage opens with a wave of weak enemies and keeps trickling drifters
//! in until enough weak kills summon the stage boss. Killing the boss starts
//! the next stage; killing the last one and emptying the field clears the run.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{BossState, Enemy, EnemyId, EnemyKind, GamePhase, GameState};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    /// Weak enemies arriving, counting kills toward the boss
    Spawning,
    /// The stage boss is on the field
    BossFight,
    /// Every stage beaten and the field is empty
    Cleared,
}

#[derive(Debug, Clone)]
pub struct StageDirector {
    /// Current stage, 1-based (`max_stages + 1` after the final boss)
    pub stage: u32,
    pub phase: StagePhase,
    /// False once the final boss falls
    pub active: bool,
    /// Frames until the next trickle spawn
    pub spawn_timer: f32,
}

impl Default for StageDirector {
    fn default() -> Self {
        Self {
            stage: 1,
            phase: StagePhase::Spawning,
            active: false,
            spawn_timer: 0.0,
        }
    }
}

impl StageDirector {
    pub fn boss_alive(&self) -> bool {
        self.phase == StagePhase::BossFight
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == StagePhase::Cleared
    }
}

/// Begin `stage`: drop any boss, reset the boss counter, and spawn the
/// opening wave of `3 + 2 * stage` weak enemies above the screen
pub fn start_stage(state: &mut GameState, stage: u32) {
    state.enemies.retain(|e| !e.is_boss());
    state.director.stage = stage;
    state.director.phase = StagePhase::Spawning;
    state.director.active = true;
    state.ledger.reset_stage_kills();

    let count = 3 + 2 * stage;
    for i in 0..count {
        let x = state.rng.random::<f32>() * (ARENA_WIDTH - ENEMY_SIZE) + ENEMY_SIZE / 2.0;
        let y = -state.rng.random::<f32>() * 200.0 - i as f32 * 40.0;
        spawn_weak(state, Vec2::new(x, y), stage);
    }

    state.events.push(GameEvent::StageStarted { stage });
    log::info!("Stage {} started with {} enemies", stage, count);
}

/// Spawn one weak enemy scaled to `stage`: smaller, faster, tougher and
/// quicker to fire as stages go up
pub fn spawn_weak(state: &mut GameState, pos: Vec2, stage: u32) -> EnemyId {
    let n = stage as f32;
    let size = (ENEMY_SIZE - 1.5 * n).max(14.0);
    let speed = ENEMY_SPEED + 0.35 * n;
    let shoot_rate = (40 - 3 * stage as i32).max(8);
    let hp = (1.0 + 0.6 * n).floor().max(1.0);

    let id = state.next_enemy_id();
    let enemy = Enemy {
        id,
        pos,
        size,
        hp,
        max_hp: hp,
        speed,
        angle: 0.0,
        rotation_speed: state.rng.random_range(-0.02..0.02),
        shoot_cooldown: state.rng.random_range(0..shoot_rate),
        shoot_rate,
        sway_phase: state.rng.random_range(0.0..TAU),
        drift: 0.0,
        kind: EnemyKind::Weak,
    };
    state.enemies.push(enemy);
    id
}

/// Spawn a default-strength drifter just above the screen
pub fn spawn_drifter(state: &mut GameState) -> EnemyId {
    let x = state.rng.random::<f32>() * (ARENA_WIDTH - ENEMY_SIZE) + ENEMY_SIZE / 2.0;
    let id = state.next_enemy_id();
    let enemy = Enemy {
        id,
        pos: Vec2::new(x, -ENEMY_SIZE / 2.0),
        size: ENEMY_SIZE,
        hp: 1.0,
        max_hp: 1.0,
        speed: ENEMY_SPEED,
        angle: 0.0,
        rotation_speed: state.rng.random_range(-0.02..0.02),
        shoot_cooldown: state.rng.random_range(0..DRIFTER_SHOOT_RATE),
        shoot_rate: DRIFTER_SHOOT_RATE,
        sway_phase: state.rng.random_range(0.0..TAU),
        drift: state.rng.random_range(-20.0..20.0),
        kind: EnemyKind::Weak,
    };
    state.enemies.push(enemy);
    id
}

/// Spawn the boss for `stage`, centered above the screen
pub fn spawn_boss(state: &mut GameState, stage: u32) -> EnemyId {
    let n = stage as f32;
    let size = ENEMY_SIZE * (1.6 + 0.15 * n);
    let max_hp = 60.0 + 20.0 * (n - 1.0).max(0.0);
    let boss = BossState {
        attack_type: stage.min(MAX_ATTACK_TYPE as u32) as u8,
        density_scale: 1.0 + 0.6 * (n - 1.0).max(0.0),
        enraged: false,
        // Hover line is measured from the top edge
        target_y: size.max(80.0) + size / 2.0,
        spiral_angle: 0.0,
    };

    let id = state.next_enemy_id();
    let enemy = Enemy {
        id,
        pos: Vec2::new(ARENA_WIDTH / 2.0, -size / 2.0),
        size,
        hp: max_hp,
        max_hp,
        speed: ENEMY_SPEED * 0.4,
        angle: 0.0,
        rotation_speed: 0.01,
        shoot_cooldown: 0,
        shoot_rate: (36 - 4 * stage as i32).max(10),
        sway_phase: state.rng.random_range(0.0..TAU),
        drift: 0.0,
        kind: EnemyKind::Boss(boss),
    };
    state.enemies.push(enemy);
    state.director.phase = StagePhase::BossFight;

    state.events.push(GameEvent::BossSpawned { id, stage });
    log::info!("Boss {:?} spawned for stage {} ({} hp)", id, stage, max_hp);
    id
}

/// Advance past a defeated boss. The boss must already be off the field.
pub fn on_boss_defeated(state: &mut GameState) {
    state.director.stage += 1;
    let next = state.director.stage;
    if next <= state.tuning.max_stages {
        start_stage(state, next);
    } else {
        state.director.active = false;
        state.director.phase = StagePhase::Spawning;
        log::info!("Final boss down, waiting for the field to empty");
    }
}

/// Per-tick director step: summon the boss, detect the clear, and trickle
/// drifters in between boss fights
pub fn update(state: &mut GameState) {
    let max_stages = state.tuning.max_stages;
    let director = &state.director;

    if director.active
        && !director.boss_alive()
        && director.stage <= max_stages
        && state.ledger.weak_kills_this_stage >= state.tuning.boss_trigger_kills
    {
        let stage = director.stage;
        spawn_boss(state, stage);
        state.ledger.reset_stage_kills();
    } else if !director.active
        && !director.is_cleared()
        && director.stage > max_stages
        && state.enemies.is_empty()
    {
        state.director.phase = StagePhase::Cleared;
        state.phase = GamePhase::Cleared;
        state.events.push(GameEvent::RunCleared);
        log::info!(
            "Run cleared: score {}, kills {}",
            state.ledger.score,
            state.ledger.kill_count
        );
        return;
    }

    if state.director.boss_alive() {
        state.director.spawn_timer = SPAWN_INTERVAL_MIN as f32;
    } else if state.director.stage <= max_stages {
        state.director.spawn_timer -= SPAWN_TIMER_STEP;
        if state.director.spawn_timer <= 0.0 {
            spawn_drifter(state);
            state.director.spawn_timer =
                SPAWN_INTERVAL_MIN as f32 + state.rng.random::<f32>() * SPAWN_INTERVAL_JITTER;
        }
    }
}
