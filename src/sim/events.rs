//! Per-tick events for the presentation layer
//!
//! The simulation never reads these back; they exist so a renderer or
//! sound layer can react (flashes, jingles) without diffing snapshots.

use serde::Serialize;

use super::state::EnemyId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    /// A new stage's wave was spawned
    StageStarted { stage: u32 },
    EnemyKilled { id: EnemyId, score: u64 },
    PlayerDamaged { hearts_left: u8 },
    HeartRestored,
    StarRestored,
    NovaFired { stars_left: u8 },
    BossSpawned { id: EnemyId, stage: u32 },
    /// Boss crossed half HP and switched to a stronger pattern
    BossEnraged { id: EnemyId, attack_type: u8 },
    BossDefeated { id: EnemyId, stage: u32 },
    GameOver,
    RunCleared,
}
