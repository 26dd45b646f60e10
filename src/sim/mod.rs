//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per displayed frame
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod events;
pub mod input;
pub mod ledger;
pub mod projectile;
pub mod snapshot;
pub mod stage;
pub mod state;
pub mod tick;

pub use enemy::AttackPattern;
pub use events::GameEvent;
pub use input::{Controls, NovaLatch};
pub use ledger::{Ledger, Regen};
pub use snapshot::{BeamView, EnemyView, PlayerView, ShotView, Snapshot};
pub use stage::{StageDirector, StagePhase};
pub use state::{
    BossState, Bullet, Enemy, EnemyId, EnemyKind, EnemyShot, GamePhase, GameState, LaserBeam,
    NovaBeam, Player,
};
pub use tick::{autopilot, tick};
