//! Read-only per-frame view of the simulation for renderers and tooling

use glam::Vec2;
use serde::Serialize;

use super::events::GameEvent;
use super::stage::StagePhase;
use super::state::{EnemyId, EnemyShot, GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub invincible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub pos: Vec2,
    pub size: f32,
    pub angle: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub boss: bool,
    /// Boss attack selector (`None` for weak enemies)
    pub attack_type: Option<u8>,
    pub enraged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotView {
    pub pos: Vec2,
    pub homing: bool,
}

/// Segment geometry shared by boss lasers and nova beams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeamView {
    pub origin: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub life: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub stage: u32,
    pub stage_phase: StagePhase,
    pub score: u64,
    pub hearts: u8,
    pub max_hearts: u8,
    pub stars: u8,
    pub max_stars: u8,
    pub kill_count: u32,
    pub weak_kills_this_stage: u32,
    pub boss_alive: bool,
    pub game_over: bool,
    pub cleared: bool,
    pub player: PlayerView,
    pub bullets: Vec<Vec2>,
    pub enemies: Vec<EnemyView>,
    pub enemy_shots: Vec<ShotView>,
    pub lasers: Vec<BeamView>,
    pub novas: Vec<BeamView>,
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let mut enemy_shots = Vec::new();
        let mut lasers = Vec::new();
        for shot in &self.enemy_shots {
            match shot {
                EnemyShot::Straight { pos, .. } => enemy_shots.push(ShotView {
                    pos: *pos,
                    homing: false,
                }),
                EnemyShot::Homing { pos, .. } => enemy_shots.push(ShotView {
                    pos: *pos,
                    homing: true,
                }),
                EnemyShot::Laser(beam) => lasers.push(BeamView {
                    origin: beam.origin,
                    end: beam.end(),
                    width: beam.width,
                    life: beam.life,
                }),
            }
        }

        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            stage: self.director.stage,
            stage_phase: self.director.phase,
            score: self.ledger.score,
            hearts: self.ledger.hearts,
            max_hearts: self.ledger.max_hearts(),
            stars: self.ledger.stars,
            max_stars: self.ledger.max_stars(),
            kill_count: self.ledger.kill_count,
            weak_kills_this_stage: self.ledger.weak_kills_this_stage,
            boss_alive: self.boss_alive(),
            game_over: self.is_game_over(),
            cleared: self.is_cleared(),
            player: PlayerView {
                pos: self.player.pos,
                radius: self.player.radius,
                invincible: self.player.is_invincible(),
            },
            bullets: self.bullets.iter().map(|b| b.pos).collect(),
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    size: e.size,
                    angle: e.angle,
                    hp: e.hp,
                    max_hp: e.max_hp,
                    boss: e.is_boss(),
                    attack_type: e.boss().map(|b| b.attack_type),
                    enraged: e.boss().is_some_and(|b| b.enraged),
                })
                .collect(),
            enemy_shots,
            lasers,
            novas: self
                .novas
                .iter()
                .map(|n| BeamView {
                    origin: n.origin,
                    end: n.end(),
                    width: n.width,
                    life: n.life,
                })
                .collect(),
            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::stage::spawn_boss;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(4);
        spawn_boss(&mut state, 2);
        let snap = state.snapshot();

        assert_eq!(snap.stage, 1);
        assert!(snap.boss_alive);
        assert!(!snap.game_over);
        assert_eq!(snap.enemies.len(), 6);
        let boss = snap.enemies.iter().find(|e| e.boss).unwrap();
        assert_eq!(boss.attack_type, Some(2));
        assert!(!boss.enraged);
        assert!(snap.enemies.iter().filter(|e| !e.boss).all(|e| e.attack_type.is_none()));
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(8);
        let json = state.snapshot().to_json().unwrap();
        assert!(json.contains("\"hearts\": 3"));
        assert!(json.contains("\"phase\": \"Playing\""));
    }
}
