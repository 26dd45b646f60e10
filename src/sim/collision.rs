//! Collision detection and damage resolution
//!
//! Runs once per tick after everything has moved, in a fixed order:
//! player/enemy contact, player bullets, enemy shots, then nova beams.
//! A pass that empties the player's hearts stops the resolver on the spot.

use glam::Vec2;

use super::events::GameEvent;
use super::ledger::Regen;
use super::stage;
use super::state::{Bullet, Enemy, EnemyId, EnemyShot, GamePhase, GameState, LaserBeam, NovaBeam};
use crate::consts::*;

/// Strict circle overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Shortest distance from `p` to the segment `a..b`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Laser hit test in the beam's local frame: `p` must lie strictly ahead of
/// the origin, short of the far end, and within `width` of the center line
pub fn laser_hits(beam: &LaserBeam, p: Vec2) -> bool {
    let axis = crate::heading(beam.angle, 1.0);
    let d = p - beam.origin;
    let along = d.dot(axis);
    let across = d.perp_dot(axis);
    along > 0.0 && along < beam.length && across.abs() < beam.width
}

/// Whether a circle of radius `r` at `p` is touched by a nova beam
#[inline]
pub fn beam_touches(beam: &NovaBeam, p: Vec2, r: f32) -> bool {
    point_segment_distance(p, beam.origin, beam.end()) < beam.width + r
}

/// Run every collision step for this tick
pub fn resolve(state: &mut GameState) {
    resolve_player_contacts(state);
    if state.is_game_over() {
        return;
    }
    resolve_player_bullets(state);
    resolve_enemy_shots(state);
    if state.is_game_over() {
        return;
    }
    resolve_nova_beams(state);
}

/// Body contact with enemies. Costs a heart unless invincible; weak enemies
/// also take a point of damage, bosses do not.
pub fn resolve_player_contacts(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemies.len() {
        if state.player.is_invincible() {
            return;
        }
        let enemy = &state.enemies[i];
        if !circles_overlap(state.player.pos, state.player.radius, enemy.pos, enemy.radius()) {
            i += 1;
            continue;
        }

        if hurt_player(state) {
            return;
        }
        let enemy = &mut state.enemies[i];
        if !enemy.is_boss() {
            enemy.hp -= 1.0;
            if enemy.hp <= 0.0 {
                credit_weak_kill(state, i);
                continue;
            }
        }
        i += 1;
    }
}

/// Player bullets against enemies. Each enemy present at the start of the
/// pass absorbs at most one bullet; enemies spawned mid-pass (a new stage's
/// wave after a boss kill) are not visited.
pub fn resolve_player_bullets(state: &mut GameState) {
    let targets: Vec<EnemyId> = state.enemies.iter().map(|e| e.id).collect();

    for id in targets {
        let Some(idx) = state.enemies.iter().position(|e| e.id == id) else {
            continue;
        };
        let (pos, r) = (state.enemies[idx].pos, state.enemies[idx].radius());
        let Some(hit) = state
            .bullets
            .iter()
            .position(|b| circles_overlap(b.pos, Bullet::RADIUS, pos, r))
        else {
            continue;
        };
        state.bullets.remove(hit);

        let enemy = &mut state.enemies[idx];
        enemy.hp -= 1.0;
        if enemy.hp > 0.0 {
            continue;
        }
        if enemy.is_boss() {
            defeat_boss(state, idx);
        } else {
            credit_weak_kill(state, idx);
        }
    }
}

/// Enemy bullets and lasers against the player. Damage only lands while the
/// player is not invincible; a point bullet is consumed only when it lands,
/// lasers are never consumed.
pub fn resolve_enemy_shots(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemy_shots.len() {
        if state.player.is_invincible() {
            return;
        }
        let player = &state.player;
        let shot = &state.enemy_shots[i];
        let hit = match shot {
            EnemyShot::Laser(beam) => laser_hits(beam, player.pos),
            _ => shot
                .point()
                .is_some_and(|p| circles_overlap(p, EnemyShot::RADIUS, player.pos, player.radius)),
        };
        if !hit {
            i += 1;
            continue;
        }

        let consumed = !shot.is_laser();
        if hurt_player(state) {
            return;
        }
        if consumed {
            state.enemy_shots.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Nova beams: erase enemy shots (lasers by their origin), destroy weak
/// enemies outright, and chip bosses under a per-beam cap
pub fn resolve_nova_beams(state: &mut GameState) {
    if state.novas.is_empty() {
        return;
    }

    // Lasers are cancelled at their muzzle
    let novas = &state.novas;
    state.enemy_shots.retain(|shot| {
        let anchor = match shot {
            EnemyShot::Laser(beam) => beam.origin,
            EnemyShot::Straight { pos, .. } | EnemyShot::Homing { pos, .. } => *pos,
        };
        !novas.iter().any(|n| beam_touches(n, anchor, EnemyShot::RADIUS))
    });

    let doomed: Vec<EnemyId> = state
        .enemies
        .iter()
        .filter(|e| !e.is_boss() && novas.iter().any(|n| beam_touches(n, e.pos, e.radius())))
        .map(|e| e.id)
        .collect();
    for id in doomed {
        if let Some(idx) = state.enemies.iter().position(|e| e.id == id) {
            credit_weak_kill(state, idx);
        }
    }

    let per_frame = state.tuning.beam_dps / TICK_RATE;
    for boss in state.enemies.iter_mut().filter(|e| e.is_boss()) {
        for beam in state.novas.iter_mut() {
            if beam_touches(beam, boss.pos, boss.radius()) {
                apply_beam_damage(beam, boss, per_frame);
            }
        }
    }
}

/// Deal up to `amount` beam damage to a boss, respecting the beam's lifetime
/// cap of a quarter of the boss's max HP. Boss HP never drops below 1 here.
/// Returns the damage actually applied.
pub fn apply_beam_damage(beam: &mut NovaBeam, boss: &mut Enemy, amount: f32) -> f32 {
    let cap = (boss.max_hp * BEAM_BOSS_CAP_FRACTION).floor();
    let dealt = beam.damage_dealt.entry(boss.id).or_insert(0.0);
    let allowed = amount.min(cap - *dealt).max(0.0);
    if allowed <= 0.0 {
        return 0.0;
    }
    *dealt += allowed;
    let before = boss.hp;
    boss.hp = (boss.hp - allowed).max(1.0);
    before - boss.hp
}

/// Apply one hit to the player. Returns true if that was the last heart.
fn hurt_player(state: &mut GameState) -> bool {
    state.player.invincible_ticks = state.tuning.invincible_ticks;
    let dead = state.ledger.damage_player();
    state.events.push(GameEvent::PlayerDamaged {
        hearts_left: state.ledger.hearts,
    });

    if dead {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over: stage {}, score {}, kills {}",
            state.director.stage,
            state.ledger.score,
            state.ledger.kill_count
        );
    }
    dead
}

fn push_regen(events: &mut Vec<GameEvent>, regen: Regen) {
    if regen.heart {
        events.push(GameEvent::HeartRestored);
    }
    if regen.star {
        events.push(GameEvent::StarRestored);
    }
}

/// Remove a weak enemy and credit the kill
fn credit_weak_kill(state: &mut GameState, idx: usize) {
    let enemy = state.enemies.remove(idx);
    let points = state.tuning.weak_kill_score;
    let regen = state.ledger.award_weak_kill(points);
    state.events.push(GameEvent::EnemyKilled {
        id: enemy.id,
        score: points,
    });
    push_regen(&mut state.events, regen);
}

/// Remove the boss, credit it, and move the run to the next stage
fn defeat_boss(state: &mut GameState, idx: usize) {
    let boss = state.enemies.remove(idx);
    let points = state.tuning.boss_kill_score;
    let regen = state.ledger.award_boss_kill(points);
    state.events.push(GameEvent::EnemyKilled {
        id: boss.id,
        score: points,
    });
    push_regen(&mut state.events, regen);
    state.events.push(GameEvent::BossDefeated {
        id: boss.id,
        stage: state.director.stage,
    });
    log::info!(
        "Boss {:?} defeated on stage {} (score {})",
        boss.id,
        state.director.stage,
        state.ledger.score
    );

    stage::on_boss_defeated(state);
}
