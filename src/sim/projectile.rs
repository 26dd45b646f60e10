//! Projectile motion
//!
//! Point bullets move by their velocity, homing shots steer a bounded amount
//! toward the player, and beams (boss lasers, player novas) stay anchored
//! and only count down their lifetime.

use glam::Vec2;

use super::events::GameEvent;
use super::state::{Bullet, EnemyShot, GameState, NovaBeam};
use crate::consts::*;
use crate::{bearing, heading, normalize_angle};

/// Advance player bullets and drop those past the top edge
pub fn update_bullets(bullets: &mut Vec<Bullet>) {
    for bullet in bullets.iter_mut() {
        bullet.pos += bullet.vel;
    }
    bullets.retain(|b| b.pos.y >= -BULLET_SIZE);
}

/// Advance every enemy shot one frame toward/around `target` (the player)
pub fn update_enemy_shots(shots: &mut Vec<EnemyShot>, target: Vec2) {
    shots.retain_mut(|shot| advance_shot(shot, target));
}

/// Count down nova beams and drop expired ones
pub fn update_novas(novas: &mut Vec<NovaBeam>) {
    for nova in novas.iter_mut() {
        nova.life = nova.life.saturating_sub(1);
    }
    novas.retain(|n| n.life > 0);
}

/// Move one shot; returns false once it should be removed
fn advance_shot(shot: &mut EnemyShot, target: Vec2) -> bool {
    match shot {
        EnemyShot::Straight { pos, vel } => {
            *pos += *vel;
            in_play_bounds(*pos)
        }
        EnemyShot::Homing {
            pos,
            vel,
            speed,
            life,
        } => {
            *life = life.saturating_sub(1);
            if *life == 0 {
                return false;
            }
            *vel = steer(*pos, *vel, target, *speed);
            *pos += *vel;
            in_play_bounds(*pos)
        }
        EnemyShot::Laser(beam) => {
            beam.life = beam.life.saturating_sub(1);
            beam.life > 0
        }
    }
}

/// Blend the current heading toward `target` by [`HOMING_TURN_RATE`],
/// keeping the speed magnitude fixed
pub fn steer(pos: Vec2, vel: Vec2, target: Vec2, speed: f32) -> Vec2 {
    let desired = bearing(pos, target);
    let current = vel.y.atan2(vel.x);
    let turned = current + normalize_angle(desired - current) * HOMING_TURN_RATE;
    heading(turned, speed)
}

/// Play area padded by [`BOUNDS_PADDING`]
#[inline]
fn in_play_bounds(p: Vec2) -> bool {
    p.x >= -BOUNDS_PADDING
        && p.x <= ARENA_WIDTH + BOUNDS_PADDING
        && p.y >= -BOUNDS_PADDING
        && p.y <= ARENA_HEIGHT + BOUNDS_PADDING
}

/// Radial fan of nova beams centered straight up from `origin`
pub fn nova_fan(origin: Vec2) -> Vec<NovaBeam> {
    let length = ARENA_WIDTH.max(ARENA_HEIGHT) * 1.2;
    let base = -std::f32::consts::FRAC_PI_2;
    (0..NOVA_BEAM_COUNT)
        .map(|i| {
            let t = if NOVA_BEAM_COUNT == 1 {
                0.5
            } else {
                i as f32 / (NOVA_BEAM_COUNT - 1) as f32
            };
            let angle = base - NOVA_SPREAD / 2.0 + t * NOVA_SPREAD;
            NovaBeam::new(origin, angle, length)
        })
        .collect()
}

/// Spend a star and release a nova fan from the player. Returns false when
/// no star is available.
pub fn cast_nova(state: &mut GameState) -> bool {
    if !state.ledger.spend_star() {
        log::debug!("Nova requested with no stars left");
        return false;
    }
    state.novas.extend(nova_fan(state.player.pos));
    state.events.push(GameEvent::NovaFired {
        stars_left: state.ledger.stars,
    });
    log::debug!("Nova cast, {} stars left", state.ledger.stars);
    true
}
