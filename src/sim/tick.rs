//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision;
use super::enemy::{update_enemies, update_player};
use super::input::Controls;
use super::projectile::{cast_nova, update_bullets, update_enemy_shots, update_novas};
use super::stage;
use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, controls: &Controls) {
    // Frozen once the run is over or cleared
    if state.phase != GamePhase::Playing {
        return;
    }

    state.events.clear();
    state.time_ticks += 1;

    update_player(state, controls);
    if state.nova_latch.rising(controls.nova) {
        cast_nova(state);
    }

    update_bullets(&mut state.bullets);
    let target = state.player.pos;
    update_enemy_shots(&mut state.enemy_shots, target);
    update_novas(&mut state.novas);
    update_enemies(state);

    collision::resolve(state);
    if state.is_game_over() {
        return;
    }

    stage::update(state);
    state.normalize_order();
}

/// Demo-mode pilot: keeps firing, shadows the most threatening enemy, and
/// sidesteps shots closing in from above
pub fn autopilot(state: &GameState) -> Controls {
    let player = state.player.pos;
    let mut controls = Controls {
        fire: true,
        ..Default::default()
    };

    // Nearest incoming shot in a column above the player
    let threat = state
        .enemy_shots
        .iter()
        .filter_map(|s| s.point())
        .filter(|p| p.y < player.y + 10.0 && p.y > player.y - 120.0 && (p.x - player.x).abs() < 24.0)
        .min_by(|a, b| {
            a.distance_squared(player)
                .partial_cmp(&b.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(shot) = threat {
        // Step away from the shot, toward the open side near a wall
        let go_right = if player.x < 40.0 {
            true
        } else if player.x > ARENA_WIDTH - 40.0 {
            false
        } else {
            shot.x <= player.x
        };
        controls.right = go_right;
        controls.left = !go_right;
        return controls;
    }

    // Boss first, otherwise the lowest enemy on screen
    let target = state.boss().or_else(|| {
        state
            .enemies
            .iter()
            .filter(|e| e.pos.y > 0.0)
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
    });

    if let Some(enemy) = target {
        let dx = enemy.pos.x - player.x;
        if dx.abs() > PLAYER_SPEED {
            controls.right = dx > 0.0;
            controls.left = dx < 0.0;
        } else {
            controls.precision = true;
        }
    }

    // Spend a star when the screen gets crowded
    let crowded = state.enemy_shots.len() > 40 || (state.boss_alive() && state.enemy_shots.len() > 25);
    controls.nova = crowded && state.ledger.stars > 0;

    controls
}
