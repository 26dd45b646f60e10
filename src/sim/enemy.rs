//! Entity behavior: player movement/fire, weak enemies, and the boss
//!
//! Bosses pick one of seven bullet patterns from `attack_type` and escalate
//! once ("enrage") when their HP first falls to half.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::input::Controls;
use super::state::{Bullet, Enemy, EnemyKind, EnemyShot, GameState, LaserBeam};
use crate::consts::*;
use crate::{bearing, heading};

/// Boss bullet patterns, selected by `BossState::attack_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    /// Medium-speed fan aimed at the player
    AimedFan,
    /// Evenly spaced burst that rotates between volleys
    Spiral,
    /// Slow concentric rings
    Rings,
    /// Narrow, fast fan aimed at the player
    FastFan,
    /// Rotating arc of closely stepped shots
    Swirl,
    /// Volley of shots that steer toward the player
    HomingVolley,
    /// Sustained aimed laser
    Laser,
    /// Wide aimed spread; used for any unknown selector
    DenseSpread,
}

impl AttackPattern {
    pub fn from_selector(selector: u8) -> Self {
        match selector {
            1 => Self::AimedFan,
            2 => Self::Spiral,
            3 => Self::Rings,
            4 => Self::FastFan,
            5 => Self::Swirl,
            6 => Self::HomingVolley,
            7 => Self::Laser,
            _ => Self::DenseSpread,
        }
    }
}

/// Move the player from held directions, decay timers, and handle primary fire
pub fn update_player(state: &mut GameState, controls: &Controls) {
    let player = &mut state.player;

    let speed = if controls.precision {
        PLAYER_SPEED / 2.0
    } else {
        PLAYER_SPEED
    };
    player.pos += controls.direction() * speed;
    let r = player.radius;
    player.pos.x = player.pos.x.clamp(r, ARENA_WIDTH - r);
    player.pos.y = player.pos.y.clamp(r, ARENA_HEIGHT - r);

    if player.invincible_ticks > 0 {
        player.invincible_ticks -= 1;
    }

    if controls.fire && player.shoot_cooldown <= 0 {
        state.bullets.push(Bullet {
            pos: player.pos - Vec2::new(0.0, r),
            vel: Vec2::new(0.0, -BULLET_SPEED),
        });
        player.shoot_cooldown = state.tuning.player_shoot_cooldown;
    }
    if player.shoot_cooldown > 0 {
        player.shoot_cooldown -= 1;
    }
}

/// Move every enemy, apply enrage checks, and fire whatever is off cooldown
pub fn update_enemies(state: &mut GameState) {
    let target = state.player.pos;
    let t = state.time_ticks as f32;
    let enemies = &mut state.enemies;
    let shots = &mut state.enemy_shots;
    let rng = &mut state.rng;
    let events = &mut state.events;

    for enemy in enemies.iter_mut() {
        if enemy.is_boss() {
            move_boss(enemy, t);
        } else {
            move_weak(enemy, t);
        }

        if let Some(attack_type) = check_enrage(enemy) {
            log::info!(
                "Boss {:?} enraged: attack type {}, shoot rate {}",
                enemy.id,
                attack_type,
                enemy.shoot_rate
            );
            events.push(GameEvent::BossEnraged {
                id: enemy.id,
                attack_type,
            });
        }

        enemy.shoot_cooldown -= 1;
        if enemy.shoot_cooldown <= 0 {
            if enemy.is_boss() {
                fire_pattern(enemy, target, rng, shots);
            } else {
                fire_aimed(enemy, target, shots);
            }
            enemy.shoot_cooldown = enemy.shoot_rate;
        }
    }

    // Weak enemies that fall off the bottom vanish without score or penalty
    enemies.retain(|e| e.is_boss() || e.pos.y <= ARENA_HEIGHT + e.size);
}

/// Horizontal sway shared by all enemies
#[inline]
fn sway(enemy: &Enemy, t: f32) -> f32 {
    (t / 30.0 + enemy.sway_phase).sin() * 0.6 + enemy.drift * 0.002
}

fn move_weak(enemy: &mut Enemy, t: f32) {
    enemy.pos.y += enemy.speed;
    enemy.pos.x += sway(enemy, t);
    enemy.angle += enemy.rotation_speed;
}

fn move_boss(enemy: &mut Enemy, t: f32) {
    let target_y = enemy.boss().map_or(80.0, |b| b.target_y);
    if enemy.pos.y < target_y {
        enemy.pos.y += (enemy.speed * 0.6).max(0.6);
    } else {
        // Hover
        enemy.pos.y += (t / 36.0 + enemy.sway_phase).sin() * 0.3;
    }
    enemy.pos.x += sway(enemy, t);
    enemy.angle += enemy.rotation_speed;
}

/// Enrage a boss the first time its HP is at or below half.
/// Returns the new attack type when the transition happens.
pub fn check_enrage(enemy: &mut Enemy) -> Option<u8> {
    let threshold = enemy.max_hp * ENRAGE_HP_FRACTION;
    let EnemyKind::Boss(boss) = &mut enemy.kind else {
        return None;
    };
    if boss.enraged || enemy.hp > threshold {
        return None;
    }

    boss.enraged = true;
    boss.attack_type = boss
        .attack_type
        .saturating_add(ENRAGE_ATTACK_STEP)
        .min(MAX_ATTACK_TYPE);
    boss.density_scale *= ENRAGE_DENSITY_MULT;
    enemy.shoot_rate = (enemy.shoot_rate - ENRAGE_RATE_STEP).max(MIN_BOSS_SHOOT_RATE);
    Some(boss.attack_type)
}

/// Single shot straight at the target
fn fire_aimed(enemy: &Enemy, target: Vec2, out: &mut Vec<EnemyShot>) {
    let angle = bearing(enemy.pos, target);
    out.push(EnemyShot::Straight {
        pos: enemy.pos,
        vel: heading(angle, ENEMY_BULLET_SPEED),
    });
}

/// Shots at `aim + k * step` for `k` in `-half..=half`
fn fan(out: &mut Vec<EnemyShot>, origin: Vec2, aim: f32, half: i32, step: f32, speed: f32) {
    for k in -half..=half {
        let angle = aim + k as f32 * step;
        out.push(EnemyShot::Straight {
            pos: origin,
            vel: heading(angle, speed),
        });
    }
}

/// Fire the boss's current pattern. Weak enemies fall back to a single aimed shot.
pub fn fire_pattern<R: Rng>(enemy: &mut Enemy, target: Vec2, rng: &mut R, out: &mut Vec<EnemyShot>) {
    let origin = enemy.pos;
    let EnemyKind::Boss(boss) = &mut enemy.kind else {
        fire_aimed(enemy, target, out);
        return;
    };

    let d = boss.density_scale.max(1.0);
    let dc = d.ceil() as usize;
    let aim = bearing(origin, target);

    match AttackPattern::from_selector(boss.attack_type) {
        AttackPattern::AimedFan => {
            fan(
                out,
                origin,
                aim,
                (2.0 * d).floor() as i32,
                0.18 / d.sqrt(),
                ENEMY_BULLET_SPEED + 0.5,
            );
        }
        AttackPattern::Spiral => {
            boss.spiral_angle += 0.3;
            let n = 6 * dc;
            for k in 0..n {
                let angle = boss.spiral_angle + k as f32 * std::f32::consts::TAU / n as f32;
                out.push(EnemyShot::Straight {
                    pos: origin,
                    vel: heading(angle, ENEMY_BULLET_SPEED),
                });
            }
        }
        AttackPattern::Rings => {
            let per_ring = 12 * dc;
            let speed = ENEMY_BULLET_SPEED * 0.6;
            // Rings are fired together and stack at higher density
            for _ in 0..dc {
                for k in 0..per_ring {
                    let angle = k as f32 * std::f32::consts::TAU / per_ring as f32;
                    out.push(EnemyShot::Straight {
                        pos: origin,
                        vel: heading(angle, speed),
                    });
                }
            }
        }
        AttackPattern::FastFan => {
            fan(
                out,
                origin,
                aim,
                d.floor() as i32,
                0.12 / d.sqrt(),
                ENEMY_BULLET_SPEED + 2.0,
            );
        }
        AttackPattern::Swirl => {
            boss.spiral_angle += 0.2;
            let n = 8 * dc;
            for k in 0..n {
                let angle = boss.spiral_angle + k as f32 * (0.8 / d.sqrt());
                out.push(EnemyShot::Straight {
                    pos: origin,
                    vel: heading(angle, ENEMY_BULLET_SPEED * 0.9),
                });
            }
        }
        AttackPattern::HomingVolley => {
            for _ in 0..4 * dc {
                let angle = aim + (rng.random::<f32>() - 0.5) * 0.6;
                let speed = ENEMY_BULLET_SPEED * (0.9 + rng.random::<f32>() * 0.8);
                out.push(EnemyShot::Homing {
                    pos: origin,
                    vel: heading(angle, speed),
                    speed,
                    life: HOMING_LIFE,
                });
            }
        }
        AttackPattern::Laser => {
            let width = 6.0 * d.round().max(1.0);
            let life = 40 + (10.0 * (d - 1.0)).floor() as u32;
            out.push(EnemyShot::Laser(LaserBeam {
                origin,
                angle: aim,
                width,
                length: ARENA_HEIGHT * 1.2,
                life,
            }));
        }
        AttackPattern::DenseSpread => {
            fan(
                out,
                origin,
                aim,
                (3.0 * d).floor() as i32,
                0.14 / d.sqrt(),
                ENEMY_BULLET_SPEED + 0.5,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BossState, EnemyId};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn boss_at(pos: Vec2, attack_type: u8, density_scale: f32) -> Enemy {
        Enemy {
            id: EnemyId(99),
            pos,
            size: 50.0,
            hp: 100.0,
            max_hp: 100.0,
            speed: 1.0,
            angle: 0.0,
            rotation_speed: 0.01,
            shoot_cooldown: 0,
            shoot_rate: 32,
            sway_phase: 0.0,
            drift: 0.0,
            kind: EnemyKind::Boss(BossState {
                attack_type,
                density_scale,
                enraged: false,
                target_y: 80.0,
                spiral_angle: 0.0,
            }),
        }
    }

    fn shots_for(attack_type: u8, density: f32) -> Vec<EnemyShot> {
        let mut boss = boss_at(Vec2::new(240.0, 80.0), attack_type, density);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = Vec::new();
        fire_pattern(&mut boss, Vec2::new(240.0, 585.0), &mut rng, &mut out);
        out
    }

    fn quiet_state() -> GameState {
        let mut state = GameState::new(11);
        state.enemies.clear();
        state
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = quiet_state();
        let start = state.player.pos;
        let right = Controls {
            right: true,
            ..Default::default()
        };
        update_player(&mut state, &right);
        assert_eq!(state.player.pos.x, start.x + PLAYER_SPEED);

        let slow_up = Controls {
            up: true,
            precision: true,
            ..Default::default()
        };
        update_player(&mut state, &slow_up);
        assert_eq!(state.player.pos.y, start.y - PLAYER_SPEED / 2.0);

        for _ in 0..500 {
            update_player(&mut state, &right);
        }
        assert_eq!(state.player.pos.x, ARENA_WIDTH - state.player.radius);
    }

    #[test]
    fn test_primary_fire_respects_cooldown() {
        let mut state = quiet_state();
        let fire = Controls {
            fire: true,
            ..Default::default()
        };
        for _ in 0..8 {
            update_player(&mut state, &fire);
        }
        assert_eq!(state.bullets.len(), 1);
        update_player(&mut state, &fire);
        assert_eq!(state.bullets.len(), 2);
        assert!(state.bullets.iter().all(|b| b.vel == Vec2::new(0.0, -BULLET_SPEED)));
    }

    #[test]
    fn test_invincibility_decays_each_update() {
        let mut state = quiet_state();
        state.player.invincible_ticks = 2;
        update_player(&mut state, &Controls::default());
        assert!(state.player.is_invincible());
        update_player(&mut state, &Controls::default());
        assert!(!state.player.is_invincible());
    }

    #[test]
    fn test_weak_enemy_fires_aimed_shot() {
        let mut state = quiet_state();
        crate::sim::stage::spawn_weak(&mut state, Vec2::new(240.0, 100.0), 1);
        state.enemies[0].shoot_cooldown = 1;
        state.enemies[0].shoot_rate = 40;
        update_enemies(&mut state);

        assert_eq!(state.enemy_shots.len(), 1);
        assert_eq!(state.enemies[0].shoot_cooldown, 40);
        let EnemyShot::Straight { vel, .. } = &state.enemy_shots[0] else {
            panic!("expected a straight shot");
        };
        // Player is straight below
        assert!(vel.y > 3.9);
        assert!((vel.length() - ENEMY_BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_weak_enemy_despawns_below_screen() {
        let mut state = quiet_state();
        crate::sim::stage::spawn_weak(&mut state, Vec2::new(240.0, ARENA_HEIGHT + 40.0), 1);
        let score = state.ledger.score;
        update_enemies(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.ledger.score, score);
    }

    #[test]
    fn test_boss_descends_then_hovers_and_never_despawns() {
        let mut state = quiet_state();
        let mut boss = boss_at(Vec2::new(240.0, -25.0), 1, 1.0);
        boss.shoot_cooldown = i32::MAX;
        state.enemies.push(boss);

        update_enemies(&mut state);
        assert!((state.enemies[0].pos.y - (-25.0 + 0.6)).abs() < 1e-4);

        for _ in 0..400 {
            update_enemies(&mut state);
        }
        let y = state.enemies[0].pos.y;
        assert!((80.0..82.0).contains(&y), "boss should hover near target, got {y}");

        state.enemies[0].pos.y = ARENA_HEIGHT * 3.0;
        update_enemies(&mut state);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_enrage_happens_once_at_half_hp() {
        let mut boss = boss_at(Vec2::ZERO, 3, 1.0);
        boss.hp = 51.0;
        assert_eq!(check_enrage(&mut boss), None);

        boss.hp = 50.0;
        assert_eq!(check_enrage(&mut boss), Some(5));
        let state = boss.boss().unwrap();
        assert!(state.enraged);
        assert!((state.density_scale - ENRAGE_DENSITY_MULT).abs() < 1e-6);
        assert_eq!(boss.shoot_rate, 24);

        boss.hp = 10.0;
        assert_eq!(check_enrage(&mut boss), None);
        assert_eq!(boss.boss().unwrap().attack_type, 5);
    }

    #[test]
    fn test_enrage_caps_attack_type_and_rate() {
        let mut boss = boss_at(Vec2::ZERO, 6, 1.0);
        boss.shoot_rate = 12;
        boss.hp = 1.0;
        assert_eq!(check_enrage(&mut boss), Some(MAX_ATTACK_TYPE));
        assert_eq!(boss.shoot_rate, MIN_BOSS_SHOOT_RATE);
    }

    #[test]
    fn test_weak_enemies_never_enrage() {
        let mut state = quiet_state();
        crate::sim::stage::spawn_weak(&mut state, Vec2::new(100.0, 100.0), 3);
        let mut weak = state.enemies.remove(0);
        weak.hp = 0.5;
        assert_eq!(check_enrage(&mut weak), None);
    }

    #[test]
    fn test_pattern_shot_counts_at_base_density() {
        assert_eq!(shots_for(1, 1.0).len(), 5);
        assert_eq!(shots_for(2, 1.0).len(), 6);
        assert_eq!(shots_for(3, 1.0).len(), 12);
        assert_eq!(shots_for(4, 1.0).len(), 3);
        assert_eq!(shots_for(5, 1.0).len(), 8);
        assert_eq!(shots_for(6, 1.0).len(), 4);
        assert_eq!(shots_for(7, 1.0).len(), 1);
    }

    #[test]
    fn test_density_scales_volume() {
        // floor(2 * 1.6) = 3 -> 7 shots
        assert_eq!(shots_for(1, 1.6).len(), 7);
        // ceil(1.6) = 2 rings of 24
        assert_eq!(shots_for(3, 1.6).len(), 48);
        assert_eq!(shots_for(6, 2.2).len(), 12);
    }

    #[test]
    fn test_rings_share_one_slow_speed() {
        let shots = shots_for(3, 2.2);
        assert_eq!(shots.len(), 3 * 36);
        for shot in &shots {
            let EnemyShot::Straight { vel, .. } = shot else {
                panic!("expected straight shots");
            };
            assert!((vel.length() - ENEMY_BULLET_SPEED * 0.6).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unknown_selector_falls_back_to_dense_spread() {
        assert_eq!(AttackPattern::from_selector(0), AttackPattern::DenseSpread);
        assert_eq!(AttackPattern::from_selector(42), AttackPattern::DenseSpread);
        assert_eq!(shots_for(0, 1.0).len(), 7);
    }

    #[test]
    fn test_homing_volley_spawns_homing_shots() {
        let shots = shots_for(6, 1.0);
        assert!(shots.iter().all(|s| matches!(
            s,
            EnemyShot::Homing { life, speed, .. } if *life == HOMING_LIFE && *speed >= ENEMY_BULLET_SPEED * 0.9
        )));
    }

    #[test]
    fn test_laser_scales_with_density() {
        let shots = shots_for(7, 2.0);
        let EnemyShot::Laser(beam) = &shots[0] else {
            panic!("expected a laser");
        };
        assert_eq!(beam.width, 12.0);
        assert_eq!(beam.life, 50);
        // Aimed straight down at the player
        assert!((beam.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_spiral_rotates_between_volleys() {
        let mut boss = boss_at(Vec2::new(240.0, 80.0), 2, 1.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut out = Vec::new();
        fire_pattern(&mut boss, Vec2::ZERO, &mut rng, &mut out);
        fire_pattern(&mut boss, Vec2::ZERO, &mut rng, &mut out);
        assert!((boss.boss().unwrap().spiral_angle - 0.6).abs() < 1e-5);
    }
}
