//! Game balance tuning
//!
//! Defaults mirror [`crate::consts`]. A tuning file may override any subset
//! of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Balance knobs read by the simulation at run start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run structure ===
    /// Number of stages before the run is cleared
    pub max_stages: u32,
    /// Weak kills within a stage that summon the boss
    pub boss_trigger_kills: u32,

    // === Resources ===
    pub start_hearts: u8,
    pub max_hearts: u8,
    pub start_stars: u8,
    pub max_stars: u8,
    /// Every Nth cumulative kill restores one heart
    pub heart_regen_kills: u32,
    /// Every Nth cumulative kill restores one star
    pub star_regen_kills: u32,

    // === Player ===
    /// Frames of invulnerability after a hit
    pub invincible_ticks: u32,
    /// Frames between primary shots
    pub player_shoot_cooldown: i32,

    // === Nova beams ===
    /// Damage per second a nova beam deals to a boss
    pub beam_dps: f32,

    // === Scoring ===
    pub weak_kill_score: u64,
    pub boss_kill_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_stages: MAX_STAGES,
            boss_trigger_kills: BOSS_TRIGGER_KILLS,

            start_hearts: START_HEARTS,
            max_hearts: MAX_HEARTS,
            start_stars: START_STARS,
            max_stars: MAX_STARS,
            heart_regen_kills: HEART_REGEN_KILLS,
            star_regen_kills: STAR_REGEN_KILLS,

            invincible_ticks: INVINCIBLE_TICKS,
            player_shoot_cooldown: PLAYER_SHOOT_COOLDOWN,

            beam_dps: BEAM_DPS,

            weak_kill_score: WEAK_KILL_SCORE,
            boss_kill_score: BOSS_KILL_SCORE,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a template file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.max_stages == 0 {
            return invalid("max_stages", "must be at least 1");
        }
        if self.boss_trigger_kills == 0 {
            return invalid("boss_trigger_kills", "must be at least 1");
        }
        if self.max_hearts == 0 {
            return invalid("max_hearts", "must be at least 1");
        }
        if self.start_hearts == 0 || self.start_hearts > self.max_hearts {
            return invalid("start_hearts", "must be within 1..=max_hearts");
        }
        if self.start_stars > self.max_stars {
            return invalid("start_stars", "must not exceed max_stars");
        }
        if self.heart_regen_kills == 0 {
            return invalid("heart_regen_kills", "must be at least 1");
        }
        if self.star_regen_kills == 0 {
            return invalid("star_regen_kills", "must be at least 1");
        }
        if self.player_shoot_cooldown < 1 {
            return invalid("player_shoot_cooldown", "must be at least 1");
        }
        if !self.beam_dps.is_finite() || self.beam_dps < 0.0 {
            return invalid("beam_dps", "must be a finite non-negative number");
        }
        Ok(())
    }
}
