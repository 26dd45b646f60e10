//! Error types
//!
//! The simulation itself never fails: it clamps at every mutation. Errors
//! only come from loading configuration and from the rule checker used in
//! tests and debug runs.

use std::fmt;

/// Failure to load or validate a [`crate::Tuning`]
#[derive(Debug)]
pub enum TuningError {
    /// Reading the tuning file failed
    Io(std::io::Error),
    /// The file is not valid tuning JSON
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read tuning file: {e}"),
            Self::Parse(e) => write!(f, "failed to parse tuning JSON: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Identifies a state invariant checked by [`crate::sim::GameState::check_rules`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    HeartsRange,
    StarsRange,
    StageRange,
    PlayerBounds,
    EnemyHpRange,
    EnemyIdOrder,
    BossFlagConsistency,
    GameOverConsistency,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeartsRange => write!(f, "HEARTS_RANGE"),
            Self::StarsRange => write!(f, "STARS_RANGE"),
            Self::StageRange => write!(f, "STAGE_RANGE"),
            Self::PlayerBounds => write!(f, "PLAYER_BOUNDS"),
            Self::EnemyHpRange => write!(f, "ENEMY_HP_RANGE"),
            Self::EnemyIdOrder => write!(f, "ENEMY_ID_ORDER"),
            Self::BossFlagConsistency => write!(f, "BOSS_FLAG_CONSISTENCY"),
            Self::GameOverConsistency => write!(f, "GAME_OVER_CONSISTENCY"),
        }
    }
}

/// A broken invariant observed at a given tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleViolation {
    pub tick: u64,
    pub rule: RuleCode,
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule violation at tick {}: {}", self.tick, self.rule)
    }
}

impl std::error::Error for RuleViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        let err = TuningError::Invalid {
            field: "max_hearts",
            reason: "must be at least 1",
        };
        assert_eq!(err.to_string(), "invalid tuning `max_hearts`: must be at least 1");

        let v = RuleViolation {
            tick: 42,
            rule: RuleCode::HeartsRange,
        };
        assert_eq!(v.to_string(), "rule violation at tick 42: HEARTS_RANGE");
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TuningError = parse.into();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
