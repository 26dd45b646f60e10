//! Logical input commands for a single tick
//!
//! Device plumbing happens outside the crate; it only has to produce the
//! held state of each command once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Held state of every logical command this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Halves movement speed for fine dodging
    pub precision: bool,
    /// Primary fire (auto-repeats while held)
    pub fire: bool,
    /// Nova cast (fires only on press, see [`NovaLatch`])
    pub nova: bool,
}

impl Controls {
    /// Build from the names of currently pressed keys (browser `KeyboardEvent.key`
    /// values, any case): arrows move, space is precision, `f` fires, `j` casts nova.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut controls = Self::default();
        for key in keys {
            match key.as_ref().to_lowercase().as_str() {
                "arrowleft" => controls.left = true,
                "arrowright" => controls.right = true,
                "arrowup" => controls.up = true,
                "arrowdown" => controls.down = true,
                " " | "space" => controls.precision = true,
                "f" => controls.fire = true,
                "j" => controls.nova = true,
                _ => {}
            }
        }
        controls
    }

    /// Per-axis movement direction; diagonals are not normalized
    pub fn direction(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Rising-edge detector for the nova command
#[derive(Debug, Clone, Copy, Default)]
pub struct NovaLatch {
    was_held: bool,
}

impl NovaLatch {
    /// True only on the frame the command goes from released to held
    pub fn rising(&mut self, held: bool) -> bool {
        let fired = held && !self.was_held;
        self.was_held = held;
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let c = Controls::from_keys(["ArrowLeft", "ArrowUp", " ", "F", "j", "x"]);
        assert!(c.left && c.up && c.precision && c.fire && c.nova);
        assert!(!c.right && !c.down);
    }

    #[test]
    fn test_direction_cancels_opposites() {
        let c = Controls::from_keys(["arrowleft", "arrowright", "arrowdown"]);
        assert_eq!(c.direction(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_nova_latch_fires_once_per_press() {
        let mut latch = NovaLatch::default();
        assert!(latch.rising(true));
        assert!(!latch.rising(true));
        assert!(!latch.rising(true));
        assert!(!latch.rising(false));
        assert!(latch.rising(true));
    }
}
