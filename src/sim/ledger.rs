//! Score and resource bookkeeping
//!
//! No update step of its own: the collision resolver and stage director
//! call into it. Every mutation clamps in place, so hearts and stars can
//! never leave their ranges and score/kills never go down.

use crate::tuning::Tuning;

/// Resources restored by a kill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regen {
    pub heart: bool,
    pub star: bool,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    pub score: u64,
    pub hearts: u8,
    /// Nova charges
    pub stars: u8,
    /// All kills this run (drives regeneration)
    pub kill_count: u32,
    /// Weak kills since the stage started or the boss appeared
    pub weak_kills_this_stage: u32,
    max_hearts: u8,
    max_stars: u8,
    heart_regen_kills: u32,
    star_regen_kills: u32,
}

impl Ledger {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            hearts: tuning.start_hearts.min(tuning.max_hearts),
            stars: tuning.start_stars.min(tuning.max_stars),
            kill_count: 0,
            weak_kills_this_stage: 0,
            max_hearts: tuning.max_hearts,
            max_stars: tuning.max_stars,
            heart_regen_kills: tuning.heart_regen_kills.max(1),
            star_regen_kills: tuning.star_regen_kills.max(1),
        }
    }

    pub fn max_hearts(&self) -> u8 {
        self.max_hearts
    }

    pub fn max_stars(&self) -> u8 {
        self.max_stars
    }

    /// Remove one heart. Returns true when none are left.
    pub fn damage_player(&mut self) -> bool {
        self.hearts = self.hearts.saturating_sub(1);
        self.hearts == 0
    }

    /// Spend a star on a nova cast. Returns false when there is none.
    pub fn spend_star(&mut self) -> bool {
        if self.stars == 0 {
            return false;
        }
        self.stars -= 1;
        true
    }

    /// Credit a weak enemy kill
    pub fn award_weak_kill(&mut self, points: u64) -> Regen {
        self.weak_kills_this_stage += 1;
        self.award_kill(points)
    }

    /// Credit a boss kill (does not count toward the next boss)
    pub fn award_boss_kill(&mut self, points: u64) -> Regen {
        self.award_kill(points)
    }

    pub fn reset_stage_kills(&mut self) {
        self.weak_kills_this_stage = 0;
    }

    fn award_kill(&mut self, points: u64) -> Regen {
        self.score = self.score.saturating_add(points);
        self.kill_count = self.kill_count.saturating_add(1);

        let mut regen = Regen::default();
        if self.kill_count % self.heart_regen_kills == 0 && self.hearts < self.max_hearts {
            self.hearts += 1;
            regen.heart = true;
        }
        if self.kill_count % self.star_regen_kills == 0 && self.stars < self.max_stars {
            self.stars += 1;
            regen.star = true;
        }
        regen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use proptest::prelude::*;

    #[test]
    fn test_every_twentieth_kill_restores_heart() {
        let mut ledger = Ledger::new(&Tuning::default());
        ledger.hearts = 1;
        for _ in 0..19 {
            assert!(!ledger.award_weak_kill(WEAK_KILL_SCORE).heart);
        }
        let regen = ledger.award_weak_kill(WEAK_KILL_SCORE);
        assert!(regen.heart);
        assert_eq!(ledger.hearts, 2);
        assert_eq!(ledger.score, 20 * WEAK_KILL_SCORE);
        assert_eq!(ledger.weak_kills_this_stage, 20);
    }

    #[test]
    fn test_every_thirtieth_kill_restores_star() {
        let mut ledger = Ledger::new(&Tuning::default());
        ledger.stars = 0;
        for _ in 0..29 {
            ledger.award_boss_kill(BOSS_KILL_SCORE);
        }
        assert_eq!(ledger.stars, 0);
        assert!(ledger.award_boss_kill(BOSS_KILL_SCORE).star);
        assert_eq!(ledger.stars, 1);
        // Boss kills never count toward the next boss
        assert_eq!(ledger.weak_kills_this_stage, 0);
    }

    #[test]
    fn test_regen_respects_caps() {
        let mut ledger = Ledger::new(&Tuning::default());
        ledger.hearts = MAX_HEARTS;
        ledger.stars = MAX_STARS;
        for _ in 0..60 {
            let regen = ledger.award_weak_kill(WEAK_KILL_SCORE);
            assert_eq!(regen, Regen::default());
        }
        assert_eq!(ledger.hearts, MAX_HEARTS);
        assert_eq!(ledger.stars, MAX_STARS);
    }

    #[test]
    fn test_damage_and_spend_clamp_at_zero() {
        let mut ledger = Ledger::new(&Tuning::default());
        ledger.hearts = 1;
        assert!(ledger.damage_player());
        assert!(ledger.damage_player());
        assert_eq!(ledger.hearts, 0);

        ledger.stars = 1;
        assert!(ledger.spend_star());
        assert!(!ledger.spend_star());
        assert_eq!(ledger.stars, 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Weak,
        Boss,
        Hurt,
        Nova,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Weak), Just(Op::Boss), Just(Op::Hurt), Just(Op::Nova)]
    }

    proptest! {
        #[test]
        fn prop_ranges_and_monotonic_counters(ops in prop::collection::vec(op(), 0..300)) {
            let mut ledger = Ledger::new(&Tuning::default());
            let (mut score, mut kills) = (ledger.score, ledger.kill_count);
            for op in ops {
                match op {
                    Op::Weak => { ledger.award_weak_kill(WEAK_KILL_SCORE); }
                    Op::Boss => { ledger.award_boss_kill(BOSS_KILL_SCORE); }
                    Op::Hurt => { ledger.damage_player(); }
                    Op::Nova => { ledger.spend_star(); }
                }
                prop_assert!(ledger.hearts <= MAX_HEARTS);
                prop_assert!(ledger.stars <= MAX_STARS);
                prop_assert!(ledger.score >= score);
                prop_assert!(ledger.kill_count >= kills);
                score = ledger.score;
                kills = ledger.kill_count;
            }
        }
    }
}
