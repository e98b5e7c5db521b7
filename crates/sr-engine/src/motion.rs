//! Spin motion controller
//!
//! Picks per-reel duration and travel for one spin and launches the motion
//! on every reel. A spin uses exactly one [`MotionProfile`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::reel::Reel;
use crate::scheduler::SpinJoin;
use crate::timing::{MotionProfile, TimingProfile};

/// Duration and travel of one reel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelPlan {
    pub column: u8,
    pub duration_ms: f64,
    /// Travel in cells
    pub turns: f64,
}

impl ReelPlan {
    pub fn target_from(&self, position: f64) -> f64 {
        position + self.turns
    }
}

/// Motion plan for every reel of one spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    pub profile: TimingProfile,
    pub reels: Vec<ReelPlan>,
}

impl SpinPlan {
    /// Time until the last reel settles
    pub fn longest_ms(&self) -> f64 {
        self.reels
            .iter()
            .map(|r| r.duration_ms)
            .fold(0.0, f64::max)
    }
}

/// Holds both timing profiles and turns them into spin plans
#[derive(Debug, Clone)]
pub struct MotionController {
    normal: MotionProfile,
    turbo: MotionProfile,
}

impl MotionController {
    pub fn new(normal: MotionProfile, turbo: MotionProfile) -> Self {
        Self { normal, turbo }
    }

    pub fn profile(&self, turbo: bool) -> &MotionProfile {
        if turbo { &self.turbo } else { &self.normal }
    }

    /// Draw duration and travel for each reel column
    pub fn plan<R: Rng + ?Sized>(&self, turbo: bool, reel_count: u8, rng: &mut R) -> SpinPlan {
        let profile = self.profile(turbo);
        let reels = (0..reel_count)
            .map(|column| {
                let (min_ms, max_ms) = profile.duration_bounds(column);
                let (min_turns, max_turns) = profile.turn_bounds(column);
                ReelPlan {
                    column,
                    duration_ms: rng.random_range(min_ms..=max_ms) as f64,
                    turns: rng.random_range(min_turns..=max_turns) as f64,
                }
            })
            .collect();

        SpinPlan {
            profile: profile.profile,
            reels,
        }
    }

    /// Start every reel on its planned motion and collect the completion receivers
    pub fn launch(&self, plan: &SpinPlan, reels: &mut [Reel], now_ms: f64) -> SpinJoin {
        let receivers = plan
            .reels
            .iter()
            .zip(reels.iter_mut())
            .map(|(reel_plan, reel)| {
                let target = reel_plan.target_from(reel.position());
                reel.begin(target, reel_plan.duration_ms, now_ms)
            })
            .collect();
        SpinJoin::new(receivers)
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionProfile::normal(), MotionProfile::turbo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use sr_core::GridGeometry;

    use crate::symbols::SymbolCatalog;

    #[test]
    fn test_plan_within_profile_bounds() {
        let controller = MotionController::default();
        let mut rng = StdRng::seed_from_u64(1);

        for turbo in [false, true] {
            let profile = controller.profile(turbo).clone();
            for _ in 0..50 {
                let plan = controller.plan(turbo, 5, &mut rng);
                assert_eq!(plan.reels.len(), 5);
                assert_eq!(plan.profile, profile.profile);
                for reel in &plan.reels {
                    let (min_ms, max_ms) = profile.duration_bounds(reel.column);
                    let (min_t, max_t) = profile.turn_bounds(reel.column);
                    assert!(reel.duration_ms >= min_ms as f64 && reel.duration_ms <= max_ms as f64);
                    assert!(reel.turns >= min_t as f64 && reel.turns <= max_t as f64);
                    assert_eq!(reel.turns.fract(), 0.0);
                }
                assert!(plan.longest_ms() <= profile.longest_spin_ms(5) as f64);
            }
        }
    }

    #[test]
    fn test_launch_starts_every_reel() {
        let geometry = GridGeometry::standard_5x3();
        let catalog = SymbolCatalog::standard();
        let mut rng = StdRng::seed_from_u64(9);
        let mut reels: Vec<Reel> = (0..5)
            .map(|c| Reel::new(c, &geometry, &catalog, &mut rng))
            .collect();

        let controller = MotionController::default();
        let plan = controller.plan(true, 5, &mut rng);
        let join = controller.launch(&plan, &mut reels, 0.0);

        assert_eq!(join.remaining(), 5);
        assert!(reels.iter().all(|r| r.is_spinning()));
    }
}
