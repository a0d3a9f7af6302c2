use std::fmt;

use super::input::TickInput;
use crate::config::SimConfig;
use crate::io::input::Centerline;
use crate::processing::radius::RadiusModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Idle,
    Navigating,
    Success,
    Fail,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Navigating => "navigating",
            RunState::Success => "success",
            RunState::Fail => "fail",
        }
    }

    /// Only an explicit reset leaves a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Success | RunState::Fail)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact report for the current tick. `clearance` is refreshed every tick,
/// `hit` only when an advance was refused.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collision {
    pub hit: bool,
    pub clearance: f64,
}

/// Snapshot of the navigation state machine.
///
/// Values are only produced by [`NavState::initial`] and [`NavState::tick`];
/// the fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavState {
    u: f64,
    run_state: RunState,
    overpush: f64,
    twist: f64,
    collision: Collision,
}

impl NavState {
    /// Idle at the proximal end with no pressure, twist or contact.
    pub fn initial() -> Self {
        NavState::default()
    }

    pub fn u(&self) -> f64 {
        self.u
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn overpush(&self) -> f64 {
        self.overpush
    }

    pub fn twist(&self) -> f64 {
        self.twist
    }

    pub fn collision(&self) -> Collision {
        self.collision
    }

    /// Advances the state machine by one frame.
    ///
    /// An advance is refused while the clearance at the current position is
    /// not positive; each refusal adds to the overpush pressure, every other
    /// tick bleeds it off. Sustained pressure past the threshold fails the
    /// run, reaching the distal threshold while navigating succeeds.
    ///
    /// Only the current position is inspected, so a very large step can
    /// jump over a narrow lesion.
    pub fn tick<M: RadiusModel + ?Sized>(
        &self,
        input: &TickInput,
        wire_radius: f64,
        centerline: &Centerline,
        model: &M,
        config: &SimConfig,
    ) -> NavState {
        let (du, twist_delta) = input.effective();
        let mut next = self.clone();

        let clearance = model.effective_radius(centerline, self.u) - wire_radius;

        if du > 0.0 && clearance <= 0.0 {
            next.collision = Collision {
                hit: true,
                clearance,
            };
            next.overpush += config.overpush_increment;
            tracing::debug!(
                u = self.u,
                clearance,
                overpush = next.overpush,
                "advance blocked"
            );
        } else {
            next.collision = Collision {
                hit: false,
                clearance,
            };
            next.overpush = (next.overpush - config.overpush_decay).max(0.0);
            if du != 0.0 {
                next.u = (self.u + du * config.step_scale).clamp(0.0, config.max_progress);
                if next.run_state == RunState::Idle {
                    next.run_state = RunState::Navigating;
                }
            }
        }

        if next.overpush > config.overpush_fail_threshold && next.run_state != RunState::Success {
            next.run_state = RunState::Fail;
        }
        if next.u > config.success_threshold && next.run_state == RunState::Navigating {
            next.run_state = RunState::Success;
        }

        next.twist += twist_delta;

        if next.run_state != self.run_state {
            tracing::info!(
                from = %self.run_state,
                to = %next.run_state,
                u = next.u,
                "run state changed"
            );
        }

        next
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::io::builtin::straight_centerline;
    use crate::processing::curve::InterpolationMode;
    use crate::processing::radius::{effective_radius, LumenRadiusModel, NoStenosis};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn healthy_model() -> LumenRadiusModel<NoStenosis> {
        let config = SimConfig::default();
        LumenRadiusModel::with_profile(&config.radius, InterpolationMode::CatmullRom, NoStenosis)
    }

    fn advance(config: &SimConfig) -> TickInput {
        TickInput {
            du: config.forward_speed,
            ..Default::default()
        }
    }

    fn withdraw(config: &SimConfig) -> TickInput {
        TickInput {
            du: -config.forward_speed,
            ..Default::default()
        }
    }

    /// Navigating at the peak of the default lesion.
    fn at_lesion() -> NavState {
        NavState {
            u: 0.55,
            run_state: RunState::Navigating,
            ..NavState::initial()
        }
    }

    #[test]
    fn test_straight_vessel_reaches_success() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = healthy_model();
        let step = config.forward_speed * config.step_scale;

        let mut state = NavState::initial();
        let mut ticks = 0usize;
        let mut after_500 = 0.0;
        while state.run_state() != RunState::Success && ticks < 5000 {
            state = state.tick(&advance(&config), 0.55, &cl, &model, &config);
            assert!(!state.collision().hit, "collision at u={}", state.u());
            assert_relative_eq!(state.collision().clearance, 2.25, epsilon = 1e-3);
            ticks += 1;
            if ticks == 500 {
                after_500 = state.u();
            }
        }

        assert_eq!(state.run_state(), RunState::Success);
        assert!(state.u() >= 0.995);
        assert_relative_eq!(after_500, 500.0 * step, epsilon = 1e-9);
        assert_eq!(ticks, (0.995 / step).floor() as usize + 1);
    }

    #[test]
    fn test_first_movement_starts_navigation() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = healthy_model();

        let idle = NavState::initial();
        let still = idle.tick(&TickInput::default(), 0.55, &cl, &model, &config);
        assert_eq!(still.run_state(), RunState::Idle);

        let moving = idle.tick(&advance(&config), 0.55, &cl, &model, &config);
        assert_eq!(moving.run_state(), RunState::Navigating);
        assert_relative_eq!(moving.u(), 0.00044, epsilon = 1e-12);
    }

    #[test]
    fn test_peak_stenosis_clearance_depends_on_wire() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = LumenRadiusModel::default();
        let state = at_lesion();

        let thin = state.tick(&advance(&config), 0.55, &cl, &model, &config);
        assert!(!thin.collision().hit);
        assert_relative_eq!(thin.collision().clearance, 0.57, epsilon = 1e-3);
        assert!(thin.u() > state.u());

        let thick = state.tick(&advance(&config), 1.2, &cl, &model, &config);
        assert!(thick.collision().hit);
        assert!(thick.collision().clearance < 0.0);
        assert_eq!(thick.u(), state.u());
        assert_eq!(thick.overpush(), 1.0);
    }

    #[test]
    fn test_withdraw_is_never_blocked() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = LumenRadiusModel::default();

        let next = at_lesion().tick(&withdraw(&config), 1.2, &cl, &model, &config);
        assert!(!next.collision().hit);
        assert!(next.u() < 0.55);
    }

    #[test]
    fn test_sustained_overpush_fails() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = LumenRadiusModel::default();

        let mut state = at_lesion();
        for _ in 0..60 {
            state = state.tick(&advance(&config), 1.2, &cl, &model, &config);
        }
        assert_eq!(state.run_state(), RunState::Navigating);
        assert_eq!(state.overpush(), 60.0);

        state = state.tick(&advance(&config), 1.2, &cl, &model, &config);
        assert_eq!(state.run_state(), RunState::Fail);
        assert_relative_eq!(state.u(), 0.55);

        // Fail is sticky even once the pressure bleeds off
        for _ in 0..200 {
            state = state.tick(&withdraw(&config), 1.2, &cl, &model, &config);
        }
        assert_eq!(state.overpush(), 0.0);
        assert_eq!(state.run_state(), RunState::Fail);
    }

    #[test]
    fn test_success_is_not_overturned_by_pressure() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let blocked = |_cl: &Centerline, _u: f64| 0.1;

        let mut state = NavState {
            u: 0.998,
            run_state: RunState::Success,
            ..NavState::initial()
        };
        for _ in 0..100 {
            state = state.tick(&advance(&config), 0.55, &cl, &blocked, &config);
        }
        assert!(state.overpush() > config.overpush_fail_threshold);
        assert_eq!(state.run_state(), RunState::Success);
    }

    #[test]
    fn test_blocked_tick_forgiven_after_two_quiet_ticks() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = LumenRadiusModel::default();

        let mut state = at_lesion();
        for _ in 0..3 {
            state = state.tick(&advance(&config), 1.2, &cl, &model, &config);
        }
        let before = state.overpush();

        state = state.tick(&advance(&config), 1.2, &cl, &model, &config);
        assert_eq!(state.overpush(), before + 1.0);
        state = state.tick(&TickInput::default(), 1.2, &cl, &model, &config);
        assert!(!state.collision().hit);
        state = state.tick(&TickInput::default(), 1.2, &cl, &model, &config);
        assert!(state.overpush() <= before);

        let quiet = NavState::initial().tick(&TickInput::default(), 0.55, &cl, &model, &config);
        assert_eq!(quiet.overpush(), 0.0);
    }

    #[test]
    fn test_progress_stays_clamped() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = healthy_model();
        let mut rng = StdRng::seed_from_u64(17);

        let mut state = NavState::initial();
        for _ in 0..2000 {
            let input = TickInput {
                du: rng.random_range(-500.0..500.0),
                twist_delta: rng.random_range(-1.0..1.0),
                paused: rng.random_bool(0.1),
            };
            state = state.tick(&input, 0.55, &cl, &model, &config);
            assert!((0.0..=0.999).contains(&state.u()), "u escaped: {}", state.u());
            assert!(state.overpush() >= 0.0);
        }

        let huge = TickInput {
            du: f64::INFINITY,
            ..Default::default()
        };
        let state = NavState::initial().tick(&huge, 0.55, &cl, &model, &config);
        assert_eq!(state.u(), 0.999);
    }

    #[test]
    fn test_pressure_never_negative_under_random_blocking() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = LumenRadiusModel::default();
        let mut rng = StdRng::seed_from_u64(3);

        let mut state = at_lesion();
        for _ in 0..500 {
            let input = if rng.random_bool(0.5) {
                advance(&config)
            } else {
                TickInput::default()
            };
            state = state.tick(&input, 1.2, &cl, &model, &config);
            assert!(state.overpush() >= 0.0);
            assert_relative_eq!(state.u(), 0.55);
        }
    }

    #[test]
    fn test_pause_freezes_motion_but_refreshes_clearance() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let state = at_lesion();
        let input = TickInput {
            du: config.forward_speed,
            twist_delta: 0.03,
            paused: true,
        };

        let next = state.tick(&input, 0.55, &cl, &LumenRadiusModel::default(), &config);
        assert_eq!(next.u(), state.u());
        assert_eq!(next.twist(), 0.0);
        assert!(!next.collision().hit);
        assert_relative_eq!(
            next.collision().clearance,
            effective_radius(&cl, 0.55) - 0.55
        );
    }

    #[test]
    fn test_twist_is_cosmetic() {
        let config = SimConfig::default();
        let cl = straight_centerline();
        let model = healthy_model();
        let twist_only = TickInput {
            twist_delta: 0.03,
            ..Default::default()
        };

        let mut state = NavState::initial();
        for _ in 0..10 {
            state = state.tick(&twist_only, 0.55, &cl, &model, &config);
        }
        assert_relative_eq!(state.twist(), 0.3, epsilon = 1e-12);
        assert_eq!(state.u(), 0.0);
        assert_eq!(state.run_state(), RunState::Idle);
    }

    #[test]
    fn test_initial_state() {
        let state = NavState::initial();
        assert_eq!(state.u(), 0.0);
        assert_eq!(state.twist(), 0.0);
        assert_eq!(state.overpush(), 0.0);
        assert_eq!(state.run_state(), RunState::Idle);
        assert!(!state.collision().hit);
        assert!(!state.run_state().is_terminal());
        assert_eq!(RunState::Fail.to_string(), "fail");
    }
}
