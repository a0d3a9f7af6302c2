use anyhow::{Context, Result};
use crossbeam::channel::Sender;

use super::input::{HeldInput, TickInput};
use super::state::{NavState, RunState};
use crate::config::SimConfig;
use crate::io::input::{Centerline, Point3};
use crate::processing::curve::{point_at_with, resample_with, MIN_RESAMPLE_EXTENT};
use crate::processing::radius::{LumenRadiusModel, RadiusModel};

/// Change notifications pushed to the render shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigationEvent {
    Progress(f64),
    StateChanged(RunState),
}

/// Receives progress and run-state changes. Each callback fires at most
/// once per tick, and only when the value changed.
///
/// Callbacks return whether the observer is still listening; an observer
/// that returns `false` is dropped by the navigator.
pub trait NavigationObserver {
    fn on_progress(&mut self, _u: f64) -> bool {
        true
    }
    fn on_state_change(&mut self, _state: RunState) -> bool {
        true
    }
}

/// Detaches once the receiving end is gone.
impl NavigationObserver for Sender<NavigationEvent> {
    fn on_progress(&mut self, u: f64) -> bool {
        self.send(NavigationEvent::Progress(u)).is_ok()
    }

    fn on_state_change(&mut self, state: RunState) -> bool {
        self.send(NavigationEvent::StateChanged(state)).is_ok()
    }
}

/// Guidewire geometry for one frame. Rebuilt from scratch on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct WireGeometry {
    /// Wire body from the proximal end to the tip.
    pub path: Vec<Point3>,
    pub tip: Point3,
    /// Cosmetic tip rotation in radians.
    pub tip_twist: f64,
}

/// Sole owner and writer of the simulation state for one vessel.
///
/// The shell feeds input through [`Navigator::tick`] once per frame and
/// reads back [`Navigator::state`] and [`Navigator::wire_geometry`].
pub struct Navigator {
    centerline: Centerline,
    model: Box<dyn RadiusModel>,
    config: SimConfig,
    state: NavState,
    observers: Vec<Box<dyn NavigationObserver>>,
}

impl Navigator {
    /// Navigator using the lumen model described by `config`.
    pub fn new(centerline: Centerline, config: SimConfig) -> Result<Self> {
        let model = LumenRadiusModel::from_config(&config);
        Navigator::with_model(centerline, config, model)
    }

    /// Fails when `config` does not pass [`SimConfig::validate`].
    pub fn with_model<M: RadiusModel + 'static>(
        centerline: Centerline,
        config: SimConfig,
        model: M,
    ) -> Result<Self> {
        config
            .validate()
            .context("cannot start navigation with this config")?;
        Ok(Navigator {
            centerline,
            model: Box::new(model),
            config,
            state: NavState::initial(),
            observers: Vec::new(),
        })
    }

    pub fn add_observer<O: NavigationObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn centerline(&self) -> &Centerline {
        &self.centerline
    }

    /// Swaps in a new vessel and starts over.
    pub fn set_centerline(&mut self, centerline: Centerline) {
        self.centerline = centerline;
        self.reset();
    }

    pub fn set_model<M: RadiusModel + 'static>(&mut self, model: M) {
        self.model = Box::new(model);
    }

    /// One frame of held controls.
    pub fn tick(&mut self, held: HeldInput, paused: bool) -> &NavState {
        let input = TickInput::from_held(held, paused, &self.config);
        self.step(&input)
    }

    /// One frame of raw input deltas.
    pub fn step(&mut self, input: &TickInput) -> &NavState {
        let next = self.state.tick(
            input,
            self.config.wire_radius,
            &self.centerline,
            self.model.as_ref(),
            &self.config,
        );
        self.commit(next);
        &self.state
    }

    /// Back to idle at the proximal end. The only way out of success or fail.
    pub fn reset(&mut self) {
        tracing::info!(from = %self.state.run_state(), "navigation reset");
        self.commit(NavState::initial());
    }

    fn commit(&mut self, next: NavState) {
        let moved = next.u() != self.state.u();
        let changed = next.run_state() != self.state.run_state();
        self.state = next;

        let (u, run_state) = (self.state.u(), self.state.run_state());
        let before = self.observers.len();
        self.observers.retain_mut(|observer| {
            let mut alive = true;
            if moved {
                alive &= observer.on_progress(u);
            }
            if changed && alive {
                alive &= observer.on_state_change(run_state);
            }
            alive
        });
        if self.observers.len() < before {
            tracing::debug!(
                dropped = before - self.observers.len(),
                "detached observers that stopped listening"
            );
        }
    }

    /// Clearance the wire would have at `u`, without touching the state.
    pub fn clearance_at(&self, u: f64) -> f64 {
        self.model.effective_radius(&self.centerline, u) - self.config.wire_radius
    }

    pub fn wire_geometry(&self) -> WireGeometry {
        let extent = self.state.u().max(MIN_RESAMPLE_EXTENT);
        let path = resample_with(
            &self.centerline,
            extent,
            self.config.wire_samples,
            self.config.interpolation,
        );
        let tip = match path.last() {
            Some(p) => *p,
            None => point_at_with(&self.centerline, extent, self.config.interpolation),
        };

        WireGeometry {
            path,
            tip,
            tip_twist: self.state.twist(),
        }
    }

    /// The whole vessel path, for drawing the lumen.
    pub fn vessel_path(&self) -> Vec<Point3> {
        resample_with(
            &self.centerline,
            1.0,
            self.config.vessel_samples,
            self.config.interpolation,
        )
    }
}
