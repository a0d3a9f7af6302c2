use crate::config::SimConfig;

/// Which controls the operator is holding this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldInput {
    pub advance: bool,
    pub withdraw: bool,
    pub twist_left: bool,
    pub twist_right: bool,
}

impl HeldInput {
    pub fn advancing() -> Self {
        HeldInput {
            advance: true,
            ..Default::default()
        }
    }

    pub fn withdrawing() -> Self {
        HeldInput {
            withdraw: true,
            ..Default::default()
        }
    }
}

/// Per-tick input for the state machine. `du` is in input units and is
/// scaled by `step_scale` when applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub du: f64,
    pub twist_delta: f64,
    pub paused: bool,
}

impl TickInput {
    /// Opposing keys cancel. When paused both deltas are zero.
    pub fn from_held(held: HeldInput, paused: bool, config: &SimConfig) -> Self {
        if paused {
            return TickInput {
                paused,
                ..Default::default()
            };
        }

        let mut du = 0.0;
        if held.advance {
            du += config.forward_speed;
        }
        if held.withdraw {
            du -= config.forward_speed;
        }

        let mut twist_delta = 0.0;
        if held.twist_left {
            twist_delta -= config.twist_speed;
        }
        if held.twist_right {
            twist_delta += config.twist_speed;
        }

        TickInput {
            du,
            twist_delta,
            paused,
        }
    }

    /// Deltas actually applied this tick: zero while paused, NaN read as no input.
    pub(crate) fn effective(&self) -> (f64, f64) {
        if self.paused {
            return (0.0, 0.0);
        }
        let sanitize = |v: f64| if v.is_nan() { 0.0 } else { v };
        (sanitize(self.du), sanitize(self.twist_delta))
    }
}
