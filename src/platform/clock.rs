//! Frame timing

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Turns host timestamps (milliseconds) into frame deltas (seconds)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call, clamped to `[0, MAX_FRAME_DT]`.
    /// The first frame reports one sim step.
    pub fn tick(&mut self, time_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp (after a pause or focus loss)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step: step.max(f32::EPSILON),
            max_substeps: max_substeps.max(1),
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Leftover time not yet simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Feed a frame delta and run `f(step)` once per whole step.
    /// Returns the number of steps run. Time beyond `max_substeps` is dropped.
    pub fn advance(&mut self, frame_dt: f32, mut f: impl FnMut(f32)) -> u32 {
        self.accumulator += frame_dt.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            f(self.step);
            self.accumulator -= self.step;
            substeps += 1;
        }

        if substeps == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.3}s of sim time", self.accumulator);
            self.accumulator %= self.step;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
