use serde::{Deserialize, Serialize};

use crate::errors::{Result, SimulationError};
use crate::model::{ModelParameters, State, derivative};

/// Evenly spaced sample times, both endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    pub start: f64,
    pub end: f64,
    pub samples: usize,
}

impl Default for TimeGrid {
    fn default() -> Self {
        TimeGrid {
            start: 0.0,
            end: 30.0,
            samples: 500,
        }
    }
}

impl TimeGrid {
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SimulationError::InvalidParameter(format!(
                "time grid bounds must be finite, got [{}, {}]",
                self.start, self.end
            )));
        }
        if self.samples == 0 {
            return Err(SimulationError::InvalidParameter(
                "time grid needs at least one sample".to_string(),
            ));
        }
        if self.samples > 1 && self.end <= self.start {
            return Err(SimulationError::InvalidParameter(format!(
                "time grid end ({}) must be greater than start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }

    pub fn times(&self) -> Vec<f64> {
        match self.samples {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                let mut times: Vec<f64> = (0..n).map(|i| self.start + i as f64 * step).collect();
                times[n - 1] = self.end;
                times
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn get(&self, index: usize) -> Option<(f64, State)> {
        Some((*self.times.get(index)?, *self.states.get(index)?))
    }

    /// Index of the first non-finite sample, if the scheme blew up.
    pub fn divergence(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_finite())
    }
}

/// Fixed-step classic Runge-Kutta over `times`.
///
/// `times` must be ascending and evenly spaced; the step for each interval is
/// the difference of its two endpoints. Non-finite results for large steps are
/// returned as data, see [`Trajectory::divergence`].
pub fn integrate(initial: State, times: &[f64], params: &ModelParameters) -> Trajectory {
    solve(|s| derivative(s, params), initial, times)
}

fn solve<F>(field: F, initial: State, times: &[f64]) -> Trajectory
where
    F: Fn(State) -> State,
{
    let mut states = Vec::with_capacity(times.len());
    if !times.is_empty() {
        states.push(initial);
    }

    for window in times.windows(2) {
        let dt = window[1] - window[0];
        let x = states[states.len() - 1];

        let k1 = field(x);
        let k2 = field(x + k1 * (dt / 2.0));
        let k3 = field(x + k2 * (dt / 2.0));
        let k4 = field(x + k3 * dt);

        states.push(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0));
    }

    Trajectory {
        times: times.to_vec(),
        states,
    }
}
