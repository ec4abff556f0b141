use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SimulationError};

/// Rates of the Lotka-Volterra system. Signs are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Herbivore growth rate.
    pub alpha: f64,
    /// Herbivore death-by-predation rate.
    pub beta: f64,
    /// Predator death rate.
    pub delta: f64,
    /// Predator growth-from-predation rate.
    pub gamma: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            alpha: 1.0,
            beta: 1.0,
            delta: 1.5,
            gamma: 1.0,
        }
    }
}

impl ModelParameters {
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("delta", self.delta),
            ("gamma", self.gamma),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(SimulationError::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Non-trivial fixed point `(delta / gamma, alpha / beta)`.
    pub fn equilibrium(&self) -> State {
        State::new(self.delta / self.gamma, self.alpha / self.beta)
    }
}

/// Continuous populations. Not clamped to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub herbivores: f64,
    pub predators: f64,
}

impl Default for State {
    fn default() -> Self {
        State::new(4.0, 2.0)
    }
}

impl State {
    pub const fn new(herbivores: f64, predators: f64) -> Self {
        State {
            herbivores,
            predators,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.herbivores.is_finite() && self.predators.is_finite()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(SimulationError::InvalidParameter(format!(
                "initial state must be finite, got ({}, {})",
                self.herbivores, self.predators
            )))
        }
    }
}

impl Add for State {
    type Output = State;

    fn add(self, rhs: State) -> State {
        State::new(self.herbivores + rhs.herbivores, self.predators + rhs.predators)
    }
}

impl Mul<f64> for State {
    type Output = State;

    fn mul(self, rhs: f64) -> State {
        State::new(self.herbivores * rhs, self.predators * rhs)
    }
}

/// Instantaneous rates of change of both populations.
///
/// ```text
/// dH/dt = H * (alpha - beta * P)
/// dP/dt = P * (-delta + gamma * H)
/// ```
pub fn derivative(state: State, params: &ModelParameters) -> State {
    let h = state.herbivores;
    let p = state.predators;
    State::new(
        h * (params.alpha - params.beta * p),
        p * (-params.delta + params.gamma * h),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_matches_hand_computation() {
        let params = ModelParameters::default();
        let d = derivative(State::new(4.0, 2.0), &params);
        assert_eq!(d.herbivores, 4.0 * (1.0 - 2.0));
        assert_eq!(d.predators, 2.0 * (-1.5 + 4.0));
    }

    #[test]
    fn derivative_vanishes_at_equilibrium() {
        let params = ModelParameters {
            alpha: 2.0,
            beta: 0.5,
            delta: 2.0,
            gamma: 0.5,
        };
        let d = derivative(params.equilibrium(), &params);
        assert_eq!(d, State::new(0.0, 0.0));
    }

    #[test]
    fn extinct_populations_stay_extinct() {
        let d = derivative(State::new(0.0, 0.0), &ModelParameters::default());
        assert_eq!(d, State::new(0.0, 0.0));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let params = ModelParameters {
            beta: f64::NAN,
            ..ModelParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidParameter(msg)) if msg.contains("beta")
        ));
        assert!(State::new(f64::INFINITY, 1.0).validate().is_err());
        assert!(ModelParameters::default().validate().is_ok());
    }
}
