use thiserror::Error;

/// Errors surfaced by the simulation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Non-finite or structurally invalid parameters, state, time grid or grid size.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The sampler gave up before either species exhausted its target.
    #[error(
        "capacity shortfall after {passes} passes \
         ({herbivores_remaining} herbivores and {predators_remaining} predators left to place)"
    )]
    CapacityShortfall {
        passes: usize,
        herbivores_remaining: usize,
        predators_remaining: usize,
    },

    /// A configuration file could not be read or decoded.
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
