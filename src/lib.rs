//! Lotka-Volterra predator-prey populations, integrated once and then
//! resampled every frame onto a small occupancy grid.

pub mod errors;
pub mod grid;
pub mod integrator;
pub mod model;
pub mod simulation;
pub mod simulation_stats;

pub use errors::{Result, SimulationError};
pub use grid::{Cell, Grid, GridSize, Placement, place_on_grid};
pub use integrator::{TimeGrid, Trajectory, integrate};
pub use model::{ModelParameters, State, derivative};
pub use simulation::{FrameResult, POPULATION_SCALE, Simulation, SimulationConfig, target_count};
pub use simulation_stats::{ComparisonSeries, History};
