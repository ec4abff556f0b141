use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{Result, SimulationError};
use crate::grid::{Grid, GridSize, place_on_grid};
use crate::integrator::{TimeGrid, Trajectory, integrate};
use crate::model::{ModelParameters, State};
use crate::simulation_stats::{ComparisonSeries, History};

/// Individuals placed on the grid per unit of continuous population.
pub const POPULATION_SCALE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub parameters: ModelParameters,
    pub initial_state: State,
    pub time_grid: TimeGrid,
    pub grid: GridSize,
    /// Fixes the sampler RNG so a run can be repeated exactly.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        self.initial_state.validate()?;
        self.time_grid.validate()?;
        self.grid.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::Config(format!("reading {}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| SimulationError::Config(format!("parsing {}: {e}", path.display())))
    }

    /// RNG for the sampler: seeded when `seed` is set, otherwise fresh.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub frame_index: usize,
    pub time: f64,
    pub target_herbivores: usize,
    pub target_predators: usize,
    pub achieved_herbivores: usize,
    pub achieved_predators: usize,
    pub grid: Grid,
}

/// Integer grid target for a continuous population: scaled, then truncated
/// toward zero. Negative and non-finite populations map to zero.
pub fn target_count(population: f64) -> usize {
    let scaled = (population * POPULATION_SCALE).trunc();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as usize
    } else {
        0
    }
}

/// Frame-by-frame driver. Each call to `next` samples one frame in time order
/// and appends it to the history.
pub struct Simulation<R> {
    grid: GridSize,
    trajectory: Trajectory,
    history: History,
    rng: R,
    next_frame: usize,
    failure: Option<SimulationError>,
}

impl Simulation<StdRng> {
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        Simulation::new(config, config.rng())
    }
}

impl<R: Rng> Simulation<R> {
    /// Validates `config` and integrates the whole trajectory up front.
    pub fn new(config: &SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let times = config.time_grid.times();
        let trajectory = integrate(config.initial_state, &times, &config.parameters);
        if let Some(index) = trajectory.divergence() {
            warn!(
                index,
                time = trajectory.times()[index],
                "trajectory diverged; later frames will have empty targets"
            );
        }
        info!(
            frames = trajectory.len(),
            width = config.grid.width,
            height = config.grid.height,
            "trajectory integrated"
        );

        Ok(Simulation {
            grid: config.grid,
            history: History::with_capacity(trajectory.len()),
            trajectory,
            rng,
            next_frame: 0,
            failure: None,
        })
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    pub fn frame_count(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_finished(&self) -> bool {
        self.history.len() == self.trajectory.len()
    }

    fn step(&mut self, frame_index: usize) -> Result<FrameResult> {
        let time = self.trajectory.times()[frame_index];
        let state = self.trajectory.states()[frame_index];
        let target_herbivores = target_count(state.herbivores);
        let target_predators = target_count(state.predators);

        let placement = place_on_grid(
            self.grid.width,
            self.grid.height,
            target_herbivores,
            target_predators,
            &mut self.rng,
        )?;

        self.history
            .push(frame_index, placement.herbivores, placement.predators);
        debug!(
            frame = frame_index,
            time,
            target_herbivores,
            target_predators,
            herbivores = placement.herbivores,
            predators = placement.predators,
            passes = placement.passes,
            "frame sampled"
        );

        Ok(FrameResult {
            frame_index,
            time,
            target_herbivores,
            target_predators,
            achieved_herbivores: placement.herbivores,
            achieved_predators: placement.predators,
            grid: placement.grid,
        })
    }

    /// The error that stopped the run, if any.
    pub fn failure(&self) -> Option<&SimulationError> {
        self.failure.as_ref()
    }

    /// Drains the remaining frames and returns the comparison series. A run
    /// that already stopped on an error returns that error again.
    pub fn run_to_end(&mut self) -> Result<ComparisonSeries> {
        while let Some(frame) = self.next() {
            frame?;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.series()),
        }
    }

    /// Achieved and theoretical series, available once every frame has run.
    pub fn comparison(&self) -> Option<ComparisonSeries> {
        self.is_finished().then(|| self.series())
    }

    fn series(&self) -> ComparisonSeries {
        let states = self.trajectory.states();
        ComparisonSeries {
            time: self.trajectory.times().to_vec(),
            herbivore_achieved: self.history.herbivores().to_vec(),
            predator_achieved: self.history.predators().to_vec(),
            herbivore_theoretical: states
                .iter()
                .map(|s| s.herbivores * POPULATION_SCALE)
                .collect(),
            predator_theoretical: states
                .iter()
                .map(|s| s.predators * POPULATION_SCALE)
                .collect(),
        }
    }
}

impl<R: Rng> Iterator for Simulation<R> {
    type Item = Result<FrameResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failure.is_some() || self.next_frame >= self.trajectory.len() {
            return None;
        }
        let frame_index = self.next_frame;
        self.next_frame += 1;

        let result = self.step(frame_index);
        if let Err(err) = &result {
            self.failure = Some(err.clone());
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failure.is_some() {
            return (0, Some(0));
        }
        let left = self.trajectory.len() - self.next_frame;
        (0, Some(left))
    }
}
