use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::errors::{Result, SimulationError};

/// A draw must exceed this to claim a cell, roughly a 10% chance per pass.
pub const ACCEPT_THRESHOLD: u32 = 90;
pub const DRAW_MAX: u32 = 100;
/// Passes after which the sampler reports [`SimulationError::CapacityShortfall`].
pub const MAX_PASSES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Herbivore,
    Predator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl Default for GridSize {
    fn default() -> Self {
        GridSize {
            width: 15,
            height: 15,
        }
    }
}

impl GridSize {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::InvalidParameter(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(SimulationError::InvalidParameter(format!(
                "grid {}x{} is too large",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.width * self.height
    }
}

/// Row-major occupancy snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    fn empty(size: GridSize) -> Self {
        Grid {
            width: size.width,
            height: size.height,
            cells: vec![Cell::Empty; size.capacity()],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub grid: Grid,
    pub herbivores: usize,
    pub predators: usize,
    pub passes: usize,
}

/// Scatter up to `target_herbivores` and `target_predators` onto a fresh grid.
///
/// Every cell of every pass draws two integers in `1..=100`; a draw above
/// [`ACCEPT_THRESHOLD`] claims an empty cell for that species, herbivores
/// first. Passes repeat until *either* species has been fully placed, so the
/// other one usually falls short; a zero target for either species means no
/// pass runs at all and the grid stays empty.
pub fn place_on_grid(
    width: usize,
    height: usize,
    target_herbivores: usize,
    target_predators: usize,
    rng: &mut impl Rng,
) -> Result<Placement> {
    let size = GridSize { width, height };
    size.validate()?;

    let mut grid = Grid::empty(size);
    let mut herbivores_left = target_herbivores;
    let mut predators_left = target_predators;
    let mut herbivores = 0;
    let mut predators = 0;
    let mut passes = 0;

    while herbivores_left != 0 && predators_left != 0 {
        if passes == MAX_PASSES || herbivores + predators == grid.cells.len() {
            return Err(SimulationError::CapacityShortfall {
                passes,
                herbivores_remaining: herbivores_left,
                predators_remaining: predators_left,
            });
        }

        for cell in grid.cells.iter_mut() {
            let herbivore_draw = rng.random_range(1..=DRAW_MAX);
            let predator_draw = rng.random_range(1..=DRAW_MAX);

            if herbivore_draw > ACCEPT_THRESHOLD && herbivores_left > 0 && *cell == Cell::Empty {
                *cell = Cell::Herbivore;
                herbivores_left -= 1;
                herbivores += 1;
            }
            if predator_draw > ACCEPT_THRESHOLD && predators_left > 0 && *cell == Cell::Empty {
                *cell = Cell::Predator;
                predators_left -= 1;
                predators += 1;
            }
        }
        passes += 1;
    }

    trace!(passes, herbivores, predators, "grid placement finished");

    Ok(Placement {
        grid,
        herbivores,
        predators,
        passes,
    })
}
