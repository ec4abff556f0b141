use ecology_lab::{
    Cell, GridSize, ModelParameters, Simulation, SimulationConfig, SimulationError, State,
    TimeGrid, place_on_grid,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn reference_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        parameters: ModelParameters {
            alpha: 1.0,
            beta: 1.0,
            delta: 1.5,
            gamma: 1.0,
        },
        initial_state: State::new(4.0, 2.0),
        time_grid: TimeGrid {
            start: 0.0,
            end: 30.0,
            samples: 500,
        },
        grid: GridSize {
            width: 15,
            height: 15,
        },
        seed: Some(seed),
    }
}

#[test]
fn trajectory_history_and_frames_have_equal_length() {
    let mut sim = Simulation::from_config(&reference_config(17)).unwrap();
    let frames: Vec<_> = sim.by_ref().collect::<Result<_, _>>().unwrap();
    let series = sim.comparison().unwrap();

    assert_eq!(sim.trajectory().len(), 500);
    assert_eq!(frames.len(), 500);
    assert_eq!(sim.history().len(), 500);
    assert_eq!(series.len(), 500);
    assert_eq!(series.herbivore_theoretical.len(), 500);
    assert_eq!(series.predator_achieved.len(), 500);
    assert_eq!(sim.history().frames(), (0..500).collect::<Vec<_>>().as_slice());
}

#[test]
fn every_frame_respects_occupancy_invariants() {
    let config = reference_config(23);
    let capacity = config.grid.capacity();
    let mut sim = Simulation::from_config(&config).unwrap();

    for frame in sim.by_ref() {
        let frame = frame.unwrap();
        let cells = frame.grid.cells();
        assert_eq!(cells.len(), capacity);
        assert!(frame.achieved_herbivores + frame.achieved_predators <= capacity);
        assert!(frame.achieved_herbivores <= frame.target_herbivores);
        assert!(frame.achieved_predators <= frame.target_predators);

        let empty = cells.iter().filter(|&&c| c == Cell::Empty).count();
        assert_eq!(
            empty + frame.achieved_herbivores + frame.achieved_predators,
            capacity
        );
    }
}

#[test]
fn one_species_always_meets_its_target() {
    let mut sim = Simulation::from_config(&reference_config(31)).unwrap();
    for frame in sim.by_ref() {
        let frame = frame.unwrap();
        assert!(
            frame.achieved_herbivores == frame.target_herbivores
                || frame.achieved_predators == frame.target_predators,
            "frame {} missed both targets",
            frame.frame_index
        );
    }
    let series = sim.comparison().unwrap();
    let (herbivore_dev, predator_dev) = series.mean_abs_deviation();
    assert!(herbivore_dev.is_finite() && predator_dev.is_finite());
}

#[test]
fn sampler_edge_cases_through_public_api() {
    let mut rng = StdRng::seed_from_u64(8);

    let placed = place_on_grid(15, 15, 0, 5, &mut rng).unwrap();
    assert_eq!(placed.predators, 0);
    assert_eq!(placed.grid.count(Cell::Empty), 225);

    assert!(matches!(
        place_on_grid(0, 10, 1, 1, &mut rng),
        Err(SimulationError::InvalidParameter(_))
    ));
}

#[test]
fn extinct_predators_leave_the_grid_empty() {
    // Zero predators: every frame has a zero target, so nothing is placed.
    let config = SimulationConfig {
        initial_state: State::new(2.0, 0.0),
        time_grid: TimeGrid {
            start: 0.0,
            end: 1.0,
            samples: 20,
        },
        seed: Some(2),
        ..SimulationConfig::default()
    };
    let series = Simulation::from_config(&config).unwrap().run_to_end().unwrap();
    assert!(series.herbivore_achieved.iter().all(|&n| n == 0));
    assert!(series.predator_achieved.iter().all(|&n| n == 0));
    assert!(series.herbivore_theoretical.iter().all(|&h| h >= 20.0));
}

#[test]
fn diverging_trajectory_still_yields_every_frame() {
    let config = SimulationConfig {
        parameters: ModelParameters {
            alpha: 50.0,
            beta: 1.0,
            delta: 1.0,
            gamma: 50.0,
        },
        initial_state: State::new(10.0, 10.0),
        time_grid: TimeGrid {
            start: 0.0,
            end: 1000.0,
            samples: 20,
        },
        seed: Some(6),
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::from_config(&config).unwrap();
    let diverged_at = sim.trajectory().divergence().expect("trajectory should blow up");

    let frames: Vec<_> = sim.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(frames.len(), 20);
    assert_eq!(sim.history().len(), 20);
    for frame in &frames[diverged_at..] {
        assert_eq!(frame.target_herbivores, 0);
        assert_eq!(frame.target_predators, 0);
        assert_eq!(frame.grid.count(Cell::Empty), config.grid.capacity());
    }

    let series = sim.run_to_end().unwrap();
    assert_eq!(series.len(), 20);
}
