mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ecology_lab::{ComparisonSeries, FrameResult, Simulation, SimulationConfig};
use piston_window::*;
use tracing::info;

use render::{RenderConfig, Renderer};

/// Lotka-Volterra predator-prey populations drawn on an occupancy grid.
#[derive(Parser, Debug)]
#[command(name = "ecology-lab", version, about)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Herbivore growth rate
    #[arg(long)]
    alpha: Option<f64>,
    /// Herbivore death-by-predation rate
    #[arg(long)]
    beta: Option<f64>,
    /// Predator death rate
    #[arg(long)]
    delta: Option<f64>,
    /// Predator growth-from-predation rate
    #[arg(long)]
    gamma: Option<f64>,

    /// Initial herbivore population
    #[arg(long)]
    herbivores: Option<f64>,
    /// Initial predator population
    #[arg(long)]
    predators: Option<f64>,

    /// End of the simulated time span (starts at the configured start)
    #[arg(long)]
    t_end: Option<f64>,
    /// Number of samples, and therefore frames
    #[arg(long)]
    samples: Option<usize>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,
    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Seed for the placement sampler
    #[arg(long)]
    seed: Option<u64>,

    /// Font used for labels
    #[arg(long, default_value = "assets/FiraSans-Regular.ttf")]
    font: PathBuf,

    /// Frames advanced per second
    #[arg(long, default_value = "60")]
    ups: u64,

    /// Run every frame without opening a window
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        let p = &mut config.parameters;
        p.alpha = self.alpha.unwrap_or(p.alpha);
        p.beta = self.beta.unwrap_or(p.beta);
        p.delta = self.delta.unwrap_or(p.delta);
        p.gamma = self.gamma.unwrap_or(p.gamma);

        let s = &mut config.initial_state;
        s.herbivores = self.herbivores.unwrap_or(s.herbivores);
        s.predators = self.predators.unwrap_or(s.predators);

        let t = &mut config.time_grid;
        t.end = self.t_end.unwrap_or(t.end);
        t.samples = self.samples.unwrap_or(t.samples);

        config.grid.width = self.width.unwrap_or(config.grid.width);
        config.grid.height = self.height.unwrap_or(config.grid.height);
        config.seed = self.seed.or(config.seed);

        config.validate().context("invalid simulation configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.simulation_config()?;
    let mut simulation = Simulation::from_config(&config)?;

    if cli.headless {
        let series = simulation.run_to_end()?;
        report(&series);
        return Ok(());
    }

    run_window(&cli, &config, simulation)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn report(series: &ComparisonSeries) {
    let (herbivore_dev, predator_dev) = series.mean_abs_deviation();
    let herbivore_peak = series.herbivore_achieved.iter().max().copied().unwrap_or(0);
    let predator_peak = series.predator_achieved.iter().max().copied().unwrap_or(0);
    info!(
        frames = series.len(),
        herbivore_peak,
        predator_peak,
        herbivore_dev,
        predator_dev,
        "run finished"
    );
}

fn run_window<R: rand::Rng>(
    cli: &Cli,
    config: &SimulationConfig,
    mut simulation: Simulation<R>,
) -> Result<()> {
    let render_config = RenderConfig::for_grid(config.grid, cli.font.clone());
    let mut window = WindowSettings::new(
        render_config.title.clone(),
        [
            render_config.window_width as u32,
            render_config.window_height as u32,
        ],
    )
    .exit_on_esc(true)
    .build::<PistonWindow>()
    .map_err(|e| anyhow!("failed to open window: {e}"))?;
    window.set_ups(cli.ups);

    let mut renderer = Renderer::new(render_config, &mut window);
    let frame_count = simulation.frame_count();
    let mut current: Option<FrameResult> = None;
    let mut comparison: Option<ComparisonSeries> = None;

    while let Some(e) = window.next() {
        if e.update_args().is_some() && comparison.is_none() {
            match simulation.next() {
                Some(frame) => current = Some(frame?),
                None => {
                    comparison = simulation.comparison();
                    if let Some(series) = &comparison {
                        report(series);
                    }
                }
            }
        }

        if e.render_args().is_some() {
            if let Some(series) = &comparison {
                renderer.draw_comparison(&mut window, &e, series);
            } else if let Some(frame) = &current {
                renderer.draw_frame(&mut window, &e, frame, simulation.history(), frame_count);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "ecology-lab",
            "--alpha",
            "2",
            "--samples",
            "50",
            "--width",
            "8",
            "--seed",
            "4",
        ]);
        let config = cli.simulation_config().unwrap();
        assert_eq!(config.parameters.alpha, 2.0);
        assert_eq!(config.parameters.delta, 1.5);
        assert_eq!(config.time_grid.samples, 50);
        assert_eq!(config.grid.width, 8);
        assert_eq!(config.grid.height, 15);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn zero_width_flag_is_rejected() {
        let cli = Cli::parse_from(["ecology-lab", "--width", "0"]);
        assert!(cli.simulation_config().is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{ "grid": { "width": 20, "height": 12 }, "seed": 1 }"#).unwrap();

        let args: Vec<OsString> = vec![
            "ecology-lab".into(),
            "--config".into(),
            path.into_os_string(),
            "--height".into(),
            "9".into(),
        ];
        let cli = Cli::parse_from(args);
        let config = cli.simulation_config().unwrap();
        assert_eq!(config.grid.width, 20);
        assert_eq!(config.grid.height, 9);
        assert_eq!(config.seed, Some(1));
    }
}
