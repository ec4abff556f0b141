use std::path::PathBuf;

use ecology_lab::{Cell, ComparisonSeries, FrameResult, GridSize, History};
use piston_window::*;
use tracing::{debug, warn};

const CELL_PITCH: f64 = 20.0;
const CELL_SIZE: f64 = 15.0;
const GRID_TOP: f64 = 100.0;
const MIN_WINDOW_WIDTH: f64 = 500.0;
const CHART_HEIGHT: f64 = 260.0;

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const AXIS: [f32; 4] = [0.4, 0.4, 0.4, 1.0];

fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Layout and palette, fixed for the lifetime of the window.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub title: String,
    pub window_width: f64,
    pub window_height: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub cell_pitch: f64,
    pub cell_size: f64,
    pub chart_top: f64,
    pub chart_height: f64,
    pub predator_color: [f32; 4],
    pub herbivore_color: [f32; 4],
    pub grass_color: [f32; 4],
    pub background_color: [f32; 4],
    pub theoretical_herbivore_color: [f32; 4],
    pub theoretical_predator_color: [f32; 4],
    pub font_path: PathBuf,
}

impl RenderConfig {
    pub fn for_grid(size: GridSize, font_path: PathBuf) -> Self {
        let grid_width = size.width as f64 * CELL_PITCH;
        let grid_height = size.height as f64 * CELL_PITCH;
        let window_width = MIN_WINDOW_WIDTH.max(grid_width + 40.0);
        let chart_top = GRID_TOP + grid_height + 80.0;

        RenderConfig {
            title: "Ecology Lab".to_string(),
            window_width,
            window_height: chart_top + CHART_HEIGHT + 40.0,
            margin_x: (window_width - grid_width) / 2.0,
            margin_y: GRID_TOP,
            cell_pitch: CELL_PITCH,
            cell_size: CELL_SIZE,
            chart_top,
            chart_height: CHART_HEIGHT,
            predator_color: rgb(204, 0, 0),
            herbivore_color: rgb(102, 178, 255),
            grass_color: rgb(229, 255, 204),
            background_color: rgb(255, 255, 255),
            theoretical_herbivore_color: rgb(0, 191, 191),
            theoretical_predator_color: rgb(191, 191, 0),
            font_path,
        }
    }

    fn chart(&self) -> Chart {
        Chart {
            left: 50.0,
            top: self.chart_top,
            width: self.window_width - 80.0,
            height: self.chart_height,
        }
    }

    fn cell_color(&self, cell: Cell) -> [f32; 4] {
        match cell {
            Cell::Empty => self.grass_color,
            Cell::Herbivore => self.herbivore_color,
            Cell::Predator => self.predator_color,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Chart {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Chart {
    fn point(&self, x_frac: f64, y: f64, y_max: f64) -> [f64; 2] {
        let y_frac = if y_max > 0.0 { (y / y_max).clamp(0.0, 1.0) } else { 0.0 };
        [
            self.left + x_frac.clamp(0.0, 1.0) * self.width,
            self.top + self.height * (1.0 - y_frac),
        ]
    }

    fn draw_axes(&self, transform: math::Matrix2d, g: &mut G2d) {
        let bottom = self.top + self.height;
        line(AXIS, 0.5, [self.left, self.top, self.left, bottom], transform, g);
        line(
            AXIS,
            0.5,
            [self.left, bottom, self.left + self.width, bottom],
            transform,
            g,
        );
    }

    /// Polyline through `values`, spread evenly over `x_slots` positions.
    fn draw_series<I>(
        &self,
        values: I,
        x_slots: usize,
        y_max: f64,
        color: [f32; 4],
        transform: math::Matrix2d,
        g: &mut G2d,
    ) where
        I: IntoIterator<Item = f64>,
    {
        let span = x_slots.saturating_sub(1).max(1) as f64;
        let mut previous: Option<[f64; 2]> = None;
        for (i, value) in values.into_iter().enumerate() {
            if !value.is_finite() {
                previous = None;
                continue;
            }
            let point = self.point(i as f64 / span, value, y_max);
            if let Some(from) = previous {
                line(color, 0.75, [from[0], from[1], point[0], point[1]], transform, g);
            }
            previous = Some(point);
        }
    }
}

pub struct Renderer {
    config: RenderConfig,
    glyphs: Option<Glyphs>,
}

impl Renderer {
    pub fn new(config: RenderConfig, window: &mut PistonWindow) -> Self {
        let glyphs = if config.font_path.exists() {
            match window.load_font(&config.font_path) {
                Ok(glyphs) => Some(glyphs),
                Err(err) => {
                    warn!(path = %config.font_path.display(), %err, "could not load font");
                    None
                }
            }
        } else {
            warn!(path = %config.font_path.display(), "font file not found; text disabled");
            None
        };
        Renderer { config, glyphs }
    }

    /// Occupancy grid, counters and the running chart of achieved counts.
    pub fn draw_frame(
        &mut self,
        window: &mut PistonWindow,
        event: &Event,
        frame: &FrameResult,
        history: &History,
        frame_count: usize,
    ) {
        let config = &self.config;
        let glyphs = &mut self.glyphs;

        window.draw_2d(event, |c, g, device| {
            clear(config.background_color, g);

            for (row, cells) in frame.grid.rows().enumerate() {
                for (col, &cell) in cells.iter().enumerate() {
                    rectangle(
                        config.cell_color(cell),
                        [
                            config.margin_x + col as f64 * config.cell_pitch,
                            config.margin_y + row as f64 * config.cell_pitch,
                            config.cell_size,
                            config.cell_size,
                        ],
                        c.transform,
                        g,
                    );
                }
            }

            let chart = config.chart();
            chart.draw_axes(c.transform, g);
            let y_max = (history.peak().max(1) as f64) * 1.1;
            chart.draw_series(
                history.herbivores().iter().map(|&n| n as f64),
                frame_count,
                y_max,
                config.herbivore_color,
                c.transform,
                g,
            );
            chart.draw_series(
                history.predators().iter().map(|&n| n as f64),
                frame_count,
                y_max,
                config.predator_color,
                c.transform,
                g,
            );

            if let Some(glyphs) = glyphs {
                let counts_y = config.margin_y + frame.grid.height() as f64 * config.cell_pitch + 30.0;
                label(glyphs, &config.title, 20, [config.window_width / 3.0, 30.0], &c, g);
                label(glyphs, &format!("Time: {}", frame.frame_index), 15, [20.0, 70.0], &c, g);
                label(
                    glyphs,
                    &format!("Predators: {}", frame.achieved_predators),
                    15,
                    [20.0, counts_y],
                    &c,
                    g,
                );
                label(
                    glyphs,
                    &format!("Herbivores: {}", frame.achieved_herbivores),
                    15,
                    [config.window_width / 3.0, counts_y],
                    &c,
                    g,
                );
                glyphs.factory.encoder.flush(device);
            }
        });
    }

    /// Final overlay of achieved against theoretical populations over time.
    pub fn draw_comparison(
        &mut self,
        window: &mut PistonWindow,
        event: &Event,
        series: &ComparisonSeries,
    ) {
        let config = &self.config;
        let glyphs = &mut self.glyphs;

        window.draw_2d(event, |c, g, device| {
            clear(config.background_color, g);

            let chart = Chart {
                left: 50.0,
                top: 80.0,
                width: config.window_width - 80.0,
                height: config.window_height - 160.0,
            };
            chart.draw_axes(c.transform, g);

            let n = series.len();
            let y_max = series.peak().max(1.0) * 1.1;
            let lines = [
                (
                    series.herbivore_achieved.iter().map(|&v| v as f64).collect::<Vec<_>>(),
                    config.herbivore_color,
                ),
                (
                    series.predator_achieved.iter().map(|&v| v as f64).collect(),
                    config.predator_color,
                ),
                (series.herbivore_theoretical.clone(), config.theoretical_herbivore_color),
                (series.predator_theoretical.clone(), config.theoretical_predator_color),
            ];
            for (values, color) in lines {
                chart.draw_series(values, n, y_max, color, c.transform, g);
            }

            if let Some(glyphs) = glyphs {
                label(glyphs, "Time Series", 20, [config.window_width / 3.0, 40.0], &c, g);
                let legend_y = config.window_height - 40.0;
                let legend = [
                    ("Herbivores", config.herbivore_color),
                    ("Predators", config.predator_color),
                    ("Theoretical H", config.theoretical_herbivore_color),
                    ("Theoretical P", config.theoretical_predator_color),
                ];
                for (i, (name, color)) in legend.iter().enumerate() {
                    let x = 20.0 + i as f64 * (config.window_width - 40.0) / 4.0;
                    rectangle(*color, [x, legend_y - 10.0, 10.0, 10.0], c.transform, g);
                    label(glyphs, name, 12, [x + 14.0, legend_y], &c, g);
                }
                if let (Some(first), Some(last)) = (series.time.first(), series.time.last()) {
                    let bottom = chart.top + chart.height + 18.0;
                    label(glyphs, &format!("{first:.1}"), 12, [chart.left, bottom], &c, g);
                    label(
                        glyphs,
                        &format!("{last:.1}"),
                        12,
                        [chart.left + chart.width - 20.0, bottom],
                        &c,
                        g,
                    );
                }
                glyphs.factory.encoder.flush(device);
            }
        });
    }
}

fn label(glyphs: &mut Glyphs, content: &str, size: u32, at: [f64; 2], c: &Context, g: &mut G2d) {
    let drawn = text::Text::new_color(BLACK, size).draw(
        content,
        glyphs,
        &c.draw_state,
        c.transform.trans(at[0], at[1]),
        g,
    );
    if let Err(err) = drawn {
        debug!(?err, content, "text draw failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_layout_matches_reference_window() {
        let config = RenderConfig::for_grid(GridSize::default(), PathBuf::from("missing.ttf"));
        assert_eq!(config.window_width, 500.0);
        assert_eq!(config.margin_x, 100.0);
        assert_eq!(config.margin_y, 100.0);
        assert_eq!(config.predator_color, rgb(204, 0, 0));
        assert!(config.chart_top > config.margin_y + 15.0 * config.cell_pitch);
    }

    #[test]
    fn wide_grids_grow_the_window() {
        let size = GridSize {
            width: 40,
            height: 10,
        };
        let config = RenderConfig::for_grid(size, PathBuf::new());
        assert!(config.window_width >= 40.0 * config.cell_pitch);
        assert!(config.margin_x >= 0.0);
    }

    #[test]
    fn chart_points_stay_inside_the_area() {
        let chart = Chart {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(chart.point(0.0, 0.0, 10.0), [10.0, 70.0]);
        assert_eq!(chart.point(1.0, 10.0, 10.0), [110.0, 20.0]);
        assert_eq!(chart.point(2.0, 99.0, 10.0), [110.0, 20.0]);
        assert_eq!(chart.point(0.5, 5.0, 0.0), [60.0, 70.0]);
    }
}
