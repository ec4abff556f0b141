/// Achieved counts per frame, appended in frame order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    herbivores: Vec<usize>,
    predators: Vec<usize>,
    frames: Vec<usize>,
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        History {
            herbivores: Vec::with_capacity(capacity),
            predators: Vec::with_capacity(capacity),
            frames: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, frame: usize, herbivores: usize, predators: usize) {
        debug_assert_eq!(frame, self.frames.len());
        self.frames.push(frame);
        self.herbivores.push(herbivores);
        self.predators.push(predators);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn herbivores(&self) -> &[usize] {
        &self.herbivores
    }

    pub fn predators(&self) -> &[usize] {
        &self.predators
    }

    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    /// Largest achieved count of either species so far.
    pub fn peak(&self) -> usize {
        self.herbivores
            .iter()
            .chain(&self.predators)
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Index-aligned series for the end-of-run overlay of achieved against
/// theoretical (scaled, untruncated) populations.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub time: Vec<f64>,
    pub herbivore_achieved: Vec<usize>,
    pub predator_achieved: Vec<usize>,
    pub herbivore_theoretical: Vec<f64>,
    pub predator_theoretical: Vec<f64>,
}

impl ComparisonSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Mean of `|achieved - theoretical|` per species, ignoring non-finite samples.
    pub fn mean_abs_deviation(&self) -> (f64, f64) {
        (
            mean_abs_deviation(&self.herbivore_achieved, &self.herbivore_theoretical),
            mean_abs_deviation(&self.predator_achieved, &self.predator_theoretical),
        )
    }

    /// Largest finite value across all four series, for chart scaling.
    pub fn peak(&self) -> f64 {
        self.herbivore_achieved
            .iter()
            .chain(&self.predator_achieved)
            .map(|&n| n as f64)
            .chain(self.herbivore_theoretical.iter().copied())
            .chain(self.predator_theoretical.iter().copied())
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

fn mean_abs_deviation(achieved: &[usize], theoretical: &[f64]) -> f64 {
    let (sum, n) = achieved
        .iter()
        .zip(theoretical)
        .filter(|(_, t)| t.is_finite())
        .fold((0.0, 0usize), |(sum, n), (&a, &t)| {
            (sum + (a as f64 - t).abs(), n + 1)
        });
    if n == 0 { 0.0 } else { sum / n as f64 }
}
