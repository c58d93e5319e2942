use super::DEGREE;
use std::f64::consts::TAU;

/// The step parameters for OffsetSweep.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SweepParams {
    /// Distance between consecutive candidates, in radians.
    pub step: f64,
    /// Exclusive upper bound of the sweep, in radians.
    pub max: f64,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            step: DEGREE,
            max: 2.0 * TAU,
        }
    }
}

impl SweepParams {
    /// Number of candidates the sweep yields.
    ///
    /// The small bias keeps `4π / 1°` at 720 steps rather than
    /// flickering to 719 on rounding.
    pub fn steps(&self) -> usize {
        if !(self.step > 0.0) || !(self.max > 0.0) {
            return 0;
        }
        (self.max / self.step + 1e-9).floor() as usize
    }
}

/// An iterator that yields non-negative offsets `0, step, 2·step, ...`
/// lazily, stopping before `max`.
#[derive(Clone, Debug)]
pub struct OffsetSweep {
    step: f64,
    steps: usize,
    i: usize,
}

impl OffsetSweep {
    pub fn new(params: &SweepParams) -> Self {
        Self {
            step: params.step,
            steps: params.steps(),
            i: 0,
        }
    }

    /// How many candidates have been handed out so far.
    pub fn taken(&self) -> usize {
        self.i
    }
}

impl Iterator for OffsetSweep {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.steps {
            return None;
        }
        let out = self.i as f64 * self.step;
        self.i += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.steps - self.i;
        (left, Some(left))
    }
}

impl ExactSizeIterator for OffsetSweep {}
