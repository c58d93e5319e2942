//! Initial-instant tooth collision resolution between neighboring gears.
//!
//! Only teeth in the mesh zone are compared: those pointing roughly
//! along the line between the two centers. A pair collides if any two
//! such tips are closer than the safe distance.
//!
//! Resolution is best effort. Every pair is bounded to
//! `3 * max_iterations` steps, and a pair that is still colliding at that
//! point keeps the least-bad angles seen and is reported as residual.
//! Pairs are processed left to right and never revisited, so moving gear
//! `i` while resolving `(i, i+1)` can disturb `(i-1, i)`. The audit in
//! [`MeshReport::residual_pairs`] catches that case.

use crate::{Chain, Gear, MeshParams, ToothProfile};
use kurbo::Point;

/// Geometry the resolver tests against.
#[derive(Clone, Debug)]
pub struct MeshGeometry {
    pub profile: ToothProfile,
    pub params: MeshParams,
}

impl MeshGeometry {
    pub fn new(profile: ToothProfile, params: MeshParams) -> Self {
        Self { profile, params }
    }

    pub fn min_safe_distance(&self) -> f64 {
        self.params.min_safe_distance(&self.profile)
    }

    /// Tips of the teeth of `gear` (rotated to `angle`) that face `toward`.
    pub fn facing_tips(&self, gear: &Gear, angle: f64, toward: Point) -> Vec<Point> {
        let bearing = gear.bearing_to(toward);
        gear.teeth(angle, &self.profile)
            .filter(|t| {
                angles::wrapped_diff(t.facing, bearing).abs() <= self.params.facing_tolerance
            })
            .map(|t| t.tip)
            .collect()
    }

    /// Smallest distance between facing tips of the two gears, or
    /// infinity if either has no tooth in the mesh zone.
    pub fn clearance(&self, a: &Gear, angle_a: f64, b: &Gear, angle_b: f64) -> f64 {
        let tips_a = self.facing_tips(a, angle_a, b.center);
        let tips_b = self.facing_tips(b, angle_b, a.center);

        let mut min = f64::INFINITY;
        for p in tips_a.iter() {
            for q in tips_b.iter() {
                min = min.min(p.distance(*q));
            }
        }
        min
    }

    pub fn collides(&self, a: &Gear, angle_a: f64, b: &Gear, angle_b: f64) -> bool {
        self.clearance(a, angle_a, b, angle_b) < self.min_safe_distance()
    }
}

/// Stage of the per-pair resolver. Each stage but the last runs for at
/// most `max_iterations` steps before handing over to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum ResolveState {
    /// rotate the right-hand gear
    AdvanceNeighbor,
    /// rotate the left-hand gear
    AdvanceSelf,
    /// rotate right on even iterations, left on odd
    Alternate,
    Exhausted,
}

impl ResolveState {
    pub fn next(self) -> Self {
        use ResolveState::*;
        match self {
            AdvanceNeighbor => AdvanceSelf,
            AdvanceSelf => Alternate,
            Alternate | Exhausted => Exhausted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum PairOutcome {
    Clear,
    /// Ran out of steps. The pair is left at the angles with the largest
    /// clearance seen, which is still below the safe distance.
    Residual { clearance: f64 },
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PairReport {
    /// index of the left-hand gear
    pub index: usize,
    pub outcome: PairOutcome,
    /// the stage the resolver finished in
    pub state: ResolveState,
    /// how many times a gear was advanced
    pub steps: usize,
}

/// Resolves a single pair of gears, one step at a time.
#[derive(Debug, Clone)]
pub struct PairResolver<'a> {
    geometry: &'a MeshGeometry,
    index: usize,
    left: Gear,
    right: Gear,

    state: ResolveState,
    iteration: usize,
    steps: usize,

    // largest clearance seen, with the (left, right) angles it was seen at
    best: (f64, f64, f64),
}

impl<'a> PairResolver<'a> {
    /// `index` is the position of `left` in the chain; `right` is its
    /// successor.
    pub fn new(geometry: &'a MeshGeometry, index: usize, left: &Gear, right: &Gear) -> Self {
        Self {
            geometry,
            index,
            left: left.clone(),
            right: right.clone(),
            state: ResolveState::AdvanceNeighbor,
            iteration: 0,
            steps: 0,
            best: (f64::NEG_INFINITY, left.initial_angle, right.initial_angle),
        }
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn angles(&self) -> (f64, f64) {
        (self.left.initial_angle, self.right.initial_angle)
    }

    pub fn clearance(&self) -> f64 {
        self.geometry.clearance(
            &self.left,
            self.left.initial_angle,
            &self.right,
            self.right.initial_angle,
        )
    }

    fn advance_left(&mut self) {
        self.left.initial_angle =
            angles::normalize(self.left.initial_angle + self.geometry.params.adjustment_step);
    }

    fn advance_right(&mut self) {
        self.right.initial_angle =
            angles::normalize(self.right.initial_angle + self.geometry.params.adjustment_step);
    }

    /// Tests the current angles and, if they collide, advances one gear
    /// according to the current stage. Returns the outcome once the pair
    /// is clear or the resolver is exhausted.
    pub fn step(&mut self) -> Option<PairOutcome> {
        let clearance = self.clearance();
        if clearance > self.best.0 {
            self.best = (clearance, self.left.initial_angle, self.right.initial_angle);
        }
        if clearance >= self.geometry.min_safe_distance() {
            return Some(PairOutcome::Clear);
        }

        if self.iteration >= self.geometry.params.max_iterations {
            self.state = self.state.next();
            self.iteration = 0;
        }

        match self.state {
            ResolveState::AdvanceNeighbor => self.advance_right(),
            ResolveState::AdvanceSelf => self.advance_left(),
            ResolveState::Alternate => {
                if self.iteration % 2 == 0 {
                    self.advance_right();
                } else {
                    self.advance_left();
                }
            }
            ResolveState::Exhausted => {
                let (clearance, l, r) = self.best;
                self.left.initial_angle = l;
                self.right.initial_angle = r;
                return Some(PairOutcome::Residual { clearance });
            }
        }

        self.iteration += 1;
        self.steps += 1;
        None
    }

    /// Steps until done, returning the report and the final
    /// (left, right) angles.
    pub fn run(mut self) -> (PairReport, (f64, f64)) {
        let outcome = loop {
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };

        (
            PairReport {
                index: self.index,
                outcome,
                state: self.state,
                steps: self.steps,
            },
            self.angles(),
        )
    }
}

/// What the resolver did to a chain.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MeshReport {
    pub pairs: Vec<PairReport>,
    /// Left-hand indices of pairs that still collide once every pair
    /// has been processed.
    pub residual_pairs: Vec<usize>,
}

impl MeshReport {
    pub fn is_clear(&self) -> bool {
        self.residual_pairs.is_empty()
    }

    pub fn total_steps(&self) -> usize {
        self.pairs.iter().map(|p| p.steps).sum()
    }
}

/// Pairs of `chain` that currently collide, by left-hand index.
pub fn colliding_pairs(chain: &Chain, geometry: &MeshGeometry) -> Vec<usize> {
    chain
        .gears
        .windows(2)
        .enumerate()
        .filter(|(_, w)| geometry.collides(&w[0], w[0].initial_angle, &w[1], w[1].initial_angle))
        .map(|(i, _)| i)
        .collect()
}

/// Rewrites the initial angles of `chain` so neighboring teeth do not
/// overlap, as far as the step bounds allow.
pub fn resolve(chain: &mut Chain, geometry: &MeshGeometry) -> MeshReport {
    let mut pairs = Vec::with_capacity(chain.len().saturating_sub(1));

    for i in 0..chain.len().saturating_sub(1) {
        let resolver = PairResolver::new(geometry, i, &chain.gears[i], &chain.gears[i + 1]);
        let (report, (left, right)) = resolver.run();
        chain.gears[i].initial_angle = left;
        chain.gears[i + 1].initial_angle = right;

        log::debug!(
            "pair {}-{}: {:?} after {} steps ({:?})",
            i,
            i + 1,
            report.outcome,
            report.steps,
            report.state
        );
        pairs.push(report);
    }

    let residual_pairs = colliding_pairs(chain, geometry);
    for i in residual_pairs.iter() {
        let (a, b) = (&chain.gears[*i], &chain.gears[*i + 1]);
        log::warn!(
            "gears {} and {} still overlap: clearance {:.2} < {:.2}",
            i,
            i + 1,
            geometry.clearance(a, a.initial_angle, b, b.initial_angle),
            geometry.min_safe_distance()
        );
    }

    MeshReport {
        pairs,
        residual_pairs,
    }
}
