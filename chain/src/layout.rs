//! Places gear centers along a line and hands out directions, starting
//! angles and marked teeth.

use crate::{Chain, Direction, Gear, LineArrangement, TaskConfig};
use kurbo::Point;
use rand::Rng;
use std::f64::consts::{PI, SQRT_2, TAU};

/// The random choices a chain is built from.
///
/// Drawing these is the only place layout touches the random source,
/// so a chain can also be built from hand-picked choices.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ChainSeed {
    pub num_gears: usize,
    pub first_direction: Direction,
    pub arrangement: LineArrangement,
    /// rotation of the first gear
    pub first_angle: f64,
    pub marked_teeth: Vec<usize>,
}

impl ChainSeed {
    /// Draws the choices for one chain. The order of draws is fixed:
    /// gear count, first direction, arrangement, first angle, then one
    /// marked tooth per gear.
    pub fn draw<R: Rng + ?Sized>(config: &TaskConfig, rng: &mut R) -> Self {
        let num_gears = rng.random_range(config.min_gears..=config.max_gears);
        let first_direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        let arrangement = LineArrangement::ALL[rng.random_range(0..LineArrangement::ALL.len())];
        let first_angle = rng.random_range(0.0..TAU);
        let marked_teeth = (0..num_gears)
            .map(|_| rng.random_range(0..config.tooth_count))
            .collect();

        Self {
            num_gears,
            first_direction,
            arrangement,
            first_angle,
            marked_teeth,
        }
    }

    /// Direction of the last gear, from the parity of the gear count.
    pub fn last_direction(&self) -> Direction {
        Direction::at_index(self.first_direction, self.num_gears.saturating_sub(1))
    }
}

/// Centers of `num_gears` gears `spacing` apart along `arrangement`,
/// centered in an image of `size`.
///
/// Diagonal steps are `spacing/√2` per axis so that the distance between
/// neighbors is still `spacing`.
pub fn centers(
    num_gears: usize,
    size: (u32, u32),
    spacing: f64,
    arrangement: LineArrangement,
) -> Vec<Point> {
    let (w, h) = (size.0 as f64, size.1 as f64);
    let steps = num_gears.saturating_sub(1) as f64;

    let (start, step) = match arrangement {
        LineArrangement::Horizontal => {
            let total = steps * spacing;
            (Point::new((w - total) / 2., h / 2.), (spacing, 0.))
        }
        LineArrangement::Vertical => {
            let total = steps * spacing;
            (Point::new(w / 2., (h - total) / 2.), (0., spacing))
        }
        LineArrangement::DiagonalDown => {
            let s = spacing / SQRT_2;
            let total = steps * s;
            (Point::new((w - total) / 2., (h - total) / 2.), (s, s))
        }
        LineArrangement::DiagonalUp => {
            let s = spacing / SQRT_2;
            let total = steps * s;
            (Point::new((w - total) / 2., (h + total) / 2.), (s, -s))
        }
    };

    (0..num_gears)
        .map(|i| Point::new(start.x + i as f64 * step.0, start.y + i as f64 * step.1))
        .collect()
}

/// Starting rotations: the first gear takes `first_angle`, every later
/// gear starts half a tooth past the line back to its predecessor so the
/// teeth begin staggered.
pub fn initial_angles(centers: &[Point], tooth_count: usize, first_angle: f64) -> Vec<f64> {
    let half_step = PI / tooth_count as f64;

    let mut out = Vec::with_capacity(centers.len());
    for (i, c) in centers.iter().enumerate() {
        if i == 0 {
            out.push(angles::normalize(first_angle));
            continue;
        }
        let prev = centers[i - 1];
        let connection = angles::heading(prev.x, prev.y, c.x, c.y);
        out.push(angles::normalize(connection + PI + half_step));
    }
    out
}

/// Lays out the chain described by `seed`. Angles are provisional until
/// the mesh resolver has run.
pub fn plan(config: &TaskConfig, seed: &ChainSeed) -> Chain {
    let centers = centers(
        seed.num_gears,
        config.image_size,
        config.spacing(),
        seed.arrangement,
    );
    let angles = initial_angles(&centers, config.tooth_count, seed.first_angle);

    let gears = centers
        .into_iter()
        .zip(angles)
        .enumerate()
        .map(|(i, (center, initial_angle))| Gear {
            center,
            radius: config.gear_radius,
            tooth_count: config.tooth_count,
            initial_angle,
            direction: Direction::at_index(seed.first_direction, i),
            marked_tooth: seed.marked_teeth.get(i).copied().unwrap_or(0) % config.tooth_count,
        })
        .collect();

    Chain {
        gears,
        arrangement: seed.arrangement,
    }
}
