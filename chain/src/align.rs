//! Finds how far to turn the chain so the marked teeth of the last two
//! gears meet on the line between their centers.

use crate::{AlignParams, Chain};
use angles::{arc_distance, OffsetSweep};
use std::f64::consts::PI;

/// Result of the offset search.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum Alignment {
    /// Smallest offset that satisfies both conditions.
    Found(f64),
    /// Nothing in the search range matched. The offset is a stand-in so
    /// the animation still has somewhere to go, not a solution.
    Fallback(f64),
}

impl Alignment {
    pub fn offset(&self) -> f64 {
        match self {
            Alignment::Found(r) | Alignment::Fallback(r) => *r,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Alignment::Found(_))
    }
}

/// The last two gears' marked teeth, reduced to what the search needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairTarget {
    /// angle of the line from the second-to-last center to the last
    pub connection: f64,
    /// marked tooth facing of the second-to-last gear at offset zero
    pub near: f64,
    pub near_sign: f64,
    /// marked tooth facing of the last gear at offset zero
    pub far: f64,
    pub far_sign: f64,
}

impl PairTarget {
    pub fn from_chain(chain: &Chain) -> Option<Self> {
        let n = chain.len();
        if n < 2 {
            return None;
        }
        let (i, j) = (n - 2, n - 1);
        let (near, far) = (&chain.gears[i], &chain.gears[j]);

        Some(Self {
            connection: chain.connection_angle(i),
            near: near.marked_facing(near.initial_angle),
            near_sign: Chain::rotation_sign(i),
            far: far.marked_facing(far.initial_angle),
            far_sign: Chain::rotation_sign(j),
        })
    }

    /// Angular distance of each marked tooth from its target after the
    /// chain has turned by `offset`: (near to the connection line, far to
    /// the connection line plus π).
    pub fn errors(&self, offset: f64) -> (f64, f64) {
        (
            arc_distance(self.near + self.near_sign * offset, self.connection),
            arc_distance(self.far + self.far_sign * offset, self.connection + PI),
        )
    }

    /// How far the pair is from being alignable at all.
    ///
    /// Turning the chain moves both teeth by the same amount, so one
    /// combination of their errors never changes. When the gears turn in
    /// opposite senses that is `near + far - (2·connection + π)`. Unless
    /// it is under roughly twice the tolerance, no offset can satisfy
    /// both conditions.
    pub fn joint_phase_error(&self) -> f64 {
        let near = self.near - self.connection;
        let far = self.far - self.connection - PI;
        arc_distance(self.far_sign * near - self.near_sign * far, 0.)
    }
}

/// Sweeps the offset upwards from zero and returns the first one that
/// brings both marked teeth within `params.tolerance` of their targets.
pub fn solve_pair(target: &PairTarget, params: &AlignParams) -> Alignment {
    let hit = OffsetSweep::new(&params.sweep).find(|r| {
        let (near, far) = target.errors(*r);
        near < params.tolerance && far < params.tolerance
    });

    match hit {
        Some(r) => Alignment::Found(r),
        None => Alignment::Fallback(params.fallback),
    }
}

/// Solves for the rotation offset of a resolved chain. Chains of fewer
/// than two gears are trivially aligned.
pub fn solve(chain: &Chain, params: &AlignParams) -> Alignment {
    match PairTarget::from_chain(chain) {
        Some(target) => {
            let out = solve_pair(&target, params);
            if !out.is_found() {
                log::warn!(
                    "no offset aligns the marked teeth (phase error {:.3} rad), \
                     using fallback {:.3}",
                    target.joint_phase_error(),
                    out.offset()
                );
            }
            out
        }
        None => Alignment::Found(0.),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Gear, LineArrangement};
    use angles::DEGREE;
    use kurbo::Point;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use std::f64::consts::TAU;

    fn gear(x: f64, y: f64, angle: f64, marked: usize, direction: Direction) -> Gear {
        Gear {
            center: Point::new(x, y),
            radius: 40.,
            tooth_count: 12,
            initial_angle: angle,
            direction,
            marked_tooth: marked,
        }
    }

    /// Three gears on a horizontal line, connection angle 0 between the
    /// last two. `far_angle` is chosen by the caller.
    fn chain(near_angle: f64, far_angle: f64, marked: (usize, usize)) -> Chain {
        Chain {
            gears: vec![
                gear(154., 256., 1.0, 0, Direction::Clockwise),
                gear(256., 256., near_angle, marked.0, Direction::Counterclockwise),
                gear(358., 256., far_angle, marked.1, Direction::Clockwise),
            ],
            arrangement: LineArrangement::Horizontal,
        }
    }

    /// Checks a solution against the chain geometry directly.
    fn assert_aligned(c: &Chain, r: f64, tol: f64) {
        let n = c.len();
        let (near, far) = (&c.gears[n - 2], &c.gears[n - 1]);
        let connection = (far.center.y - near.center.y).atan2(far.center.x - near.center.x);

        let near_facing = near.marked_facing(c.gear_angle(n - 2, r));
        let far_facing = far.marked_facing(c.gear_angle(n - 1, r));

        // the marked tip of the near gear lies on the center line
        let tip = near.center + kurbo::Vec2::from_angle(near_facing) * 55.;
        let along = kurbo::Vec2::from_angle(connection);
        let perp = (tip - near.center).cross(along).abs();
        assert!(perp < 55. * tol.sin(), "near tip {} off the line", perp);

        assert!(arc_distance(near_facing, connection) < tol);
        assert!(arc_distance(far_facing, connection + PI) < tol);
    }

    #[test]
    fn found_at_connection_zero() {
        // near gear is odd (turns back), far gear even (turns forward).
        // near: marked tooth 2 at 1.2 + 60° ; far must sum to π with it.
        let near_angle = 1.2;
        let near_facing = near_angle + 2. * TAU / 12.;
        let far_facing = PI - near_facing;
        let far_angle = far_facing - 7. * TAU / 12.;
        let c = chain(near_angle, far_angle, (2, 7));

        let target = PairTarget::from_chain(&c).unwrap();
        assert_eq!(target.connection, 0.);
        assert!(target.joint_phase_error() < 1e-9);

        let params = AlignParams::default();
        let out = solve(&c, &params);
        assert!(out.is_found(), "{:?}", out);
        assert_ne!(out, Alignment::Fallback(PI / 3.));
        assert_aligned(&c, out.offset(), 3. * DEGREE);

        // smallest: no earlier step works
        let r = out.offset();
        let mut k = 0.;
        while k * DEGREE < r - 1e-9 {
            let (e1, e2) = target.errors(k * DEGREE);
            assert!(!(e1 < params.tolerance && e2 < params.tolerance));
            k += 1.;
        }
    }

    #[test]
    fn already_aligned_is_zero() {
        // near marked tooth points at +x, far marked tooth at -x
        let c = chain(0., PI, (0, 0));
        assert_eq!(solve(&c, &AlignParams::default()), Alignment::Found(0.));
    }

    #[test]
    fn incompatible_phase_falls_back() {
        // far tooth sits half a tooth off the phase both would need
        let c = chain(0., PI + PI / 12., (0, 0));
        let target = PairTarget::from_chain(&c).unwrap();
        assert!((target.joint_phase_error() - PI / 12.).abs() < 1e-9);

        let out = solve(&c, &AlignParams::default());
        assert_eq!(out, Alignment::Fallback(PI / 3.));
        assert!(!out.is_found());
        assert_eq!(out.offset(), PI / 3.);
    }

    #[test]
    fn short_chains_are_trivial() {
        let c = Chain {
            gears: vec![gear(0., 0., 0., 0, Direction::Clockwise)],
            arrangement: LineArrangement::Vertical,
        };
        assert!(PairTarget::from_chain(&c).is_none());
        assert_eq!(solve(&c, &AlignParams::default()), Alignment::Found(0.));
    }

    #[test]
    fn zero_fallbacks_for_compatible_pairs() {
        let params = AlignParams::default();
        let mut rng = Pcg64::seed_from_u64(42);

        let spots = [
            (LineArrangement::Horizontal, (102., 0.)),
            (LineArrangement::Vertical, (0., 102.)),
            (LineArrangement::DiagonalDown, (72.12, 72.12)),
            (LineArrangement::DiagonalUp, (72.12, -72.12)),
        ];

        for _ in 0..2000 {
            let (arrangement, (dx, dy)) = spots[rng.random_range(0..spots.len())];
            let n = rng.random_range(2..=6usize);
            let mut gears: Vec<Gear> = (0..n)
                .map(|i| {
                    gear(
                        100. + i as f64 * dx,
                        300. + i as f64 * dy,
                        rng.random_range(0.0..TAU),
                        rng.random_range(0..12),
                        Direction::at_index(Direction::Clockwise, i),
                    )
                })
                .collect();

            // re-phase the last gear so the pair is alignable, give or take a degree
            let connection = dy.atan2(dx);
            let near = &gears[n - 2];
            let near_facing = near.marked_facing(near.initial_angle);
            let jitter = rng.random_range(-1.0..1.0) * DEGREE;
            let far_facing = 2. * connection + PI - near_facing + jitter;
            let last = &mut gears[n - 1];
            let marked_offset = last.marked_tooth as f64 * TAU / 12.;
            last.initial_angle = angles::normalize(far_facing - marked_offset);

            let c = Chain { gears, arrangement };
            let out = solve(&c, &params);
            assert!(out.is_found(), "fell back on {:?}", c);
            assert_aligned(&c, out.offset(), params.tolerance);
            assert!(out.offset() >= 0. && out.offset() < 4. * PI);
        }
    }
}
