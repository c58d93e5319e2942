use crate::Direction;
use kurbo::{Point, Vec2};
use std::f64::consts::TAU;

/// Number of teeth on every gear the generator produces.
pub const STANDARD_TOOTH_COUNT: usize = 12;

/// Tooth dimensions, shared with whatever draws the gears so that the
/// modeled and rendered teeth agree.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ToothProfile {
    /// distance from the body radius to the tooth tip
    pub length: f64,
    pub width: f64,
}

impl ToothProfile {
    pub const STANDARD: ToothProfile = ToothProfile {
        length: 15.,
        width: 8.,
    };
}

impl Default for ToothProfile {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A single tooth, derived from a gear and a rotation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooth {
    pub index: usize,
    pub tip: Point,
    /// direction the tooth points, from the gear center
    pub facing: f64,
}

/// Iterator over the teeth of a gear at some rotation angle.
#[derive(Debug, Clone)]
pub struct Teeth {
    center: Point,
    reach: f64,
    angle: f64,
    count: usize,
    i: usize,
}

impl Teeth {
    pub fn new(
        center: Point,
        radius: f64,
        angle: f64,
        count: usize,
        profile: &ToothProfile,
    ) -> Self {
        Self {
            center,
            reach: radius + profile.length,
            angle,
            count,
            i: 0,
        }
    }
}

impl Iterator for Teeth {
    type Item = Tooth;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.count {
            return None;
        }
        let index = self.i;
        self.i += 1;

        let facing = facing_angle(self.angle, index, self.count);
        Some(Tooth {
            index,
            tip: self.center + Vec2::from_angle(facing) * self.reach,
            facing,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.i;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Teeth {}

/// Facing angle of tooth `index` on a gear rotated to `angle`.
pub fn facing_angle(angle: f64, index: usize, count: usize) -> f64 {
    angle + TAU * index as f64 / count as f64
}

/// One gear in a chain.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Gear {
    pub center: Point,
    pub radius: f64,
    pub tooth_count: usize,
    /// rotation at the initial instant, before any animation offset
    pub initial_angle: f64,
    pub direction: Direction,
    /// the distinguished (green) tooth
    pub marked_tooth: usize,
}

impl Gear {
    /// angular spacing between teeth
    pub fn tooth_step(&self) -> f64 {
        TAU / self.tooth_count as f64
    }

    /// tip circle radius, aka outer-most radius
    pub fn r_tip(&self, profile: &ToothProfile) -> f64 {
        self.radius + profile.length
    }

    pub fn teeth(&self, angle: f64, profile: &ToothProfile) -> Teeth {
        Teeth::new(self.center, self.radius, angle, self.tooth_count, profile)
    }

    /// Facing angle of the marked tooth when the gear is rotated to `angle`.
    pub fn marked_facing(&self, angle: f64) -> f64 {
        facing_angle(angle, self.marked_tooth, self.tooth_count)
    }

    /// Direction from this gear's center towards `p`.
    pub fn bearing_to(&self, p: Point) -> f64 {
        angles::heading(self.center.x, self.center.y, p.x, p.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn gear() -> Gear {
        Gear {
            center: Point::new(100., 50.),
            radius: 40.,
            tooth_count: STANDARD_TOOTH_COUNT,
            initial_angle: 0.,
            direction: Direction::Clockwise,
            marked_tooth: 3,
        }
    }

    #[test]
    fn basic_dimensions() {
        let g = gear();
        assert_eq!(g.r_tip(&ToothProfile::STANDARD), 55.0);
        assert!((g.tooth_step() - PI / 6.0).abs() < 1e-12);
        assert!((g.marked_facing(0.25) - (0.25 + PI / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn tooth_tips() {
        let g = gear();
        let teeth: Vec<Tooth> = g.teeth(0., &ToothProfile::STANDARD).collect();
        assert_eq!(teeth.len(), 12);

        // tooth 0 points along +x
        assert!((teeth[0].tip.x - 155.).abs() < 1e-9);
        assert!((teeth[0].tip.y - 50.).abs() < 1e-9);
        // tooth 3 points along +y (down, in image space)
        assert!((teeth[3].tip.x - 100.).abs() < 1e-9);
        assert!((teeth[3].tip.y - 105.).abs() < 1e-9);

        for t in teeth.iter() {
            assert!((t.tip.distance(g.center) - 55.).abs() < 1e-9);
            assert!((t.facing - t.index as f64 * PI / 6.).abs() < 1e-12);
        }
    }

    #[test]
    fn rotation_shifts_every_tooth() {
        let g = gear();
        let a = 0.3;
        for (t0, t1) in g
            .teeth(0., &ToothProfile::STANDARD)
            .zip(g.teeth(a, &ToothProfile::STANDARD))
        {
            assert!((t1.facing - t0.facing - a).abs() < 1e-12);
        }
    }

    #[test]
    fn bearing() {
        let g = gear();
        assert_eq!(g.bearing_to(Point::new(200., 50.)), 0.);
        assert!((g.bearing_to(Point::new(100., 0.)) + PI / 2.).abs() < 1e-12);
    }
}
