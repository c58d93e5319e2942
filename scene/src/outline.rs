//! Vector outlines of a gear for renderers. Everything here is in image
//! coordinates and uses the same tooth geometry as the chain model.

use chain::{Direction, Gear, ToothProfile};
use kurbo::{BezPath, Circle, Point, Vec2};
use std::f64::consts::FRAC_PI_2;

/// How far below the body radius a tooth starts.
const TOOTH_ROOT_INSET: f64 = 5.;
/// The visible body is inset from the nominal radius.
const BODY_INSET: f64 = 10.;
/// The direction arrow runs this far inside the nominal radius.
const ARROW_INSET: f64 = 20.;
const ARROW_HEAD: f64 = 12.;

/// Closed quadrilateral for one tooth.
pub fn tooth_path(center: Point, radius: f64, facing: f64, profile: &ToothProfile) -> BezPath {
    let dir = Vec2::from_angle(facing);
    let side = Vec2::from_angle(facing + FRAC_PI_2) * (profile.width / 2.);

    let base = center + dir * (radius - TOOTH_ROOT_INSET);
    let tip = center + dir * (radius + profile.length);

    let mut path = BezPath::new();
    path.move_to(base - side);
    path.line_to(base + side);
    path.line_to(tip + side);
    path.line_to(tip - side);
    path.close_path();
    path
}

/// Outline of a gear rotated to `angle`.
#[derive(Clone, Debug)]
pub struct GearOutline {
    pub body: Circle,
    pub hub: Circle,
    /// one path per tooth, in tooth index order
    pub teeth: Vec<BezPath>,
    pub marked_tooth: usize,
    /// where the `G<n>` label goes
    pub label_anchor: Point,
}

impl GearOutline {
    pub fn new(gear: &Gear, angle: f64, profile: &ToothProfile) -> Self {
        let teeth = gear
            .teeth(angle, profile)
            .map(|t| tooth_path(gear.center, gear.radius, t.facing, profile))
            .collect();

        Self {
            body: Circle::new(gear.center, gear.radius - BODY_INSET),
            hub: Circle::new(gear.center, gear.radius / 5.),
            teeth,
            marked_tooth: gear.marked_tooth,
            label_anchor: Point::new(gear.center.x - 10., gear.center.y + gear.radius + 20.),
        }
    }
}

/// A curved arrow showing which way a gear turns.
#[derive(Clone, Debug)]
pub struct DirectionArrow {
    pub arc: BezPath,
    pub head: BezPath,
}

impl DirectionArrow {
    pub fn new(center: Point, radius: f64, direction: Direction) -> Self {
        // degrees; screen y points down, so growing angles run clockwise
        let (start, end) = match direction {
            Direction::Clockwise => (-60, 60),
            Direction::Counterclockwise => (120, 240),
        };
        let r = radius - ARROW_INSET;
        let on_arc = |deg: f64| center + Vec2::from_angle(deg.to_radians()) * r;

        let mut arc = BezPath::new();
        arc.move_to(on_arc(start as f64));
        for deg in (start + 5..=end).step_by(5) {
            arc.line_to(on_arc(deg as f64));
        }

        let end_rad = (end as f64).to_radians();
        let tangent = match direction {
            Direction::Clockwise => end_rad + FRAC_PI_2,
            Direction::Counterclockwise => end_rad - FRAC_PI_2,
        };
        let at = on_arc(end as f64);
        let tip = at + Vec2::from_angle(tangent) * ARROW_HEAD;
        let side = Vec2::from_angle(tangent + FRAC_PI_2) * (ARROW_HEAD * 0.6);

        let mut head = BezPath::new();
        head.move_to(tip);
        head.line_to(at + side);
        head.line_to(at - side);
        head.close_path();

        Self { arc, head }
    }
}
