use crate::Gear;

/// Spin direction of a gear, as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Clockwise, Direction::Counterclockwise];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
        }
    }

    /// Direction of the gear at `index` in a chain whose first gear
    /// turns `first`.
    pub fn at_index(first: Direction, index: usize) -> Self {
        if index % 2 == 0 {
            first
        } else {
            first.opposite()
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Clockwise => write!(f, "clockwise"),
            Direction::Counterclockwise => write!(f, "counterclockwise"),
        }
    }
}

/// The line the gear centers are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineArrangement {
    Horizontal,
    Vertical,
    /// top-left to bottom-right
    DiagonalDown,
    /// bottom-left to top-right
    DiagonalUp,
}

impl LineArrangement {
    pub const ALL: [LineArrangement; 4] = [
        LineArrangement::Horizontal,
        LineArrangement::Vertical,
        LineArrangement::DiagonalDown,
        LineArrangement::DiagonalUp,
    ];

    pub fn is_diagonal(&self) -> bool {
        matches!(
            self,
            LineArrangement::DiagonalDown | LineArrangement::DiagonalUp
        )
    }
}

impl std::fmt::Display for LineArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineArrangement::Horizontal => write!(f, "horizontal"),
            LineArrangement::Vertical => write!(f, "vertical"),
            LineArrangement::DiagonalDown => write!(f, "diagonal_down"),
            LineArrangement::DiagonalUp => write!(f, "diagonal_up"),
        }
    }
}

/// Chain stores an ordered run of gears. Index order is adjacency:
/// gear `i` meshes with gears `i-1` and `i+1`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Chain {
    pub gears: Vec<Gear>,
    pub arrangement: LineArrangement,
}

impl Chain {
    pub fn len(&self) -> usize {
        self.gears.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gears.is_empty()
    }

    pub fn first_direction(&self) -> Option<Direction> {
        self.gears.first().map(|g| g.direction)
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.gears.last().map(|g| g.direction)
    }

    /// True if no two neighbors spin the same way.
    pub fn directions_alternate(&self) -> bool {
        self.gears
            .windows(2)
            .all(|w| w[0].direction != w[1].direction)
    }

    /// Angle of the line from the center of gear `i` to gear `i+1`.
    ///
    /// Panics if `i+1` is out of bounds.
    pub fn connection_angle(&self, i: usize) -> f64 {
        let (a, b) = (&self.gears[i], &self.gears[i + 1]);
        a.bearing_to(b.center)
    }

    /// The sign an animation offset is applied with for gear `i`:
    /// even gears advance, odd gears retreat.
    pub fn rotation_sign(i: usize) -> f64 {
        if i % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Rotation of gear `i` once the animation has advanced by `offset`.
    pub fn gear_angle(&self, i: usize, offset: f64) -> f64 {
        self.gears[i].initial_angle + Chain::rotation_sign(i) * offset
    }
}
