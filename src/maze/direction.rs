use std::fmt;

/// One of the four compass directions a robot or wall can face.
///
/// The coordinate system puts (1, 1) in the upper left, so moving
/// north decreases y and moving south increases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed compass priority used whenever neighbors are scanned in
    /// order. Doubles as the documented flood-fill tie-break order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The direction 90 degrees counter-clockwise from this one.
    pub fn left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// The direction 90 degrees clockwise from this one.
    pub fn right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Unit cell offset for a move in this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Heading in radians, for renderers. North is up (-pi/2 in the
    /// usual screen coordinate system where y grows downward).
    pub fn angle(self) -> f64 {
        use std::f64::consts::FRAC_PI_2;
        match self {
            Self::East => 0.0,
            Self::South => FRAC_PI_2,
            Self::West => 2.0 * FRAC_PI_2,
            Self::North => 3.0 * FRAC_PI_2,
        }
    }

    /// ASCII glyph pointing this way.
    pub fn arrow(self) -> char {
        match self {
            Self::North => '^',
            Self::East => '>',
            Self::South => 'v',
            Self::West => '<',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        };
        f.write_str(name)
    }
}
