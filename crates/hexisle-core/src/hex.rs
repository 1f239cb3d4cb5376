//! Offset-row hex coordinates for the board grid.
//!
//! Hexes are pointy-top and laid out in rows. Odd rows sit half a hex to the
//! right of even rows, so the neighbour offsets depend on row parity.
//!
//! Every hex has six sides and six corners, numbered counter-clockwise from
//! the east:
//! - side `k` faces `Direction::ALL[k]`
//! - corner `k` lies between sides `k` and `k + 1`
//!
//! which makes side `k` run from corner `k` to corner `k - 1`.

use serde::{Deserialize, Serialize};

/// Direction of a side (and of the neighbouring hex across it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Right
    East,
    /// Top-right
    NorthEast,
    /// Top-left
    NorthWest,
    /// Left
    West,
    /// Bottom-left
    SouthWest,
    /// Bottom-right
    SouthEast,
}

impl Direction {
    /// All directions in counter-clockwise order starting from East
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// Side/corner index of this direction (0-5)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index, wrapping modulo 6
    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 6]
    }

    /// Parse a facing digit (`'0'..='5'`)
    pub fn from_digit(digit: char) -> Option<Direction> {
        match digit.to_digit(10)? {
            d @ 0..=5 => Some(Self::from_index(d as usize)),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    /// Rotate counter-clockwise by `steps` sixths of a turn
    pub const fn rotate(self, steps: usize) -> Direction {
        Self::from_index(self.index() + steps)
    }
}

/// Position of a hex on the sparse grid: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct HexPos {
    pub x: i32,
    pub y: i32,
}

impl HexPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether this hex sits on a row shifted half a hex to the right
    pub const fn is_odd_row(&self) -> bool {
        self.y.rem_euclid(2) == 1
    }

    /// The hex across the side facing `direction`
    pub fn neighbor(&self, direction: Direction) -> HexPos {
        let odd = self.is_odd_row() as i32;
        let even = 1 - odd;
        match direction {
            Direction::East => HexPos::new(self.x + 1, self.y),
            Direction::West => HexPos::new(self.x - 1, self.y),
            Direction::NorthEast => HexPos::new(self.x + odd, self.y - 1),
            Direction::NorthWest => HexPos::new(self.x - even, self.y - 1),
            Direction::SouthEast => HexPos::new(self.x + odd, self.y + 1),
            Direction::SouthWest => HexPos::new(self.x - even, self.y + 1),
        }
    }

    /// The six neighbouring hexes in side order
    pub fn neighbors(&self) -> [HexPos; 6] {
        Direction::ALL.map(|dir| self.neighbor(dir))
    }

    /// The same side as seen from the hex across it.
    pub fn side_alias(&self, side: usize) -> (HexPos, usize) {
        let dir = Direction::from_index(side);
        (self.neighbor(dir), dir.opposite().index())
    }

    /// The same corner as seen from the two other hexes that touch it.
    ///
    /// Corner `k` is corner `k + 2` of the neighbour across side `k`, and
    /// corner `k + 4` of the neighbour across side `k + 1`.
    pub fn corner_aliases(&self, corner: usize) -> [(HexPos, usize); 2] {
        let corner = corner % 6;
        [
            (self.neighbor(Direction::from_index(corner)), (corner + 2) % 6),
            (self.neighbor(Direction::from_index(corner + 1)), (corner + 4) % 6),
        ]
    }
}

/// The two sides meeting at a corner: `[corner, corner + 1]`
pub const fn corner_sides(corner: usize) -> [usize; 2] {
    [corner % 6, (corner + 1) % 6]
}

/// The two corners at the ends of a side: `[side, side - 1]`
pub const fn side_corners(side: usize) -> [usize; 2] {
    [side % 6, (side + 5) % 6]
}
