//! Terrain, resources, ports and the sparse hex table they are loaded into.
//!
//! A [`HexGrid`] is what the text encoding produces and consumes; the
//! [`Board`](crate::board::Board) is built from it once per game.

use crate::hex::{Direction, HexPos};
use serde::{Deserialize, Serialize};

/// Resource types produced by land hexes and traded at ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Brick,
    Grain,
    Ore,
    Wool,
    Lumber,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Brick,
        Resource::Grain,
        Resource::Ore,
        Resource::Wool,
        Resource::Lumber,
    ];

    /// Position of this resource in per-resource arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Port letter in the map encoding
    pub const fn letter(self) -> char {
        match self {
            Resource::Brick => 'b',
            Resource::Grain => 'g',
            Resource::Ore => 'o',
            Resource::Wool => 'w',
            Resource::Lumber => 'l',
        }
    }
}

/// Type of hex terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Produces brick
    Hill,
    /// Produces grain
    Field,
    /// Produces ore
    Mountain,
    /// Produces wool
    Pasture,
    /// Produces lumber
    Forest,
    /// Produces nothing; the robber starts here
    Desert,
    /// Water; carries ports and ships
    Sea,
    /// Produces a resource of the owner's choice
    Gold,
}

impl Terrain {
    pub const fn letter(self) -> char {
        match self {
            Terrain::Hill => 'h',
            Terrain::Field => 'f',
            Terrain::Mountain => 'm',
            Terrain::Pasture => 'p',
            Terrain::Forest => 't',
            Terrain::Desert => 'd',
            Terrain::Sea => 's',
            Terrain::Gold => 'g',
        }
    }

    pub fn from_letter(letter: char) -> Option<Terrain> {
        Some(match letter {
            'h' => Terrain::Hill,
            'f' => Terrain::Field,
            'm' => Terrain::Mountain,
            'p' => Terrain::Pasture,
            't' => Terrain::Forest,
            'd' => Terrain::Desert,
            's' => Terrain::Sea,
            'g' => Terrain::Gold,
            _ => return None,
        })
    }

    pub const fn is_sea(self) -> bool {
        matches!(self, Terrain::Sea)
    }

    pub const fn is_land(self) -> bool {
        !self.is_sea()
    }

    /// Whether a dice roll is laid out on this terrain
    pub const fn produces(self) -> bool {
        !matches!(self, Terrain::Sea | Terrain::Desert)
    }

    /// The fixed resource this terrain yields (gold yields a choice)
    pub const fn resource(self) -> Option<Resource> {
        match self {
            Terrain::Hill => Some(Resource::Brick),
            Terrain::Field => Some(Resource::Grain),
            Terrain::Mountain => Some(Resource::Ore),
            Terrain::Pasture => Some(Resource::Wool),
            Terrain::Forest => Some(Resource::Lumber),
            Terrain::Desert | Terrain::Sea | Terrain::Gold => None,
        }
    }
}

/// Harbor types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Harbor {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl Harbor {
    /// The exchange rate for this harbor
    pub fn rate(&self) -> u32 {
        match self {
            Harbor::Generic => 3,
            Harbor::Specific(_) => 2,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Harbor::Generic => '?',
            Harbor::Specific(resource) => resource.letter(),
        }
    }

    pub fn from_letter(letter: char) -> Option<Harbor> {
        if letter == '?' {
            return Some(Harbor::Generic);
        }
        Resource::ALL
            .into_iter()
            .find(|r| r.letter() == letter)
            .map(Harbor::Specific)
    }
}

/// A port on a sea hex, opening onto the side it faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    pub harbor: Harbor,
    pub facing: Direction,
}

/// Load-time description of one populated grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    /// Only sea tiles carry ports
    pub port: Option<Port>,
    /// Order in which this hex receives a dice roll (land only)
    pub chit: Option<u32>,
    /// Whether terrain shuffling may move this tile
    pub shuffle: bool,
}

impl Tile {
    pub fn land(terrain: Terrain, chit: u32) -> Self {
        Self {
            terrain,
            port: None,
            chit: Some(chit),
            shuffle: true,
        }
    }

    pub fn sea() -> Self {
        Self {
            terrain: Terrain::Sea,
            port: None,
            chit: None,
            shuffle: true,
        }
    }

    pub fn port(harbor: Harbor, facing: Direction) -> Self {
        Self {
            port: Some(Port { harbor, facing }),
            ..Self::sea()
        }
    }

    /// Exempt this tile from shuffling
    pub fn fixed(self) -> Self {
        Self {
            shuffle: false,
            ..self
        }
    }
}

/// Sparse row-major table of tiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexGrid {
    width: i32,
    height: i32,
    cells: Vec<Option<Tile>>,
}

impl HexGrid {
    /// Create an empty grid of the given size
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Build a grid from rows of cells, sized to the widest/tallest populated row
    pub fn from_rows(rows: Vec<Vec<Option<Tile>>>) -> Self {
        let height = rows
            .iter()
            .rposition(|row| row.iter().any(Option::is_some))
            .map_or(0, |y| y + 1);
        let width = rows
            .iter()
            .filter_map(|row| row.iter().rposition(Option::is_some))
            .max()
            .map_or(0, |x| x + 1);

        let mut grid = Self::new(width as i32, height as i32);
        for (y, row) in rows.into_iter().take(height).enumerate() {
            for (x, cell) in row.into_iter().take(width).enumerate() {
                if let Some(tile) = cell {
                    grid.set(HexPos::new(x as i32, y as i32), tile);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub(crate) fn index(&self, pos: HexPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn get(&self, pos: HexPos) -> Option<&Tile> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    /// Place a tile; positions outside the grid are ignored
    pub fn set(&mut self, pos: HexPos, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Some(tile);
        }
    }

    /// Populated cells in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (HexPos, &Tile)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let pos = HexPos::new(i as i32 % width, i as i32 / width);
            cell.as_ref().map(|tile| (pos, tile))
        })
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
