//! Text encoding of a hex grid.
//!
//! One line per grid row, one token per hex:
//! - a terrain letter (`h f m p t d g s`), or `-` for an absent slot
//! - for `s` only, an optional port letter (`b g o w l ?`) and facing digit `0-5`
//! - an optional decimal chit sequence index (required on land)
//! - an optional `+` exempting the hex from shuffling
//!
//! Tokens may be separated by commas or whitespace, or run together. The
//! encoder always writes commas so that a sea hex next to a gold hex cannot be
//! mistaken for a grain port.

use crate::grid::{Harbor, HexGrid, Port, Terrain, Tile};
use crate::hex::{Direction, HexPos};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Errors that stop a map from loading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("land hex at ({x}, {y}) has no chit sequence index")]
    MissingChit { x: i32, y: i32 },

    #[error("chit sequence index {index} at ({x}, {y}) is already used")]
    DuplicateChit { index: u32, x: i32, y: i32 },

    #[error("map contains no hexes")]
    Empty,
}

/// A token that was skipped while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// 1-based character column
    pub column: usize,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
    }
}

/// Parse map text, returning the grid and every non-fatal warning
pub fn parse_grid(text: &str) -> Result<(HexGrid, Vec<ParseWarning>), ParseError> {
    let mut warnings = Vec::new();
    let rows: Vec<Vec<Option<Tile>>> = text
        .lines()
        .enumerate()
        .map(|(i, line)| parse_row(i + 1, line, &mut warnings))
        .collect();

    let grid = HexGrid::from_rows(rows);
    if grid.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut used: HashMap<u32, HexPos> = HashMap::new();
    for (pos, tile) in grid.tiles() {
        if tile.terrain.is_sea() {
            continue;
        }
        let index = tile.chit.ok_or(ParseError::MissingChit { x: pos.x, y: pos.y })?;
        if used.insert(index, pos).is_some() {
            return Err(ParseError::DuplicateChit {
                index,
                x: pos.x,
                y: pos.y,
            });
        }
    }

    Ok((grid, warnings))
}

fn is_token_boundary(c: char) -> bool {
    c == ',' || c == '-' || c.is_whitespace() || Terrain::from_letter(c).is_some()
}

fn parse_row(line: usize, text: &str, warnings: &mut Vec<ParseWarning>) -> Vec<Option<Tile>> {
    let chars: Vec<char> = text.chars().collect();
    let mut warn_at = |column: usize, message: String| {
        warn!(line, column, "{}", message);
        warnings.push(ParseWarning {
            line,
            column,
            message,
        });
    };

    let mut row = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == ',' || c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '-' {
            row.push(None);
            i += 1;
            continue;
        }

        let Some(terrain) = Terrain::from_letter(c) else {
            warn_at(i + 1, format!("unrecognised hex token '{}'", c));
            row.push(None);
            i += 1;
            while i < chars.len() && !is_token_boundary(chars[i]) {
                i += 1;
            }
            continue;
        };
        let start = i;
        i += 1;

        let mut port = None;
        if terrain.is_sea() {
            if let (Some(&letter), Some(&digit)) = (chars.get(i), chars.get(i + 1)) {
                if let (Some(harbor), Some(facing)) =
                    (Harbor::from_letter(letter), Direction::from_digit(digit))
                {
                    port = Some(Port { harbor, facing });
                    i += 2;
                }
            }
        }

        let digits_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let mut chit = None;
        if i > digits_start {
            let digits: String = chars[digits_start..i].iter().collect();
            if terrain.is_sea() {
                warn_at(digits_start + 1, "sea hex carries a chit index; ignored".into());
            } else {
                match digits.parse::<u32>() {
                    Ok(index) => chit = Some(index),
                    Err(_) => warn_at(digits_start + 1, format!("chit index '{}' is out of range", digits)),
                }
            }
        }

        let shuffle = if chars.get(i) == Some(&'+') {
            i += 1;
            false
        } else {
            true
        };

        if i < chars.len() && !is_token_boundary(chars[i]) && chars[i] != '+' {
            warn_at(
                i + 1,
                format!("unexpected '{}' after hex token starting at column {}", chars[i], start + 1),
            );
            row.push(None);
            while i < chars.len() && !is_token_boundary(chars[i]) {
                i += 1;
            }
            continue;
        }

        row.push(Some(Tile {
            terrain,
            port,
            chit,
            shuffle,
        }));
    }
    row
}

fn format_tile(tile: &Tile, out: &mut String) {
    out.push(tile.terrain.letter());
    if let Some(port) = tile.port {
        out.push(port.harbor.letter());
        out.push_str(&port.facing.index().to_string());
    }
    if tile.terrain.is_land() {
        if let Some(chit) = tile.chit {
            out.push_str(&chit.to_string());
        }
    }
    if !tile.shuffle {
        out.push('+');
    }
}

impl HexGrid {
    /// Encode the grid as map text, one comma-separated line per row.
    ///
    /// The parser also reads tokens run together, but a sea hex followed by a
    /// gold hex would then read as a grain port (`sg1`), so commas are always
    /// written.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height() {
            let last = (0..self.width())
                .rev()
                .find(|&x| self.get(HexPos::new(x, y)).is_some());
            if let Some(last) = last {
                for x in 0..=last {
                    if x > 0 {
                        out.push(',');
                    }
                    match self.get(HexPos::new(x, y)) {
                        Some(tile) => format_tile(tile, &mut out),
                        None => out.push('-'),
                    }
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for HexGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for HexGrid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_grid(s).map(|(grid, _)| grid)
    }
}
