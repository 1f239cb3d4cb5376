//! Summary printed by the CLI for a loaded board.

use hexisle_core::{Board, HexPos, ParseWarning};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BoardSummary {
    pub width: i32,
    pub height: i32,
    pub hexes: usize,
    pub land: usize,
    pub ports: usize,
    pub nodes: usize,
    pub edges: usize,
    pub robber: Option<HexPos>,
    /// Rolls by hex in row-major order, deserts and sea omitted
    pub rolls: Vec<(HexPos, u8)>,
    pub adjacent_red_rolls: bool,
    pub warnings: Vec<String>,
    /// The map re-encoded in canonical form
    pub text: String,
}

impl BoardSummary {
    pub fn new(board: &Board, warnings: &[ParseWarning]) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            hexes: board.hexes().count(),
            land: board.hexes().filter(|h| h.terrain.is_land()).count(),
            ports: board.hexes().filter(|h| h.port.is_some()).count(),
            nodes: board.node_count(),
            edges: board.edge_count(),
            robber: board.robber(),
            rolls: board
                .hexes()
                .filter(|h| h.roll > 0)
                .map(|h| (h.pos, h.roll))
                .collect(),
            adjacent_red_rolls: board.has_adjacent_red_rolls(),
            warnings: warnings.iter().map(ToString::to_string).collect(),
            text: board.to_text(),
        }
    }
}
