//! Placement rules for the opening setup steps.
//!
//! In a setup step a player places one settlement and one edge (single setup)
//! or two of each (double setup). The pieces go down one at a time, so each
//! placement is judged against what the step's [`BuildRecord`] already holds:
//! it is accepted only if the step can still be finished with every
//! settlement served by its own edge.

use crate::board::{Board, EdgeId, EdgeKind, NodeId};
use crate::buildrec::BuildRecord;
use crate::query::Assume;
use serde::{Deserialize, Serialize};

/// How many settlement/edge pairs a setup step places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetupMode {
    Single,
    Double,
}

impl SetupMode {
    /// Settlements (and edges) placed in one step
    pub const fn count(self) -> usize {
        match self {
            SetupMode::Single => 1,
            SetupMode::Double => 2,
        }
    }
}

impl Board {
    /// Terrain and vacancy only; setup pieces need no existing network
    fn setup_edge_fits(&self, edge: EdgeId, kind: EdgeKind) -> bool {
        self.edge(edge).piece().is_empty()
            && match kind {
                EdgeKind::Road => self.edge_on_land(edge),
                EdgeKind::Ship => self.edge_on_sea(edge) && !self.edge_borders_pirate(edge),
                EdgeKind::Bridge => self.rules().bridges && !self.edge_on_land(edge),
            }
    }

    /// `kind` may go on `edge` in the open setup step
    pub fn can_setup_edge(&self, record: &BuildRecord, edge: EdgeId, kind: EdgeKind, mode: SetupMode) -> bool {
        if !self.setup_edge_fits(edge, kind) {
            return false;
        }
        let settlements = record.settlements();
        let edges = record.edges();
        let adj = |e: EdgeId, n: NodeId| self.edge_adjacent_to_node(e, n);
        let has_place = |e: EdgeId| self.edge_has_place_for_settlement(e);

        match mode {
            SetupMode::Single => match (settlements.as_slice(), edges.as_slice()) {
                ([], []) => has_place(edge),
                ([s], []) => adj(edge, *s),
                _ => false,
            },
            SetupMode::Double => match (settlements.as_slice(), edges.as_slice()) {
                ([], []) => has_place(edge),
                // Both edges still need their own settlement: pick one for
                // this edge and see if the other edge keeps a spot
                ([], [e1]) => self.edge(edge).nodes().iter().any(|&n| {
                    self.node_settleable(n)
                        && self.edge_has_place_for_settlement_as(*e1, Assume::settled(n))
                }),
                ([s], []) => adj(edge, *s) || has_place(edge),
                ([s], [e1]) => (adj(*e1, *s) && has_place(edge)) || (adj(edge, *s) && has_place(*e1)),
                ([s1, s2], []) => adj(edge, *s1) || adj(edge, *s2),
                ([s1, s2], [e1]) => (adj(*e1, *s1) && adj(edge, *s2)) || (adj(*e1, *s2) && adj(edge, *s1)),
                _ => false,
            },
        }
    }

    /// A settlement may go on `node` in the open setup step
    pub fn can_setup_settlement(&self, record: &BuildRecord, node: NodeId, mode: SetupMode) -> bool {
        if !self.node_settleable(node) {
            return false;
        }
        let settlements = record.settlements();
        let edges = record.edges();
        let adj = |e: EdgeId, n: NodeId| self.edge_adjacent_to_node(e, n);
        let keeps_place = |e: EdgeId| self.edge_has_place_for_settlement_as(e, Assume::settled(node));

        match mode {
            SetupMode::Single => match (settlements.as_slice(), edges.as_slice()) {
                ([], []) => true,
                ([], [e1]) => adj(*e1, node),
                _ => false,
            },
            SetupMode::Double => match (settlements.as_slice(), edges.as_slice()) {
                ([], []) => true,
                ([], [e1]) => adj(*e1, node) || keeps_place(*e1),
                ([], [e1, e2]) => (adj(*e1, node) && keeps_place(*e2)) || (adj(*e2, node) && keeps_place(*e1)),
                ([_], []) => true,
                ([s], [e1]) => adj(*e1, *s) || adj(*e1, node),
                ([s], [e1, e2]) => (adj(*e1, *s) && adj(*e2, node)) || (adj(*e2, *s) && adj(*e1, node)),
                _ => false,
            },
        }
    }

    pub fn legal_setup_edges(&self, record: &BuildRecord, kind: EdgeKind, mode: SetupMode) -> Vec<EdgeId> {
        self.edge_ids()
            .filter(|&edge| self.can_setup_edge(record, edge, kind, mode))
            .collect()
    }

    pub fn legal_setup_settlements(&self, record: &BuildRecord, mode: SetupMode) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&node| self.can_setup_settlement(record, node, mode))
            .collect()
    }

    /// Whether an edge of `kind` (or, with `None`, a settlement) can go
    /// anywhere in the open setup step
    pub fn can_setup_anywhere(&self, record: &BuildRecord, kind: Option<EdgeKind>, mode: SetupMode) -> bool {
        match kind {
            Some(kind) => self.edge_ids().any(|e| self.can_setup_edge(record, e, kind, mode)),
            None => self.node_ids().any(|n| self.can_setup_settlement(record, n, mode)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Rules;
    use crate::buildrec::Placement;
    use crate::hex::HexPos;

    #[test]
    fn test_single_setup_sequence() {
        let mut board = Board::standard();
        let mut record = BuildRecord::new();
        let hex = board.hex(HexPos::new(2, 2)).unwrap().clone();
        let mode = SetupMode::Single;

        assert!(board.can_setup_settlement(&record, hex.node(1), mode));
        board.commit(&mut record, 0, Placement::Settlement(hex.node(1))).unwrap();

        // A second settlement is not part of a single step
        assert!(!board.can_setup_settlement(&record, hex.node(4), mode));
        assert!(board.can_setup_edge(&record, hex.edge(1), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, hex.edge(2), EdgeKind::Road, mode));
        assert!(!board.can_setup_edge(&record, hex.edge(4), EdgeKind::Road, mode));

        board.commit(&mut record, 0, Placement::Road(hex.edge(1))).unwrap();
        assert!(!board.can_setup_anywhere(&record, Some(EdgeKind::Road), mode));
        assert!(!board.can_setup_anywhere(&record, None, mode));
        assert!(record.setup_complete(&board, mode));
    }

    #[test]
    fn test_single_setup_edge_first() {
        let mut board = Board::standard();
        let mut record = BuildRecord::new();
        let hex = board.hex(HexPos::new(2, 2)).unwrap().clone();
        let mode = SetupMode::Single;

        board.commit(&mut record, 0, Placement::Road(hex.edge(1))).unwrap();
        assert!(board.can_setup_settlement(&record, hex.node(0), mode));
        assert!(!board.can_setup_settlement(&record, hex.node(3), mode));
        assert_eq!(board.legal_setup_settlements(&record, mode).len(), 2);
    }

    #[test]
    fn test_setup_edge_terrain() {
        let board = Board::load("h0,s", Rules::default()).unwrap();
        let record = BuildRecord::new();
        let land = board.hex(HexPos::new(0, 0)).unwrap();
        let sea = board.hex(HexPos::new(1, 0)).unwrap();
        let mode = SetupMode::Single;

        // Coast takes either a road or a ship
        assert!(board.can_setup_edge(&record, land.edge(0), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, land.edge(0), EdgeKind::Ship, mode));
        assert!(!board.can_setup_edge(&record, land.edge(3), EdgeKind::Ship, mode));
        // Open water touches no settleable corner
        assert!(!board.can_setup_edge(&record, sea.edge(0), EdgeKind::Ship, mode));
    }

    #[test]
    fn test_setup_bridge_follows_rules() {
        let text = "h0,s,h1";
        let record = BuildRecord::new();
        let mode = SetupMode::Single;
        for bridges in [false, true] {
            let rules = Rules {
                bridges,
                ..Rules::default()
            };
            let board = Board::load(text, rules).unwrap();
            let sea = board.hex(HexPos::new(1, 0)).unwrap();
            // Top side of the strait: open water ending on the west island
            assert_eq!(board.can_setup_edge(&record, sea.edge(2), EdgeKind::Bridge, mode), bridges);
            assert_eq!(board.can_setup_anywhere(&record, Some(EdgeKind::Bridge), mode), bridges);
        }
    }

    #[test]
    fn test_double_setup_second_edge_keeps_a_spot_for_the_first() {
        let mut board = Board::load("h0,s", Rules::default()).unwrap();
        let mut record = BuildRecord::new();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        let sea = board.hex(HexPos::new(1, 0)).unwrap().clone();
        let mode = SetupMode::Double;

        // A ship whose only land corner is the top of the coast
        board.commit(&mut record, 0, Placement::Ship(sea.edge(2))).unwrap();
        // Either end of this road would crowd that corner out
        assert!(!board.can_setup_edge(&record, land.edge(1), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, land.edge(3), EdgeKind::Road, mode));
    }

    #[test]
    fn test_double_setup_two_edges_then_settlements() {
        let mut board = Board::standard();
        let mut record = BuildRecord::new();
        let a = board.hex(HexPos::new(2, 2)).unwrap().clone();
        let b = board.hex(HexPos::new(4, 4)).unwrap().clone();
        let mode = SetupMode::Double;

        board.commit(&mut record, 0, Placement::Road(a.edge(1))).unwrap();
        // Corners two apart on the same hex can hold both settlements
        assert!(board.can_setup_edge(&record, a.edge(2), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, b.edge(1), EdgeKind::Road, mode));
        board.commit(&mut record, 0, Placement::Road(b.edge(1))).unwrap();
        assert!(!board.can_setup_anywhere(&record, Some(EdgeKind::Road), mode));

        assert!(board.can_setup_settlement(&record, a.node(1), mode));
        assert!(board.can_setup_settlement(&record, b.node(0), mode));
        assert!(!board.can_setup_settlement(&record, a.node(4), mode));
        board.commit(&mut record, 0, Placement::Settlement(a.node(1))).unwrap();

        assert!(!board.can_setup_settlement(&record, a.node(0), mode));
        assert!(board.can_setup_settlement(&record, b.node(1), mode));
        board.commit(&mut record, 0, Placement::Settlement(b.node(1))).unwrap();
        assert!(record.setup_complete(&board, mode));
    }

    #[test]
    fn test_double_setup_settlements_first() {
        let mut board = Board::standard();
        let mut record = BuildRecord::new();
        let a = board.hex(HexPos::new(2, 2)).unwrap().clone();
        let b = board.hex(HexPos::new(4, 4)).unwrap().clone();
        let mode = SetupMode::Double;

        board.commit(&mut record, 0, Placement::Settlement(a.node(1))).unwrap();
        board.commit(&mut record, 0, Placement::Settlement(b.node(4))).unwrap();
        assert!(!board.can_setup_anywhere(&record, None, mode));

        // Either settlement may be served first
        assert!(board.can_setup_edge(&record, a.edge(2), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, b.edge(4), EdgeKind::Road, mode));
        assert!(!board.can_setup_edge(&record, a.edge(4), EdgeKind::Road, mode));

        board.commit(&mut record, 0, Placement::Road(a.edge(2))).unwrap();
        // Now only the second settlement lacks an edge
        assert!(!board.can_setup_edge(&record, a.edge(1), EdgeKind::Road, mode));
        assert!(board.can_setup_edge(&record, b.edge(5), EdgeKind::Road, mode));
    }
}
