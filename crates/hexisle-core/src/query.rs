//! Side-effect-free predicates over the board graph.
//!
//! Some legality rules need to ask "what if": what if this corner were
//! already settled, what if this ship had already sailed away. Those questions
//! are answered by passing an [`Assume`] rather than by editing the board.

use crate::board::{Board, EdgeId, EdgeKind, EdgePiece, NodeId, PlayerId};

/// A hypothetical change layered over the board for one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Assume {
    /// Treat this node as carrying a building
    pub settled: Option<NodeId>,
    /// Treat this edge as empty
    pub vacated: Option<EdgeId>,
}

impl Assume {
    /// The board exactly as it is
    pub const NOTHING: Assume = Assume {
        settled: None,
        vacated: None,
    };

    pub const fn settled(node: NodeId) -> Self {
        Self {
            settled: Some(node),
            vacated: None,
        }
    }

    pub const fn vacated(edge: EdgeId) -> Self {
        Self {
            settled: None,
            vacated: Some(edge),
        }
    }
}

impl Board {
    pub fn edge_adjacent_to_node(&self, edge: EdgeId, node: NodeId) -> bool {
        self.edge(edge).nodes().contains(&node)
    }

    /// The node at the far end of `edge` from `node`
    pub fn other_end(&self, edge: EdgeId, node: NodeId) -> NodeId {
        let [a, b] = self.edge(edge).nodes();
        if a == node {
            b
        } else {
            a
        }
    }

    /// Any hex at this corner is land
    pub fn node_on_land(&self, node: NodeId) -> bool {
        self.node(node)
            .hexes()
            .iter()
            .any(|&pos| self.hex(pos).is_some_and(|h| h.terrain.is_land()))
    }

    /// Any hex on this side is land
    pub fn edge_on_land(&self, edge: EdgeId) -> bool {
        self.edge(edge)
            .hexes()
            .iter()
            .any(|&pos| self.hex(pos).is_some_and(|h| h.terrain.is_land()))
    }

    /// Any hex on this side is sea
    pub fn edge_on_sea(&self, edge: EdgeId) -> bool {
        self.edge(edge)
            .hexes()
            .iter()
            .any(|&pos| self.hex(pos).is_some_and(|h| h.terrain.is_sea()))
    }

    /// The pirate sits on one of the hexes sharing this side
    pub fn edge_borders_pirate(&self, edge: EdgeId) -> bool {
        self.rules().pirate
            && self
                .pirate()
                .is_some_and(|pirate| self.edge(edge).hexes().contains(&pirate))
    }

    pub(crate) fn piece_as(&self, edge: EdgeId, assume: Assume) -> EdgePiece {
        if assume.vacated == Some(edge) {
            EdgePiece::Empty
        } else {
            self.edge(edge).piece()
        }
    }

    pub(crate) fn occupied_as(&self, node: NodeId, assume: Assume) -> bool {
        assume.settled == Some(node) || !self.node(node).building().is_empty()
    }

    /// The player owns an edge of one of `kinds` at this node, other than `except`
    pub fn node_has_edge_owned_by(
        &self,
        node: NodeId,
        player: PlayerId,
        kinds: &[EdgeKind],
        except: Option<EdgeId>,
        assume: Assume,
    ) -> bool {
        self.node(node).edges().iter().any(|&edge| {
            if Some(edge) == except {
                return false;
            }
            let piece = self.piece_as(edge, assume);
            piece.owner() == Some(player) && piece.kind().is_some_and(|k| kinds.contains(&k))
        })
    }

    /// No building sits one edge away from this node.
    ///
    /// With bridges on the board, an all-water side does not count as a link
    /// between its two corners.
    pub fn node_spacing_ok(&self, node: NodeId) -> bool {
        self.node_spacing_ok_as(node, Assume::NOTHING)
    }

    pub fn node_spacing_ok_as(&self, node: NodeId, assume: Assume) -> bool {
        let bridges = self.rules().bridges;
        self.node(node).edges().iter().all(|&edge| {
            if bridges && !self.edge_on_land(edge) {
                return true;
            }
            !self.occupied_as(self.other_end(edge, node), assume)
        })
    }

    /// A settlement could stand here: vacant, on land and spaced out
    pub fn node_settleable(&self, node: NodeId) -> bool {
        self.node_settleable_as(node, Assume::NOTHING)
    }

    pub fn node_settleable_as(&self, node: NodeId, assume: Assume) -> bool {
        !self.occupied_as(node, assume)
            && self.node_on_land(node)
            && self.node_spacing_ok_as(node, assume)
    }

    /// At least one end of this edge could still take a settlement
    pub fn edge_has_place_for_settlement(&self, edge: EdgeId) -> bool {
        self.edge_has_place_for_settlement_as(edge, Assume::NOTHING)
    }

    pub fn edge_has_place_for_settlement_as(&self, edge: EdgeId, assume: Assume) -> bool {
        self.edge(edge)
            .nodes()
            .iter()
            .any(|&node| self.node_settleable_as(node, assume))
    }
}
