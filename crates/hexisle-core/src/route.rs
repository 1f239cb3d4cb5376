//! Longest contiguous route of roads, ships and bridges.

use crate::board::{Board, EdgeId, EdgeKind, NodeId, PlayerId};
use tracing::trace;

/// Edges on the path currently being walked.
///
/// An edge is marked only while the branch that entered it is being explored,
/// so other branches may still use it.
struct Trail {
    marks: Vec<bool>,
}

impl Trail {
    fn new(edges: usize) -> Self {
        Self {
            marks: vec![false; edges],
        }
    }

    fn contains(&self, edge: EdgeId) -> bool {
        self.marks[edge.index()]
    }

    /// Run `walk` with `edge` marked, clearing the mark afterwards
    fn through<T>(&mut self, edge: EdgeId, walk: impl FnOnce(&mut Trail) -> T) -> T {
        self.marks[edge.index()] = true;
        let result = walk(self);
        self.marks[edge.index()] = false;
        result
    }
}

/// Road and ship only meet at a node holding the player's own building;
/// bridges join either.
fn changes_transport(from: EdgeKind, to: EdgeKind) -> bool {
    matches!(
        (from, to),
        (EdgeKind::Road, EdgeKind::Ship) | (EdgeKind::Ship, EdgeKind::Road)
    )
}

impl Board {
    /// Length of the player's longest chain of contiguous edges.
    ///
    /// The chain may pass a node only if no opponent has built there, and may
    /// switch between road and ship only at one of the player's own
    /// buildings. No edge is used twice within one chain, so a closed loop
    /// counts each of its edges once.
    pub fn longest_route(&self, player: PlayerId) -> u32 {
        let mut trail = Trail::new(self.edge_count());
        let mut best = 0;

        for start in self.edge_ids().filter(|&e| self.edge(e).owner() == Some(player)) {
            for end in self.edge(start).nodes() {
                let length = trail.through(start, |trail| 1 + self.extend_route(player, start, end, trail));
                best = best.max(length);
            }
        }

        trace!(player, length = best, "longest route");
        best
    }

    /// Longest continuation leaving `node`, having arrived along `from`
    fn extend_route(&self, player: PlayerId, from: EdgeId, node: NodeId, trail: &mut Trail) -> u32 {
        let owner = self.node(node).owner();
        if owner.is_some_and(|o| o != player) {
            return 0;
        }
        let Some(from_kind) = self.edge(from).piece().kind() else {
            return 0;
        };

        let mut best = 0;
        for &next in self.node(node).edges() {
            if next == from || trail.contains(next) {
                continue;
            }
            let piece = self.edge(next).piece();
            let Some(kind) = piece.kind() else { continue };
            if piece.owner() != Some(player) {
                continue;
            }
            if changes_transport(from_kind, kind) && owner != Some(player) {
                continue;
            }
            let far = self.other_end(next, node);
            let length = trail.through(next, |trail| 1 + self.extend_route(player, next, far, trail));
            best = best.max(length);
        }
        best
    }

    /// Longest route of every player from 0 to `players - 1`
    pub fn route_lengths(&self, players: u8) -> Vec<u32> {
        (0..players).map(|p| self.longest_route(p)).collect()
    }
}
