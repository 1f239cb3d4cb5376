//! Land masses and island discovery.

use crate::board::{Board, NodeId, PlayerId};
use std::collections::HashSet;

impl Board {
    /// Every land node reachable from `node` along sides that touch land.
    ///
    /// Returns an empty set if `node` itself is not on land.
    pub fn land_mass(&self, node: NodeId) -> HashSet<NodeId> {
        let mut seen = HashSet::new();
        if !self.node_on_land(node) {
            return seen;
        }
        let mut stack = vec![node];
        seen.insert(node);
        while let Some(current) = stack.pop() {
            for &edge in self.node(current).edges() {
                if !self.edge_on_land(edge) {
                    continue;
                }
                let next = self.other_end(edge, current);
                if seen.insert(next) {
                    stack.push(next);
                }
            }
        }
        seen
    }

    /// Settling at `node` would be the player's first building on its island
    pub fn is_island_discovered(&self, node: NodeId, player: PlayerId) -> bool {
        let island = self.land_mass(node);
        !island.is_empty()
            && island
                .iter()
                .all(|&n| self.node(n).owner() != Some(player))
    }
}
