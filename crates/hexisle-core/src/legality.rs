//! Where a player may build during normal play.
//!
//! Every check is a plain `bool`: a slot is legal when it is free, sits on the
//! right terrain, and connects to what the player already owns.

use crate::board::{Board, EdgeId, EdgeKind, EdgePiece, NodeBuilding, NodeId, PlayerId};
use crate::buildrec::BuildRecord;
use crate::query::Assume;
use serde::{Deserialize, Serialize};

/// Kinds of structure a player can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    Road,
    Ship,
    Bridge,
    Settlement,
    City,
}

impl BuildKind {
    pub const ALL: [BuildKind; 5] = [
        BuildKind::Road,
        BuildKind::Ship,
        BuildKind::Bridge,
        BuildKind::Settlement,
        BuildKind::City,
    ];

    /// The edge piece this builds, for roads, ships and bridges
    pub const fn edge_kind(self) -> Option<EdgeKind> {
        match self {
            BuildKind::Road => Some(EdgeKind::Road),
            BuildKind::Ship => Some(EdgeKind::Ship),
            BuildKind::Bridge => Some(EdgeKind::Bridge),
            BuildKind::Settlement | BuildKind::City => None,
        }
    }
}

impl From<EdgeKind> for BuildKind {
    fn from(kind: EdgeKind) -> Self {
        match kind {
            EdgeKind::Road => BuildKind::Road,
            EdgeKind::Ship => BuildKind::Ship,
            EdgeKind::Bridge => BuildKind::Bridge,
        }
    }
}

impl Board {
    /// One end of `edge` reaches the player's network.
    ///
    /// An end reaches it when the player has a building there, or when the
    /// end is free of buildings and another of the player's edges of one of
    /// `links` meets it. An opponent's building cuts the end off.
    pub fn edge_connects(
        &self,
        edge: EdgeId,
        player: PlayerId,
        links: &[EdgeKind],
        assume: Assume,
    ) -> bool {
        self.edge(edge)
            .nodes()
            .iter()
            .any(|&node| match self.node(node).owner() {
                Some(owner) => owner == player,
                None => self.node_has_edge_owned_by(node, player, links, Some(edge), assume),
            })
    }

    pub fn can_build_road(&self, edge: EdgeId, player: PlayerId) -> bool {
        self.edge(edge).piece().is_empty()
            && self.edge_on_land(edge)
            && self.edge_connects(edge, player, EdgeKind::Road.links(), Assume::NOTHING)
    }

    pub fn can_build_ship(&self, edge: EdgeId, player: PlayerId) -> bool {
        self.can_build_ship_as(edge, player, Assume::NOTHING)
    }

    /// Ship placement with a hypothetical layered over the board; used to
    /// judge a ship move as if the ship had already left its old edge.
    pub fn can_build_ship_as(&self, edge: EdgeId, player: PlayerId, assume: Assume) -> bool {
        self.piece_as(edge, assume).is_empty()
            && self.edge_on_sea(edge)
            && !self.edge_borders_pirate(edge)
            && self.edge_connects(edge, player, EdgeKind::Ship.links(), assume)
    }

    /// Bridges only exist on boards whose rules allow them
    pub fn can_build_bridge(&self, edge: EdgeId, player: PlayerId) -> bool {
        self.rules().bridges
            && self.edge(edge).piece().is_empty()
            && !self.edge_on_land(edge)
            && self.edge_connects(edge, player, EdgeKind::Bridge.links(), Assume::NOTHING)
    }

    pub fn can_build_edge(&self, edge: EdgeId, kind: EdgeKind, player: PlayerId) -> bool {
        match kind {
            EdgeKind::Road => self.can_build_road(edge, player),
            EdgeKind::Ship => self.can_build_ship(edge, player),
            EdgeKind::Bridge => self.can_build_bridge(edge, player),
        }
    }

    /// A new settlement: free, on land, spaced out, and touching one of the
    /// player's roads, ships or bridges.
    pub fn can_build_settlement(&self, node: NodeId, player: PlayerId) -> bool {
        self.node_settleable(node)
            && self.node_has_edge_owned_by(node, player, &EdgeKind::ALL, None, Assume::NOTHING)
    }

    pub fn can_upgrade_settlement(&self, node: NodeId, player: PlayerId) -> bool {
        self.node(node).building() == NodeBuilding::Settlement(player)
    }

    /// A city either replaces the player's settlement or stands where a new
    /// settlement could.
    pub fn can_build_city(&self, node: NodeId, player: PlayerId) -> bool {
        self.can_upgrade_settlement(node, player) || self.can_build_settlement(node, player)
    }

    /// The ship on `from` could be picked up this turn.
    ///
    /// It must be the player's, clear of the pirate, not placed this turn, and
    /// no other ship may have moved yet. It must also be at the open end of a
    /// line: once it is gone, one of its ends holds neither a building of the
    /// player nor another of their edges.
    pub fn can_move_ship_from(&self, record: &BuildRecord, from: EdgeId, player: PlayerId) -> bool {
        if self.edge(from).piece() != EdgePiece::Ship(player)
            || self.edge_borders_pirate(from)
            || record.contains_edge(from)
            || record.moved_ship().is_some()
        {
            return false;
        }
        self.edge(from).nodes().iter().any(|&node| {
            self.node(node).owner() != Some(player)
                && !self.node_has_edge_owned_by(
                    node,
                    player,
                    &EdgeKind::ALL,
                    Some(from),
                    Assume::vacated(from),
                )
        })
    }

    /// The ship on `from` may sail to `to`
    pub fn can_move_ship(&self, record: &BuildRecord, from: EdgeId, to: EdgeId, player: PlayerId) -> bool {
        from != to
            && self.can_move_ship_from(record, from, player)
            && self.can_build_ship_as(to, player, Assume::vacated(from))
    }

    /// Edges where `kind` may be built; empty for settlements and cities
    pub fn legal_edges(&self, kind: BuildKind, player: PlayerId) -> Vec<EdgeId> {
        let Some(kind) = kind.edge_kind() else {
            return Vec::new();
        };
        self.edge_ids()
            .filter(|&edge| self.can_build_edge(edge, kind, player))
            .collect()
    }

    /// Nodes where `kind` may be built; empty for edge pieces
    pub fn legal_nodes(&self, kind: BuildKind, player: PlayerId) -> Vec<NodeId> {
        let check: fn(&Board, NodeId, PlayerId) -> bool = match kind {
            BuildKind::Settlement => Board::can_build_settlement,
            BuildKind::City => Board::can_build_city,
            _ => return Vec::new(),
        };
        self.node_ids().filter(|&node| check(self, node, player)).collect()
    }

    /// Whether building `kind` is worth offering to the player at all
    pub fn can_place_anywhere(&self, kind: BuildKind, player: PlayerId) -> bool {
        match kind.edge_kind() {
            Some(edge_kind) => self.edge_ids().any(|e| self.can_build_edge(e, edge_kind, player)),
            None => !self.legal_nodes(kind, player).is_empty(),
        }
    }

    /// Some ship of the player's has somewhere to go
    pub fn can_move_any_ship(&self, record: &BuildRecord, player: PlayerId) -> bool {
        self.edge_ids()
            .filter(|&from| self.can_move_ship_from(record, from, player))
            .any(|from| self.edge_ids().any(|to| self.can_move_ship(record, from, to, player)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Rules;
    use crate::buildrec::Placement;
    use crate::hex::HexPos;

    fn place(board: &mut Board, player: PlayerId, placement: Placement) {
        let mut record = BuildRecord::new();
        board.commit(&mut record, player, placement).unwrap();
    }

    #[test]
    fn test_road_needs_a_building_or_road() {
        let mut board = Board::load("h0", Rules::default()).unwrap();
        let hex = board.hex(HexPos::new(0, 0)).unwrap().clone();
        assert!(!board.can_build_road(hex.edge(0), 0));

        place(&mut board, 0, Placement::Settlement(hex.node(0)));
        assert!(board.can_build_road(hex.edge(0), 0));
        assert!(board.can_build_road(hex.edge(1), 0));
        assert!(!board.can_build_road(hex.edge(3), 0));
        assert!(!board.can_build_road(hex.edge(0), 1));

        place(&mut board, 0, Placement::Road(hex.edge(1)));
        assert!(board.can_build_road(hex.edge(2), 0));
        assert!(!board.can_build_road(hex.edge(1), 0));
    }

    #[test]
    fn test_opposing_building_cuts_the_road() {
        let mut board = Board::load("h0", Rules::default()).unwrap();
        let hex = board.hex(HexPos::new(0, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(hex.node(0)));
        place(&mut board, 0, Placement::Road(hex.edge(1)));
        assert!(board.can_build_road(hex.edge(2), 0));

        // Too close to commit; only a board edited directly can hold it
        board.node_mut(hex.node(1)).building = NodeBuilding::Settlement(1);
        assert!(!board.can_build_road(hex.edge(2), 0));
    }

    #[test]
    fn test_ships_do_not_extend_roads() {
        let mut board = Board::load("h0,s", Rules::default()).unwrap();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        let sea = board.hex(HexPos::new(1, 0)).unwrap().clone();

        // Road along the coast, no building at its seaward end
        place(&mut board, 0, Placement::Settlement(land.node(5)));
        place(&mut board, 0, Placement::Road(land.edge(0)));
        // The top corner of the shared side holds no building; a ship there
        // would have to extend the road
        assert!(!board.can_build_ship(sea.edge(2), 0));

        // Move the settlement up to the top corner of the coast
        board.node_mut(land.node(5)).building = NodeBuilding::Empty;
        place(&mut board, 0, Placement::Settlement(land.node(0)));
        assert!(board.can_build_ship(sea.edge(2), 0));
        assert!(!board.can_build_road(sea.edge(2), 0));
    }

    #[test]
    fn test_pirate_blocks_ships() {
        let rules = Rules {
            pirate: true,
            ..Rules::default()
        };
        let mut board = Board::load("h0,s", rules).unwrap();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(land.node(0)));
        let edge = land.edge(0);
        assert!(board.can_build_ship(edge, 0));

        assert!(board.move_pirate(HexPos::new(1, 0)));
        assert!(!board.can_build_ship(edge, 0));
    }

    #[test]
    fn test_bridge_over_open_water() {
        let rules = Rules {
            bridges: true,
            ..Rules::default()
        };
        let mut board = Board::load("h0,s,h1", rules).unwrap();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        let sea = board.hex(HexPos::new(1, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(land.node(0)));

        // The coast is land, so no bridge there
        assert!(!board.can_build_bridge(land.edge(0), 0));
        // The sea hex's top sides are open water
        assert!(board.can_build_bridge(sea.edge(2), 0));
        place(&mut board, 0, Placement::Bridge(sea.edge(2)));
        assert!(board.can_build_bridge(sea.edge(1), 0));
    }

    #[test]
    fn test_no_bridges_without_the_rule() {
        let mut board = Board::load("h0,s,h1", Rules::default()).unwrap();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        let sea = board.hex(HexPos::new(1, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(land.node(0)));

        assert!(!board.can_build_bridge(sea.edge(2), 0));
        assert!(!board.can_build_edge(sea.edge(2), EdgeKind::Bridge, 0));
        assert!(board.legal_edges(BuildKind::Bridge, 0).is_empty());
        assert!(!board.can_place_anywhere(BuildKind::Bridge, 0));
        // The same water still takes a ship
        assert!(board.can_build_ship(sea.edge(2), 0));
    }

    #[test]
    fn test_settlement_and_city() {
        let mut board = Board::load("h0,f1", Rules::default()).unwrap();
        let hex = board.hex(HexPos::new(0, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(hex.node(3)));
        place(&mut board, 0, Placement::Road(hex.edge(3)));
        place(&mut board, 0, Placement::Road(hex.edge(2)));

        // One edge from the settlement: too close
        assert!(!board.can_build_settlement(hex.node(2), 0));
        assert!(board.can_build_settlement(hex.node(1), 0));
        assert!(!board.can_build_settlement(hex.node(1), 1));

        assert!(board.can_build_city(hex.node(3), 0));
        assert!(!board.can_build_city(hex.node(3), 1));
        assert!(board.can_build_city(hex.node(1), 0));
        assert!(board.can_upgrade_settlement(hex.node(3), 0));
        assert!(!board.can_upgrade_settlement(hex.node(1), 0));

        assert_eq!(board.legal_nodes(BuildKind::Settlement, 0), vec![hex.node(1)]);
        assert!(board.legal_nodes(BuildKind::Road, 0).is_empty());
        assert!(board.can_place_anywhere(BuildKind::City, 0));
        assert!(!board.can_place_anywhere(BuildKind::Settlement, 1));
    }

    #[test]
    fn test_legal_edges_enumeration() {
        let mut board = Board::load("h0", Rules::default()).unwrap();
        let hex = board.hex(HexPos::new(0, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(hex.node(0)));

        let mut edges = board.legal_edges(BuildKind::Road, 0);
        edges.sort();
        let mut expected = vec![hex.edge(0), hex.edge(1)];
        expected.sort();
        assert_eq!(edges, expected);
        assert!(board.legal_edges(BuildKind::Ship, 0).is_empty());
        assert!(board.legal_edges(BuildKind::City, 0).is_empty());
        assert!(!board.can_place_anywhere(BuildKind::Ship, 0));
    }

    fn fleet() -> (Board, Vec<EdgeId>) {
        // Settlement on the coast, two ships heading out to sea in a line
        let mut board = Board::load("h0,s,s", Rules::default()).unwrap();
        let land = board.hex(HexPos::new(0, 0)).unwrap().clone();
        let sea = board.hex(HexPos::new(1, 0)).unwrap().clone();
        place(&mut board, 0, Placement::Settlement(land.node(0)));
        place(&mut board, 0, Placement::Ship(sea.edge(2)));
        place(&mut board, 0, Placement::Ship(sea.edge(1)));
        (board, vec![sea.edge(2), sea.edge(1), sea.edge(0), sea.edge(3), sea.edge(4)])
    }

    #[test]
    fn test_only_the_open_end_ship_moves() {
        let (board, edges) = fleet();
        let record = BuildRecord::new();
        assert!(!board.can_move_ship_from(&record, edges[0], 0));
        assert!(board.can_move_ship_from(&record, edges[1], 0));
        assert!(!board.can_move_ship_from(&record, edges[1], 1));

        // The coast beside the settlement is reachable
        assert!(board.can_move_ship(&record, edges[1], edges[3], 0));
        assert!(!board.can_move_ship(&record, edges[1], edges[1], 0));
        assert!(board.can_move_any_ship(&record, 0));
    }

    #[test]
    fn test_ship_cannot_hang_off_its_old_edge() {
        let (board, edges) = fleet();
        let record = BuildRecord::new();
        // Next to the outer ship, but nothing else of the player's is there
        assert!(board.can_build_ship(edges[2], 0));
        assert!(!board.can_move_ship(&record, edges[1], edges[2], 0));
        assert_eq!(board.edge(edges[1]).piece(), EdgePiece::Ship(0));
    }

    #[test]
    fn test_ship_move_limits_per_turn() {
        let (mut board, edges) = fleet();
        let mut record = BuildRecord::new();
        board.commit(&mut record, 0, Placement::Ship(edges[3])).unwrap();
        // Placed this turn
        assert!(!board.can_move_ship_from(&record, edges[3], 0));
        assert!(board.can_move_ship_from(&record, edges[1], 0));

        board
            .commit(
                &mut record,
                0,
                Placement::MoveShip {
                    from: edges[1],
                    to: edges[4],
                },
            )
            .unwrap();
        // One move per turn, even though the inner ship is now a loose end
        assert!(!board.can_move_ship_from(&record, edges[0], 0));
        assert!(!board.can_move_any_ship(&record, 0));

        record.clear();
        assert!(board.can_move_ship_from(&record, edges[0], 0));
    }
}
