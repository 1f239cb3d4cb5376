//! The log of placements made during the current turn or setup step.
//!
//! Commits are written straight into the board graph so every legality query
//! sees them; the record remembers what each slot held before so the step can
//! be undone piece by piece. Confirming the step is just clearing the record.

use crate::board::{Board, EdgeId, EdgeKind, EdgePiece, Location, NodeBuilding, NodeId, PlayerId};
use crate::query::Assume;
use crate::setup::SetupMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// A single placement on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Road(EdgeId),
    Ship(EdgeId),
    Bridge(EdgeId),
    Settlement(NodeId),
    City(NodeId),
    MoveShip { from: EdgeId, to: EdgeId },
}

impl Placement {
    /// A new piece of `kind` on `edge`
    pub fn edge(kind: EdgeKind, edge: EdgeId) -> Self {
        match kind {
            EdgeKind::Road => Placement::Road(edge),
            EdgeKind::Ship => Placement::Ship(edge),
            EdgeKind::Bridge => Placement::Bridge(edge),
        }
    }

    /// The edge a new piece lands on, if any
    pub fn placed_edge(&self) -> Option<EdgeId> {
        match *self {
            Placement::Road(e) | Placement::Ship(e) | Placement::Bridge(e) => Some(e),
            Placement::MoveShip { to, .. } => Some(to),
            Placement::Settlement(_) | Placement::City(_) => None,
        }
    }
}

/// Contents of the slot a placement overwrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Previous {
    Edge(EdgePiece),
    Node(NodeBuilding),
}

/// One committed placement and what it replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRec {
    pub player: PlayerId,
    pub placement: Placement,
    pub previous: Previous,
}

/// Commit requests the legality predicates would have refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("slot {0} is already occupied")]
    Occupied(Location),

    #[error("slot {0} is on the wrong terrain for this piece")]
    WrongTerrain(Location),

    #[error("piece at {0} does not belong to the player")]
    NotOwner(Location),

    #[error("ship at {0} cannot move onto itself")]
    SameEdge(Location),

    #[error("node {0} is one side away from another building")]
    TooClose(Location),

    #[error("bridges are not allowed on this board (edge {0})")]
    BridgesDisabled(Location),

    #[error("edge {0} borders the pirate")]
    PirateBlocked(Location),

    #[error("ship at {0} cannot move again this step")]
    ShipLocked(Location),
}

/// Ordered placements of the open turn or setup step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    recs: Vec<BuildRec>,
}

impl BuildRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.recs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildRec> {
        self.recs.iter()
    }

    pub fn last(&self) -> Option<&BuildRec> {
        self.recs.last()
    }

    /// Confirm the step: forget the log, keep the pieces
    pub fn clear(&mut self) {
        self.recs.clear();
    }

    /// Confirm the step, handing back what was placed
    pub fn take(&mut self) -> Vec<BuildRec> {
        std::mem::take(&mut self.recs)
    }

    pub(crate) fn push(&mut self, rec: BuildRec) {
        self.recs.push(rec);
    }

    pub(crate) fn pop(&mut self) -> Option<BuildRec> {
        self.recs.pop()
    }

    /// Settlements placed, in order
    pub fn settlements(&self) -> Vec<NodeId> {
        self.recs
            .iter()
            .filter_map(|rec| match rec.placement {
                Placement::Settlement(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// New roads, ships and bridges placed, in order
    pub fn edges(&self) -> Vec<EdgeId> {
        self.recs
            .iter()
            .filter_map(|rec| match rec.placement {
                Placement::Road(e) | Placement::Ship(e) | Placement::Bridge(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// A new piece was placed on `edge` this step (moved ships included)
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.recs
            .iter()
            .any(|rec| rec.placement.placed_edge() == Some(edge))
    }

    /// The ship move made this step, if any
    pub fn moved_ship(&self) -> Option<(EdgeId, EdgeId)> {
        self.recs.iter().find_map(|rec| match rec.placement {
            Placement::MoveShip { from, to } => Some((from, to)),
            _ => None,
        })
    }

    /// Every new edge piece in the record was connected to the player's
    /// network at the moment it was placed.
    ///
    /// The record is unwound on a scratch copy of the board, newest first, and
    /// each edge is checked against the board as it stood just before it was
    /// placed.
    pub fn is_connected(&self, board: &Board, player: PlayerId) -> bool {
        let mut scratch = board.clone();
        for rec in self.recs.iter().rev() {
            scratch.restore(rec);
            if rec.player != player {
                continue;
            }
            let connected = match rec.placement {
                Placement::Road(e) => scratch.edge_connects(e, player, EdgeKind::Road.links(), Assume::NOTHING),
                Placement::Ship(e) => scratch.edge_connects(e, player, EdgeKind::Ship.links(), Assume::NOTHING),
                Placement::Bridge(e) => {
                    scratch.edge_connects(e, player, EdgeKind::Bridge.links(), Assume::NOTHING)
                }
                Placement::MoveShip { from, to } => {
                    scratch.edge_connects(to, player, EdgeKind::Ship.links(), Assume::vacated(from))
                }
                Placement::Settlement(_) | Placement::City(_) => true,
            };
            if !connected {
                debug!(player, placement = ?rec.placement, "record is not connected");
                return false;
            }
        }
        true
    }

    /// The setup step holds exactly the pieces `mode` asks for, with every
    /// settlement served by its own edge.
    pub fn setup_complete(&self, board: &Board, mode: SetupMode) -> bool {
        let settlements = self.settlements();
        let edges = self.edges();
        let want = mode.count();
        if settlements.len() != want || edges.len() != want || self.len() != 2 * want {
            return false;
        }
        let adj = |e: EdgeId, n: NodeId| board.edge_adjacent_to_node(e, n);
        match (settlements.as_slice(), edges.as_slice()) {
            ([s], [e]) => adj(*e, *s),
            ([s1, s2], [e1, e2]) => (adj(*e1, *s1) && adj(*e2, *s2)) || (adj(*e1, *s2) && adj(*e2, *s1)),
            _ => false,
        }
    }
}

impl Board {
    fn commit_fault(&self, err: CommitError, player: PlayerId, placement: Placement) -> CommitError {
        error!(player, ?placement, "commit rejected: {}", err);
        err
    }

    /// Write a placement into the graph and log it in `record`.
    ///
    /// Callers are expected to have asked the matching legality predicate
    /// first; this only rejects what would corrupt the board or break a
    /// per-step limit.
    pub fn commit(
        &mut self,
        record: &mut BuildRecord,
        player: PlayerId,
        placement: Placement,
    ) -> Result<(), CommitError> {
        let previous = match placement {
            Placement::Road(e) => self.commit_edge(e, EdgeKind::Road, player, placement)?,
            Placement::Ship(e) => self.commit_edge(e, EdgeKind::Ship, player, placement)?,
            Placement::Bridge(e) => self.commit_edge(e, EdgeKind::Bridge, player, placement)?,
            Placement::Settlement(n) => {
                let location = self.node(n).location();
                if !self.node(n).building().is_empty() {
                    return Err(self.commit_fault(CommitError::Occupied(location), player, placement));
                }
                if !self.node_on_land(n) {
                    return Err(self.commit_fault(CommitError::WrongTerrain(location), player, placement));
                }
                if !self.node_spacing_ok(n) {
                    return Err(self.commit_fault(CommitError::TooClose(location), player, placement));
                }
                self.node_mut(n).building = NodeBuilding::Settlement(player);
                Previous::Node(NodeBuilding::Empty)
            }
            Placement::City(n) => {
                let location = self.node(n).location();
                let before = self.node(n).building();
                match before {
                    NodeBuilding::Settlement(owner) if owner == player => {}
                    NodeBuilding::Settlement(_) => {
                        return Err(self.commit_fault(CommitError::NotOwner(location), player, placement))
                    }
                    NodeBuilding::City(_) => {
                        return Err(self.commit_fault(CommitError::Occupied(location), player, placement))
                    }
                    NodeBuilding::Empty if !self.node_on_land(n) => {
                        return Err(self.commit_fault(CommitError::WrongTerrain(location), player, placement))
                    }
                    NodeBuilding::Empty if !self.node_spacing_ok(n) => {
                        return Err(self.commit_fault(CommitError::TooClose(location), player, placement))
                    }
                    NodeBuilding::Empty => {}
                }
                self.node_mut(n).building = NodeBuilding::City(player);
                Previous::Node(before)
            }
            Placement::MoveShip { from, to } => {
                let location = self.edge(from).location();
                if from == to {
                    return Err(self.commit_fault(CommitError::SameEdge(location), player, placement));
                }
                if self.edge(from).piece() != EdgePiece::Ship(player) {
                    return Err(self.commit_fault(CommitError::NotOwner(location), player, placement));
                }
                // One move per step, and never a ship that arrived this step
                if record.moved_ship().is_some() || record.contains_edge(from) {
                    return Err(self.commit_fault(CommitError::ShipLocked(location), player, placement));
                }
                if self.edge_borders_pirate(from) {
                    return Err(self.commit_fault(CommitError::PirateBlocked(location), player, placement));
                }
                let target = self.edge(to).location();
                if !self.edge(to).piece().is_empty() {
                    return Err(self.commit_fault(CommitError::Occupied(target), player, placement));
                }
                if !self.edge_on_sea(to) {
                    return Err(self.commit_fault(CommitError::WrongTerrain(target), player, placement));
                }
                if self.edge_borders_pirate(to) {
                    return Err(self.commit_fault(CommitError::PirateBlocked(target), player, placement));
                }
                self.edge_mut(from).piece = EdgePiece::Empty;
                self.edge_mut(to).piece = EdgePiece::Ship(player);
                Previous::Edge(EdgePiece::Empty)
            }
        };

        debug!(player, ?placement, "committed");
        record.push(BuildRec {
            player,
            placement,
            previous,
        });
        Ok(())
    }

    fn commit_edge(
        &mut self,
        e: EdgeId,
        kind: EdgeKind,
        player: PlayerId,
        placement: Placement,
    ) -> Result<Previous, CommitError> {
        let location = self.edge(e).location();
        if !self.edge(e).piece().is_empty() {
            return Err(self.commit_fault(CommitError::Occupied(location), player, placement));
        }
        if kind == EdgeKind::Bridge && !self.rules().bridges {
            return Err(self.commit_fault(CommitError::BridgesDisabled(location), player, placement));
        }
        let fits = match kind {
            EdgeKind::Road => self.edge_on_land(e),
            EdgeKind::Ship => self.edge_on_sea(e),
            EdgeKind::Bridge => !self.edge_on_land(e),
        };
        if !fits {
            return Err(self.commit_fault(CommitError::WrongTerrain(location), player, placement));
        }
        if kind == EdgeKind::Ship && self.edge_borders_pirate(e) {
            return Err(self.commit_fault(CommitError::PirateBlocked(location), player, placement));
        }
        self.edge_mut(e).piece = EdgePiece::new(kind, player);
        Ok(Previous::Edge(EdgePiece::Empty))
    }

    /// Reverse the newest placement in `record`
    pub fn undo(&mut self, record: &mut BuildRecord) -> Option<BuildRec> {
        let rec = record.pop()?;
        self.restore(&rec);
        debug!(player = rec.player, placement = ?rec.placement, "undone");
        Some(rec)
    }

    fn restore(&mut self, rec: &BuildRec) {
        match (rec.placement, rec.previous) {
            (Placement::MoveShip { from, to }, Previous::Edge(piece)) => {
                self.edge_mut(to).piece = piece;
                self.edge_mut(from).piece = EdgePiece::Ship(rec.player);
            }
            (Placement::Settlement(n) | Placement::City(n), Previous::Node(building)) => {
                self.node_mut(n).building = building;
            }
            (placement, Previous::Edge(piece)) => {
                if let Some(e) = placement.placed_edge() {
                    self.edge_mut(e).piece = piece;
                }
            }
            (_, Previous::Node(_)) => {}
        }
    }
}
