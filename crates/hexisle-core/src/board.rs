//! The board graph: hexes, their shared corners (nodes) and sides (edges).
//!
//! Nodes and edges live in arenas owned by the [`Board`] and are referred to
//! by small integer handles. A hex stores the handles of its six nodes and six
//! edges; nodes and edges store the positions of the hexes they touch and the
//! handles of each other. The whole graph is plain data, so a client can hold
//! an exact copy of the server's board.

use crate::chits::{ChitError, STANDARD_CHITS};
use crate::encoding::{parse_grid, ParseError, ParseWarning};
use crate::grid::{HexGrid, Port, Terrain, Tile};
use crate::hex::{corner_sides, side_corners, HexPos};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Player identifier
pub type PlayerId = u8;

/// Handle of a node (hex corner) in the board arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle of an edge (hex side) in the board arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Canonical identity of a node or edge: the first hex (in row-major order)
/// that touches it, and the corner or side index on that hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub pos: u8,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.pos)
    }
}

/// What's built on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeBuilding {
    /// Nothing built
    #[default]
    Empty,
    Settlement(PlayerId),
    City(PlayerId),
}

impl NodeBuilding {
    /// Get the owner of this building, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            NodeBuilding::Empty => None,
            NodeBuilding::Settlement(p) | NodeBuilding::City(p) => Some(*p),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NodeBuilding::Empty)
    }
}

/// Kinds of piece that occupy an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Road,
    Ship,
    Bridge,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [EdgeKind::Road, EdgeKind::Ship, EdgeKind::Bridge];

    /// Kinds of neighbouring piece a new piece of this kind may extend from.
    /// Ships only continue ships; roads and bridges continue each other.
    pub const fn links(self) -> &'static [EdgeKind] {
        match self {
            EdgeKind::Road | EdgeKind::Bridge => &[EdgeKind::Road, EdgeKind::Bridge],
            EdgeKind::Ship => &[EdgeKind::Ship],
        }
    }
}

/// What's built on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EdgePiece {
    /// Nothing built
    #[default]
    Empty,
    Road(PlayerId),
    Ship(PlayerId),
    Bridge(PlayerId),
}

impl EdgePiece {
    pub fn new(kind: EdgeKind, owner: PlayerId) -> Self {
        match kind {
            EdgeKind::Road => EdgePiece::Road(owner),
            EdgeKind::Ship => EdgePiece::Ship(owner),
            EdgeKind::Bridge => EdgePiece::Bridge(owner),
        }
    }

    /// Get the owner of this piece, if any
    pub fn owner(&self) -> Option<PlayerId> {
        match self {
            EdgePiece::Empty => None,
            EdgePiece::Road(p) | EdgePiece::Ship(p) | EdgePiece::Bridge(p) => Some(*p),
        }
    }

    pub fn kind(&self) -> Option<EdgeKind> {
        match self {
            EdgePiece::Empty => None,
            EdgePiece::Road(_) => Some(EdgeKind::Road),
            EdgePiece::Ship(_) => Some(EdgeKind::Ship),
            EdgePiece::Bridge(_) => Some(EdgeKind::Bridge),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EdgePiece::Empty)
    }
}

/// A hex corner; settlements and cities are built here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    location: Location,
    /// Up to three hexes meeting at this corner
    hexes: Vec<HexPos>,
    /// Up to three edges leaving this corner
    edges: Vec<EdgeId>,
    pub(crate) building: NodeBuilding,
}

impl Node {
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn hexes(&self) -> &[HexPos] {
        &self.hexes
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn building(&self) -> NodeBuilding {
        self.building
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.building.owner()
    }
}

/// A hex side; roads, ships and bridges are built here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    location: Location,
    /// One or two hexes sharing this side
    hexes: Vec<HexPos>,
    nodes: [NodeId; 2],
    pub(crate) piece: EdgePiece,
}

impl Edge {
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn hexes(&self) -> &[HexPos] {
        &self.hexes
    }

    /// The two end nodes of this edge
    pub fn nodes(&self) -> [NodeId; 2] {
        self.nodes
    }

    pub fn piece(&self) -> EdgePiece {
        self.piece
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.piece.owner()
    }
}

/// A hex on the built board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub pos: HexPos,
    pub terrain: Terrain,
    pub port: Option<Port>,
    /// Order in which this hex receives a dice roll
    pub chit: Option<u32>,
    /// Whether terrain shuffling may move this hex
    pub shuffle: bool,
    /// Dice roll resolved by chit layout (0 for desert and sea)
    pub roll: u8,
    /// Whether the robber (land) or pirate (sea) is here
    pub robber: bool,
    nodes: [NodeId; 6],
    edges: [EdgeId; 6],
}

impl Hex {
    /// Node at corner `corner` (0-5)
    pub fn node(&self, corner: usize) -> NodeId {
        self.nodes[corner % 6]
    }

    /// Edge at side `side` (0-5)
    pub fn edge(&self, side: usize) -> EdgeId {
        self.edges[side % 6]
    }

    pub fn nodes(&self) -> [NodeId; 6] {
        self.nodes
    }

    pub fn edges(&self) -> [EdgeId; 6] {
        self.edges
    }

    pub fn tile(&self) -> Tile {
        Tile {
            terrain: self.terrain,
            port: self.port,
            chit: self.chit,
            shuffle: self.shuffle,
        }
    }
}

/// Board-wide rule switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Bridges may be built over water
    pub bridges: bool,
    /// A pirate roams the sea and blocks ships beside it
    pub pirate: bool,
    /// Dice roll values laid out over producing hexes
    pub chits: Vec<u8>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            bridges: false,
            pirate: false,
            chits: STANDARD_CHITS.to_vec(),
        }
    }
}

impl Rules {
    /// Parse a JSON rules document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Errors that can occur while loading a board from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Chits(#[from] ChitError),
}

/// Standard island: 19 land hexes in rows of 3-4-5-4-3 inside a ring of sea
/// with four generic and five specific ports.
pub const STANDARD_MAP: &str = "\
-,-,s?5,s,sw4,s
-,s,t0,p1,f2,s?3
-,sb0,p11,t12,m13,h3,so3
s,f10,p17,d18,f14,m4,s?3
-,sl0,m9,h16,t15,p5,s
-,s,h8,t7,f6,s?2
-,-,s,sg1,s,s
";

/// The complete board graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    hexes: Vec<Option<Hex>>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    rules: Rules,
    pub(crate) robber: Option<HexPos>,
    pub(crate) pirate: Option<HexPos>,
    /// Set once the robber leaves its starting desert
    pub(crate) robber_moved: bool,
}

/// Node and edge handles claimed by one hex while the graph is being built
type Slots = ([Option<NodeId>; 6], [Option<EdgeId>; 6]);

impl Board {
    /// Expand a grid into the node/edge mesh.
    ///
    /// Hexes are visited in row-major order. For each corner and side the
    /// neighbouring hexes that were already visited are asked whether they
    /// created the shared node or edge; if none did, a new one is allocated.
    /// A second pass links every node to its edges and every edge to its two
    /// nodes.
    pub fn build(grid: &HexGrid, rules: Rules) -> Self {
        let mut slots: Vec<Option<Slots>> = vec![None; (grid.width() * grid.height()) as usize];
        let mut nodes: Vec<Node> = Vec::new();
        let mut edges: Vec<Edge> = Vec::new();
        let mut edge_hexes: Vec<Vec<HexPos>> = Vec::new();

        for (pos, _) in grid.tiles() {
            let mut node_ids = [None; 6];
            let mut edge_ids = [None; 6];

            for k in 0..6 {
                let (other, other_side) = pos.side_alias(k);
                let shared = grid
                    .index(other)
                    .and_then(|i| slots[i].as_ref())
                    .and_then(|(_, sides)| sides[other_side]);
                let edge = shared.unwrap_or_else(|| {
                    edge_hexes.push(Vec::new());
                    EdgeId(edge_hexes.len() as u32 - 1)
                });
                edge_hexes[edge.index()].push(pos);
                edge_ids[k] = Some(edge);

                let shared = pos.corner_aliases(k).into_iter().find_map(|(other, other_corner)| {
                    grid.index(other)
                        .and_then(|i| slots[i].as_ref())
                        .and_then(|(corners, _)| corners[other_corner])
                });
                let node = shared.unwrap_or_else(|| {
                    nodes.push(Node {
                        location: Location {
                            x: pos.x,
                            y: pos.y,
                            pos: k as u8,
                        },
                        hexes: Vec::new(),
                        edges: Vec::new(),
                        building: NodeBuilding::Empty,
                    });
                    NodeId(nodes.len() as u32 - 1)
                });
                nodes[node.index()].hexes.push(pos);
                node_ids[k] = Some(node);
            }

            if let Some(i) = grid.index(pos) {
                slots[i] = Some((node_ids, edge_ids));
            }
        }

        // Link pass: node k touches sides k and k+1, side k touches corners k and k-1
        let mut edge_nodes: Vec<Option<[NodeId; 2]>> = vec![None; edge_hexes.len()];
        let mut edge_owner: Vec<Option<Location>> = vec![None; edge_hexes.len()];
        let mut hexes: Vec<Option<Hex>> = vec![None; slots.len()];

        for (pos, tile) in grid.tiles() {
            let Some(i) = grid.index(pos) else { continue };
            let Some((node_ids, edge_ids)) = slots[i] else { continue };
            let node_ids = node_ids.map(|n| n.unwrap_or(NodeId(0)));
            let edge_ids = edge_ids.map(|e| e.unwrap_or(EdgeId(0)));

            for k in 0..6 {
                let node = &mut nodes[node_ids[k].index()];
                for side in corner_sides(k) {
                    if !node.edges.contains(&edge_ids[side]) {
                        node.edges.push(edge_ids[side]);
                    }
                }

                let edge = edge_ids[k].index();
                if edge_nodes[edge].is_none() {
                    edge_nodes[edge] = Some(side_corners(k).map(|corner| node_ids[corner]));
                    edge_owner[edge] = Some(Location {
                        x: pos.x,
                        y: pos.y,
                        pos: k as u8,
                    });
                }
            }

            hexes[i] = Some(Hex {
                pos,
                terrain: tile.terrain,
                port: tile.port,
                chit: tile.chit,
                shuffle: tile.shuffle,
                roll: 0,
                robber: false,
                nodes: node_ids,
                edges: edge_ids,
            });
        }

        for (i, hexes) in edge_hexes.into_iter().enumerate() {
            if let (Some(nodes), Some(location)) = (edge_nodes[i], edge_owner[i]) {
                edges.push(Edge {
                    location,
                    hexes,
                    nodes,
                    piece: EdgePiece::Empty,
                });
            }
        }

        debug!(
            hexes = grid.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "built board graph"
        );

        Self {
            width: grid.width(),
            height: grid.height(),
            hexes,
            nodes,
            edges,
            rules,
            robber: None,
            pirate: None,
            robber_moved: false,
        }
    }

    /// Parse map text, build the graph and lay out the rules' chit sequence
    pub fn load(text: &str, rules: Rules) -> Result<Self, LoadError> {
        Self::load_with_warnings(text, rules).map(|(board, _)| board)
    }

    /// Like [`Board::load`], also returning the tokens that were skipped
    pub fn load_with_warnings(
        text: &str,
        rules: Rules,
    ) -> Result<(Self, Vec<ParseWarning>), LoadError> {
        let (grid, warnings) = parse_grid(text)?;
        let chits = rules.chits.clone();
        let mut board = Self::build(&grid, rules);
        board.layout_chits(&chits)?;
        Ok((board, warnings))
    }

    /// The bundled standard island with the standard chit sequence
    pub fn standard() -> Self {
        Self::load(STANDARD_MAP, Rules::default()).expect("bundled standard map is well-formed")
    }

    // ==================== Query Methods ====================

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    fn index(&self, pos: HexPos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y * self.width + pos.x) as usize)
    }

    /// Get a hex by position
    pub fn hex(&self, pos: HexPos) -> Option<&Hex> {
        self.index(pos).and_then(|i| self.hexes[i].as_ref())
    }

    pub(crate) fn hex_mut(&mut self, pos: HexPos) -> Option<&mut Hex> {
        self.index(pos).and_then(|i| self.hexes[i].as_mut())
    }

    /// All hexes in row-major order
    pub fn hexes(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.iter().flatten()
    }

    pub(crate) fn hexes_mut(&mut self) -> impl Iterator<Item = &mut Hex> {
        self.hexes.iter_mut().flatten()
    }

    /// Panics if the handle did not come from this board
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Panics if the handle did not come from this board
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> {
        (0..self.edges.len() as u32).map(EdgeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Node at a corner of a hex, described from any hex that touches it
    pub fn node_at(&self, x: i32, y: i32, pos: u8) -> Option<NodeId> {
        if pos >= 6 {
            return None;
        }
        self.hex(HexPos::new(x, y)).map(|hex| hex.node(pos as usize))
    }

    /// Edge at a side of a hex, described from any hex that touches it
    pub fn edge_at(&self, x: i32, y: i32, pos: u8) -> Option<EdgeId> {
        if pos >= 6 {
            return None;
        }
        self.hex(HexPos::new(x, y)).map(|hex| hex.edge(pos as usize))
    }

    /// Current robber location
    pub fn robber(&self) -> Option<HexPos> {
        self.robber
    }

    /// Current pirate location
    pub fn pirate(&self) -> Option<HexPos> {
        self.pirate
    }

    /// The grid this board would encode to
    pub fn to_grid(&self) -> HexGrid {
        let mut grid = HexGrid::new(self.width, self.height);
        for hex in self.hexes() {
            grid.set(hex.pos, hex.tile());
        }
        grid
    }

    /// Encode the board's terrain, ports and chit order as map text
    pub fn to_text(&self) -> String {
        self.to_grid().to_text()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
