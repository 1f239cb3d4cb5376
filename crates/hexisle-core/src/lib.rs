//! Hexisle - board topology and rule-legality engine for a seafaring
//! hex-island trading game
//!
//! This crate owns the board graph and every question asked of it:
//! - Loading a board from map text and expanding it into shared corners and sides
//! - Legality of roads, ships, bridges, settlements and cities, in normal play
//!   and in the opening setup steps
//! - Longest route, port access and dice roll layout
//!
//! # Architecture
//!
//! The engine is synchronous and keeps no hidden state. A server and its
//! clients each hold their own [`Board`]; replaying the same confirmed commits
//! keeps them identical. It can be compiled to:
//! - Native Rust for the authoritative server
//! - WebAssembly for the client's own copy, used to show legal placements
//!
//! # Modules
//!
//! - [`hex`]: Offset-row coordinates, directions, corner and side numbering
//! - [`grid`]: Terrain, ports and the sparse tile table
//! - [`encoding`]: Map text parser and encoder
//! - [`board`]: The node/edge graph
//! - [`query`]: Side-effect-free predicates over the graph
//! - [`legality`]: Normal-play placement rules
//! - [`setup`]: Setup-step placement rules
//! - [`buildrec`]: Placement log, commit and undo
//! - [`route`]: Longest route
//! - [`maritime`]: Port access
//! - [`chits`]: Dice roll layout, terrain shuffle, robber and pirate
//! - [`island`]: Land masses

pub mod board;
pub mod buildrec;
pub mod chits;
pub mod encoding;
pub mod grid;
pub mod hex;
pub mod island;
pub mod legality;
pub mod maritime;
pub mod query;
pub mod route;
pub mod setup;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use board::{
    Board, Edge, EdgeId, EdgeKind, EdgePiece, Hex, LoadError, Location, Node, NodeBuilding, NodeId,
    PlayerId, Rules, STANDARD_MAP,
};
pub use buildrec::{BuildRec, BuildRecord, CommitError, Placement, Previous};
pub use chits::{ChitError, STANDARD_CHITS};
pub use encoding::{parse_grid, ParseError, ParseWarning};
pub use grid::{Harbor, HexGrid, Port, Resource, Terrain, Tile};
pub use hex::{Direction, HexPos};
pub use legality::BuildKind;
pub use maritime::MaritimeInfo;
pub use query::Assume;
pub use setup::SetupMode;
