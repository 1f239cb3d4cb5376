//! WebAssembly bindings for the Hexisle board engine.
//!
//! A browser client keeps its own copy of the board and asks it which slots
//! are legal before the player clicks. Slots are named by `(x, y, pos)` as
//! seen from any hex that touches them.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::board::{Board, EdgeId, EdgeKind, NodeId, Rules};
#[cfg(feature = "wasm")]
use crate::buildrec::{BuildRecord, Placement};
#[cfg(feature = "wasm")]
use crate::setup::SetupMode;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn edge_kind(name: &str) -> Result<EdgeKind, JsValue> {
    match name {
        "road" => Ok(EdgeKind::Road),
        "ship" => Ok(EdgeKind::Ship),
        "bridge" => Ok(EdgeKind::Bridge),
        other => Err(JsValue::from_str(&format!("Unknown edge kind: {}", other))),
    }
}

#[cfg(feature = "wasm")]
fn setup_mode(double: bool) -> SetupMode {
    if double {
        SetupMode::Double
    } else {
        SetupMode::Single
    }
}

/// WASM-exposed board mirror with the open turn's build record
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmBoard {
    board: Board,
    record: BuildRecord,
}

#[cfg(feature = "wasm")]
impl WasmBoard {
    fn node(&self, x: i32, y: i32, pos: u8) -> Option<NodeId> {
        self.board.node_at(x, y, pos)
    }

    fn edge(&self, x: i32, y: i32, pos: u8) -> Option<EdgeId> {
        self.board.edge_at(x, y, pos)
    }

    fn commit(&mut self, player: u8, placement: Placement) -> Result<(), JsValue> {
        self.board
            .commit(&mut self.record, player, placement)
            .map_err(|e| JsValue::from_str(&format!("Commit failed: {}", e)))
    }
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmBoard {
    /// Load a board from map text and a JSON rules document ("" for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(map: &str, rules_json: &str) -> Result<WasmBoard, JsValue> {
        let rules = if rules_json.trim().is_empty() {
            Rules::default()
        } else {
            Rules::from_json(rules_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid rules: {}", e)))?
        };
        let board = Board::load(map, rules)
            .map_err(|e| JsValue::from_str(&format!("Invalid map: {}", e)))?;
        Ok(WasmBoard {
            board,
            record: BuildRecord::new(),
        })
    }

    /// The whole board as JSON
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        serde_json::to_string(&self.board).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = canBuildEdge)]
    pub fn can_build_edge(&self, kind: &str, x: i32, y: i32, pos: u8, player: u8) -> Result<bool, JsValue> {
        let kind = edge_kind(kind)?;
        Ok(self
            .edge(x, y, pos)
            .is_some_and(|e| self.board.can_build_edge(e, kind, player)))
    }

    #[wasm_bindgen(js_name = canBuildSettlement)]
    pub fn can_build_settlement(&self, x: i32, y: i32, pos: u8, player: u8) -> bool {
        self.node(x, y, pos)
            .is_some_and(|n| self.board.can_build_settlement(n, player))
    }

    #[wasm_bindgen(js_name = canBuildCity)]
    pub fn can_build_city(&self, x: i32, y: i32, pos: u8, player: u8) -> bool {
        self.node(x, y, pos)
            .is_some_and(|n| self.board.can_build_city(n, player))
    }

    #[wasm_bindgen(js_name = canMoveShip)]
    pub fn can_move_ship(&self, from_x: i32, from_y: i32, from_pos: u8, x: i32, y: i32, pos: u8, player: u8) -> bool {
        match (self.edge(from_x, from_y, from_pos), self.edge(x, y, pos)) {
            (Some(from), Some(to)) => self.board.can_move_ship(&self.record, from, to, player),
            _ => false,
        }
    }

    #[wasm_bindgen(js_name = canSetupEdge)]
    pub fn can_setup_edge(&self, kind: &str, x: i32, y: i32, pos: u8, double: bool) -> Result<bool, JsValue> {
        let kind = edge_kind(kind)?;
        Ok(self
            .edge(x, y, pos)
            .is_some_and(|e| self.board.can_setup_edge(&self.record, e, kind, setup_mode(double))))
    }

    #[wasm_bindgen(js_name = canSetupSettlement)]
    pub fn can_setup_settlement(&self, x: i32, y: i32, pos: u8, double: bool) -> bool {
        self.node(x, y, pos)
            .is_some_and(|n| self.board.can_setup_settlement(&self.record, n, setup_mode(double)))
    }

    /// Place a road, ship or bridge
    #[wasm_bindgen(js_name = buildEdge)]
    pub fn build_edge(&mut self, kind: &str, x: i32, y: i32, pos: u8, player: u8) -> Result<(), JsValue> {
        let kind = edge_kind(kind)?;
        let edge = self
            .edge(x, y, pos)
            .ok_or_else(|| JsValue::from_str("No such edge"))?;
        self.commit(player, Placement::edge(kind, edge))
    }

    #[wasm_bindgen(js_name = buildSettlement)]
    pub fn build_settlement(&mut self, x: i32, y: i32, pos: u8, player: u8) -> Result<(), JsValue> {
        let node = self
            .node(x, y, pos)
            .ok_or_else(|| JsValue::from_str("No such node"))?;
        self.commit(player, Placement::Settlement(node))
    }

    #[wasm_bindgen(js_name = buildCity)]
    pub fn build_city(&mut self, x: i32, y: i32, pos: u8, player: u8) -> Result<(), JsValue> {
        let node = self
            .node(x, y, pos)
            .ok_or_else(|| JsValue::from_str("No such node"))?;
        self.commit(player, Placement::City(node))
    }

    #[wasm_bindgen(js_name = moveShip)]
    pub fn move_ship(&mut self, from_x: i32, from_y: i32, from_pos: u8, x: i32, y: i32, pos: u8, player: u8) -> Result<(), JsValue> {
        let (from, to) = match (self.edge(from_x, from_y, from_pos), self.edge(x, y, pos)) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(JsValue::from_str("No such edge")),
        };
        self.commit(player, Placement::MoveShip { from, to })
    }

    /// Undo the newest placement of the open step; false if there was none
    pub fn undo(&mut self) -> bool {
        self.board.undo(&mut self.record).is_some()
    }

    /// Confirm the open step
    pub fn confirm(&mut self) {
        self.record.clear();
    }

    #[wasm_bindgen(js_name = setupComplete)]
    pub fn setup_complete(&self, double: bool) -> bool {
        self.record.setup_complete(&self.board, setup_mode(double))
    }

    #[wasm_bindgen(js_name = longestRoute)]
    pub fn longest_route(&self, player: u8) -> u32 {
        self.board.longest_route(player)
    }

    /// Port access as JSON
    #[wasm_bindgen(js_name = getMaritimeInfo)]
    pub fn get_maritime_info(&self, player: u8) -> String {
        serde_json::to_string(&self.board.maritime_info(player)).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = moveRobber)]
    pub fn move_robber(&mut self, x: i32, y: i32) -> bool {
        self.board.move_robber(crate::hex::HexPos::new(x, y))
    }

    #[wasm_bindgen(js_name = movePirate)]
    pub fn move_pirate(&mut self, x: i32, y: i32) -> bool {
        self.board.move_pirate(crate::hex::HexPos::new(x, y))
    }
}
