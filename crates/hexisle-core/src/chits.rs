//! Dice roll layout, terrain shuffling, and the robber and pirate.

use crate::board::Board;
use crate::hex::HexPos;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Standard roll sequence, laid out in chit order over the producing hexes
pub const STANDARD_CHITS: [u8; 18] = [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChitError {
    #[error("board has producing hexes but the roll sequence is empty")]
    EmptySequence,
}

fn is_red(roll: u8) -> bool {
    roll == 6 || roll == 8
}

impl Board {
    /// Assign rolls from `sequence` to the land hexes in chit order.
    ///
    /// Deserts get roll 0 and are skipped by the sequence, which wraps around
    /// when there are more producing hexes than values. Unless the robber has
    /// already been moved, it is placed on the first desert.
    pub fn layout_chits(&mut self, sequence: &[u8]) -> Result<(), ChitError> {
        let mut land: Vec<(u32, HexPos)> = self
            .hexes()
            .filter(|hex| hex.terrain.is_land())
            .map(|hex| (hex.chit.unwrap_or(u32::MAX), hex.pos))
            .collect();
        land.sort();

        let producing = land
            .iter()
            .filter(|(_, pos)| self.hex(*pos).is_some_and(|h| h.terrain.produces()))
            .count();
        if producing > 0 && sequence.is_empty() {
            return Err(ChitError::EmptySequence);
        }

        for hex in self.hexes_mut() {
            hex.roll = 0;
        }

        let mut next = 0;
        let mut first_desert = None;
        for (_, pos) in &land {
            let Some(hex) = self.hex_mut(*pos) else { continue };
            if hex.terrain.produces() {
                hex.roll = sequence[next % sequence.len()];
                next += 1;
            } else if first_desert.is_none() {
                first_desert = Some(*pos);
            }
        }

        if !self.robber_moved {
            for hex in self.hexes_mut().filter(|h| h.terrain.is_land()) {
                hex.robber = false;
            }
            self.robber = first_desert;
            if let Some(hex) = first_desert.and_then(|pos| self.hex_mut(pos)) {
                hex.robber = true;
            }
        }

        debug!(producing, values = sequence.len(), robber = ?self.robber, "laid out chits");
        Ok(())
    }

    /// Two hexes carrying a 6 or an 8 share a side
    pub fn has_adjacent_red_rolls(&self) -> bool {
        self.hexes().filter(|h| is_red(h.roll)).any(|hex| {
            hex.pos
                .neighbors()
                .iter()
                .any(|&pos| self.hex(pos).is_some_and(|n| is_red(n.roll)))
        })
    }

    /// Shuffle terrain among the shufflable land hexes and harbors among the
    /// shufflable port hexes, then lay out the rules' roll sequence again.
    ///
    /// Chit sequence indices and port facings stay where they are. Shuffling is
    /// retried a fixed number of times to keep 6s and 8s apart; if every
    /// attempt fails the last one is kept.
    pub fn shuffle_terrain<R: Rng>(&mut self, rng: &mut R) -> Result<(), ChitError> {
        const MAX_ATTEMPTS: usize = 100;

        let land: Vec<HexPos> = self
            .hexes()
            .filter(|h| h.shuffle && h.terrain.is_land())
            .map(|h| h.pos)
            .collect();
        let ports: Vec<HexPos> = self
            .hexes()
            .filter(|h| h.shuffle && h.port.is_some())
            .map(|h| h.pos)
            .collect();
        let mut terrains: Vec<_> = land.iter().filter_map(|&p| self.hex(p)).map(|h| h.terrain).collect();
        let mut harbors: Vec<_> = ports
            .iter()
            .filter_map(|&p| self.hex(p).and_then(|h| h.port))
            .map(|port| port.harbor)
            .collect();
        let sequence = self.rules().chits.clone();

        for attempt in 1..=MAX_ATTEMPTS {
            terrains.shuffle(rng);
            harbors.shuffle(rng);

            for (&pos, &terrain) in land.iter().zip(&terrains) {
                if let Some(hex) = self.hex_mut(pos) {
                    hex.terrain = terrain;
                }
            }
            for (&pos, &harbor) in ports.iter().zip(&harbors) {
                if let Some(port) = self.hex_mut(pos).and_then(|h| h.port.as_mut()) {
                    port.harbor = harbor;
                }
            }
            self.layout_chits(&sequence)?;

            if !self.has_adjacent_red_rolls() {
                debug!(attempt, "shuffled terrain");
                return Ok(());
            }
        }

        debug!("shuffled terrain, red rolls left adjacent");
        Ok(())
    }

    /// Move the robber onto a land hex. Returns false (and does nothing) if
    /// `pos` is not a land hex on this board.
    pub fn move_robber(&mut self, pos: HexPos) -> bool {
        if !self.hex(pos).is_some_and(|h| h.terrain.is_land()) {
            return false;
        }
        if let Some(hex) = self.robber.and_then(|old| self.hex_mut(old)) {
            hex.robber = false;
        }
        if let Some(hex) = self.hex_mut(pos) {
            hex.robber = true;
        }
        self.robber = Some(pos);
        self.robber_moved = true;
        true
    }

    /// Move the pirate onto a sea hex. Returns false if `pos` is not sea.
    pub fn move_pirate(&mut self, pos: HexPos) -> bool {
        if !self.hex(pos).is_some_and(|h| h.terrain.is_sea()) {
            return false;
        }
        if let Some(hex) = self.pirate.and_then(|old| self.hex_mut(old)) {
            hex.robber = false;
        }
        if let Some(hex) = self.hex_mut(pos) {
            hex.robber = true;
        }
        self.pirate = Some(pos);
        true
    }
}
