//! Which sea-port trade rates a player has reached.

use crate::board::{Board, PlayerId};
use crate::grid::{Harbor, Resource};
use crate::hex::side_corners;
use serde::{Deserialize, Serialize};

/// Ports a player can trade through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaritimeInfo {
    /// A 3:1 port for any resource
    pub any_resource: bool,
    /// A 2:1 port, indexed by [`Resource::index`]
    pub specific: [bool; 5],
}

impl MaritimeInfo {
    pub fn has_port(&self, harbor: Harbor) -> bool {
        match harbor {
            Harbor::Generic => self.any_resource,
            Harbor::Specific(resource) => self.specific[resource.index()],
        }
    }

    /// How many of `resource` buy one card of another resource
    pub fn rate(&self, resource: Resource) -> u32 {
        if self.specific[resource.index()] {
            2
        } else if self.any_resource {
            3
        } else {
            4
        }
    }

    fn add(&mut self, harbor: Harbor) {
        match harbor {
            Harbor::Generic => self.any_resource = true,
            Harbor::Specific(resource) => self.specific[resource.index()] = true,
        }
    }
}

impl Board {
    /// Harbors whose two corners on the facing side hold one of the player's
    /// buildings, one entry per port
    pub fn player_harbors(&self, player: PlayerId) -> Vec<Harbor> {
        self.hexes()
            .filter(|hex| hex.terrain.is_sea())
            .filter_map(|hex| hex.port.map(|port| (hex, port)))
            .filter(|(hex, port)| {
                side_corners(port.facing.index())
                    .iter()
                    .any(|&corner| self.node(hex.node(corner)).owner() == Some(player))
            })
            .map(|(_, port)| port.harbor)
            .collect()
    }

    pub fn maritime_info(&self, player: PlayerId) -> MaritimeInfo {
        let mut info = MaritimeInfo::default();
        for harbor in self.player_harbors(player) {
            info.add(harbor);
        }
        info
    }
}
