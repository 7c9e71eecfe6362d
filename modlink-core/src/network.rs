use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const MAX_PLAYERS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Broadcast,
    /// A player's local index.
    Player(u8),
}

/// Outgoing traffic produced by scripts. Delivery is the transport's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    Object {
        sync_id: u32,
        reliable: bool,
        values: Vec<u32>,
    },
    Custom {
        destination: Destination,
        reliable: bool,
        payload: Vec<u8>,
    },
}

#[derive(Debug)]
pub struct NetworkState {
    connected: usize,
    max_players: usize,
    outbox: VecDeque<Packet>,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self::new(MAX_PLAYERS)
    }
}

impl NetworkState {
    pub fn new(max_players: usize) -> Self {
        Self {
            connected: 1,
            max_players,
            outbox: VecDeque::new(),
        }
    }

    /// Number of connected participants, the local player included.
    pub fn connected(&self) -> usize {
        self.connected
    }

    pub fn set_connected(&mut self, count: usize) {
        self.connected = count.min(self.max_players);
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn is_single_player(&self) -> bool {
        self.connected < 2
    }

    pub fn send_object(&mut self, sync_id: u32, reliable: bool, values: Vec<u32>) {
        log::debug!("queue object packet sync_id={} reliable={}", sync_id, reliable);
        self.outbox.push_back(Packet::Object {
            sync_id,
            reliable,
            values,
        });
    }

    pub fn send_custom(&mut self, destination: Destination, reliable: bool, payload: Vec<u8>) {
        log::debug!(
            "queue custom packet to {:?} ({} bytes, reliable={})",
            destination,
            payload.len(),
            reliable
        );
        self.outbox.push_back(Packet::Custom {
            destination,
            reliable,
            payload,
        });
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Packet> + '_ {
        self.outbox.drain(..)
    }
}
