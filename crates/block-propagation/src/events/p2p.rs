//! P2P message types emitted by Block Propagation.

use shared_types::{Block, Hash, U256};
use std::sync::Arc;

/// Outbound network messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkMessage {
    /// Full block pushed to a peer
    NewBlock(NewBlockBroadcast),
    /// Our new best chain status
    BestStatus(BestStatusAnnouncement),
}

/// Full block broadcast. The block is shared between all recipients of
/// one fanout round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewBlockBroadcast {
    pub block: Arc<Block>,
}

/// Best chain status pushed after a block became the new head.
///
/// `genesis_hash` lets the receiver reject status from a foreign network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestStatusAnnouncement {
    pub best_height: u64,
    pub cumulative_difficulty: U256,
    pub best_hash: Hash,
    pub genesis_hash: Hash,
}

impl BestStatusAnnouncement {
    /// Build the announcement for `best`, the current canonical head.
    pub fn for_best_block(best: &Block, genesis_hash: Hash) -> Self {
        Self {
            best_height: best.height(),
            cumulative_difficulty: best.cumulative_difficulty(),
            best_hash: *best.hash(),
            genesis_hash,
        }
    }
}
