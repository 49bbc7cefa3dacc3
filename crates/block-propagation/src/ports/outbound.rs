//! Outbound ports (SPI) for Block Propagation subsystem.

use shared_types::{Block, BlockHeader, PeerId};
use std::collections::HashMap;

use crate::domain::{ImportOutcome, PeerView};
use crate::events::{NetworkMessage, PropagationError};

/// Header validation rules (PoW, timestamp, structure).
pub trait HeaderValidator: Send + Sync {
    /// Returns `true` if the header passes validation. Must not mutate
    /// propagation state.
    fn validate(&self, header: &BlockHeader) -> bool;
}

/// Chain import and fork choice.
///
/// Calls may block for as long as the import takes; no timeout is applied
/// by the propagation service.
pub trait ChainConnector: Send + Sync {
    /// True if `height` is outside the window the chain currently imports.
    fn skip_try_to_connect(&self, height: u64) -> Result<bool, PropagationError>;

    /// Import the block and report the fork-choice decision.
    fn try_to_connect(&self, block: &Block) -> Result<ImportOutcome, PropagationError>;

    /// Keep an out-of-window block as a pending candidate. Best effort.
    fn store_pending_status_block(&self, block: &Block) -> Result<bool, PropagationError>;

    /// Current canonical head.
    fn get_best_block(&self) -> Result<Block, PropagationError>;
}

/// Registry of connected peers.
pub trait PeerRegistry: Send + Sync {
    /// Owned snapshot of active peers. Must be safe to call while peers
    /// connect and disconnect.
    fn active_peers(&self) -> HashMap<PeerId, PeerView>;
}

/// P2P message dispatch.
pub trait NetworkSender: Send + Sync {
    /// Fire-and-forget send. Delivery failures stay inside the sender.
    fn send(&self, peer_id: PeerId, display_id: &str, message: NetworkMessage);
}
