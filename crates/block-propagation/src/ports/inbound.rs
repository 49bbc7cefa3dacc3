//! Inbound ports (API) for Block Propagation subsystem.

use shared_types::{Block, PeerId};

use crate::domain::PropagationStatus;
use crate::events::PropagationError;

/// Primary API for block propagation.
pub trait BlockPropagationApi: Send + Sync {
    /// Handle a block received from a peer.
    ///
    /// Validates, deduplicates and imports the block, then relays it
    /// according to the import outcome.
    ///
    /// # Arguments
    /// * `origin` - Registry id of the sending peer (never relayed back to)
    /// * `origin_display_id` - Display id of the sending peer, for logs
    /// * `block` - The decoded block; `None` is dropped
    ///
    /// # Errors
    /// Chain connector failures are returned unchanged. The block hash stays
    /// marked as seen.
    fn process_incoming_block(
        &self,
        origin: PeerId,
        origin_display_id: &str,
        block: Option<&Block>,
    ) -> Result<PropagationStatus, PropagationError>;

    /// Broadcast a locally produced block to every active peer.
    fn propagate_new_block(&self, block: Option<&Block>);
}
