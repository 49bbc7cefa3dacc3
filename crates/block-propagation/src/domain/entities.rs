//! # Peer View
//!
//! Snapshot of what a connected peer last told us about its chain.

use shared_types::{PeerId, U256};

/// A peer as reported by the peer registry at snapshot time.
///
/// # Example
///
/// ```rust
/// use block_propagation::PeerView;
/// use shared_types::{PeerId, U256};
///
/// let peer = PeerView::new(PeerId(7), "node-7", 1_000, U256::from(5_000));
/// assert_eq!(peer.best_height, 1_000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerView {
    /// Registry-assigned numeric id.
    pub id: PeerId,
    /// Short human-readable id used in logs and by the sender.
    pub display_id: String,
    /// Best block height from the peer's last status (0 = unknown).
    pub best_height: u64,
    /// Cumulative difficulty from the peer's last status.
    pub total_difficulty: U256,
}

impl PeerView {
    pub fn new(
        id: PeerId,
        display_id: impl Into<String>,
        best_height: u64,
        total_difficulty: U256,
    ) -> Self {
        Self {
            id,
            display_id: display_id.into(),
            best_height,
            total_difficulty,
        }
    }
}
