//! Peer selection for block relay and best-status pushes.

use shared_types::{PeerId, U256};

use super::PeerView;

/// Should a peer at `peer_best_height` receive a block at `block_height`?
///
/// The peer must be at most `window` blocks behind and not ahead of the
/// block. A best height of 0 means the peer has not reported status yet;
/// such peers always qualify.
pub fn within_broadcast_window(block_height: u64, peer_best_height: u64, window: u64) -> bool {
    if peer_best_height == 0 {
        return true;
    }
    block_height
        .checked_sub(peer_best_height)
        .is_some_and(|delta| delta <= window)
}

/// Peers that receive a relayed block: everyone but the origin inside the
/// height window.
pub fn select_block_recipients<'a, I>(
    peers: I,
    block_height: u64,
    origin: PeerId,
    window: u64,
) -> Vec<&'a PeerView>
where
    I: IntoIterator<Item = &'a PeerView>,
{
    peers
        .into_iter()
        .filter(|peer| peer.id != origin)
        .filter(|peer| within_broadcast_window(block_height, peer.best_height, window))
        .collect()
}

/// Peers that receive our new best status: everyone but the origin whose
/// reported total difficulty already matches or exceeds the new head.
pub fn select_status_recipients<'a, I>(
    peers: I,
    best_difficulty: U256,
    origin: PeerId,
) -> Vec<&'a PeerView>
where
    I: IntoIterator<Item = &'a PeerView>,
{
    peers
        .into_iter()
        .filter(|peer| peer.id != origin)
        .filter(|peer| peer.total_difficulty >= best_difficulty)
        .collect()
}
