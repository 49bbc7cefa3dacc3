//! # Core Chain Entities
//!
//! Block and peer identity types exchanged between the propagation subsystem
//! and its collaborators (validator, chain connector, peer registry).
//!
//! ## Contents
//!
//! - [`BlockHeader`]: raw header as produced by the miner / wire decoder
//! - [`Block`]: immutable block with its content hash and cumulative difficulty
//! - [`PeerId`]: numeric peer identifier assigned by the peer registry

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

// Re-export U256 from primitive-types for chain difficulty arithmetic
pub use primitive_types::U256;

/// A 32-byte content hash (SHA-256).
pub type Hash = [u8; 32];

/// Number of hex characters shown by [`Block::short_hash`].
const SHORT_HASH_LEN: usize = 6;

/// The header of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BlockHeader {
    /// Protocol version for this block.
    pub version: u16,
    /// Block height in the chain (0 = genesis).
    pub height: u64,
    /// Hash of the parent block.
    pub parent_hash: Hash,
    /// Merkle root of all transactions in the block.
    pub merkle_root: Hash,
    /// Root hash of the state trie after applying this block.
    pub state_root: Hash,
    /// Unix timestamp (seconds) when the block was sealed.
    pub timestamp: u64,
    /// Difficulty of this single block.
    pub difficulty: U256,
    /// Proof-of-work nonce.
    pub nonce: u64,
}

impl BlockHeader {
    /// Compute the SHA-256 content hash of this header.
    pub fn hash(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.parent_hash);
        hasher.update(self.merkle_root);
        hasher.update(self.state_root);
        hasher.update(self.timestamp.to_le_bytes());
        let mut difficulty_bytes = [0u8; 32];
        self.difficulty.to_big_endian(&mut difficulty_bytes);
        hasher.update(difficulty_bytes);
        hasher.update(self.nonce.to_le_bytes());
        hasher.finalize().into()
    }
}

/// A block as seen by the propagation subsystem.
///
/// Identity is the header's content hash, computed once at construction.
/// The block is read-only afterwards; all fields are reached through
/// accessors so the hash can never drift from the header.
///
/// # Example
///
/// ```rust
/// use shared_types::{Block, BlockHeader, U256};
///
/// let header = BlockHeader { height: 7, ..Default::default() };
/// let block = Block::new(header.clone(), vec![[1u8; 32]], U256::from(42));
///
/// assert_eq!(block.height(), 7);
/// assert_eq!(block.hash(), &header.hash());
/// assert_eq!(block.transaction_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    header: BlockHeader,
    hash: Hash,
    transactions: Vec<Hash>,
    cumulative_difficulty: U256,
}

impl Block {
    /// Build a block from its header, transaction hashes and the chain's
    /// cumulative difficulty up to and including this block.
    pub fn new(header: BlockHeader, transactions: Vec<Hash>, cumulative_difficulty: U256) -> Self {
        let hash = header.hash();
        Self {
            header,
            hash,
            transactions,
            cumulative_difficulty,
        }
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn height(&self) -> u64 {
        self.header.height
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn cumulative_difficulty(&self) -> U256 {
        self.cumulative_difficulty
    }

    pub fn transactions(&self) -> &[Hash] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Abbreviated hex hash for log lines.
    pub fn short_hash(&self) -> String {
        let mut encoded = hex::encode(self.hash);
        encoded.truncate(SHORT_HASH_LEN);
        encoded
    }
}

/// Numeric identifier the peer registry assigns to a connected peer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PeerId(pub u32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(height: u64) -> BlockHeader {
        BlockHeader {
            version: 1,
            height,
            parent_hash: [0xAA; 32],
            timestamp: 1_700_000_000 + height,
            difficulty: U256::from(16),
            ..Default::default()
        }
    }

    #[test]
    fn test_block_hash_matches_header() {
        let h = header(10);
        let block = Block::new(h.clone(), vec![], U256::from(160));
        assert_eq!(block.hash(), &h.hash());
        assert_eq!(block.height(), 10);
        assert_eq!(block.cumulative_difficulty(), U256::from(160));
    }

    #[test]
    fn test_header_hash_changes_with_fields() {
        let a = header(10);
        let mut b = header(10);
        b.nonce = 1;
        assert_ne!(a.hash(), b.hash());
        assert_eq!(a.hash(), header(10).hash());
    }

    #[test]
    fn test_short_hash_is_prefix() {
        let block = Block::new(header(3), vec![[1u8; 32], [2u8; 32]], U256::zero());
        let full = hex::encode(block.hash());
        assert_eq!(block.short_hash().len(), 6);
        assert!(full.starts_with(&block.short_hash()));
        assert_eq!(block.transaction_count(), 2);
    }

    #[test]
    fn test_peer_id_display() {
        assert_eq!(PeerId(42).to_string(), "42");
    }
}
