//! # Block Propagation Subsystem
//!
//! Decides what happens to every block the node learns about: whether it is
//! imported, whether it is relayed, and to which peers.
//!
//! ## Architecture Role
//!
//! ```text
//! [Sync Manager] ──process_incoming_block──→ [Block Propagation] ──→ [Chain Connector]
//! [Miner]        ──propagate_new_block────→         │
//!                                                    ↓ relay / status push
//!                                            ┌───────┴───────┐
//!                                            ↓               ↓
//!                                       [Peer A]        [Peer B] ...
//! ```
//!
//! ## Traffic Suppression
//!
//! - A seen-block LRU cache drops every block hash after its first sighting,
//!   and its atomic check-and-mark lets only one of several concurrent
//!   receivers of the same block proceed.
//! - Relays go only to peers within a height window behind the block.
//! - Best-status pushes go only to peers already at or above the new head's
//!   total difficulty.

pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;
pub mod test_utils;

pub use config::PropagationConfig;
pub use domain::*;
pub use events::{BestStatusAnnouncement, NetworkMessage, NewBlockBroadcast, PropagationError};
pub use ports::inbound::BlockPropagationApi;
pub use ports::outbound::{ChainConnector, HeaderValidator, NetworkSender, PeerRegistry};
pub use service::BlockPropagationService;
