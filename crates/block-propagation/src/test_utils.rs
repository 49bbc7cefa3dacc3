//! Test utilities for block propagation.
//!
//! In-memory implementations of the outbound ports, used by the unit tests
//! and the integration tests under `tests/`.
//!
//! # Example
//!
//! ```rust
//! use block_propagation::test_utils::{make_block, MockChainConnector};
//! use block_propagation::{ChainConnector, ImportOutcome};
//!
//! let chain = MockChainConnector::new(ImportOutcome::ConnectedNotBest);
//! let block = make_block(10, 100);
//! assert_eq!(chain.try_to_connect(&block).unwrap(), ImportOutcome::ConnectedNotBest);
//! assert_eq!(chain.connect_count(block.hash()), 1);
//! ```

use parking_lot::{Mutex, RwLock};
use shared_types::{Block, BlockHeader, Hash, PeerId, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{ImportOutcome, PeerView};
use crate::events::{NetworkMessage, PropagationError};
use crate::ports::outbound::{ChainConnector, HeaderValidator, NetworkSender, PeerRegistry};

/// Block at `height` with the given cumulative difficulty.
pub fn make_block(height: u64, cumulative_difficulty: u64) -> Block {
    make_block_with_nonce(height, cumulative_difficulty, 0)
}

/// Like [`make_block`], with a nonce to get distinct hashes at one height.
pub fn make_block_with_nonce(height: u64, cumulative_difficulty: u64, nonce: u64) -> Block {
    let header = BlockHeader {
        version: 1,
        height,
        parent_hash: [0x11; 32],
        timestamp: 1_700_000_000 + height,
        difficulty: U256::from(1),
        nonce,
        ..Default::default()
    };
    Block::new(header, vec![[0x22; 32]], U256::from(cumulative_difficulty))
}

/// Peer snapshot entry.
pub fn make_peer(id: u32, best_height: u64, total_difficulty: u64) -> PeerView {
    PeerView::new(
        PeerId(id),
        format!("peer-{id}"),
        best_height,
        U256::from(total_difficulty),
    )
}

/// Header validator with a fixed verdict.
pub struct MockHeaderValidator {
    accept: AtomicBool,
    calls: AtomicUsize,
}

impl MockHeaderValidator {
    pub fn accepting() -> Self {
        Self {
            accept: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_accept(&self, accept: bool) {
        self.accept.store(accept, Ordering::SeqCst);
    }

    /// Number of headers validated so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HeaderValidator for MockHeaderValidator {
    fn validate(&self, _header: &BlockHeader) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.accept.load(Ordering::SeqCst)
    }
}

/// Chain connector returning a scripted outcome and recording every call.
pub struct MockChainConnector {
    outcome: Mutex<ImportOutcome>,
    out_of_window: AtomicBool,
    fail_connect: AtomicBool,
    fail_skip: AtomicBool,
    fail_store: AtomicBool,
    store_result: AtomicBool,
    connect_delay: Mutex<Duration>,
    best_block: Mutex<Option<Block>>,
    connected: Mutex<Vec<Hash>>,
    pending: Mutex<Vec<Hash>>,
}

impl MockChainConnector {
    pub fn new(outcome: ImportOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            out_of_window: AtomicBool::new(false),
            fail_connect: AtomicBool::new(false),
            fail_skip: AtomicBool::new(false),
            fail_store: AtomicBool::new(false),
            store_result: AtomicBool::new(true),
            connect_delay: Mutex::new(Duration::ZERO),
            best_block: Mutex::new(None),
            connected: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Head returned by `get_best_block`.
    pub fn with_best_block(self, block: Block) -> Self {
        *self.best_block.lock() = Some(block);
        self
    }

    /// Sleep inside `try_to_connect`, widening race windows.
    pub fn with_connect_delay(self, delay: Duration) -> Self {
        *self.connect_delay.lock() = delay;
        self
    }

    pub fn set_outcome(&self, outcome: ImportOutcome) {
        *self.outcome.lock() = outcome;
    }

    /// Report every height as outside the import window.
    pub fn set_out_of_window(&self, out_of_window: bool) {
        self.out_of_window.store(out_of_window, Ordering::SeqCst);
    }

    /// Make `try_to_connect` return an error.
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Make `skip_try_to_connect` return an error.
    pub fn set_fail_skip(&self, fail: bool) {
        self.fail_skip.store(fail, Ordering::SeqCst);
    }

    /// Make `store_pending_status_block` return an error.
    pub fn set_fail_store(&self, fail: bool) {
        self.fail_store.store(fail, Ordering::SeqCst);
    }

    pub fn set_store_result(&self, stored: bool) {
        self.store_result.store(stored, Ordering::SeqCst);
    }

    /// How many times `try_to_connect` saw `hash`.
    pub fn connect_count(&self, hash: &Hash) -> usize {
        self.connected.lock().iter().filter(|h| *h == hash).count()
    }

    /// Total `try_to_connect` invocations.
    pub fn total_connects(&self) -> usize {
        self.connected.lock().len()
    }

    /// Hashes passed to `store_pending_status_block`.
    pub fn pending_blocks(&self) -> Vec<Hash> {
        self.pending.lock().clone()
    }
}

impl ChainConnector for MockChainConnector {
    fn skip_try_to_connect(&self, _height: u64) -> Result<bool, PropagationError> {
        if self.fail_skip.load(Ordering::SeqCst) {
            return Err(PropagationError::Connector("height check failed".to_string()));
        }
        Ok(self.out_of_window.load(Ordering::SeqCst))
    }

    fn try_to_connect(&self, block: &Block) -> Result<ImportOutcome, PropagationError> {
        self.connected.lock().push(*block.hash());

        let delay = *self.connect_delay.lock();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(PropagationError::Connector("import failed".to_string()));
        }
        Ok(*self.outcome.lock())
    }

    fn store_pending_status_block(&self, block: &Block) -> Result<bool, PropagationError> {
        self.pending.lock().push(*block.hash());
        if self.fail_store.load(Ordering::SeqCst) {
            return Err(PropagationError::Connector("pending store failed".to_string()));
        }
        Ok(self.store_result.load(Ordering::SeqCst))
    }

    fn get_best_block(&self) -> Result<Block, PropagationError> {
        self.best_block
            .lock()
            .clone()
            .ok_or_else(|| PropagationError::Connector("no best block".to_string()))
    }
}

/// Peer registry backed by a map that tests can mutate.
#[derive(Default)]
pub struct StaticPeerRegistry {
    peers: RwLock<HashMap<PeerId, PeerView>>,
}

impl StaticPeerRegistry {
    pub fn new(peers: Vec<PeerView>) -> Self {
        Self {
            peers: RwLock::new(peers.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub fn add(&self, peer: PeerView) {
        self.peers.write().insert(peer.id, peer);
    }

    pub fn remove(&self, id: PeerId) {
        self.peers.write().remove(&id);
    }
}

impl PeerRegistry for StaticPeerRegistry {
    fn active_peers(&self) -> HashMap<PeerId, PeerView> {
        self.peers.read().clone()
    }
}

/// One message handed to the network.
#[derive(Clone, Debug)]
pub struct SentMessage {
    pub peer_id: PeerId,
    pub display_id: String,
    pub message: NetworkMessage,
}

/// Network sender that records instead of sending.
#[derive(Default)]
pub struct RecordingNetwork {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }

    /// Sorted ids of peers that received a `NewBlock`.
    pub fn new_block_recipients(&self) -> Vec<PeerId> {
        self.recipients(|m| matches!(m, NetworkMessage::NewBlock(_)))
    }

    /// Sorted ids of peers that received a `BestStatus`.
    pub fn status_recipients(&self) -> Vec<PeerId> {
        self.recipients(|m| matches!(m, NetworkMessage::BestStatus(_)))
    }

    fn recipients<F>(&self, filter: F) -> Vec<PeerId>
    where
        F: Fn(&NetworkMessage) -> bool,
    {
        let mut ids: Vec<PeerId> = self
            .sent
            .lock()
            .iter()
            .filter(|s| filter(&s.message))
            .map(|s| s.peer_id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl NetworkSender for RecordingNetwork {
    fn send(&self, peer_id: PeerId, display_id: &str, message: NetworkMessage) {
        self.sent.lock().push(SentMessage {
            peer_id,
            display_id: display_id.to_string(),
            message,
        });
    }
}
