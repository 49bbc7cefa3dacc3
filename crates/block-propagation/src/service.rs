//! # Block Propagation Service
//!
//! Decides, for every block the node learns about, whether it is imported,
//! whether it is relayed, and to whom.
//!
//! ## Architecture
//!
//! This service implements the inbound port [`BlockPropagationApi`]:
//! - `process_incoming_block`: blocks received from peers
//! - `propagate_new_block`: blocks produced locally
//!
//! It depends on four outbound ports (implemented by adapters in the node):
//! - [`HeaderValidator`]: header checks before any caching
//! - [`ChainConnector`]: import / fork choice
//! - [`PeerRegistry`]: snapshot of active peers
//! - [`NetworkSender`]: message dispatch
//!
//! ## Incoming Block Pipeline
//!
//! ```text
//! validate header ──fail──→ Dropped (not cached)
//!       │
//! try_mark_seen ──dup──→ Dropped
//!       │
//! in import window? ──no──→ Orphan + store pending
//!       │yes
//! try_to_connect ──→ outcome
//!       │
//! valid? → relay to peers in height window
//! best?  → push status to peers at or above new total difficulty
//! ```
//!
//! The hash is marked before import, so a block whose import fails (even
//! with a connector error) is never reprocessed while it stays cached.

use std::sync::Arc;
use std::time::Instant;

use shared_types::{Block, PeerId};
use tracing::{debug, info, trace};

use crate::config::PropagationConfig;
use crate::domain::{
    derive_status, is_best, is_valid, select_block_recipients, select_status_recipients,
    ImportOutcome, PropagationStatus, SeenBlockCache,
};
use crate::events::{BestStatusAnnouncement, NetworkMessage, NewBlockBroadcast, PropagationError};
use crate::ports::inbound::BlockPropagationApi;
use crate::ports::outbound::{ChainConnector, HeaderValidator, NetworkSender, PeerRegistry};

/// Block Propagation Service.
///
/// ## Thread Safety
///
/// This service is thread-safe and can be shared across worker threads via
/// `Arc`. The seen block cache is the only mutable state; peer data is read
/// as a fresh snapshot on every operation.
pub struct BlockPropagationService<V, C, R, N>
where
    V: HeaderValidator,
    C: ChainConnector,
    R: PeerRegistry,
    N: NetworkSender,
{
    /// Service configuration.
    config: PropagationConfig,
    /// LRU cache for deduplication.
    seen_cache: SeenBlockCache,
    /// Header validation rules.
    validator: Arc<V>,
    /// Chain import adapter.
    chain: Arc<C>,
    /// Active peer registry.
    peers: Arc<R>,
    /// P2P message dispatch.
    network: Arc<N>,
}

impl<V, C, R, N> BlockPropagationService<V, C, R, N>
where
    V: HeaderValidator,
    C: ChainConnector,
    R: PeerRegistry,
    N: NetworkSender,
{
    /// Create the service. Fails if the config does not validate.
    pub fn new(
        config: PropagationConfig,
        validator: Arc<V>,
        chain: Arc<C>,
        peers: Arc<R>,
        network: Arc<N>,
    ) -> Result<Self, PropagationError> {
        let capacity = config.seen_cache_capacity()?;
        Ok(Self {
            seen_cache: SeenBlockCache::new(capacity),
            config,
            validator,
            chain,
            peers,
            network,
        })
    }

    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    /// Deduplication cache, exposed for diagnostics.
    pub fn seen_cache(&self) -> &SeenBlockCache {
        &self.seen_cache
    }

    /// Hand the block to the chain, or park it if it is out of range.
    fn import(
        &self,
        origin_display_id: &str,
        block: &Block,
    ) -> Result<ImportOutcome, PropagationError> {
        let started = Instant::now();

        if self.chain.skip_try_to_connect(block.height())? {
            info!(
                node = origin_display_id,
                hash = %block.short_hash(),
                number = block.height(),
                txs = block.transaction_count(),
                block_time = block.timestamp(),
                "import-status: NOT_IN_RANGE"
            );
            let stored = self.chain.store_pending_status_block(block)?;
            debug!(
                hash = %block.short_hash(),
                number = block.height(),
                txs = block.transaction_count(),
                stored,
                "Out-of-range block {}",
                if stored { "STORED" } else { "NOT STORED" }
            );
            return Ok(ImportOutcome::Orphan);
        }

        let outcome = self.chain.try_to_connect(block)?;
        info!(
            node = origin_display_id,
            hash = %block.short_hash(),
            number = block.height(),
            txs = block.transaction_count(),
            block_time = block.timestamp(),
            result = %outcome,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "import-status"
        );
        Ok(outcome)
    }

    /// Relay `block` to peers in the height window, skipping `origin`.
    ///
    /// Returns whether at least one peer was sent the block. Sync-only nodes
    /// send nothing but still report `true`.
    fn send(&self, block: &Block, origin: PeerId) -> bool {
        if self.config.sync_only {
            return true;
        }

        let snapshot = self.peers.active_peers();
        let recipients = select_block_recipients(
            snapshot.values(),
            block.height(),
            origin,
            self.config.broadcast_height_window,
        );
        if recipients.is_empty() {
            return false;
        }

        let shared = Arc::new(block.clone());
        let mut sent = false;
        for peer in recipients {
            debug!(
                hash = %block.short_hash(),
                to_node = %peer.display_id,
                "sending-new-block"
            );
            self.network.send(
                peer.id,
                &peer.display_id,
                NetworkMessage::NewBlock(NewBlockBroadcast {
                    block: Arc::clone(&shared),
                }),
            );
            sent = true;
        }
        sent
    }

    /// Push our new head to peers already at or above its total difficulty.
    fn announce_best_status(
        &self,
        block: &Block,
        origin: PeerId,
        outcome: ImportOutcome,
    ) -> Result<(), PropagationError> {
        let best = self.chain.get_best_block()?;
        let best_difficulty = best.cumulative_difficulty();
        let status = BestStatusAnnouncement::for_best_block(&best, self.config.genesis_hash);

        let snapshot = self.peers.active_peers();
        for peer in select_status_recipients(snapshot.values(), best_difficulty, origin) {
            debug!(
                blk = block.height(),
                hash = %block.short_hash(),
                to_node = %peer.display_id,
                ahead_by = %peer.total_difficulty.saturating_sub(best_difficulty),
                import_result = %outcome,
                "push-status"
            );
            self.network.send(
                peer.id,
                &peer.display_id,
                NetworkMessage::BestStatus(status.clone()),
            );
        }
        Ok(())
    }
}

impl<V, C, R, N> BlockPropagationApi for BlockPropagationService<V, C, R, N>
where
    V: HeaderValidator,
    C: ChainConnector,
    R: PeerRegistry,
    N: NetworkSender,
{
    fn process_incoming_block(
        &self,
        origin: PeerId,
        origin_display_id: &str,
        block: Option<&Block>,
    ) -> Result<PropagationStatus, PropagationError> {
        let Some(block) = block else {
            return Ok(PropagationStatus::Dropped);
        };

        // Invalid headers are not cached; a resend is validated again
        if !self.validator.validate(block.header()) {
            debug!(
                node = origin_display_id,
                hash = %block.short_hash(),
                number = block.height(),
                "Header validation failed"
            );
            return Ok(PropagationStatus::Dropped);
        }

        if self.seen_cache.try_mark_seen(*block.hash()) {
            trace!(hash = %block.short_hash(), "block already cached");
            return Ok(PropagationStatus::Dropped);
        }

        let outcome = self.import(origin_display_id, block)?;

        let sent = is_valid(outcome) && self.send(block, origin);

        if is_best(outcome) {
            self.announce_best_status(block, origin, outcome)?;
        }

        Ok(derive_status(sent, outcome))
    }

    fn propagate_new_block(&self, block: Option<&Block>) {
        let Some(block) = block else {
            return;
        };

        self.seen_cache.mark_seen(*block.hash());

        let shared = Arc::new(block.clone());
        for peer in self.peers.active_peers().values() {
            debug!(
                hash = %block.short_hash(),
                to_node = %peer.display_id,
                "sending-new-block"
            );
            self.network.send(
                peer.id,
                &peer.display_id,
                NetworkMessage::NewBlock(NewBlockBroadcast {
                    block: Arc::clone(&shared),
                }),
            );
        }
    }
}
