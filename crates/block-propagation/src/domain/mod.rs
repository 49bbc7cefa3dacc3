//! # Domain Layer for Block Propagation
//!
//! Pure business logic with no I/O dependencies. This is the innermost layer
//! of the hexagonal architecture.
//!
//! ## Contents
//!
//! - **entities**: `PeerView`, the per-operation peer snapshot
//! - **seen_cache**: `SeenBlockCache`, LRU deduplication with atomic check-and-mark
//! - **outcome**: `ImportOutcome` predicates and `PropagationStatus` derivation
//! - **fanout**: height-window and difficulty-gated peer selection
//!
//! ## Design Principles
//!
//! 1. **No I/O**: All functions are pure and synchronous
//! 2. **No Collaborators**: Only shared-types and in-memory collections
//! 3. **Testable**: All logic can be unit tested without mocks

mod entities;
mod fanout;
mod outcome;
mod seen_cache;

pub use entities::*;
pub use fanout::*;
pub use outcome::*;
pub use seen_cache::*;
