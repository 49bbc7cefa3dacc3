//! Chain import outcomes and the propagation status derived from them.

use std::fmt;

/// Result of handing a block to the chain connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportOutcome {
    /// Parent unknown, or height outside the accepted processing window
    Orphan,
    /// Block failed import validation
    Invalid,
    /// Block already stored in the chain
    AlreadyExists,
    /// Imported onto a side chain
    ConnectedNotBest,
    /// Imported and became the new canonical head
    ConnectedBest,
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportOutcome::Orphan => "ORPHAN",
            ImportOutcome::Invalid => "INVALID",
            ImportOutcome::AlreadyExists => "EXIST",
            ImportOutcome::ConnectedNotBest => "IMPORTED_NOT_BEST",
            ImportOutcome::ConnectedBest => "IMPORTED_BEST",
        };
        f.write_str(name)
    }
}

/// What happened to an incoming block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationStatus {
    /// Neither relayed nor connected
    Dropped,
    /// Relayed to peers but not connected
    Propagated,
    /// Connected locally, not relayed
    Connected,
    /// Relayed and connected
    PropagatedAndConnected,
}

/// Any outcome except `Invalid`. Valid blocks are eligible for relay.
pub fn is_valid(outcome: ImportOutcome) -> bool {
    !matches!(outcome, ImportOutcome::Invalid)
}

/// The block became the new canonical head.
pub fn is_best(outcome: ImportOutcome) -> bool {
    matches!(outcome, ImportOutcome::ConnectedBest)
}

/// The block was imported, on the main chain or a side chain.
pub fn is_successful(outcome: ImportOutcome) -> bool {
    matches!(
        outcome,
        ImportOutcome::ConnectedNotBest | ImportOutcome::ConnectedBest
    )
}

/// Combine the relay result and the import outcome into a final status.
pub fn derive_status(sent: bool, outcome: ImportOutcome) -> PropagationStatus {
    match (sent, is_successful(outcome)) {
        (true, true) => PropagationStatus::PropagatedAndConnected,
        (false, true) => PropagationStatus::Connected,
        (true, false) => PropagationStatus::Propagated,
        (false, false) => PropagationStatus::Dropped,
    }
}
