//! Events and error types for Block Propagation subsystem.

use thiserror::Error;

pub mod p2p;

pub use p2p::*;

/// Block propagation errors.
///
/// Dropped blocks (absent, invalid header, duplicate) are not errors; they
/// surface as [`crate::PropagationStatus::Dropped`]. Only collaborator
/// failures and bad configuration are reported here.
#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("Chain connector failure: {0}")]
    Connector(String),

    #[error("Invalid propagation config: {0}")]
    InvalidConfig(String),
}
