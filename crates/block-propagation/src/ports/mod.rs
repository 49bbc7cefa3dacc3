//! # Ports Layer
//!
//! - **Inbound**: [`BlockPropagationApi`], driven by the sync manager and the miner
//! - **Outbound**: collaborator SPIs implemented by node adapters

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
