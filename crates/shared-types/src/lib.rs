//! # Shared Types Crate
//!
//! Chain entities shared between the block propagation subsystem and the
//! collaborators it talks to (header validation, chain import, peer registry).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Block and peer identity types are defined here.
//! - **Immutable Blocks**: A [`Block`] is hashed once at construction and is
//!   read-only afterwards.

pub mod entities;

pub use entities::*;
