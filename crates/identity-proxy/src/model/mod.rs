//! The two schemas of `SyncIdentityProvider` and the types they share.

pub mod backing;
pub mod common;
pub mod public;

pub use common::*;
