//! Dispatch Module
//!
//! Routes each transaction to the node that owns its key.

mod client;
mod dispatcher;

pub use client::{PeerClient, FORWARDED_HEADER};
pub use dispatcher::Dispatcher;
