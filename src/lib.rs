//! Keeps a page of form controls in sync with named variables held by a
//! webgate server, over a small JSON request/response protocol.
//!
//! The [`sync::engine::SyncEngine`] owns the binding [`registry`] and the
//! [`page`]. Inbound values arrive through a self-rescheduling read cycle
//! and are applied to every element the user is not currently editing;
//! outbound edits are pushed as single-variable writes.

pub mod cli;
pub mod page;
pub mod protocol;
pub mod registry;
pub mod sync;
pub mod trace;
pub mod transport;
