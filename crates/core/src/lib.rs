//! Pedidos Core - Shared order types.
//!
//! This crate provides the types exchanged between the relay server and the
//! operator CLI:
//! - `relay` - HTTP API polled by the point-of-sale (PDV) system
//! - `cli` - Operator tool acting on the order document directly
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no clocks, no HTTP. Timestamps
//! and ids are passed in by the caller, which keeps every type here trivially
//! testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, receipt status, and the order record itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
