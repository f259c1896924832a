//! Pedidos relay library.
//!
//! This crate provides the relay functionality as a library, allowing the
//! order store to be reused by the CLI and the HTTP layer to be tested
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
