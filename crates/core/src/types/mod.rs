//! Core types for the order relay.
//!
//! This module provides type-safe wrappers for the order domain.

pub mod id;
pub mod order;
pub mod status;

pub use id::*;
pub use order::{NewOrder, Order, OrdersDocument, PayloadError, RESERVED_FIELDS};
pub use status::ReceiptStatus;
