//! Voltmart Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront binary and its
//! tests:
//! - Type-safe IDs for products, orders and users
//! - Rupee prices with Indian digit grouping
//! - Validated email addresses
//! - Product categories, order and payment statuses
//! - Opaque API session tokens
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. The
//! storefront owns all communication with the remote catalog API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
