//! Core types and trait definitions for the Utsav marketplace.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the cart aggregation rules and the admin entity dispatcher; storage
//! backends implement [`store::MarketStore`] and the server wires them in.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod admin;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod id;
pub mod store;

pub use error::{Error, Result};
