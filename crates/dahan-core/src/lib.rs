//! Core types and trait definitions for the Dahan score tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store, source and CLI crates all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod export;
pub mod game;
pub mod source;
pub mod store;
pub mod tabular;
pub mod view;

pub use error::{SourceError, ValidationError};
