//! Row models.
//!
//! The listings table is written by the external updater, so models decode
//! whatever columns it provides rather than a fixed set.

pub mod listing;

pub use listing::Listing;
