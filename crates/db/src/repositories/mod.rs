//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async read methods
//! that accept `&DbPool` as the first argument.

pub mod listing_repo;

pub use listing_repo::ListingRepo;
