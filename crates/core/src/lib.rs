//! Domain logic for the price sorter service.
//!
//! Everything in this crate is free of database and HTTP concerns: the
//! category allow-list, page request normalization, the listing query
//! builder, the freshness tracker and the dataset updater capability.

pub mod category;
pub mod error;
pub mod freshness;
pub mod listing_query;
pub mod paging;
pub mod types;
pub mod updater;
