//! Background jobs spawned alongside the HTTP server.

pub mod dataset_refresh;
