pub mod listings;
pub mod status;
