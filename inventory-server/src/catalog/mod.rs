//! Catalog domain logic that does not touch storage

pub mod search;

pub use search::{SearchMode, SearchQuery};
