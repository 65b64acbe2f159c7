//! Database layer - connection pools and store adapters
//!
//! # Design Principles
//!
//! - One pool per store, connecting lazily - no connection state shared
//!   between requests beyond the pool itself
//! - Every store call is time-bounded
//! - Primary schema is never touched; secondary schema is created on demand

pub mod error;
pub mod pool;
pub mod repos;

pub use error::{bounded, StoreError};
pub use pool::{create_primary_pool, create_secondary_pool};
pub use repos::*;
