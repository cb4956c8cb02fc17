//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Hotel and booking lookups
//! - Maintenance request vectors stored as f32 blobs
//! - An in-memory candidate store for fixtures

mod memory;
mod migrations;
mod models;
mod sqlite;

pub use memory::InMemoryCandidateStore;
pub use migrations::MIGRATIONS;
pub use models::{Booking, CandidateRecord, CandidateStore, Hotel, HotelDirectory};
pub use sqlite::{Result, Storage, StorageError};
