//! Stored records and the read contracts the services depend on

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Result;
use crate::embeddings::Embedding;

// ============================================================================
// HOTEL DIRECTORY
// ============================================================================

/// A hotel in the Contoso Suites portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub hotel_id: i64,
    pub hotel_name: String,
    pub city: String,
    pub country: String,
}

/// A customer booking at one hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: i64,
    pub customer_id: i64,
    pub hotel_id: i64,
    pub stay_begin_date: NaiveDateTime,
    pub stay_end_date: NaiveDateTime,
    pub number_of_guests: i64,
}

/// Read access to hotels and bookings
pub trait HotelDirectory: Send + Sync {
    /// All hotels, ordered by id
    fn get_hotels(&self) -> Result<Vec<Hotel>>;

    /// Every booking for one hotel, ordered by stay start
    fn get_bookings_for_hotel(&self, hotel_id: i64) -> Result<Vec<Booking>>;

    /// Bookings for one hotel whose stay starts on or after `min_date`
    fn get_bookings_by_hotel_and_minimum_date(
        &self,
        hotel_id: i64,
        min_date: NaiveDateTime,
    ) -> Result<Vec<Booking>>;
}

// ============================================================================
// CANDIDATE RECORDS
// ============================================================================

/// A maintenance request with its precomputed embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: String,
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub hotel: Option<String>,
    /// Source text the vector was computed from
    pub details: String,
    #[serde(default)]
    pub source: Option<String>,
    pub request_vector: Embedding,
}

/// Read contract for the candidate store
///
/// Implementations hold vectors of a single dimensionality.
pub trait CandidateStore: Send + Sync {
    /// Dimensionality every stored vector shares
    fn dimensions(&self) -> usize;

    /// Every candidate record with its vector
    fn load_candidates(&self) -> Result<Vec<CandidateRecord>>;
}
