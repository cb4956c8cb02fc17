//! SQLite Storage Implementation
//!
//! One database file holds the hotel directory and the maintenance request
//! vectors. Reads and writes use separate connections.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};

use super::models::{Booking, CandidateRecord, CandidateStore, Hotel, HotelDirectory};
use crate::embeddings::Embedding;

/// Booking date format; lexicographic order matches chronological order
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Vector does not match the store's dimensionality
    #[error("Invalid dimensions for '{id}': expected {expected}, got {actual}")]
    InvalidDimensions {
        id: String,
        expected: usize,
        actual: usize,
    },
    /// Stored row could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// STORAGE
// ============================================================================

/// SQLite-backed hotel directory and candidate store
///
/// All methods take `&self`; connections sit behind mutexes so the API layer
/// can share one `Arc<Storage>` across requests.
pub struct Storage {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    dimensions: usize,
}

impl Storage {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) the database and apply migrations
    ///
    /// `dimensions` is the embedding dimensionality the candidate store
    /// accepts and reports.
    pub fn new(db_path: Option<PathBuf>, dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(StorageError::Init(
                "Embedding dimensions must be greater than zero".to_string(),
            ));
        }

        let path = match db_path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        tracing::debug!(path = %path.display(), dimensions, "Storage opened");

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            dimensions,
        })
    }

    /// Platform data directory location of the database
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "contoso", "suites").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("suites.db"))
    }

    fn reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    fn writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    // ========================================================================
    // HOTELS
    // ========================================================================

    /// Insert or replace a hotel
    pub fn upsert_hotel(&self, hotel: &Hotel) -> Result<()> {
        self.writer()?.execute(
            "INSERT OR REPLACE INTO hotels (hotel_id, hotel_name, city, country)
             VALUES (?1, ?2, ?3, ?4)",
            params![hotel.hotel_id, hotel.hotel_name, hotel.city, hotel.country],
        )?;
        Ok(())
    }

    /// Insert or replace a booking
    pub fn upsert_booking(&self, booking: &Booking) -> Result<()> {
        self.writer()?.execute(
            "INSERT OR REPLACE INTO bookings
             (booking_id, customer_id, hotel_id, stay_begin_date, stay_end_date, number_of_guests)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                booking.booking_id,
                booking.customer_id,
                booking.hotel_id,
                format_date(&booking.stay_begin_date),
                format_date(&booking.stay_end_date),
                booking.number_of_guests,
            ],
        )?;
        Ok(())
    }

    fn query_bookings(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Booking>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(sql)?;
        let bookings = stmt
            .query_map(params, Self::row_to_booking)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bookings)
    }

    fn row_to_booking(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
        let begin: String = row.get("stay_begin_date")?;
        let end: String = row.get("stay_end_date")?;
        Ok(Booking {
            booking_id: row.get("booking_id")?,
            customer_id: row.get("customer_id")?,
            hotel_id: row.get("hotel_id")?,
            stay_begin_date: parse_date(&begin, "stay_begin_date")?,
            stay_end_date: parse_date(&end, "stay_end_date")?,
            number_of_guests: row.get("number_of_guests")?,
        })
    }

    // ========================================================================
    // MAINTENANCE REQUESTS
    // ========================================================================

    /// Insert or replace a candidate record
    ///
    /// Rejects vectors whose dimensionality differs from the store's.
    pub fn upsert_candidate(&self, record: &CandidateRecord) -> Result<()> {
        let actual = record.request_vector.dimensions();
        if actual != self.dimensions {
            return Err(StorageError::InvalidDimensions {
                id: record.id.clone(),
                expected: self.dimensions,
                actual,
            });
        }
        if !record.request_vector.is_finite() {
            return Err(StorageError::Corrupt(format!(
                "Vector for '{}' contains non-finite values",
                record.id
            )));
        }

        self.writer()?.execute(
            "INSERT OR REPLACE INTO maintenance_requests
             (id, hotel_id, hotel, details, source, request_vector, dimensions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.hotel_id,
                record.hotel,
                record.details,
                record.source,
                record.request_vector.to_bytes(),
                actual as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Number of stored candidate records
    pub fn candidate_count(&self) -> Result<usize> {
        let count: i64 = self.reader()?.query_row(
            "SELECT COUNT(*) FROM maintenance_requests",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl HotelDirectory for Storage {
    fn get_hotels(&self) -> Result<Vec<Hotel>> {
        let reader = self.reader()?;
        let mut stmt = reader
            .prepare("SELECT hotel_id, hotel_name, city, country FROM hotels ORDER BY hotel_id")?;
        let hotels = stmt
            .query_map([], |row| {
                Ok(Hotel {
                    hotel_id: row.get(0)?,
                    hotel_name: row.get(1)?,
                    city: row.get(2)?,
                    country: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hotels)
    }

    fn get_bookings_for_hotel(&self, hotel_id: i64) -> Result<Vec<Booking>> {
        self.query_bookings(
            "SELECT * FROM bookings WHERE hotel_id = ?1 ORDER BY stay_begin_date, booking_id",
            &[&hotel_id],
        )
    }

    fn get_bookings_by_hotel_and_minimum_date(
        &self,
        hotel_id: i64,
        min_date: NaiveDateTime,
    ) -> Result<Vec<Booking>> {
        let min_date = format_date(&min_date);
        self.query_bookings(
            "SELECT * FROM bookings WHERE hotel_id = ?1 AND stay_begin_date >= ?2
             ORDER BY stay_begin_date, booking_id",
            &[&hotel_id, &min_date],
        )
    }
}

impl CandidateStore for Storage {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn load_candidates(&self) -> Result<Vec<CandidateRecord>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT id, hotel_id, hotel, details, source, request_vector
             FROM maintenance_requests ORDER BY id",
        )?;

        let rows: Vec<(String, Option<i64>, Option<String>, String, Option<String>, Vec<u8>)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, hotel_id, hotel, details, source, bytes)| -> Result<CandidateRecord> {
                let request_vector = Embedding::from_bytes(&bytes).ok_or_else(|| {
                    StorageError::Corrupt(format!("Undecodable vector for '{}'", id))
                })?;
                Ok(CandidateRecord {
                    id,
                    hotel_id,
                    hotel,
                    details,
                    source,
                    request_vector,
                })
            })
            .collect()
    }
}

fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str, field_name: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid {} date '{}': {}", field_name, value, e),
            )),
        )
    })
}

// ============================================================================
// TESTS
// ============================================================================
