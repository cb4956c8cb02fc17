//! Maintenance request import
//!
//! Loads a JSON array of maintenance requests into the candidate store.
//! Records that arrive without a `requestVector` are embedded from their
//! `details` first. The first failure stops the import; records written
//! before it stay written.

use std::path::Path;

use serde::Deserialize;
use suites_core::{CandidateRecord, Embedding, ServiceError, Storage, VectorizationService};
use tracing::{debug, info};

/// One maintenance request as found in an import file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub id: String,
    #[serde(default)]
    pub hotel_id: Option<i64>,
    #[serde(default)]
    pub hotel: Option<String>,
    pub details: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub request_vector: Option<Embedding>,
}

/// Outcome of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Records that needed a provider call
    pub embedded: usize,
}

/// Read an import file
pub fn read_import_file(path: &Path) -> anyhow::Result<Vec<ImportRecord>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write records to storage, embedding any that lack a vector
pub async fn import_records(
    records: Vec<ImportRecord>,
    vectorization: &VectorizationService,
    storage: &Storage,
) -> Result<ImportSummary, ServiceError> {
    let mut summary = ImportSummary::default();

    for record in records {
        let request_vector = match record.request_vector {
            Some(vector) => vector,
            None => {
                debug!(id = %record.id, "Embedding maintenance request");
                summary.embedded += 1;
                vectorization.get_embeddings(&record.details).await?
            }
        };

        storage.upsert_candidate(&CandidateRecord {
            id: record.id,
            hotel_id: record.hotel_id,
            hotel: record.hotel,
            details: record.details,
            source: record.source,
            request_vector,
        })?;
        summary.imported += 1;
    }

    info!(
        imported = summary.imported,
        embedded = summary.embedded,
        "Maintenance request import complete"
    );
    Ok(summary)
}
