//! API endpoint handlers

use axum::extract::State;
use axum::response::Json;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use suites_core::search::{validate_max_results, validate_threshold};
use suites_core::{
    Booking, Embedding, Hotel, SearchResult, ServiceError, DEFAULT_MAX_RESULTS,
    DEFAULT_MINIMUM_SIMILARITY_SCORE,
};

use super::error::ApiError;
use super::extract::{ApiForm, ApiJson, ApiPath, ApiQuery};
use super::state::AppState;

/// Landing page
pub async fn index() -> &'static str {
    "Welcome to the Contoso Suites Web API!"
}

/// All hotels
pub async fn get_hotels(State(state): State<AppState>) -> Result<Json<Vec<Hotel>>, ApiError> {
    Ok(Json(state.hotels.get_hotels()?))
}

/// Bookings for one hotel
pub async fn get_bookings_for_hotel(
    State(state): State<AppState>,
    ApiPath(hotel_id): ApiPath<i64>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.hotels.get_bookings_for_hotel(hotel_id)?))
}

/// Bookings for one hotel starting on or after `min_date`
pub async fn get_recent_bookings_for_hotel(
    State(state): State<AppState>,
    ApiPath((hotel_id, min_date)): ApiPath<(i64, String)>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let min_date = parse_min_date(&min_date)?;
    Ok(Json(
        state
            .hotels
            .get_bookings_by_hotel_and_minimum_date(hotel_id, min_date)?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: Option<String>,
}

/// Free-form chat; not wired to a model yet
pub async fn chat(ApiForm(_form): ApiForm<ChatForm>) -> &'static str {
    "This endpoint is not yet available."
}

#[derive(Debug, Deserialize)]
pub struct VectorizeParams {
    pub text: String,
}

/// Embed a text string
pub async fn vectorize(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VectorizeParams>,
) -> Result<Json<Embedding>, ApiError> {
    Ok(Json(state.vectorization.get_embeddings(&params.text).await?))
}

#[derive(Debug, Deserialize)]
pub struct VectorSearchParams {
    pub max_results: Option<i64>,
    pub minimum_similarity_score: Option<f64>,
}

/// Search body: a precomputed vector or text to embed first
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchQuery {
    Vector(Embedding),
    Text(String),
}

/// Rank maintenance requests against a query
pub async fn vector_search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VectorSearchParams>,
    ApiJson(query): ApiJson<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let max_results = validate_max_results(params.max_results.unwrap_or(DEFAULT_MAX_RESULTS))?;
    let minimum_similarity_score = params
        .minimum_similarity_score
        .unwrap_or(DEFAULT_MINIMUM_SIMILARITY_SCORE);
    validate_threshold(minimum_similarity_score)?;

    let results = match query {
        SearchQuery::Vector(vector) => {
            state
                .vectorization
                .execute_vector_search(&vector, max_results, minimum_similarity_score)?
        }
        SearchQuery::Text(text) => {
            state
                .vectorization
                .search_text(&text, max_results, minimum_similarity_score)
                .await?
        }
    };

    Ok(Json(results))
}

/// Ask the maintenance copilot
pub async fn maintenance_copilot_chat(
    State(state): State<AppState>,
    ApiJson(message): ApiJson<String>,
) -> Result<String, ApiError> {
    Ok(state.copilot.chat(&message).await?)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (or with a space) and RFC 3339
pub(crate) fn parse_min_date(value: &str) -> Result<NaiveDateTime, ServiceError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }
    Err(ServiceError::InvalidArgument(format!(
        "min_date '{}' is not a recognised date",
        value
    )))
}
