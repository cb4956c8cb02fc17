//! HTTP API journeys
//!
//! Every route through the real router, including the status codes and
//! error bodies clients depend on.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use suites_core::{AzureOpenAiClient, AzureOpenAiConfig, ProviderError};
use suites_e2e_tests::{ScriptedChat, SlowEmbedder, StaticEmbedder, TestApp, TestDataFactory};

// ============================================================================
// DIRECTORY
// ============================================================================

#[tokio::test]
async fn test_welcome_text() {
    let app = TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Welcome to the Contoso Suites Web API!");
}

#[tokio::test]
async fn test_list_hotels() {
    let app = TestApp::new();
    TestDataFactory::seed_hotels(&app.storage);

    let response = app.get("/Hotels").await;

    assert_eq!(response.status, StatusCode::OK);
    let hotels = response.json();
    assert_eq!(hotels.as_array().unwrap().len(), 2);
    assert_eq!(hotels[0]["hotelId"], 1);
    assert_eq!(hotels[0]["hotelName"], "Oceanview Inn");
    assert_eq!(hotels[1]["city"], "Denver");
}

#[tokio::test]
async fn test_bookings_for_hotel_with_and_without_trailing_slash() {
    let app = TestApp::new();
    TestDataFactory::seed_hotels(&app.storage);

    for uri in ["/Hotels/1/Bookings", "/Hotels/1/Bookings/"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");

        let bookings = response.json();
        let ids: Vec<i64> = bookings
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["bookingId"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![100, 101, 102], "{uri}");
    }
}

#[tokio::test]
async fn test_bookings_since_minimum_date() {
    let app = TestApp::new();
    TestDataFactory::seed_hotels(&app.storage);

    let response = app.get("/Hotels/1/Bookings/2024-06-01").await;

    assert_eq!(response.status, StatusCode::OK);
    let bookings = response.json();
    let bookings = bookings.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0]["bookingId"], 101);
    assert_eq!(bookings[0]["stayBeginDate"], "2024-06-01T00:00:00");
    assert_eq!(bookings[1]["bookingId"], 102);
}

#[tokio::test]
async fn test_bookings_unknown_hotel_is_empty() {
    let app = TestApp::new();
    TestDataFactory::seed_hotels(&app.storage);

    let response = app.get("/Hotels/99/Bookings").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_bad_minimum_date_is_client_error() {
    let app = TestApp::new();

    let response = app.get("/Hotels/1/Bookings/someday").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InvalidArgument");
}

// ============================================================================
// CHAT
// ============================================================================

#[tokio::test]
async fn test_chat_is_a_stub() {
    let app = TestApp::new();

    let response = app.post_form("/Chat", "message=hello").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "This endpoint is not yet available.");
}

#[tokio::test]
async fn test_copilot_reply_passes_through() {
    let app = TestApp::builder()
        .chat(Arc::new(ScriptedChat::replying("Ticket 42 opened for room 301.")))
        .build();

    let response = app
        .post_json("/MaintenanceCopilotChat", json!("The AC in 301 is broken"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "Ticket 42 opened for room 301.");
}

#[tokio::test]
async fn test_copilot_blank_message_rejected() {
    let app = TestApp::new();

    let response = app.post_json("/MaintenanceCopilotChat", json!("  ")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InputRejected");
}

#[tokio::test]
async fn test_copilot_outage_is_503() {
    let app = TestApp::builder()
        .chat(Arc::new(ScriptedChat::failing(ProviderError::Unavailable(
            "connection refused".into(),
        ))))
        .build();

    let response = app.post_json("/MaintenanceCopilotChat", json!("hello")).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["error"], "ProviderUnavailable");
}

// ============================================================================
// VECTORIZATION
// ============================================================================

#[tokio::test]
async fn test_vectorize_returns_bare_array() {
    let app = TestApp::builder()
        .embedder(Arc::new(StaticEmbedder::new().with("leaky faucet", vec![0.6, 0.8])))
        .build();

    let response = app.get("/Vectorize?text=leaky%20faucet").await;

    assert_eq!(response.status, StatusCode::OK);
    let vector = response.json();
    let vector = vector.as_array().unwrap();
    assert_eq!(vector.len(), 2);
    assert!((vector[0].as_f64().unwrap() - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn test_vectorize_empty_text_rejected() {
    let app = TestApp::new();

    let response = app.get("/Vectorize?text=").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InputRejected");
}

#[tokio::test]
async fn test_vectorize_timeout_is_503() {
    let app = TestApp::builder()
        .timeout(Duration::from_millis(50))
        .embedder(Arc::new(SlowEmbedder {
            delay: Duration::from_secs(5),
            vector: vec![1.0, 0.0],
        }))
        .build();

    let response = app.get("/Vectorize?text=hello").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["error"], "ProviderUnavailable");
}

// ============================================================================
// VECTOR SEARCH
// ============================================================================

#[tokio::test]
async fn test_vector_search_with_vector_body() {
    let app = TestApp::new();
    TestDataFactory::seed_unit_square(&app.storage);

    let response = app
        .post_json(
            "/VectorSearch?max_results=2&minimum_similarity_score=0.7",
            json!([1.0, 0.0]),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let results = response.json();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "x");
    assert_eq!(results[0]["rank"], 1);
    assert_eq!(results[1]["id"], "xy");
    assert_eq!(results[1]["hotel"], "Oceanview Inn");
    assert!(results[1]["similarityScore"].as_f64().unwrap() > 0.7);
}

#[tokio::test]
async fn test_vector_search_defaults() {
    let app = TestApp::new();
    TestDataFactory::seed_unit_square(&app.storage);

    let response = app.post_json("/VectorSearch", json!([0.0, 1.0])).await;

    assert_eq!(response.status, StatusCode::OK);
    let results = response.json();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "y");
}

#[tokio::test]
async fn test_vector_search_with_text_body() {
    let app = TestApp::builder()
        .embedder(Arc::new(StaticEmbedder::new().with("lights out", vec![0.1, 1.0])))
        .build();
    TestDataFactory::seed_unit_square(&app.storage);

    let response = app
        .post_json("/VectorSearch?minimum_similarity_score=0.5", json!("lights out"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let results = response.json();
    assert_eq!(results[0]["id"], "y");
    assert_eq!(results[1]["id"], "xy");
}

#[tokio::test]
async fn test_vector_search_threshold_out_of_range() {
    let app = TestApp::new();
    TestDataFactory::seed_unit_square(&app.storage);

    let response = app
        .post_json("/VectorSearch?minimum_similarity_score=1.5", json!([1.0, 0.0]))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "InvalidArgument");
    assert!(body["message"].as_str().unwrap().contains("minimum_similarity_score"));
}

#[tokio::test]
async fn test_vector_search_negative_cap_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json("/VectorSearch?max_results=-1", json!([1.0, 0.0]))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InvalidArgument");
}

#[tokio::test]
async fn test_vector_search_dimension_mismatch() {
    let app = TestApp::new();
    TestDataFactory::seed_unit_square(&app.storage);

    let response = app.post_json("/VectorSearch", json!([1.0, 0.0, 0.0])).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "DimensionMismatch");
}

#[tokio::test]
async fn test_vector_search_empty_vector_rejected() {
    let app = TestApp::new();

    let response = app.post_json("/VectorSearch", json!([])).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InputRejected");
}

#[tokio::test]
async fn test_vector_search_text_provider_timeout() {
    let app = TestApp::builder()
        .timeout(Duration::from_millis(50))
        .embedder(Arc::new(SlowEmbedder {
            delay: Duration::from_secs(5),
            vector: vec![1.0, 0.0],
        }))
        .build();

    let response = app.post_json("/VectorSearch", json!("broken shower")).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// REQUEST DECODING
// ============================================================================

#[tokio::test]
async fn test_undecodable_vector_body_is_input_rejected() {
    let app = TestApp::new();

    let response = app.post_json("/VectorSearch", json!([1.0, null])).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "InputRejected");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_non_numeric_max_results_is_invalid_argument() {
    let app = TestApp::new();

    let response = app
        .post_json("/VectorSearch?max_results=abc", json!([1.0, 0.0]))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "InvalidArgument");
    assert!(body["message"].as_str().unwrap().contains("max_results"));
}

#[tokio::test]
async fn test_vectorize_without_text_is_invalid_argument() {
    let app = TestApp::new();

    let response = app.get("/Vectorize").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "InvalidArgument");
    assert!(body["message"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_non_numeric_hotel_id_is_invalid_argument() {
    let app = TestApp::new();

    let response = app.get("/Hotels/abc/Bookings").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InvalidArgument");
}

#[tokio::test]
async fn test_copilot_non_string_body_is_input_rejected() {
    let app = TestApp::new();

    let response = app
        .post_json("/MaintenanceCopilotChat", json!({ "message": "hi" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InputRejected");
}

// ============================================================================
// CONCURRENCY AND CONFIGURATION
// ============================================================================

#[tokio::test]
async fn test_concurrency_limit_is_shared_across_routes() {
    let app = TestApp::builder()
        .concurrency_limit(1)
        .embedder(Arc::new(SlowEmbedder {
            delay: Duration::from_millis(400),
            vector: vec![1.0, 0.0],
        }))
        .build();
    TestDataFactory::seed_hotels(&app.storage);

    let (slow, (hotels, waited)) = tokio::join!(app.get("/Vectorize?text=slow"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let started = std::time::Instant::now();
        let response = app.get("/Hotels").await;
        (response, started.elapsed())
    });

    assert_eq!(slow.status, StatusCode::OK);
    assert_eq!(hotels.status, StatusCode::OK);
    // /Hotels queued behind /Vectorize for the single permit
    assert!(waited >= Duration::from_millis(200), "waited only {waited:?}");
}

#[tokio::test]
async fn test_unconfigured_azure_still_serves_hotels() {
    let client = Arc::new(AzureOpenAiClient::new(AzureOpenAiConfig::default()).unwrap());
    let app = TestApp::builder()
        .embedder(client.clone())
        .chat(client)
        .build();
    TestDataFactory::seed_hotels(&app.storage);

    let hotels = app.get("/Hotels").await;
    assert_eq!(hotels.status, StatusCode::OK);
    assert_eq!(hotels.json().as_array().unwrap().len(), 2);

    let vectorize = app.get("/Vectorize?text=hello").await;
    assert_eq!(vectorize.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(vectorize.json()["error"], "ProviderUnavailable");

    let copilot = app.post_json("/MaintenanceCopilotChat", json!("hello")).await;
    assert_eq!(copilot.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_copilot_declined_message_is_400() {
    let app = TestApp::builder()
        .chat(Arc::new(ScriptedChat::failing(ProviderError::InputRejected(
            "content_filter".into(),
        ))))
        .build();

    let response = app.post_json("/MaintenanceCopilotChat", json!("hello")).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "InputRejected");
}
