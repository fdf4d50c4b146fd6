//! Contract tests for RestStore against a mock PostgREST table.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/rest/v1/waitlist` | `insert_*` |
//! | GET | `/rest/v1/waitlist?unique_id=eq.{id}` | `find_*` |
//! | GET | `/rest/v1/waitlist?select=unique_id&limit=1` | `health_*` |

use std::time::Duration;

use waitlist_core::{Draft, NewWaitlistEntry, UniqueId};
use waitlist_store::{RestStore, StoreConfig, StoreError, WaitlistStore};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> RestStore {
    let mut config = StoreConfig::new(server.uri().parse().unwrap(), "service-key");
    config.timeout_secs = 5;
    RestStore::new(config).unwrap()
}

fn new_entry() -> NewWaitlistEntry {
    let draft: Draft = serde_json::from_value(serde_json::json!({
        "fullName": "Jean Roy",
        "jobTitle": "CEO",
        "email": "jean@roy.ca",
        "phoneNumber": "418-555-0100",
        "language": "both",
        "companyName": "Roy Inc",
        "businessSector": "IT",
        "hasCapacity": "yes",
        "interestedInAutomation": "yes",
        "targetMarkets": ["federal", "other"],
        "otherMarkets": "NATO",
        "budget": "500+",
        "alertMethod": "both",
        "betaTester": "no",
        "successRate": "35"
    }))
    .unwrap();
    NewWaitlistEntry::generate(draft.coerce().unwrap())
}

fn row(entry: &NewWaitlistEntry) -> serde_json::Value {
    let mut value = serde_json::to_value(entry).unwrap();
    value["id"] = serde_json::json!("6f1c2a9e-2f0b-4c1e-9a57-0d6c3b8e4f10");
    value["created_at"] = serde_json::json!("2025-01-15T10:30:00.123456+00:00");
    value
}

// ── POST /rest/v1/waitlist ───────────────────────────────────────────

#[tokio::test]
async fn insert_returns_stored_row() {
    let server = MockServer::start().await;
    let entry = new_entry();

    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(serde_json::json!([{
            "unique_id": entry.unique_id.as_str(),
            "other_markets": "NATO",
            "success_rate": 35
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([row(&entry)])))
        .expect(1)
        .mount(&server)
        .await;

    let stored = store(&server).insert(entry.clone()).await.unwrap();
    assert_eq!(stored.unique_id, entry.unique_id);
    assert_eq!(stored.fields, entry.fields);
}

#[tokio::test]
async fn insert_conflict_maps_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"waitlist_unique_id_key\""
        })))
        .mount(&server)
        .await;

    let err = store(&server).insert(new_entry()).await.unwrap_err();
    assert!(err.is_conflict(), "got {err:?}");
}

#[tokio::test]
async fn insert_server_error_surfaces_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "PGRST204",
            "message": "Could not find the 'budget' column of 'waitlist'"
        })))
        .mount(&server)
        .await;

    let err = store(&server).insert(new_entry()).await.unwrap_err();
    match &err {
        StoreError::Api { status, .. } => assert_eq!(*status, 400),
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Could not find the 'budget' column of 'waitlist'"
    );
}

#[tokio::test]
async fn insert_timeout_is_not_resent() {
    let server = MockServer::start().await;
    let entry = new_entry();
    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!([row(&entry)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut config = StoreConfig::new(server.uri().parse().unwrap(), "service-key");
    config.timeout_secs = 1;
    let err = RestStore::new(config).unwrap().insert(entry).await.unwrap_err();
    assert!(matches!(err, StoreError::Http { .. }), "got {err:?}");

    let posts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 1);
}

#[tokio::test]
async fn insert_with_empty_representation_is_integrity_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = store(&server).insert(new_entry()).await.unwrap_err();
    assert!(matches!(err, StoreError::Integrity(_)), "got {err:?}");
}

// ── GET /rest/v1/waitlist?unique_id=eq.{id} ──────────────────────────

#[tokio::test]
async fn find_filters_by_exact_identifier() {
    let server = MockServer::start().await;
    let entry = new_entry();
    let id = entry.unique_id.clone();

    Mock::given(method("GET"))
        .and(path("/rest/v1/waitlist"))
        .and(query_param("unique_id", format!("eq.{id}")))
        .and(query_param("select", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row(&entry)])))
        .mount(&server)
        .await;

    let rows = store(&server).find_by_unique_id(&id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].unique_id, id);
    assert_eq!(rows[0].fields.other_markets.as_deref(), Some("NATO"));
}

#[tokio::test]
async fn find_unknown_identifier_returns_no_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let id = UniqueId::new("zzzzzz").unwrap();
    assert!(store(&server).find_by_unique_id(&id).await.unwrap().is_empty());
}

#[tokio::test]
async fn find_malformed_row_is_deserialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "unique_id": "abc" }])),
        )
        .mount(&server)
        .await;

    let id = UniqueId::new("abc").unwrap();
    let err = store(&server).find_by_unique_id(&id).await.unwrap_err();
    assert!(matches!(err, StoreError::Deserialization { .. }), "got {err:?}");
}

// ── health ───────────────────────────────────────────────────────────

#[tokio::test]
async fn health_check_probes_one_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/waitlist"))
        .and(query_param("select", "unique_id"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    store(&server).health_check().await.unwrap();
}

#[tokio::test]
async fn health_check_fails_on_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/waitlist"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = store(&server).health_check().await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid API key");
}
