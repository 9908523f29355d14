// Integration tests for `StoreClient` using wiremock.

use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gatepass_store::StoreClient;

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Debug, serde::Serialize, serde::Deserialize, PartialEq)]
struct PassRow {
    id: Uuid,
    pass_token: Uuid,
    visitor_name: String,
}

async fn setup() -> (MockServer, StoreClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server URI");
    let client = StoreClient::with_client(reqwest::Client::new(), base);
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn insert_returns_stored_representation() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    let token = Uuid::new_v4();
    let draft = json!({ "pass_token": token, "visitor_name": "Alice Tan" });
    let stored = json!([{ "id": id, "pass_token": token, "visitor_name": "Alice Tan" }]);

    Mock::given(method("POST"))
        .and(path("/rest/v1/visitor_passes"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(&draft))
        .respond_with(ResponseTemplate::new(201).set_body_json(&stored))
        .mount(&server)
        .await;

    let row: PassRow = client.insert("visitor_passes", &draft).await.unwrap();

    assert_eq!(row.id, id);
    assert_eq!(row.pass_token, token);
    assert_eq!(row.visitor_name, "Alice Tan");
}

#[tokio::test]
async fn select_one_filters_by_field() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();
    let token = Uuid::new_v4();
    let body = json!([{ "id": id, "pass_token": token, "visitor_name": "Bob" }]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/visitor_passes"))
        .and(query_param("pass_token", format!("eq.{token}")))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let row: PassRow = client
        .select_one("visitor_passes", "pass_token", &token.to_string())
        .await
        .unwrap();

    assert_eq!(row.id, id);
    assert_eq!(row.visitor_name, "Bob");
}

#[tokio::test]
async fn select_list_orders_results() {
    let (server, client) = setup().await;

    let host = Uuid::new_v4();
    let body = json!([
        { "id": Uuid::new_v4(), "pass_token": Uuid::new_v4(), "visitor_name": "First" },
        { "id": Uuid::new_v4(), "pass_token": Uuid::new_v4(), "visitor_name": "Second" },
    ]);

    Mock::given(method("GET"))
        .and(path("/rest/v1/visitor_passes"))
        .and(query_param("host_id", format!("eq.{host}")))
        .and(query_param("order", "scheduled_date.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let rows: Vec<PassRow> = client
        .select_list(
            "visitor_passes",
            "host_id",
            &host.to_string(),
            Some("scheduled_date.desc"),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].visitor_name, "First");
}

#[tokio::test]
async fn delete_by_id() {
    let (server, client) = setup().await;

    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/visitor_passes"))
        .and(query_param("id", format!("eq.{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client
        .delete("visitor_passes", &id.to_string())
        .await
        .unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn select_one_empty_result_is_row_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/visitor_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client
        .select_one::<PassRow>("visitor_passes", "pass_token", "nope")
        .await
        .unwrap_err();

    assert!(err.is_not_found(), "expected not-found, got: {err}");
}

#[tokio::test]
async fn api_error_envelope_is_translated() {
    let (server, client) = setup().await;

    let body = json!({
        "message": "duplicate key value violates unique constraint",
        "code": "23505"
    });

    Mock::given(method("POST"))
        .and(path("/rest/v1/visitor_passes"))
        .respond_with(ResponseTemplate::new(409).set_body_json(&body))
        .mount(&server)
        .await;

    let err = client
        .insert::<PassRow>("visitor_passes", &json!({}))
        .await
        .unwrap_err();

    match err {
        gatepass_store::Error::Api {
            message,
            code,
            status,
        } => {
            assert!(message.contains("duplicate key"));
            assert_eq!(code.as_deref(), Some("23505"));
            assert_eq!(status, 409);
        }
        other => panic!("expected Api error, got: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/visitor_passes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client
        .select_one::<PassRow>("visitor_passes", "id", "x")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        gatepass_store::Error::Deserialization { .. }
    ));
}
