//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or error classes. Comparing parsed JSON (not
//! raw strings) avoids false negatives from field-ordering differences.

use resource_client::{
    ApiError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse, JsonCodec, Resource,
    ResourceClient, Transport, TransportError, User,
};
use serde_json::Value;
use std::sync::Arc;

/// The vectors never reach the network; any attempt is a test failure.
struct Offline;

#[async_trait::async_trait]
impl Transport for Offline {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        panic!("vectors must not perform I/O: {request:?}");
    }
}

fn client() -> ResourceClient<User> {
    ResourceClient::new(
        Arc::new(Offline),
        Resource::new("users").unwrap(),
        JsonCodec::default(),
    )
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap().as_bytes().to_vec(),
    )
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_error(name: &str, err: ApiError, expected: &str) {
    match expected {
        "NotFound" => assert!(err.is_not_found(), "{name}: expected NotFound, got {err:?}"),
        "Decode" => assert!(matches!(err, ApiError::Decode(_)), "{name}: expected Decode, got {err:?}"),
        "BadRequest" => assert_eq!(err.http_kind(), Some(HttpErrorKind::BadRequest), "{name}"),
        "Unauthorized" => assert_eq!(err.http_kind(), Some(HttpErrorKind::Unauthorized), "{name}"),
        "Forbidden" => assert_eq!(err.http_kind(), Some(HttpErrorKind::Forbidden), "{name}"),
        "ServerError" => assert_eq!(err.http_kind(), Some(HttpErrorKind::ServerError), "{name}"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

fn check_value<T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug>(
    name: &str,
    case: &Value,
    result: Result<T, ApiError>,
) {
    if let Some(expected_error) = case.get("expected_error") {
        check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        check_request(name, &c.build_list(), &case["expected_request"]);
        check_value::<Vec<User>>(name, &case, c.parse_list(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        check_request(name, &c.build_get(id).unwrap(), &case["expected_request"]);
        check_value::<User>(name, &case, c.parse_get(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();
        check_request(name, &c.build_create(&input).unwrap(), &case["expected_request"]);
        check_value::<User>(name, &case, c.parse_create(simulated(&case)));
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();
        check_request(name, &c.build_update(id, &input).unwrap(), &case["expected_request"]);
        check_value::<User>(name, &case, c.parse_update(simulated(&case), &input));
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        check_request(name, &c.build_delete(id).unwrap(), &case["expected_request"]);

        let result = c.parse_delete(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}
