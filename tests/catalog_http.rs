// tests/catalog_http.rs

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use common::{send, test_app};

fn public_get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn company_types_are_public_and_complete() {
    let (app, _) = test_app();

    let (status, body) = send(&app, public_get("/api/catalog/company-types")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 6);

    let (status, body) = send(&app, public_get("/api/catalog/company-types/Trust")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["documents"],
        json!(["Trust Deed", "Settlor ID", "Trustee ID", "Beneficiary Register"])
    );

    let (status, body) = send(&app, public_get("/api/catalog/company-types/Private%20Company")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn unknown_catalog_entries_are_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(&app, public_get("/api/catalog/company-types/Cooperative")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No catalog entry named 'Cooperative'.");

    let (status, _) = send(&app, public_get("/api/catalog/entity-types/Foundation")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entity_types_expose_fields_and_categories() {
    let (app, _) = test_app();

    let (status, body) = send(&app, public_get("/api/catalog/entity-types/Individual")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"].as_array().unwrap().len(), 9);
    assert_eq!(body["documentCategories"][0]["name"], "Identity Documents");

    let (_, body) = send(&app, public_get("/api/catalog/entity-types")).await;
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Individual", "Corporate Entity", "Trust Entity"]);
}

#[tokio::test]
async fn options_include_countries_and_upload_limits() {
    let (app, _) = test_app();

    let (status, body) = send(&app, public_get("/api/catalog/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countries"].as_array().unwrap().len(), 38);
    assert_eq!(body["fileUploadSettings"]["maxFileSize"], 10);
    assert_eq!(body["fileUploadSettings"]["maxFilesPerField"], 5);
    assert_eq!(body["roles"], json!(["Shareholder", "Director"]));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = test_app();

    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/applications/{id}/documents-ubo/commit"].is_object());
    assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
}
