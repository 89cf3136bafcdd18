//! HTTP-level integration tests for the entity endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use crm_db::memory::MemoryBackend;
use serde_json::json;

// ---------------------------------------------------------------------------
// Company listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_companies_newest_first() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let response = get(app, "/api/v1/companies").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["Name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Globex", "Acme"]);
}

#[tokio::test]
async fn test_list_companies_by_industry() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let json = body_json(get(app, "/api/v1/companies?industry=Tech").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["Name"], "Acme");
}

#[tokio::test]
async fn test_list_companies_search_and_sort() {
    let backend = common::acme_and_globex().await;

    let app = common::build_test_app(backend.clone());
    let json = body_json(get(app, "/api/v1/companies?search=glob").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["Id"], 2);

    let app = common::build_test_app(backend);
    let json = body_json(
        get(app, "/api/v1/companies?sortBy=EmployeeCount&sortOrder=desc").await,
    )
    .await;
    assert_eq!(json["data"][0]["Name"], "Globex");
    assert_eq!(json["data"][1]["Name"], "Acme");
}

// ---------------------------------------------------------------------------
// Company CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_company_returns_201_with_next_id() {
    let backend = common::acme_and_globex().await;

    let app = common::build_test_app(backend.clone());
    let response = post_json(
        app,
        "/api/v1/companies",
        json!({"Name": "Initech", "Industry": "Tech"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["Id"], 3);
    assert_eq!(json["data"]["Name"], "Initech");

    let app = common::build_test_app(backend);
    let json = body_json(get(app, "/api/v1/companies/industries").await).await;
    assert_eq!(json["data"], json!(["Finance", "Tech"]));
}

#[tokio::test]
async fn test_create_invalid_company_returns_422_with_fields() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let response = post_json(
        app,
        "/api/v1/companies",
        json!({"Name": "", "Industry": "Tech", "Email": "bad"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["Name"], "Company name is required");
    assert_eq!(json["fields"]["Email"], "Invalid email format");
    assert!(json["fields"].get("Industry").is_none());
}

#[tokio::test]
async fn test_get_nonexistent_company_returns_404() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let response = get(app, "/api/v1/companies/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Company with id 999 not found");
}

#[tokio::test]
async fn test_update_company_is_partial() {
    let backend = common::acme_and_globex().await;

    let app = common::build_test_app(backend.clone());
    let response = put_json(app, "/api/v1/companies/1", json!({"City": "Denver"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(backend);
    let json = body_json(get(app, "/api/v1/companies/1").await).await;
    assert_eq!(json["data"]["City"], "Denver");
    assert_eq!(json["data"]["Name"], "Acme");
    assert_eq!(json["data"]["EmployeeCount"], 10);
}

#[tokio::test]
async fn test_update_nonexistent_company_returns_404() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let response = put_json(app, "/api/v1/companies/42", json!({"City": "Denver"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_bad_website_returns_422() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let response = put_json(app, "/api/v1/companies/1", json!({"Website": "acme.com"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(
        json["fields"]["Website"],
        "Website must start with http:// or https://"
    );
}

#[tokio::test]
async fn test_delete_company_then_second_delete_404() {
    let backend = common::acme_and_globex().await;

    let app = common::build_test_app(backend.clone());
    let response = delete(app, "/api/v1/companies/1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["success"], true);
    assert_eq!(json["data"]["message"], "Company deleted successfully");

    let app = common::build_test_app(backend.clone());
    assert_eq!(
        get(app, "/api/v1/companies/1").await.status(),
        StatusCode::NOT_FOUND
    );

    let app = common::build_test_app(backend);
    assert_eq!(
        delete(app, "/api/v1/companies/1").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_company_stats() {
    let app = common::build_test_app(common::acme_and_globex().await);
    let json = body_json(get(app, "/api/v1/companies/stats").await).await;
    assert_eq!(json["data"]["totalCompanies"], 2);
    assert_eq!(json["data"]["totalEmployees"], 30);
    assert_eq!(json["data"]["totalRevenue"], 2000.0);
    assert_eq!(json["data"]["industries"], 2);
}

#[tokio::test]
async fn test_validate_endpoint_never_writes() {
    let backend = common::acme_and_globex().await;

    let app = common::build_test_app(backend.clone());
    let response = post_json(
        app,
        "/api/v1/companies/validate",
        json!({"Name": "", "Industry": "Tech", "Email": "bad"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["errors"]["Name"], "Company name is required");

    assert_eq!(backend.len("company_c").await, 2);
}

// ---------------------------------------------------------------------------
// Contacts, deals, activities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_contact_create_defaults_and_search() {
    let backend = Arc::new(MemoryBackend::new());

    let app = common::build_test_app(backend.clone());
    let response = post_json(
        app,
        "/api/v1/contacts",
        json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "company": "Analytical"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "lead");
    assert!(json["data"]["lastActivity"].is_string());

    let app = common::build_test_app(backend);
    let json = body_json(get(app, "/api/v1/contacts/search?q=analyt").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["firstName"], "Ada");
}

#[tokio::test]
async fn test_contact_with_unknown_status_returns_422() {
    let app = common::build_test_app(Arc::new(MemoryBackend::new()));
    let response = post_json(
        app,
        "/api/v1/contacts",
        json!({"firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com", "status": "vip"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_deal_with_non_numeric_contact_returns_400() {
    let app = common::build_test_app(Arc::new(MemoryBackend::new()));
    let response = post_json(
        app,
        "/api/v1/deals",
        json!({"title": "Pilot", "contactId": "abc"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_deals_by_stage() {
    let backend = common::seeded_backend(json!({
        "deals": [
            {"Id": 1, "title": "Pilot", "contactId": 1, "stage": "won", "value": 1000},
            {"Id": 2, "title": "Renewal", "contactId": 1, "stage": "proposal"}
        ]
    }))
    .await;

    let app = common::build_test_app(backend);
    let json = body_json(get(app, "/api/v1/deals/by-stage/won").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Pilot");
    assert_eq!(json["data"][0]["contactId"], 1);
}

#[tokio::test]
async fn test_deals_by_unknown_stage_returns_400() {
    let app = common::build_test_app(Arc::new(MemoryBackend::new()));
    let response = get(app, "/api/v1/deals/by-stage/archived").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Unknown deal stage: archived");
}

#[tokio::test]
async fn test_activities_by_contact() {
    let backend = common::seeded_backend(json!({
        "activities": [
            {"Id": 1, "contactId": 7, "type": "email", "description": "Sent proposal"},
            {"Id": 2, "contactId": 8, "description": "Intro call"}
        ]
    }))
    .await;

    let app = common::build_test_app(backend.clone());
    let json = body_json(get(app, "/api/v1/activities/by-contact/7").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["type"], "email");

    let app = common::build_test_app(backend);
    let json = body_json(get(app, "/api/v1/activities?type=call").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["description"], "Intro call");
}
