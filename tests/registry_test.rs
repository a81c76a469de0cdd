mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{Factory, TestApp};

#[tokio::test]
async fn test_list_registry_with_category_filter() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.tenant_admin();

    // Unique category per run; the registry table is shared across tests
    let category = format!("cat-{}", Uuid::new_v4());
    factory
        .publish_registry_spec(&format!("crm-{}", Uuid::new_v4()), &category)
        .await;
    factory
        .publish_registry_spec(&format!("erp-{}", Uuid::new_v4()), &category)
        .await;
    factory
        .publish_registry_spec(&format!("other-{}", Uuid::new_v4()), "elsewhere")
        .await;

    let response = app
        .server
        .get("/admin/registry/connectors")
        .add_query_param("category", &category)
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"].as_u64().unwrap(), 2);

    // Fresh tenant: nothing enabled or configured yet
    for item in body["data"].as_array().unwrap() {
        assert!(!item["enabled"].as_bool().unwrap());
        assert!(!item["configured"].as_bool().unwrap());
    }
}

#[tokio::test]
async fn test_list_registry_with_query_filter() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.tenant_admin();

    let needle = format!("needle-{}", Uuid::new_v4().simple());
    factory.publish_registry_spec(&needle, "search").await;

    let response = app
        .server
        .get("/admin/registry/connectors")
        .add_query_param("q", &needle)
        .add_header("Authorization", auth.auth_header())
        .await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert_eq!(body["data"][0]["id"].as_str().unwrap(), needle);
}

#[tokio::test]
async fn test_upsert_requires_platform_admin() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.tenant_admin();

    let response = app
        .server
        .post("/admin/registry/connectors")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "id": "sneaky",
            "display_name": "Sneaky"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upsert_replaces_existing_spec() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let admin = factory.platform_admin();
    let id = format!("upsert-{}", Uuid::new_v4());

    let response = app
        .server
        .post("/admin/registry/connectors")
        .add_header("Authorization", admin.auth_header())
        .json(&json!({
            "id": &id,
            "display_name": "First Name"
        }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    // Capitalized field casing is accepted too
    let response = app
        .server
        .post("/admin/registry/connectors")
        .add_header("Authorization", admin.auth_header())
        .json(&json!({
            "ID": &id,
            "DisplayName": "Second Name"
        }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app
        .server
        .get("/admin/registry/connectors")
        .add_query_param("q", &id)
        .add_header("Authorization", admin.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert_eq!(body["data"][0]["display_name"].as_str().unwrap(), "Second Name");
    // Kind fell back to the id
    assert_eq!(body["data"][0]["kind"].as_str().unwrap(), id);
}

#[tokio::test]
async fn test_upsert_rejects_empty_id() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let admin = factory.platform_admin();

    let response = app
        .server
        .post("/admin/registry/connectors")
        .add_header("Authorization", admin.auth_header())
        .json(&json!({
            "id": "  ",
            "display_name": "Nameless"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_enable_registry_connector_for_tenant() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.tenant_admin();

    let id = format!("enable-{}", Uuid::new_v4());
    let category = format!("cat-{}", Uuid::new_v4());
    factory.publish_registry_spec(&id, &category).await;

    let response = app
        .server
        .put(&format!("/admin/tenant/connectors/{}", id))
        .add_header("Authorization", auth.auth_header())
        .json(&json!({
            "enabled": true,
            "secrets": { "api_key": "k-123" }
        }))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);

    let response = app
        .server
        .get("/admin/registry/connectors")
        .add_query_param("category", &category)
        .add_header("Authorization", auth.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert!(body["data"][0]["enabled"].as_bool().unwrap());
    assert!(body["data"][0]["configured"].as_bool().unwrap());

    // Another tenant still sees it untouched
    let other = factory.tenant_admin();
    let response = app
        .server
        .get("/admin/registry/connectors")
        .add_query_param("category", &category)
        .add_header("Authorization", other.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert!(!body["data"][0]["enabled"].as_bool().unwrap());
}

#[tokio::test]
async fn test_enable_unknown_registry_connector() {
    let app = TestApp::new().await;
    let factory = Factory::new(&app.state);
    let auth = factory.tenant_admin();

    let response = app
        .server
        .put("/admin/tenant/connectors/no-such-connector")
        .add_header("Authorization", auth.auth_header())
        .json(&json!({ "enabled": true }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
