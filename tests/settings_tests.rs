//! Company theme and custom labels.

use anyhow::Result;
use attendtrack::repositories::CompanyRepository;
use axum::http::StatusCode;
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, token_of};

#[tokio::test]
async fn partial_updates_leave_other_fields_alone() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;

    let (status, settings) = app.get("/api/settings", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["name"], "Acme Academy");
    assert_eq!(settings["theme_id"], "corporate");
    assert!(settings["custom_labels"].is_null());

    let (status, settings) = app
        .put(
            "/api/settings",
            &token,
            json!({"custom_labels": {"member_label": "Patient", "group_label": "Ward"}}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["theme_id"], "corporate");
    assert_eq!(settings["custom_labels"]["member_label"], "Patient");
    assert_eq!(settings["custom_labels"]["member_label_plural"], "Students");

    let (status, settings) = app
        .put("/api/settings", &token, json!({"theme_id": "medical"}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["theme_id"], "medical");
    assert_eq!(settings["custom_labels"]["group_label"], "Ward");

    let (_, reread) = app.get("/api/settings", &token).await?;
    assert_eq!(reread, settings);
    Ok(())
}

#[tokio::test]
async fn invalid_settings_are_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;

    let (status, _) = app
        .put("/api/settings", &token, json!({"theme_id": "neon"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            "/api/settings",
            &token,
            json!({"custom_labels": {"favourite_colour": "blue"}}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, settings) = app.get("/api/settings", &token).await?;
    assert_eq!(settings["theme_id"], "corporate");
    Ok(())
}

#[tokio::test]
async fn malformed_stored_labels_read_as_null() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, signup) = app.signup("Acme Academy", "admin@acme.io").await?;
    let company_id = signup["user"]["company_id"].as_i64().unwrap() as i32;

    let companies = CompanyRepository::new(app.db());
    let company = companies.find_by_id(company_id).await?.unwrap();
    companies
        .update_settings(company, None, Some("{not json".to_string()))
        .await?;

    let (status, settings) = app.get("/api/settings", &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(settings["custom_labels"].is_null());
    Ok(())
}

#[tokio::test]
async fn employees_may_read_but_not_change_settings() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let (_, password) = app.create_employee(&token, "staff@acme.io").await?;
    let (_, login) = app.login("Acme Academy", "staff@acme.io", &password).await?;
    let staff = token_of(&login)?;

    let (status, _) = app.get("/api/settings", &staff).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put("/api/settings", &staff, json!({"theme_id": "learning"}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
