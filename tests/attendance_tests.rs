//! Roster replacement, listing and history.

use anyhow::Result;
use attendtrack::models::{Attendance, AttendanceStatus, Student, attendance, student};
use attendtrack::repositories::attendance::INSERT_CHUNK_SIZE;
use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use sea_orm::{EntityTrait, Set};
use serde_json::{Value, json};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::TestApp;

fn statuses(records: &Value) -> Vec<(i64, String)> {
    let mut pairs: Vec<(i64, String)> = records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["student_id"].as_i64().unwrap(),
                r["status"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    pairs.sort();
    pairs
}

#[tokio::test]
async fn resubmitting_a_day_replaces_the_roster() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;
    let b = app.create_student(&token, "Bilal", "R-2", None).await?;
    let c = app.create_student(&token, "Chen", "R-3", None).await?;

    let (status, first) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [
                {"student_id": a, "status": "present"},
                {"student_id": b, "status": "absent"},
            ]}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first.as_array().unwrap().len(), 2);

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [
                {"student_id": b, "status": "present"},
                {"student_id": c, "status": "present"},
            ]}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (_, stored) = app.get("/api/attendance?date=2025-03-10", &token).await?;
    assert_eq!(
        statuses(&stored),
        vec![(b, "present".to_string()), (c, "present".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn records_embed_student_summary() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let department = app.create_department(&token, "Physics").await?;
    let a = app
        .create_student(&token, "Asha", "R-1", Some(department))
        .await?;

    let (_, records) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [{"student_id": a, "status": "present"}]}),
        )
        .await?;

    let student = &records[0]["student"];
    assert_eq!(records[0]["date"], "2025-03-10");
    assert_eq!(student["name"], "Asha");
    assert_eq!(student["roll_number"], "R-1");
    assert_eq!(student["department_name"], "Physics");
    Ok(())
}

#[tokio::test]
async fn unknown_student_rejects_whole_batch() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;

    app.post(
        "/api/attendance",
        &token,
        json!({"date": "2025-03-10", "records": [{"student_id": a, "status": "present"}]}),
    )
    .await?;

    let (status, body) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [
                {"student_id": a, "status": "absent"},
                {"student_id": 9999, "status": "present"},
            ]}),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student 9999 not found");

    // The previous roster survives the failed submission.
    let (_, stored) = app.get("/api/attendance?date=2025-03-10", &token).await?;
    assert_eq!(statuses(&stored), vec![(a, "present".to_string())]);
    Ok(())
}

#[tokio::test]
async fn duplicate_student_in_roster_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [
                {"student_id": a, "status": "present"},
                {"student_id": a, "status": "absent"},
            ]}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn invalid_status_or_date_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [{"student_id": a, "status": "late"}]}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "10/03/2025", "records": []}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/attendance?date=yesterday", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn listing_without_date_returns_newest_first() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;

    for date in ["2025-03-08", "2025-03-10", "2025-03-09"] {
        app.post(
            "/api/attendance",
            &token,
            json!({"date": date, "records": [{"student_id": a, "status": "present"}]}),
        )
        .await?;
    }

    let (_, all) = app.get("/api/attendance", &token).await?;
    let dates: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-03-10", "2025-03-09", "2025-03-08"]);

    let (_, history) = app.get("/api/attendance/history", &token).await?;
    assert_eq!(history[0]["date"], "2025-03-10");
    Ok(())
}

#[tokio::test]
async fn history_is_capped_at_two_hundred() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;

    let mut roster = Vec::new();
    for i in 0..21 {
        let id = app
            .create_student(&token, &format!("Student {i}"), &format!("R-{i}"), None)
            .await?;
        roster.push(json!({"student_id": id, "status": "present"}));
    }

    for day in 1..=10 {
        app.post(
            "/api/attendance",
            &token,
            json!({"date": format!("2025-04-{day:02}"), "records": roster}),
        )
        .await?;
    }

    let (_, history) = app.get("/api/attendance/history", &token).await?;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 200);
    assert_eq!(history[0]["date"], "2025-04-10");
    assert_eq!(history[199]["date"], "2025-04-01");
    Ok(())
}

#[tokio::test]
async fn deleting_a_student_removes_its_attendance() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;
    let b = app.create_student(&token, "Bilal", "R-2", None).await?;

    app.post(
        "/api/attendance",
        &token,
        json!({"date": "2025-03-10", "records": [
            {"student_id": a, "status": "present"},
            {"student_id": b, "status": "absent"},
        ]}),
    )
    .await?;

    let (status, _) = app.delete(&format!("/api/students/{a}"), &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, stored) = app.get("/api/attendance", &token).await?;
    assert_eq!(statuses(&stored), vec![(b, "absent".to_string())]);
    Ok(())
}

fn company_id(signup: &Value) -> i32 {
    signup["user"]["company_id"].as_i64().unwrap() as i32
}

/// Insert `count` students directly and return their ids.
async fn seed_students(app: &TestApp, company_id: i32, count: usize) -> Result<Vec<i64>> {
    let now = Utc::now();
    for chunk_start in (0..count).step_by(INSERT_CHUNK_SIZE) {
        let rows = (chunk_start..count.min(chunk_start + INSERT_CHUNK_SIZE)).map(|i| {
            student::ActiveModel {
                name: Set(format!("Student {i}")),
                roll_number: Set(format!("R-{i:05}")),
                department_id: Set(None),
                company_id: Set(company_id),
                created_at: Set(now.into()),
                ..Default::default()
            }
        });
        Student::insert_many(rows).exec(app.db()).await?;
    }

    let ids = Student::find()
        .all(app.db())
        .await?
        .into_iter()
        .filter(|s| s.company_id == company_id)
        .map(|s| i64::from(s.id))
        .collect();
    Ok(ids)
}

#[tokio::test]
async fn school_sized_roster_is_stored() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, signup) = app.signup("Acme Academy", "admin@acme.io").await?;

    // Above what a single multi-row INSERT can bind on SQLite.
    let ids = seed_students(&app, company_id(&signup), 7_000).await?;
    assert_eq!(ids.len(), 7_000);

    let records: Vec<Value> = ids
        .iter()
        .map(|id| json!({"student_id": id, "status": "present"}))
        .collect();
    let (status, stored) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": records}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED, "{stored}");
    assert_eq!(stored.as_array().unwrap().len(), 7_000);
    assert!(stored[6_999]["student"]["name"].is_string());

    let (_, listed) = app.get("/api/attendance?date=2025-03-10", &token).await?;
    assert_eq!(listed.as_array().unwrap().len(), 7_000);
    Ok(())
}

#[tokio::test]
async fn failed_insert_restores_previous_roster() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let (_, other) = app.signup("Beta Clinic", "admin@beta.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;
    let b = app.create_student(&token, "Bilal", "R-2", None).await?;

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [{"student_id": b, "status": "absent"}]}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    // A row for (a, date) owned by another company survives the day's delete
    // and makes the following insert hit the (student_id, date) unique index.
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    Attendance::insert(attendance::ActiveModel {
        student_id: Set(a as i32),
        date: Set(date),
        status: Set(AttendanceStatus::Present),
        company_id: Set(company_id(&other)),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .exec(app.db())
    .await?;

    let (status, _) = app
        .post(
            "/api/attendance",
            &token,
            json!({"date": "2025-03-10", "records": [
                {"student_id": b, "status": "present"},
                {"student_id": a, "status": "present"},
            ]}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stored) = app.get("/api/attendance?date=2025-03-10", &token).await?;
    assert_eq!(statuses(&stored), vec![(b, "absent".to_string())]);
    Ok(())
}

#[tokio::test]
async fn list_and_history_order_a_day_identically() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let a = app.create_student(&token, "Asha", "R-1", None).await?;
    let b = app.create_student(&token, "Bilal", "R-2", None).await?;
    let c = app.create_student(&token, "Chen", "R-3", None).await?;

    app.post(
        "/api/attendance",
        &token,
        json!({"date": "2025-03-10", "records": [
            {"student_id": c, "status": "present"},
            {"student_id": a, "status": "absent"},
            {"student_id": b, "status": "present"},
        ]}),
    )
    .await?;

    let record_ids = |records: &Value| -> Vec<i64> {
        records
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect()
    };

    let (_, listed) = app.get("/api/attendance?date=2025-03-10", &token).await?;
    let (_, history) = app.get("/api/attendance/history", &token).await?;
    let listed = record_ids(&listed);
    assert_eq!(listed, record_ids(&history));
    assert!(listed.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}
