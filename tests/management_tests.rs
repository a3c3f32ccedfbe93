//! Admin management of employees, departments and students.

use anyhow::Result;
use attendtrack::credentials::GENERATED_PASSWORD_LEN;
use attendtrack::repositories::UserRepository;
use axum::http::StatusCode;
use serde_json::json;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{TestApp, token_of};

async fn employee_token(app: &TestApp, admin_token: &str, email: &str) -> Result<String> {
    let (_, password) = app.create_employee(admin_token, email).await?;
    let (status, body) = app.login("Acme Academy", email, &password).await?;
    assert_eq!(status, StatusCode::OK);
    token_of(&body)
}

#[tokio::test]
async fn generated_password_is_shown_once_and_stored_hashed() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let department = app.create_department(&token, "Front Office").await?;

    let (status, created) = app
        .post(
            "/api/employees",
            &token,
            json!({"name": "Femi", "email": " Femi@Acme.io ", "department_id": department}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "femi@acme.io");
    assert_eq!(created["role"], "employee");
    assert_eq!(created["department_name"], "Front Office");
    let password = created["generated_password"].as_str().unwrap().to_string();
    assert_eq!(password.len(), GENERATED_PASSWORD_LEN);

    let (_, listed) = app.get("/api/employees", &token).await?;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1, "admins are not listed as employees");
    assert!(listed[0].get("generated_password").is_none());

    let id = created["id"].as_i64().unwrap() as i32;
    let stored = UserRepository::new(app.db()).find_by_id(id).await?.unwrap();
    assert!(stored.password_hash.starts_with("$argon2"));
    assert_ne!(stored.password_hash, password);

    let (status, login) = app.login("Acme Academy", "femi@acme.io", &password).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["role"], "employee");
    Ok(())
}

#[tokio::test]
async fn employee_email_is_unique_per_company() -> Result<()> {
    let app = TestApp::new().await?;
    let (token_a, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let (token_b, _) = app.signup("Beta Clinic", "admin@beta.io").await?;

    app.create_employee(&token_a, "shared@mail.io").await?;
    app.create_employee(&token_b, "shared@mail.io").await?;

    let (status, body) = app
        .post(
            "/api/employees",
            &token_a,
            json!({"name": "Again", "email": "SHARED@mail.io"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered in this company");
    Ok(())
}

#[tokio::test]
async fn employees_are_kept_out_of_admin_routes() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let staff = employee_token(&app, &token, "staff@acme.io").await?;
    let department = app.create_department(&token, "Science").await?;

    let forbidden = [
        app.get("/api/employees", &staff).await?,
        app.post("/api/employees", &staff, json!({"name": "X", "email": "x@acme.io"}))
            .await?,
        app.post("/api/departments", &staff, json!({"name": "Art"})).await?,
        app.put(
            &format!("/api/departments/{department}"),
            &staff,
            json!({"name": "Arts"}),
        )
        .await?,
        app.delete(&format!("/api/departments/{department}"), &staff)
            .await?,
        app.put("/api/settings", &staff, json!({"theme_id": "medical"}))
            .await?,
    ];
    for (status, body) in forbidden {
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Admin access required");
    }

    // Day-to-day work stays open to employees.
    let (status, _) = app.get("/api/departments", &staff).await?;
    assert_eq!(status, StatusCode::OK);
    let student = app.create_student(&staff, "Asha", "R-1", None).await?;
    let (status, _) = app
        .post(
            "/api/attendance",
            &staff,
            json!({"date": "2025-03-10", "records": [{"student_id": student, "status": "present"}]}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn admins_cannot_be_deleted_as_employees() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, signup) = app.signup("Acme Academy", "admin@acme.io").await?;
    let admin_id = signup["user"]["id"].as_i64().unwrap();

    let (status, _) = app
        .delete(&format!("/api/employees/{admin_id}"), &token)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (employee, password) = app.create_employee(&token, "staff@acme.io").await?;
    let (status, body) = app
        .delete(&format!("/api/employees/{employee}"), &token)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.login("Acme Academy", "staff@acme.io", &password).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn department_names_are_unique_per_company() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    app.create_department(&token, "Science").await?;
    let arts = app.create_department(&token, "Arts").await?;

    let (status, body) = app
        .post("/api/departments", &token, json!({"name": "Science"}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Department already exists");

    let (status, body) = app
        .put(
            &format!("/api/departments/{arts}"),
            &token,
            json!({"name": "Science"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Department name already exists");

    let (status, renamed) = app
        .put(
            &format!("/api/departments/{arts}"),
            &token,
            json!({"name": "Humanities"}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Humanities");

    let (_, listed) = app.get("/api/departments", &token).await?;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Humanities", "Science"]);
    Ok(())
}

#[tokio::test]
async fn deleting_a_department_detaches_its_members() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let department = app.create_department(&token, "Science").await?;
    let student = app
        .create_student(&token, "Asha", "R-1", Some(department))
        .await?;
    let (status, _) = app
        .post(
            "/api/employees",
            &token,
            json!({"name": "Femi", "email": "femi@acme.io", "department_id": department}),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .delete(&format!("/api/departments/{department}"), &token)
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, students) = app.get("/api/students", &token).await?;
    assert_eq!(students[0]["id"], student);
    assert!(students[0]["department_id"].is_null());
    assert!(students[0]["department_name"].is_null());

    let (_, employees) = app.get("/api/employees", &token).await?;
    assert!(employees[0]["department_id"].is_null());

    let (status, _) = app
        .delete(&format!("/api/departments/{department}"), &token)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn student_roll_number_checks_on_update() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let department = app.create_department(&token, "Science").await?;
    app.create_student(&token, "Asha", "R-1", None).await?;
    let bilal = app.create_student(&token, "Bilal", "R-2", None).await?;

    let (status, body) = app
        .put(
            &format!("/api/students/{bilal}"),
            &token,
            json!({"name": "Bilal", "roll_number": "R-1"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Roll number already exists");

    let (status, updated) = app
        .put(
            &format!("/api/students/{bilal}"),
            &token,
            json!({"name": "Bilal Khan", "roll_number": "R-2", "department_id": department}),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Bilal Khan");
    assert_eq!(updated["department_name"], "Science");

    let (status, _) = app
        .put(
            "/api/students/9999",
            &token,
            json!({"name": "Ghost", "roll_number": "R-9"}),
        )
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn students_are_listed_newest_first() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;
    let first = app.create_student(&token, "Asha", "R-1", None).await?;
    let second = app.create_student(&token, "Bilal", "R-2", None).await?;

    let (_, listed) = app.get("/api/students", &token).await?;
    assert_eq!(listed[0]["id"], second);
    assert_eq!(listed[1]["id"], first);

    let (status, body) = app
        .post(
            "/api/students",
            &token,
            json!({"name": "   ", "roll_number": "R-3"}),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    Ok(())
}

#[tokio::test]
async fn malformed_path_ids_get_problem_documents() -> Result<()> {
    let app = TestApp::new().await?;
    let (token, _) = app.signup("Acme Academy", "admin@acme.io").await?;

    let responses = [
        app.delete("/api/students/abc", &token).await?,
        app.put(
            "/api/students/99999999999",
            &token,
            json!({"name": "Asha", "roll_number": "R-1"}),
        )
        .await?,
        app.put("/api/departments/1.5", &token, json!({"name": "Arts"}))
            .await?,
        app.delete("/api/employees/x", &token).await?,
    ];
    for (status, body) in responses {
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["location"], "path");
    }
    Ok(())
}
