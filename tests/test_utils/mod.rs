//! Test utilities for database and HTTP testing.
//!
//! Sets up an in-memory SQLite database with all migrations applied, builds
//! the full router on top of it, and drives requests through `oneshot`.

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use attendtrack::config::AppConfig;
use attendtrack::server::{AppState, create_app};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ADMIN_PASSWORD: &str = "s3cure-passw0rd";

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool holds exactly one connection: every connection to
/// `sqlite::memory:` opens a separate database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: Some(TEST_JWT_SECRET.to_string()),
        database_url: "sqlite::memory:".to_string(),
        ..AppConfig::default()
    }
}

/// A router wired to its own fresh database.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let db = setup_test_db().await?;
        let state = AppState::new(test_config(), db)?;
        let router = create_app(state.clone());
        Ok(Self { router, state })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Register a company; returns the admin token and the signup response.
    pub async fn signup(&self, company: &str, email: &str) -> Result<(String, Value)> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(json!({
                    "company_name": company,
                    "name": "Admin",
                    "email": email,
                    "password": ADMIN_PASSWORD,
                })),
            )
            .await?;
        if status != StatusCode::CREATED {
            return Err(anyhow!("signup failed with {status}: {body}"));
        }
        Ok((token_of(&body)?, body))
    }

    pub async fn login(
        &self,
        company: &str,
        email: &str,
        password: &str,
    ) -> Result<(StatusCode, Value)> {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({
                "company_name": company,
                "email": email,
                "password": password,
            })),
        )
        .await
    }

    /// Create a student and return its id.
    pub async fn create_student(
        &self,
        token: &str,
        name: &str,
        roll_number: &str,
        department_id: Option<i64>,
    ) -> Result<i64> {
        let (status, body) = self
            .post(
                "/api/students",
                token,
                json!({
                    "name": name,
                    "roll_number": roll_number,
                    "department_id": department_id,
                }),
            )
            .await?;
        if status != StatusCode::CREATED {
            return Err(anyhow!("student creation failed with {status}: {body}"));
        }
        id_of(&body)
    }

    pub async fn create_department(&self, token: &str, name: &str) -> Result<i64> {
        let (status, body) = self
            .post("/api/departments", token, json!({ "name": name }))
            .await?;
        if status != StatusCode::CREATED {
            return Err(anyhow!("department creation failed with {status}: {body}"));
        }
        id_of(&body)
    }

    /// Create an employee; returns its id and generated password.
    pub async fn create_employee(&self, token: &str, email: &str) -> Result<(i64, String)> {
        let (status, body) = self
            .post(
                "/api/employees",
                token,
                json!({ "name": "Employee", "email": email }),
            )
            .await?;
        if status != StatusCode::CREATED {
            return Err(anyhow!("employee creation failed with {status}: {body}"));
        }
        let password = body["generated_password"]
            .as_str()
            .ok_or_else(|| anyhow!("no generated password in {body}"))?
            .to_string();
        Ok((id_of(&body)?, password))
    }
}

pub fn token_of(body: &Value) -> Result<String> {
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no access token in {body}"))
}

pub fn id_of(body: &Value) -> Result<i64> {
    body["id"]
        .as_i64()
        .ok_or_else(|| anyhow!("no id in {body}"))
}
