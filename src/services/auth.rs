//! Signup, login and the caller's own profile.

use metrics::counter;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::settings::{DEFAULT_THEME, validate_theme};
use super::validation;
use crate::credentials::CredentialService;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Role, company, user};
use crate::repositories::{CompanyRepository, DepartmentRepository, NewUser, UserRepository};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub company_name: String,
    /// Name of the first admin
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `corporate`
    pub theme_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub company_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: i32,
    pub company_name: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

impl TokenResponse {
    fn bearer(access_token: String, user: UserProfile) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

fn profile(user: user::Model, company: &company::Model, department_name: Option<String>) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        company_id: company.id,
        company_name: company.name.clone(),
        department_id: user.department_id,
        department_name,
    }
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    credentials: &'a CredentialService,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, credentials: &'a CredentialService) -> Self {
        Self { db, credentials }
    }

    /// Register a company together with its first admin account.
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<TokenResponse> {
        let company_name = validation::required("Company name", &request.company_name)?;
        let name = validation::required("Name", &request.name)?;
        let email = validation::email(&request.email)?;
        let password = validation::new_password(&request.password)?;
        let theme_id = validate_theme(request.theme_id.as_deref().unwrap_or(DEFAULT_THEME))?;

        let password_hash = self.credentials.hash_password(password)?;

        let txn = self.db.begin().await?;
        let companies = CompanyRepository::new(&txn);
        let users = UserRepository::new(&txn);

        if companies.name_taken(&company_name).await? {
            return Err(ServiceError::validation("Company name already registered"));
        }
        if users.email_registered_anywhere(&email).await? {
            return Err(ServiceError::validation("Email already registered"));
        }

        let company = companies.create(&company_name, &theme_id).await?;
        let admin = users
            .create(NewUser {
                name,
                email,
                password_hash,
                role: Role::Admin,
                company_id: company.id,
                department_id: None,
            })
            .await?;
        txn.commit().await?;

        tracing::info!(company_id = company.id, user_id = admin.id, "Company registered");

        let token = self.credentials.issue_token(admin.id)?;
        Ok(TokenResponse::bearer(token, profile(admin, &company, None)))
    }

    /// Authenticate against a company. Every failure is the same error.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenResponse> {
        let Some((user, company)) = self.check_credentials(&request).await? else {
            counter!("auth_login_failure_total").increment(1);
            tracing::debug!("Login rejected");
            return Err(ServiceError::Authentication);
        };

        let department_name = DepartmentRepository::new(self.db)
            .name_of(company.id, user.department_id)
            .await?;
        let token = self.credentials.issue_token(user.id)?;

        counter!("auth_login_success_total").increment(1);
        tracing::info!(company_id = company.id, user_id = user.id, "User logged in");

        Ok(TokenResponse::bearer(
            token,
            profile(user, &company, department_name),
        ))
    }

    async fn check_credentials(
        &self,
        request: &LoginRequest,
    ) -> ServiceResult<Option<(user::Model, company::Model)>> {
        let company_name = request.company_name.trim();
        let email = request.email.trim().to_lowercase();

        let Some(company) = CompanyRepository::new(self.db)
            .find_by_name(company_name)
            .await?
        else {
            return Ok(None);
        };
        let Some(user) = UserRepository::new(self.db)
            .find_by_email(company.id, &email)
            .await?
        else {
            return Ok(None);
        };

        if !self
            .credentials
            .verify_password(&request.password, &user.password_hash)
        {
            return Ok(None);
        }

        Ok(Some((user, company)))
    }

    /// Profile of an already resolved caller.
    pub async fn me(&self, user: user::Model) -> ServiceResult<UserProfile> {
        let company = CompanyRepository::new(self.db)
            .find_by_id(user.company_id)
            .await?
            .ok_or(ServiceError::Authentication)?;
        let department_name = DepartmentRepository::new(self.db)
            .name_of(company.id, user.department_id)
            .await?;

        Ok(profile(user, &company, department_name))
    }
}
