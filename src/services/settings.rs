//! Company settings: UI theme and the custom labels shown by the frontend.

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ServiceError, ServiceResult};
use crate::models::company;
use crate::repositories::CompanyRepository;

/// Theme identifiers a company may select.
pub const THEMES: [&str; 4] = ["medical", "corporate", "government", "learning"];

pub const DEFAULT_THEME: &str = "corporate";

pub fn validate_theme(theme_id: &str) -> ServiceResult<String> {
    let theme_id = theme_id.trim();
    if THEMES.contains(&theme_id) {
        Ok(theme_id.to_string())
    } else {
        Err(ServiceError::validation(format!(
            "Unknown theme '{theme_id}'; expected one of {}",
            THEMES.join(", ")
        )))
    }
}

/// Wording the frontend uses for members, their ids and their groups.
///
/// Omitted fields take their default, so `{}` is a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CustomLabels {
    #[serde(default = "defaults::member_label")]
    pub member_label: String,
    #[serde(default = "defaults::member_label_plural")]
    pub member_label_plural: String,
    #[serde(default = "defaults::id_label")]
    pub id_label: String,
    #[serde(default = "defaults::group_label")]
    pub group_label: String,
    #[serde(default = "defaults::name_placeholder")]
    pub name_placeholder: String,
    #[serde(default = "defaults::id_placeholder")]
    pub id_placeholder: String,
    #[serde(default = "defaults::group_placeholder")]
    pub group_placeholder: String,
}

mod defaults {
    pub fn member_label() -> String {
        "Student".to_string()
    }
    pub fn member_label_plural() -> String {
        "Students".to_string()
    }
    pub fn id_label() -> String {
        "Roll Number".to_string()
    }
    pub fn group_label() -> String {
        "Department".to_string()
    }
    pub fn name_placeholder() -> String {
        "e.g. Arjun Sharma".to_string()
    }
    pub fn id_placeholder() -> String {
        "e.g. CS2024001".to_string()
    }
    pub fn group_placeholder() -> String {
        "e.g. Computer Science".to_string()
    }
}

impl Default for CustomLabels {
    fn default() -> Self {
        Self {
            member_label: defaults::member_label(),
            member_label_plural: defaults::member_label_plural(),
            id_label: defaults::id_label(),
            group_label: defaults::group_label(),
            name_placeholder: defaults::name_placeholder(),
            id_placeholder: defaults::id_placeholder(),
            group_placeholder: defaults::group_placeholder(),
        }
    }
}

impl CustomLabels {
    /// Decode the stored document. Anything unparsable reads as absent.
    pub fn from_stored(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        match serde_json::from_str(raw) {
            Ok(labels) => Some(labels),
            Err(error) => {
                tracing::warn!(%error, "Ignoring malformed stored custom labels");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsResponse {
    pub id: i32,
    pub name: String,
    pub theme_id: String,
    pub custom_labels: Option<CustomLabels>,
}

impl From<company::Model> for SettingsResponse {
    fn from(company: company::Model) -> Self {
        let custom_labels = CustomLabels::from_stored(company.custom_labels.as_deref());
        Self {
            id: company.id,
            name: company.name,
            theme_id: company.theme_id,
            custom_labels,
        }
    }
}

/// Partial settings update; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SettingsUpdateRequest {
    pub theme_id: Option<String>,
    pub custom_labels: Option<CustomLabels>,
}

pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn company(&self, company_id: i32) -> ServiceResult<company::Model> {
        CompanyRepository::new(self.db)
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Company"))
    }

    pub async fn get(&self, company_id: i32) -> ServiceResult<SettingsResponse> {
        Ok(self.company(company_id).await?.into())
    }

    pub async fn update(
        &self,
        company_id: i32,
        request: SettingsUpdateRequest,
    ) -> ServiceResult<SettingsResponse> {
        let theme_id = request
            .theme_id
            .as_deref()
            .map(validate_theme)
            .transpose()?;
        let custom_labels = request
            .custom_labels
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ServiceError::validation(format!("Invalid custom labels: {e}")))?;

        let company = self.company(company_id).await?;
        let updated = CompanyRepository::new(self.db)
            .update_settings(company, theme_id, custom_labels)
            .await?;

        tracing::info!(company_id, theme_id = %updated.theme_id, "Company settings updated");
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let labels: CustomLabels = serde_json::from_str("{}").unwrap();
        assert_eq!(labels, CustomLabels::default());
        assert_eq!(labels.id_label, "Roll Number");
    }

    #[test]
    fn test_partial_document_keeps_given_fields() {
        let labels: CustomLabels =
            serde_json::from_str(r#"{"member_label":"Patient","group_label":"Ward"}"#).unwrap();
        assert_eq!(labels.member_label, "Patient");
        assert_eq!(labels.group_label, "Ward");
        assert_eq!(labels.member_label_plural, "Students");
    }

    #[test]
    fn test_stored_round_trip() {
        let labels = CustomLabels {
            member_label: "Employee".into(),
            ..CustomLabels::default()
        };
        let stored = serde_json::to_string(&labels).unwrap();
        assert_eq!(CustomLabels::from_stored(Some(&stored)), Some(labels));
    }

    #[test]
    fn test_malformed_stored_labels_read_as_absent() {
        assert_eq!(CustomLabels::from_stored(None), None);
        assert_eq!(CustomLabels::from_stored(Some("not json")), None);
        assert_eq!(CustomLabels::from_stored(Some("[1, 2]")), None);
        assert_eq!(
            CustomLabels::from_stored(Some(r#"{"member_label": 5}"#)),
            None
        );
    }

    #[test]
    fn test_theme_validation() {
        assert_eq!(validate_theme(" medical ").unwrap(), "medical");
        assert!(validate_theme("neon").is_err());
    }
}
