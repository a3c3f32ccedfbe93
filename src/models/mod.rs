//! # Data Models
//!
//! SeaORM entities for the attendance tracking API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod attendance;
pub mod company;
pub mod department;
pub mod student;
pub mod user;

pub use attendance::{AttendanceStatus, Entity as Attendance};
pub use company::Entity as Company;
pub use department::Entity as Department;
pub use student::Entity as Student;
pub use user::{Entity as User, Role};

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
    /// Location of the interactive API documentation
    pub docs: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "attendtrack".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            docs: "/docs".to_string(),
        }
    }
}
