//! # Domain Services
//!
//! Each service borrows the connection pool, takes the caller's company id
//! (always taken from the resolved identity, never from request input) and
//! returns [`ServiceError`](crate::error::ServiceError) on failure.

pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod settings;
pub mod students;
mod validation;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use departments::DepartmentService;
pub use employees::EmployeeService;
pub use settings::SettingsService;
pub use students::StudentService;
