//! # Repository Layer
//!
//! Tenancy-scoped data access. Every repository borrows any SeaORM connection
//! (pool or open transaction), and every method that touches tenant data takes
//! the caller's `company_id` and ANDs it onto the query.

pub mod attendance;
pub mod company;
pub mod department;
pub mod student;
pub mod user;

pub use attendance::AttendanceRepository;
pub use company::CompanyRepository;
pub use department::DepartmentRepository;
pub use student::StudentRepository;
pub use user::{NewUser, UserRepository};
