//! # AttendTrack API Library
//!
//! Multi-tenant attendance tracking: companies register, admins manage
//! departments, employees and students, and daily attendance feeds the
//! dashboard statistics.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod telemetry;
pub use migration;
