//! In-memory student and course enrollment register.
//!
//! The [`application::services::EnrollmentManager`] owns every registered
//! [`domain::Student`] and [`domain::Course`] and links them through
//! enroll/withdraw operations. Every operation is recorded through `tracing`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
