//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::{CourseCode, StudentId};

/// Domain errors represent register rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("student with ID {0} not found")]
    StudentNotFound(StudentId),

    #[error("course with code {0} not found")]
    CourseNotFound(CourseCode),

    #[error("student {student} references unregistered course {course}")]
    UnregisteredCourse {
        student: StudentId,
        course: CourseCode,
    },

    #[error("student {student} belongs to {found}, not {expected}")]
    ForeignInstitute {
        student: StudentId,
        found: String,
        expected: String,
    },

    #[error("no student IDs left")]
    StudentIdsExhausted,

    #[error("no course codes left")]
    CourseCodesExhausted,
}

impl DomainError {
    /// Not-found conditions are recoverable lookups; everything else is invalid input.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::StudentNotFound(_) | DomainError::CourseNotFound(_)
        )
    }
}
