//! Domain entities: core data structures

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Institute every student is attached to unless configured otherwise.
pub const DEFAULT_INSTITUTE_NAME: &str = "The Kiran Academy";

/// Identifier of a student, unique within a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u32);

/// Code of a course, unique within a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(pub u32);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A course offering. Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: CourseCode,
    pub name: String,
    /// Free-form, e.g. "3 months"
    pub duration: String,
    /// Free-form, e.g. "$500"; never parsed as an amount
    pub fee: String,
}

impl Course {
    pub fn create(
        code: CourseCode,
        name: impl Into<String>,
        duration: impl Into<String>,
        fee: impl Into<String>,
    ) -> Self {
        let course = Self {
            code,
            name: name.into(),
            duration: duration.into(),
            fee: fee.into(),
        };
        info!("Created course {} with code {}", course.name, course.code);
        course
    }

    /// Multi-line detail report.
    pub fn describe(&self) -> String {
        info!("Checking course details");
        self.to_string()
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Course Code: {}", self.code)?;
        writeln!(f, "Course Name: {}", self.name)?;
        writeln!(f, "Duration: {}", self.duration)?;
        write!(f, "Course Fees: {}", self.fee)
    }
}

/// Caller-supplied fields of a student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub firstname: String,
    pub lastname: String,
    pub qualification: String,
    pub email: String,
    pub mobile_no: String,
    pub age: u32,
}

/// A student and the courses they are enrolled in.
///
/// Courses are shared with the register's course table; the student never owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub profile: StudentProfile,
    pub institute_name: String,
    enrolled_courses: Vec<Arc<Course>>,
}

impl Student {
    pub fn create(id: StudentId, profile: StudentProfile, institute_name: impl Into<String>) -> Self {
        info!("Created student with ID {}", id);
        Self {
            id,
            profile,
            institute_name: institute_name.into(),
            enrolled_courses: Vec::new(),
        }
    }

    /// Courses in enrollment order, duplicates included.
    pub fn enrolled_courses(&self) -> &[Arc<Course>] {
        &self.enrolled_courses
    }

    pub fn is_enrolled(&self, code: CourseCode) -> bool {
        self.enrolled_courses.iter().any(|c| c.code == code)
    }

    /// Append a course. Enrolling twice in the same course lists it twice.
    pub fn add_course(&mut self, course: Arc<Course>) {
        info!("Added course {} to Student ID {}", course.name, self.id);
        self.enrolled_courses.push(course);
    }

    /// Remove the first enrollment in `course`.
    ///
    /// Returns `false` and leaves the list untouched if the student is not enrolled.
    pub fn remove_course(&mut self, course: &Course) -> bool {
        match self
            .enrolled_courses
            .iter()
            .position(|c| c.code == course.code)
        {
            Some(pos) => {
                self.enrolled_courses.remove(pos);
                info!("Removed course {} from Student ID {}", course.name, self.id);
                true
            }
            None => {
                warn!(
                    "Course {} not found in Student ID {}'s enrollments",
                    course.name, self.id
                );
                false
            }
        }
    }

    /// Enrolled course names joined by ", ".
    pub fn course_names(&self) -> String {
        self.enrolled_courses.iter().map(|c| c.name.as_str()).join(", ")
    }

    /// Multi-line detail report.
    pub fn describe(&self) -> String {
        info!("Checking the details of the student");
        self.to_string()
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.profile;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Student's First Name: {}", p.firstname)?;
        writeln!(f, "Student's Last Name: {}", p.lastname)?;
        writeln!(f, "Student's Qualification: {}", p.qualification)?;
        writeln!(f, "Student's Email: {}", p.email)?;
        writeln!(f, "Student's Mobile Number: {}", p.mobile_no)?;
        writeln!(f, "Student's Age: {}", p.age)?;
        writeln!(f, "Enrolled Courses: {}", self.course_names())?;
        write!(f, "Institute Name: {}", self.institute_name)
    }
}
