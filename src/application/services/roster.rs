//! Roster replay service
//!
//! A roster is a TOML file listing courses, students and an ordered list of
//! actions. Courses and students are created in file order, so the n-th course
//! gets code n and the n-th student gets id n.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::services::{EnrollmentManager, WithdrawOutcome};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CourseCode, StudentId, StudentProfile};
use crate::infrastructure::traits::FileSystem;

/// Course entry of a roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    pub name: String,
    pub duration: String,
    pub fee: String,
}

/// One step of a roster replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum RosterAction {
    Enroll {
        student: StudentId,
        course: CourseCode,
    },
    Withdraw {
        student: StudentId,
        course: CourseCode,
    },
    StudentReport {
        student: StudentId,
    },
    CourseReport {
        course: CourseCode,
    },
}

/// Parsed roster file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub courses: Vec<CourseEntry>,
    pub students: Vec<StudentProfile>,
    pub actions: Vec<RosterAction>,
}

impl Roster {
    /// Parse roster content; `source` is only used in error messages.
    pub fn parse(content: &str, source: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Roster {
            path: source.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// What a single action did.
#[derive(Debug)]
pub enum StepOutcome {
    Enrolled,
    Withdrawn,
    NotEnrolled,
    Report(String),
    Failed(ApplicationError),
}

/// An action paired with its outcome.
#[derive(Debug)]
pub struct StepReport {
    pub action: RosterAction,
    pub outcome: StepOutcome,
}

impl StepReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, StepOutcome::Failed(_))
    }
}

/// Service for loading and replaying roster files.
pub struct RosterService {
    fs: Arc<dyn FileSystem>,
}

impl RosterService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a roster file.
    pub fn load(&self, path: &Path) -> ApplicationResult<Roster> {
        debug!("load: path={}", path.display());
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read roster", path)?;
        Roster::parse(&content, path)
    }

    /// Register the roster's courses and students, then run its actions in order.
    ///
    /// A failing action does not stop the replay; it is recorded in its step report.
    /// Only running out of codes or ids while creating entries aborts it.
    #[instrument(skip_all)]
    pub fn replay(
        &self,
        manager: &mut EnrollmentManager,
        roster: &Roster,
    ) -> ApplicationResult<Vec<StepReport>> {
        for course in &roster.courses {
            manager.create_course(
                course.name.clone(),
                course.duration.clone(),
                course.fee.clone(),
            )?;
        }
        for profile in &roster.students {
            manager.create_student(profile.clone())?;
        }
        debug!(
            "replay: {} courses, {} students, {} actions",
            roster.courses.len(),
            roster.students.len(),
            roster.actions.len()
        );

        Ok(roster
            .actions
            .iter()
            .map(|action| StepReport {
                action: action.clone(),
                outcome: Self::apply(manager, action),
            })
            .collect())
    }

    fn apply(manager: &mut EnrollmentManager, action: &RosterAction) -> StepOutcome {
        let result = match *action {
            RosterAction::Enroll { student, course } => {
                manager.enroll(student, course).map(|()| StepOutcome::Enrolled)
            }
            RosterAction::Withdraw { student, course } => {
                manager.withdraw(student, course).map(|o| match o {
                    WithdrawOutcome::Withdrawn => StepOutcome::Withdrawn,
                    WithdrawOutcome::NotEnrolled => StepOutcome::NotEnrolled,
                })
            }
            RosterAction::StudentReport { student } => {
                manager.student_report(student).map(StepOutcome::Report)
            }
            RosterAction::CourseReport { course } => {
                manager.course_report(course).map(StepOutcome::Report)
            }
        };
        result.unwrap_or_else(StepOutcome::Failed)
    }
}
