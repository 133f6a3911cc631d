//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod enrollment;
mod roster;

pub use enrollment::{EnrollmentManager, WithdrawOutcome};
pub use roster::{CourseEntry, Roster, RosterAction, RosterService, StepOutcome, StepReport};
