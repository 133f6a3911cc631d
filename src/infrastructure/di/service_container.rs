//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{EnrollmentManager, RosterService};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Roster loading and replay
    pub roster: RosterService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let roster = RosterService::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            roster,
        }
    }

    /// Fresh, empty register for the configured institute.
    pub fn register(&self) -> EnrollmentManager {
        EnrollmentManager::new(self.settings.institute_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_settings_when_creating_register_then_uses_institute_name() {
        let settings = Settings {
            institute_name: "Rust Institute".into(),
            ..Settings::default()
        };
        let container = ServiceContainer::new(settings);

        let mut register = container.register();
        let id = register.create_student(crate::domain::StudentProfile {
            firstname: "A".into(),
            lastname: "B".into(),
            qualification: "msc".into(),
            email: "a@b.c".into(),
            mobile_no: "1".into(),
            age: 30,
        })
        .unwrap();

        assert_eq!(
            register.student(id).map(|s| s.institute_name.as_str()),
            Some("Rust Institute")
        );
    }
}
