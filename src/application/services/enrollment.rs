//! Enrollment register service
//!
//! Owns every registered student and course and links them through
//! enroll/withdraw operations. Failures are returned to the caller and logged.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    Course, CourseCode, DomainError, IdSequence, Student, StudentId, StudentProfile,
    DEFAULT_INSTITUTE_NAME,
};

/// Result of a successful withdraw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    /// One enrollment was removed
    Withdrawn,
    /// Student and course exist but the student was not enrolled
    NotEnrolled,
}

/// Aggregate root of the register.
#[derive(Debug)]
pub struct EnrollmentManager {
    students: BTreeMap<StudentId, Student>,
    courses: BTreeMap<CourseCode, Arc<Course>>,
    student_ids: IdSequence,
    course_codes: IdSequence,
    institute_name: String,
}

impl Default for EnrollmentManager {
    fn default() -> Self {
        Self::new(DEFAULT_INSTITUTE_NAME)
    }
}

impl EnrollmentManager {
    pub fn new(institute_name: impl Into<String>) -> Self {
        Self {
            students: BTreeMap::new(),
            courses: BTreeMap::new(),
            student_ids: IdSequence::new(),
            course_codes: IdSequence::new(),
            institute_name: institute_name.into(),
        }
    }

    pub fn institute_name(&self) -> &str {
        &self.institute_name
    }

    /// Create a course with the next free code and register it.
    pub fn create_course(
        &mut self,
        name: impl Into<String>,
        duration: impl Into<String>,
        fee: impl Into<String>,
    ) -> ApplicationResult<Arc<Course>> {
        let code = self
            .course_codes
            .next_id()
            .map(CourseCode)
            .ok_or_else(|| reject(DomainError::CourseCodesExhausted))?;
        let course = Arc::new(Course::create(code, name, duration, fee));
        self.insert_course(Arc::clone(&course));
        Ok(course)
    }

    /// Create a student with the next free id and register it.
    pub fn create_student(&mut self, profile: StudentProfile) -> ApplicationResult<StudentId> {
        let id = self
            .student_ids
            .next_id()
            .map(StudentId)
            .ok_or_else(|| reject(DomainError::StudentIdsExhausted))?;
        let student = Student::create(id, profile, self.institute_name.clone());
        self.insert_student(student);
        Ok(id)
    }

    /// Register a course built outside the register.
    ///
    /// Replaces and returns any course already registered under the same code.
    pub fn register_course(&mut self, course: Course) -> Option<Arc<Course>> {
        self.course_codes.observe(course.code.0);
        self.insert_course(Arc::new(course))
    }

    /// Register a student built outside the register.
    ///
    /// The student must belong to this register's institute, and every course
    /// it already references must be the very course registered under that code.
    /// Replaces and returns any student already registered under the same id.
    pub fn register_student(&mut self, student: Student) -> ApplicationResult<Option<Student>> {
        if student.institute_name != self.institute_name {
            return Err(reject(DomainError::ForeignInstitute {
                student: student.id,
                found: student.institute_name.clone(),
                expected: self.institute_name.clone(),
            }));
        }
        if let Some(course) = student.enrolled_courses().iter().find(|c| {
            !self
                .courses
                .get(&c.code)
                .is_some_and(|registered| Arc::ptr_eq(*c, registered))
        }) {
            return Err(reject(DomainError::UnregisteredCourse {
                student: student.id,
                course: course.code,
            }));
        }
        self.student_ids.observe(student.id.0);
        Ok(self.insert_student(student))
    }

    /// Enroll a registered student in a registered course.
    ///
    /// Enrolling twice in the same course records two enrollments.
    pub fn enroll(&mut self, student_id: StudentId, course_code: CourseCode) -> ApplicationResult<()> {
        let (student, course) = self.lookup_mut(student_id, course_code)?;
        student.add_course(course);
        info!("Student ID {} enrolled in course {}", student_id, course_code);
        Ok(())
    }

    /// Withdraw a student from one enrollment in a course.
    pub fn withdraw(
        &mut self,
        student_id: StudentId,
        course_code: CourseCode,
    ) -> ApplicationResult<WithdrawOutcome> {
        let (student, course) = self.lookup_mut(student_id, course_code)?;
        if student.remove_course(&course) {
            info!("Student ID {} withdrawn from course {}", student_id, course_code);
            Ok(WithdrawOutcome::Withdrawn)
        } else {
            Ok(WithdrawOutcome::NotEnrolled)
        }
    }

    pub fn student_report(&self, student_id: StudentId) -> ApplicationResult<String> {
        self.students
            .get(&student_id)
            .map(Student::describe)
            .ok_or_else(|| reject(DomainError::StudentNotFound(student_id)))
    }

    pub fn course_report(&self, course_code: CourseCode) -> ApplicationResult<String> {
        self.courses
            .get(&course_code)
            .map(|c| c.describe())
            .ok_or_else(|| reject(DomainError::CourseNotFound(course_code)))
    }

    pub fn student(&self, student_id: StudentId) -> Option<&Student> {
        self.students.get(&student_id)
    }

    pub fn course(&self, course_code: CourseCode) -> Option<&Arc<Course>> {
        self.courses.get(&course_code)
    }

    /// Registered students ordered by id.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Registered courses ordered by code.
    pub fn courses(&self) -> impl Iterator<Item = &Arc<Course>> {
        self.courses.values()
    }

    /// Students currently enrolled in `course_code`, ordered by id.
    pub fn enrolled_students(&self, course_code: CourseCode) -> ApplicationResult<Vec<&Student>> {
        if !self.courses.contains_key(&course_code) {
            return Err(reject(DomainError::CourseNotFound(course_code)));
        }
        Ok(self
            .students
            .values()
            .filter(|s| s.is_enrolled(course_code))
            .collect())
    }

    fn lookup_mut(
        &mut self,
        student_id: StudentId,
        course_code: CourseCode,
    ) -> ApplicationResult<(&mut Student, Arc<Course>)> {
        let student = self
            .students
            .get_mut(&student_id)
            .ok_or_else(|| reject(DomainError::StudentNotFound(student_id)))?;
        let course = self
            .courses
            .get(&course_code)
            .cloned()
            .ok_or_else(|| reject(DomainError::CourseNotFound(course_code)))?;
        Ok((student, course))
    }

    fn insert_course(&mut self, course: Arc<Course>) -> Option<Arc<Course>> {
        let code = course.code;
        let replaced = self.courses.insert(code, course);
        if replaced.is_some() {
            debug!("course code {} re-registered, previous entry replaced", code);
        }
        info!("Course with code {} added.", code);
        replaced
    }

    fn insert_student(&mut self, student: Student) -> Option<Student> {
        let id = student.id;
        let replaced = self.students.insert(id, student);
        if replaced.is_some() {
            debug!("student ID {} re-registered, previous entry replaced", id);
        }
        info!("Student with ID {} added", id);
        replaced
    }
}

/// Log a rejected operation at the severity its kind calls for.
fn reject(err: DomainError) -> ApplicationError {
    if err.is_not_found() {
        warn!("{}", err);
    } else {
        error!("{}", err);
    }
    ApplicationError::Domain(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(firstname: &str) -> StudentProfile {
        StudentProfile {
            firstname: firstname.into(),
            lastname: "Tester".into(),
            qualification: "bsc".into(),
            email: format!("{}@example.com", firstname.to_lowercase()),
            mobile_no: "1234567890".into(),
            age: 21,
        }
    }

    #[test]
    fn given_created_entities_when_listing_then_ids_count_from_one() {
        let mut manager = EnrollmentManager::default();
        let ids: Vec<StudentId> = ["A", "B", "C"]
            .iter()
            .map(|n| manager.create_student(profile(n)).unwrap())
            .collect();
        let codes: Vec<CourseCode> = ["x", "y"]
            .iter()
            .map(|n| manager.create_course(*n, "1 month", "$1").unwrap().code)
            .collect();

        assert_eq!(ids, vec![StudentId(1), StudentId(2), StudentId(3)]);
        assert_eq!(codes, vec![CourseCode(1), CourseCode(2)]);
    }

    #[test]
    fn given_registered_course_when_creating_next_then_skips_taken_code() {
        let mut manager = EnrollmentManager::default();
        manager.register_course(Course::create(CourseCode(4), "Rust", "2 months", "$400"));

        let next = manager.create_course("Go", "1 month", "$100").unwrap();

        assert_eq!(next.code, CourseCode(5));
    }

    #[test]
    fn given_same_code_when_registering_course_then_replaces_entry() {
        let mut manager = EnrollmentManager::default();
        manager.register_course(Course::create(CourseCode(1), "Old", "1 month", "$1"));

        let replaced =
            manager.register_course(Course::create(CourseCode(1), "New", "1 month", "$1"));

        assert_eq!(replaced.map(|c| c.name.clone()), Some("Old".to_string()));
        assert_eq!(manager.courses().count(), 1);
        assert_eq!(manager.course(CourseCode(1)).unwrap().name, "New");
    }

    #[test]
    fn given_missing_course_when_enrolling_then_student_unchanged() {
        let mut manager = EnrollmentManager::default();
        let id = manager.create_student(profile("Saurav")).unwrap();

        let err = manager.enroll(id, CourseCode(42)).unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&DomainError::CourseNotFound(CourseCode(42)))
        );
        assert!(manager.student(id).unwrap().enrolled_courses().is_empty());
    }

    #[test]
    fn given_not_enrolled_when_withdrawing_then_reports_not_enrolled() {
        let mut manager = EnrollmentManager::default();
        let id = manager.create_student(profile("Saurav")).unwrap();
        let code = manager.create_course("Python Programming", "3 months", "$500").unwrap().code;

        let outcome = manager.withdraw(id, code).unwrap();

        assert_eq!(outcome, WithdrawOutcome::NotEnrolled);
    }

    #[test]
    fn given_student_with_unregistered_course_when_registering_then_rejects() {
        let mut manager = EnrollmentManager::default();
        let mut student = Student::create(StudentId(1), profile("Nikita"), DEFAULT_INSTITUTE_NAME);
        student.add_course(Arc::new(Course::create(CourseCode(9), "Ghost", "-", "-")));

        let err = manager.register_student(student).unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&DomainError::UnregisteredCourse {
                student: StudentId(1),
                course: CourseCode(9)
            })
        );
        assert_eq!(manager.students().count(), 0);
    }

    #[test]
    fn given_student_with_registered_course_when_registering_then_accepts() {
        let mut manager = EnrollmentManager::default();
        let course = manager.create_course("Java Programming", "4 months", "$600").unwrap();
        let mut student = Student::create(StudentId(3), profile("Nikita"), DEFAULT_INSTITUTE_NAME);
        student.add_course(course);

        let replaced = manager.register_student(student).unwrap();

        assert!(replaced.is_none());
        assert_eq!(manager.create_student(profile("Next")).unwrap(), StudentId(4));
    }

    #[test]
    fn given_enrollments_when_querying_course_then_lists_enrolled_students() {
        let mut manager = EnrollmentManager::default();
        let a = manager.create_student(profile("A")).unwrap();
        let b = manager.create_student(profile("B")).unwrap();
        let c = manager.create_student(profile("C")).unwrap();
        let code = manager.create_course("Python Programming", "3 months", "$500").unwrap().code;
        manager.enroll(a, code).unwrap();
        manager.enroll(c, code).unwrap();

        let ids: Vec<StudentId> = manager
            .enrolled_students(code)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();

        assert_eq!(ids, vec![a, c]);
        assert!(!ids.contains(&b));
    }

    #[test]
    fn given_course_with_max_code_when_registering_then_next_create_fails() {
        let mut manager = EnrollmentManager::default();

        let replaced =
            manager.register_course(Course::create(CourseCode(u32::MAX), "Last", "1 day", "$0"));
        let err = manager.create_course("Overflow", "1 day", "$0").unwrap_err();

        assert!(replaced.is_none());
        assert_eq!(err.as_domain(), Some(&DomainError::CourseCodesExhausted));
        assert_eq!(manager.courses().count(), 1);
        assert!(manager.course(CourseCode(0)).is_none());
    }

    #[test]
    fn given_student_with_max_id_when_registering_then_next_create_fails() {
        let mut manager = EnrollmentManager::default();
        let last = Student::create(StudentId(u32::MAX), profile("Last"), DEFAULT_INSTITUTE_NAME);

        manager.register_student(last).unwrap();
        let err = manager.create_student(profile("Overflow")).unwrap_err();

        assert_eq!(err.as_domain(), Some(&DomainError::StudentIdsExhausted));
        assert_eq!(manager.students().count(), 1);
    }

    #[test]
    fn given_lookalike_course_with_registered_code_when_registering_student_then_rejects() {
        let mut manager = EnrollmentManager::default();
        manager.create_course("Python Programming", "3 months", "$500").unwrap();
        let mut student = Student::create(StudentId(2), profile("Nikita"), DEFAULT_INSTITUTE_NAME);
        student.add_course(Arc::new(Course::create(CourseCode(1), "Ghost", "-", "-")));

        let err = manager.register_student(student).unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&DomainError::UnregisteredCourse {
                student: StudentId(2),
                course: CourseCode(1)
            })
        );
        assert!(manager.student(StudentId(2)).is_none());
    }

    #[test]
    fn given_student_from_other_institute_when_registering_then_rejects() {
        let mut manager = EnrollmentManager::default();
        let student = Student::create(StudentId(1), profile("Nikita"), "Elsewhere");

        let err = manager.register_student(student).unwrap_err();

        assert_eq!(
            err.as_domain(),
            Some(&DomainError::ForeignInstitute {
                student: StudentId(1),
                found: "Elsewhere".into(),
                expected: DEFAULT_INSTITUTE_NAME.into(),
            })
        );
        assert_eq!(manager.students().count(), 0);
    }
}
