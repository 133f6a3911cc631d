//! Built-in sample roster used by the `demo` command.

use std::path::Path;

use crate::application::services::Roster;
use crate::application::ApplicationResult;

pub const DEMO_ROSTER: &str = r#"
[[courses]]
name = "Python Programming"
duration = "3 months"
fee = "$500"

[[courses]]
name = "Java Programming"
duration = "4 months"
fee = "$600"

[[courses]]
name = "AWS Certified Solutions Architect"
duration = "6 months"
fee = "$800"

[[students]]
firstname = "Saurav"
lastname = "Gautam"
qualification = "bsc"
email = "sauravgautam@example.com"
mobile_no = "1234567890"
age = 21

[[students]]
firstname = "Nikita"
lastname = "Awalkar"
qualification = "btch"
email = "nikita@example.com"
mobile_no = "0987654321"
age = 22

[[actions]]
action = "enroll"
student = 1
course = 1

[[actions]]
action = "enroll"
student = 2
course = 2

[[actions]]
action = "student-report"
student = 1

[[actions]]
action = "course-report"
course = 1

[[actions]]
action = "withdraw"
student = 1
course = 1

[[actions]]
action = "student-report"
student = 1
"#;

pub fn demo_roster() -> ApplicationResult<Roster> {
    Roster::parse(DEMO_ROSTER, Path::new("<demo>"))
}
