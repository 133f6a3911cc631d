//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::demo_roster;
use crate::application::services::{EnrollmentManager, Roster, RosterAction, StepOutcome, StepReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Demo) => _demo(container),
        Some(Commands::Run { roster, summary }) => _run(container, roster, *summary),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(container),
            ConfigCommands::Path => _config_path(cli),
            ConfigCommands::Init { force } => _config_init(container, *force),
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(skip_all)]
fn _demo(container: &ServiceContainer) -> CliResult<()> {
    let roster = demo_roster()?;
    replay(container, &roster, false)
}

#[instrument(skip(container))]
fn _run(container: &ServiceContainer, roster_path: &Path, summary: bool) -> CliResult<()> {
    let roster = container.roster.load(roster_path)?;
    replay(container, &roster, summary)
}

fn replay(container: &ServiceContainer, roster: &Roster, summary: bool) -> CliResult<()> {
    let mut register = container.register();
    let steps = container.roster.replay(&mut register, roster)?;

    for step in &steps {
        print_step(step);
    }
    if summary {
        print_summary(&register);
    }

    let failed = steps.iter().filter(|s| s.is_failure()).count();
    debug!("replay finished: {} steps, {} failed", steps.len(), failed);
    if failed > 0 {
        return Err(CliError::ReplayFailed {
            failed,
            total: steps.len(),
        });
    }
    Ok(())
}

fn print_step(step: &StepReport) {
    let (student, course) = match step.action {
        RosterAction::Enroll { student, course } | RosterAction::Withdraw { student, course } => {
            (Some(student), Some(course))
        }
        RosterAction::StudentReport { student } => (Some(student), None),
        RosterAction::CourseReport { course } => (None, Some(course)),
    };
    let pair = || {
        format!(
            "student {} / course {}",
            student.map_or_else(|| "-".to_string(), |s| s.to_string()),
            course.map_or_else(|| "-".to_string(), |c| c.to_string())
        )
    };

    match &step.outcome {
        StepOutcome::Enrolled => output::success(&format!("enrolled {}", pair())),
        StepOutcome::Withdrawn => output::success(&format!("withdrawn {}", pair())),
        StepOutcome::NotEnrolled => output::warning(&format!("not enrolled: {}", pair())),
        StepOutcome::Report(text) => {
            output::info(text);
            output::info("");
        }
        StepOutcome::Failed(e) => output::failure(e),
    }
}

fn print_summary(register: &EnrollmentManager) {
    output::header(&format!("Students ({})", register.institute_name()));
    for student in register.students() {
        let names = student.course_names();
        output::detail(&format!(
            "{} {} {}: {}",
            student.id,
            student.profile.firstname,
            student.profile.lastname,
            if names.is_empty() { "-" } else { names.as_str() }
        ));
    }
    output::header("Courses");
    for course in register.courses() {
        let enrolled = register
            .enrolled_students(course.code)
            .map(|s| s.len())
            .unwrap_or_default();
        output::detail(&format!("{} {}: {} enrolled", course.code, course.name, enrolled));
    }
}

fn _config_show(container: &ServiceContainer) -> CliResult<()> {
    output::info(&container.settings.to_toml()?);
    Ok(())
}

fn _config_path(cli: &Cli) -> CliResult<()> {
    let global = global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());
    let local = cli
        .config
        .clone()
        .unwrap_or_else(|| local_config_path(Path::new(".")));
    output::action("global", &global);
    output::action("local", &local.display());
    Ok(())
}

fn _config_init(container: &ServiceContainer, force: bool) -> CliResult<()> {
    let path = local_config_path(Path::new("."));
    if container.fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    container
        .fs
        .write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}
