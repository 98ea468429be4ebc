use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use applicant_directory::directory::domain::parse_count;
use applicant_directory::directory::{
    ApplicantDirectory, ApplicantFilter, ApplicantSubmission, CountAttribute, DirectoryError,
    NumericAttribute, OperationObserver, SnapshotStore, ValidationError,
};

use crate::render::{self, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    View,
    UpdateStatus,
    Delete,
    ByRole,
    ByLocation,
    BySkill,
    ByExperience,
    BySalary,
    ByStatus,
    CountRole,
    CountLocation,
    CountSkill,
    AverageExperience,
    AverageSalary,
    Exit,
}

impl MenuChoice {
    const fn ordered() -> [Self; 16] {
        [
            Self::Add,
            Self::View,
            Self::UpdateStatus,
            Self::Delete,
            Self::ByRole,
            Self::ByLocation,
            Self::BySkill,
            Self::ByExperience,
            Self::BySalary,
            Self::ByStatus,
            Self::CountRole,
            Self::CountLocation,
            Self::CountSkill,
            Self::AverageExperience,
            Self::AverageSalary,
            Self::Exit,
        ]
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add New Applicant",
            Self::View => "View Applicant by Email/Name",
            Self::UpdateStatus => "Update Applicant Status",
            Self::Delete => "Delete Applicant",
            Self::ByRole => "Find all Applicants by Role",
            Self::ByLocation => "Find all Applicants by Location",
            Self::BySkill => "Find all Applicants by Skill",
            Self::ByExperience => "Find all Applicants by Experience Range",
            Self::BySalary => "Find all Applicants by Expected Salary Range",
            Self::ByStatus => "Find all Applicants by Application Status",
            Self::CountRole => "Count Applicants per Role",
            Self::CountLocation => "Count Applicants per Location",
            Self::CountSkill => "Count Applicants per Skill",
            Self::AverageExperience => "Avg Experience per Role",
            Self::AverageSalary => "Avg Expected Salary per Role",
            Self::Exit => "Exit",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let index: usize = raw.trim().parse().ok()?;
        Self::ordered().get(index.checked_sub(1)?).copied()
    }
}

/// Numbered interactive loop over a directory.
///
/// Reaching the end of input behaves like choosing Exit.
pub(crate) struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub(crate) fn run<S, O>(&mut self, directory: &mut ApplicantDirectory<S, O>) -> io::Result<()>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        loop {
            self.print_menu()?;
            let Some(raw) = self.prompt("Please select an option: ")? else {
                break;
            };

            let Some(choice) = MenuChoice::parse(&raw) else {
                writeln!(
                    self.output,
                    "Invalid choice, please enter a number between 1 and {}.",
                    MenuChoice::ordered().len()
                )?;
                continue;
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Exiting application. See you later.")?;
                break;
            }

            if self.dispatch(choice, directory)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== Job Applicant Directory ===")?;
        for (index, choice) in MenuChoice::ordered().iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, choice.label())?;
        }
        Ok(())
    }

    fn dispatch<S, O>(
        &mut self,
        choice: MenuChoice,
        directory: &mut ApplicantDirectory<S, O>,
    ) -> io::Result<ControlFlow<()>>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        match choice {
            MenuChoice::Add => self.add(directory),
            MenuChoice::View => {
                let Some(identifier) = self.prompt("Enter Email or Name: ")? else {
                    return Ok(ControlFlow::Break(()));
                };
                match directory.find(&identifier) {
                    Ok(found) => render::applicant_detail(
                        &mut self.output,
                        found,
                        &identifier,
                        OutputFormat::Text,
                    )?,
                    Err(err) => self.report(&err)?,
                }
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::UpdateStatus => {
                let Some(identifier) = self.prompt("Enter Email or Name: ")? else {
                    return Ok(ControlFlow::Break(()));
                };
                let Some(status) = self.prompt("Enter New Status: ")? else {
                    return Ok(ControlFlow::Break(()));
                };
                match directory.update_status(&identifier, &status) {
                    Ok(updated) => writeln!(
                        self.output,
                        "Status for {} updated to '{}'.",
                        updated.email, updated.status
                    )?,
                    Err(err) => self.report(&err)?,
                }
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::Delete => {
                let Some(identifier) = self.prompt("Enter Email or Name to delete: ")? else {
                    return Ok(ControlFlow::Break(()));
                };
                match directory.delete(&identifier) {
                    Ok(0) => writeln!(self.output, "No applicant matches '{identifier}'.")?,
                    Ok(removed) => writeln!(self.output, "Deleted {removed} applicant(s).")?,
                    Err(err) => self.report(&err)?,
                }
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::ByRole => self.text_filter(directory, "Enter Role: ", ApplicantFilter::Role),
            MenuChoice::ByLocation => {
                self.text_filter(directory, "Enter Location: ", ApplicantFilter::Location)
            }
            MenuChoice::BySkill => {
                self.text_filter(directory, "Enter Skill to Filter: ", ApplicantFilter::Skill)
            }
            MenuChoice::ByStatus => {
                self.text_filter(directory, "Enter Application Status: ", ApplicantFilter::Status)
            }
            MenuChoice::ByExperience => {
                let Some((min, max)) =
                    self.range::<u32>("Enter Min Experience: ", "Enter Max Experience: ", "experience")?
                else {
                    return Ok(ControlFlow::Break(()));
                };
                match (min, max) {
                    (Ok(min), Ok(max)) => {
                        self.filter(directory, ApplicantFilter::Experience { min, max })?
                    }
                    (Err(err), _) | (_, Err(err)) => self.invalid_number(&err)?,
                }
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::BySalary => {
                let Some((min, max)) =
                    self.range::<u64>("Enter Min Salary: ", "Enter Max Salary: ", "expected_salary")?
                else {
                    return Ok(ControlFlow::Break(()));
                };
                match (min, max) {
                    (Ok(min), Ok(max)) => {
                        self.filter(directory, ApplicantFilter::Salary { min, max })?
                    }
                    (Err(err), _) | (_, Err(err)) => self.invalid_number(&err)?,
                }
                Ok(ControlFlow::Continue(()))
            }
            MenuChoice::CountRole => self.count(directory, CountAttribute::Role),
            MenuChoice::CountLocation => self.count(directory, CountAttribute::Location),
            MenuChoice::CountSkill => self.count(directory, CountAttribute::Skills),
            MenuChoice::AverageExperience => self.average(directory, NumericAttribute::Experience),
            MenuChoice::AverageSalary => self.average(directory, NumericAttribute::ExpectedSalary),
            MenuChoice::Exit => Ok(ControlFlow::Break(())),
        }
    }

    fn add<S, O>(&mut self, directory: &mut ApplicantDirectory<S, O>) -> io::Result<ControlFlow<()>>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        let prompts = [
            "Enter Name: ",
            "Enter Email: ",
            "Enter Role: ",
            "Enter Location: ",
            "Enter Skills (comma-separated): ",
            "Enter Experience (years): ",
            "Enter Expected Salary: ",
            "Enter Application Status: ",
        ];
        let mut answers = Vec::with_capacity(prompts.len());
        for label in prompts {
            let Some(answer) = self.prompt(label)? else {
                return Ok(ControlFlow::Break(()));
            };
            answers.push(answer);
        }

        let mut answers = answers.into_iter();
        let mut next = || answers.next().unwrap_or_default();
        let submission = ApplicantSubmission {
            name: next(),
            email: next(),
            role: next(),
            location: next(),
            skills: next(),
            experience: next(),
            expected_salary: next(),
            status: next(),
        };

        match directory.add_submission(submission) {
            Ok(stored) => writeln!(self.output, "Applicant {} added successfully.", stored.email)?,
            Err(err) => self.report(&err)?,
        }
        Ok(ControlFlow::Continue(()))
    }

    fn text_filter<S, O, F>(
        &mut self,
        directory: &ApplicantDirectory<S, O>,
        label: &str,
        build: F,
    ) -> io::Result<ControlFlow<()>>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
        F: FnOnce(String) -> ApplicantFilter,
    {
        let Some(value) = self.prompt(label)? else {
            return Ok(ControlFlow::Break(()));
        };
        self.filter(directory, build(value))?;
        Ok(ControlFlow::Continue(()))
    }

    fn filter<S, O>(
        &mut self,
        directory: &ApplicantDirectory<S, O>,
        filter: ApplicantFilter,
    ) -> io::Result<()>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        match directory.filter(&filter) {
            Ok(matches) => render::applicant_list(&mut self.output, &matches, OutputFormat::Text),
            Err(err) => self.report(&err),
        }
    }

    fn count<S, O>(
        &mut self,
        directory: &ApplicantDirectory<S, O>,
        attribute: CountAttribute,
    ) -> io::Result<ControlFlow<()>>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        let counts = directory.count_by(attribute);
        render::counts(&mut self.output, attribute, &counts, OutputFormat::Text)?;
        Ok(ControlFlow::Continue(()))
    }

    fn average<S, O>(
        &mut self,
        directory: &ApplicantDirectory<S, O>,
        attribute: NumericAttribute,
    ) -> io::Result<ControlFlow<()>>
    where
        S: SnapshotStore + 'static,
        O: OperationObserver + 'static,
    {
        let averages = directory.average_by_role(attribute);
        render::averages(&mut self.output, attribute, &averages, OutputFormat::Text)?;
        Ok(ControlFlow::Continue(()))
    }

    /// Reads a min/max pair; `None` when input ended.
    #[allow(clippy::type_complexity)]
    fn range<T: std::str::FromStr>(
        &mut self,
        min_label: &str,
        max_label: &str,
        field: &'static str,
    ) -> io::Result<Option<(Result<T, ValidationError>, Result<T, ValidationError>)>> {
        let Some(min) = self.prompt(min_label)? else {
            return Ok(None);
        };
        let Some(max) = self.prompt(max_label)? else {
            return Ok(None);
        };
        Ok(Some((parse_count(field, &min), parse_count(field, &max))))
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn invalid_number(&mut self, err: &ValidationError) -> io::Result<()> {
        writeln!(self.output, "Invalid numeric input: {err}")
    }

    fn report(&mut self, err: &DirectoryError) -> io::Result<()> {
        writeln!(self.output, "Error: {err}")
    }
}
