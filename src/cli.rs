use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use applicant_directory::config::AppConfig;
use applicant_directory::directory::{
    ApplicantDirectory, ApplicantFilter, ApplicantSubmission, CountAttribute, IdentifierPolicy,
    JsonFileStore, NumericAttribute, TracingObserver,
};
use applicant_directory::error::AppError;
use applicant_directory::headlines::HeadlineReport;
use applicant_directory::telemetry;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::menu::Menu;
use crate::render::{self, OutputFormat};

type Directory = ApplicantDirectory<JsonFileStore, TracingObserver>;

#[derive(Parser, Debug)]
#[command(
    name = "applicant-directory",
    about = "Manage a persistent directory of job applicants",
    version
)]
struct Cli {
    /// Override the configured applicant store file
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// How a name resolves when several applicants share it (first | reject)
    #[arg(long, global = true)]
    name_match: Option<IdentifierPolicy>,
    /// Print command results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the numbered interactive menu (default command)
    Menu,
    /// Add a single applicant
    Add(AddArgs),
    /// Show the applicant matching an email or name
    Show { identifier: String },
    /// Replace the status of the applicant matching an email or name
    UpdateStatus { identifier: String, status: String },
    /// Delete every applicant matching an email or name
    Delete { identifier: String },
    /// List applicants matching a filter
    Filter {
        #[command(subcommand)]
        filter: FilterCommand,
    },
    /// Count applicants per attribute value
    Count { attribute: CountAttribute },
    /// Average a numeric attribute per role
    Average { attribute: NumericAttribute },
    /// Bulk-load applicants from a CSV file
    Import { csv: PathBuf },
    /// Work with headline ranking reports
    Headlines {
        #[command(subcommand)]
        command: HeadlinesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum FilterCommand {
    Role { value: String },
    Location { value: String },
    Skill { value: String },
    Status { value: String },
    /// Inclusive experience range in years
    Experience { min: u32, max: u32 },
    /// Inclusive expected salary range
    Salary { min: u64, max: u64 },
}

impl From<FilterCommand> for ApplicantFilter {
    fn from(value: FilterCommand) -> Self {
        match value {
            FilterCommand::Role { value } => Self::Role(value),
            FilterCommand::Location { value } => Self::Location(value),
            FilterCommand::Skill { value } => Self::Skill(value),
            FilterCommand::Status { value } => Self::Status(value),
            FilterCommand::Experience { min, max } => Self::Experience { min, max },
            FilterCommand::Salary { min, max } => Self::Salary { min, max },
        }
    }
}

#[derive(Subcommand, Debug)]
enum HeadlinesCommand {
    /// Check a ranking job's output file against its contract
    Validate { report: PathBuf },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, default_value = "")]
    role: String,
    #[arg(long, default_value = "")]
    location: String,
    /// Comma separated skill list
    #[arg(long, default_value = "")]
    skills: String,
    /// Whole years; required
    #[arg(long)]
    experience: Option<String>,
    /// Whole currency units; required
    #[arg(long)]
    expected_salary: Option<String>,
    #[arg(long, default_value = "Applied")]
    status: String,
}

impl From<AddArgs> for ApplicantSubmission {
    fn from(args: AddArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            role: args.role,
            location: args.location,
            skills: args.skills,
            experience: args.experience.unwrap_or_default(),
            expected_salary: args.expected_salary.unwrap_or_default(),
            status: args.status,
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }
    if let Some(policy) = cli.name_match {
        config.store.identifier_policy = policy;
    }
    telemetry::init(&config.telemetry)?;

    let format = OutputFormat::from_flag(cli.json);
    let command = cli.command.unwrap_or(Command::Menu);

    if let Command::Headlines {
        command: HeadlinesCommand::Validate { report },
    } = &command
    {
        return validate_headlines(report, format);
    }

    let mut directory = ApplicantDirectory::open(
        Arc::new(JsonFileStore::new(&config.store.path)),
        Arc::new(TracingObserver),
        config.store.identifier_policy,
    )?;
    info!(
        environment = ?config.environment,
        store = %directory.store_location(),
        policy = %directory.policy(),
        applicants = directory.len(),
        "applicant directory opened"
    );

    execute(command, &mut directory, format)
}

fn execute(
    command: Command,
    directory: &mut Directory,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(stdin.lock(), &mut out).run(directory)?;
        }
        Command::Add(args) => {
            let stored = directory.add_submission(args.into())?;
            render::applicant_detail(&mut out, Some(&stored), &stored.email, format)?;
        }
        Command::Show { identifier } => {
            let found = directory.find(&identifier)?;
            render::applicant_detail(&mut out, found, &identifier, format)?;
        }
        Command::UpdateStatus { identifier, status } => {
            let updated = directory.update_status(&identifier, &status)?;
            render::applicant_detail(&mut out, Some(&updated), &identifier, format)?;
        }
        Command::Delete { identifier } => {
            let removed = directory.delete(&identifier)?;
            if format == OutputFormat::Json {
                writeln!(out, "{}", serde_json::json!({ "removed": removed }))?;
            } else {
                writeln!(out, "Deleted {removed} applicant(s) matching '{identifier}'.")?;
            }
        }
        Command::Filter { filter } => {
            let filter = ApplicantFilter::from(filter);
            let matches = directory.filter(&filter)?;
            info!(filter = %filter.describe(), matches = matches.len(), "filter applied");
            render::applicant_list(&mut out, &matches, format)?;
        }
        Command::Count { attribute } => {
            let counts = directory.count_by(attribute);
            render::counts(&mut out, attribute, &counts, format)?;
        }
        Command::Average { attribute } => {
            let averages = directory.average_by_role(attribute);
            render::averages(&mut out, attribute, &averages, format)?;
        }
        Command::Import { csv } => {
            let summary = directory.import_csv_path(&csv)?;
            render::import_summary(&mut out, &summary, format)?;
        }
        Command::Headlines { command } => match command {
            HeadlinesCommand::Validate { report } => validate_headlines(&report, format)?,
        },
    }

    Ok(())
}

fn validate_headlines(path: &Path, format: OutputFormat) -> Result<(), AppError> {
    let report = HeadlineReport::from_path(path)?;
    report.validate()?;
    info!(
        report = %path.display(),
        articles = report.articles.len(),
        "headline report satisfies its contract"
    );

    let mut out = io::stdout().lock();
    if format == OutputFormat::Json {
        writeln!(
            out,
            "{}",
            serde_json::json!({
                "valid": true,
                "totalResults": report.total_results,
                "articles": report.articles.len(),
            })
        )?;
    } else {
        writeln!(
            out,
            "{} is valid: {} of {} articles carry ranked headlines.",
            path.display(),
            report.articles.len(),
            report.total_results
        )?;
    }
    Ok(())
}
