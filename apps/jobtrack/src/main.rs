use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobtrack::config::Config;
use jobtrack::errors::ClientError;
use jobtrack::models::application::ApplicationStatus;
use jobtrack::models::job::NewJob;
use jobtrack::models::resume::{Education, Experience};
use jobtrack::models::user::{Credentials, Registration};
use jobtrack::render;
use jobtrack::routes::Route;
use jobtrack::state::App;
use jobtrack::views::applications::{ApplicationDetailView, ApplicationsView};
use jobtrack::views::auth::AuthView;
use jobtrack::views::dashboard::DashboardView;
use jobtrack::views::jobs::JobsView;
use jobtrack::views::resume::{ResumeView, ScalarField};
use jobtrack::views::{AssumeYes, Confirm, Level, Notification, ViewCore, ViewStatus};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications and AI-tailored resumes from the terminal")]
#[command(version)]
struct Cli {
    /// API origin (overrides JOBTRACK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session directory (overrides JOBTRACK_SESSION_DIR)
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and persist the session
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Stats, résumé, and the most recent applications
    Dashboard,

    /// Upload, view, and edit the résumé
    Resume {
        #[command(subcommand)]
        command: ResumeCommand,
    },

    /// Manage job postings
    Jobs {
        #[command(subcommand)]
        command: JobsCommand,
    },

    /// Track applications
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand)]
enum ResumeCommand {
    Show,

    /// Upload a PDF, TXT, DOC, or DOCX file for parsing
    Upload { path: PathBuf },

    /// Edit parsed fields; positions are 1-based
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        summary: Option<String>,

        #[arg(long = "add-skill", value_name = "SKILL")]
        add_skill: Vec<String>,
        #[arg(long = "set-skill", value_name = "N=SKILL")]
        set_skill: Vec<String>,
        #[arg(long = "remove-skill", value_name = "N")]
        remove_skill: Vec<usize>,

        #[arg(long = "add-experience", value_name = "TITLE|COMPANY|DURATION|DESCRIPTION")]
        add_experience: Vec<String>,
        #[arg(long = "remove-experience", value_name = "N")]
        remove_experience: Vec<usize>,

        #[arg(long = "add-education", value_name = "DEGREE|INSTITUTION|YEAR")]
        add_education: Vec<String>,
        #[arg(long = "remove-education", value_name = "N")]
        remove_education: Vec<usize>,

        /// Print the draft and throw it away instead of saving
        #[arg(long)]
        discard: bool,
    },
}

#[derive(Subcommand)]
enum JobsCommand {
    List,

    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        requirements: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },

    /// Delete a job (asks for confirmation)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Generate a tailored résumé and cover letter and record the application
    Apply { id: String },
}

#[derive(Subcommand)]
enum ApplicationsCommand {
    List {
        #[arg(long)]
        status: Option<ApplicationStatus>,
    },

    /// Show generated documents
    Show { id: String },

    /// Change an application's status
    Status {
        id: String,
        status: ApplicationStatus,
    },
}

struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env(cli.api_url.clone(), cli.session_dir.clone())?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("jobtrack v{} against {}", env!("CARGO_PKG_VERSION"), config.api_url);

    if cli.no_color {
        colored::control::set_override(false);
    }
    let mut app = App::bootstrap(config)?;
    Ok(dispatch(cli.command, &mut app).await)
}

async fn dispatch(command: Commands, app: &mut App) -> ExitCode {
    match command {
        Commands::Login { email, password } => {
            let password = match password_or_prompt(password) {
                Ok(p) => p,
                Err(e) => return report_error(e.into()),
            };
            let mut view = AuthView::new(app.context());
            let ok = view.login(Credentials { email, password }).await;
            if ok {
                app.navigate(Route::Dashboard);
            }
            finish(&mut view.core)
        }

        Commands::Register {
            name,
            email,
            password,
        } => {
            let password = match password_or_prompt(password) {
                Ok(p) => p,
                Err(e) => return report_error(e.into()),
            };
            let mut view = AuthView::new(app.context());
            let ok = view
                .register(Registration {
                    email,
                    password,
                    full_name: name,
                })
                .await;
            if ok {
                app.navigate(Route::Dashboard);
            }
            finish(&mut view.core)
        }

        Commands::Logout => match app.session().logout() {
            Ok(()) => {
                println!("Logged out.");
                ExitCode::SUCCESS
            }
            Err(e) => report_error(e),
        },

        Commands::Whoami => match app.session().user() {
            Some(user) => {
                println!("{} <{}>", user.full_name, user.email);
                ExitCode::SUCCESS
            }
            None => not_logged_in(),
        },

        Commands::Dashboard => {
            if !enter(app, Route::Dashboard) {
                return not_logged_in();
            }
            let mut view = DashboardView::new(app.context());
            view.load().await;
            if view.core.status() == ViewStatus::Idle {
                if let Some(user) = app.session().user() {
                    println!("Welcome, {}\n", user.full_name);
                }
                if let Some(stats) = &view.stats {
                    print!("{}", render::stats(stats));
                }
                match &view.resume {
                    Some(resume) => println!("\nResume: {}", resume.file_name),
                    None => println!("\nResume: none uploaded"),
                }
                println!("\nRecent applications:");
                let recent: Vec<_> = view.recent.iter().collect();
                print!("{}", render::applications(&recent));
            }
            finish(&mut view.core)
        }

        Commands::Resume { command } => {
            if !enter(app, Route::Resume) {
                return not_logged_in();
            }
            resume_command(command, app).await
        }

        Commands::Jobs { command } => {
            if !enter(app, Route::Jobs) {
                return not_logged_in();
            }
            jobs_command(command, app).await
        }

        Commands::Applications { command } => {
            let route = match &command {
                ApplicationsCommand::Show { id } => Route::ApplicationDetail(id.clone()),
                _ => Route::Applications,
            };
            if !enter(app, route) {
                return not_logged_in();
            }
            applications_command(command, app).await
        }
    }
}

async fn resume_command(command: ResumeCommand, app: &App) -> ExitCode {
    let mut view = ResumeView::new(app.context());
    match command {
        ResumeCommand::Show => {
            view.load().await;
            if view.core.status() == ViewStatus::Idle {
                print!(
                    "{}",
                    render::resume(view.resume.as_ref(), view.fields(), view.mode())
                );
            }
        }

        ResumeCommand::Upload { path } => {
            if view.upload_path(&path).await {
                print!(
                    "{}",
                    render::resume(view.resume.as_ref(), view.fields(), view.mode())
                );
            }
        }

        ResumeCommand::Edit {
            name,
            email,
            phone,
            summary,
            add_skill,
            set_skill,
            remove_skill,
            add_experience,
            remove_experience,
            add_education,
            remove_education,
            discard,
        } => {
            view.load().await;
            if view.core.status() != ViewStatus::Idle {
                return finish(&mut view.core);
            }
            let edits = apply_edits(
                &mut view,
                Edits {
                    scalars: [
                        (ScalarField::Name, name),
                        (ScalarField::Email, email),
                        (ScalarField::Phone, phone),
                        (ScalarField::Summary, summary),
                    ],
                    add_skill,
                    set_skill,
                    remove_skill,
                    add_experience,
                    remove_experience,
                    add_education,
                    remove_education,
                },
            );
            if let Err(err) = edits {
                view.cancel().await;
                view.core.fail(err);
                return finish(&mut view.core);
            }

            print!(
                "{}",
                render::resume(view.resume.as_ref(), view.fields(), view.mode())
            );
            if discard {
                view.cancel().await;
                println!("Draft discarded.");
            } else {
                view.save().await;
            }
        }
    }
    finish(&mut view.core)
}

struct Edits {
    scalars: [(ScalarField, Option<String>); 4],
    add_skill: Vec<String>,
    set_skill: Vec<String>,
    remove_skill: Vec<usize>,
    add_experience: Vec<String>,
    remove_experience: Vec<usize>,
    add_education: Vec<String>,
    remove_education: Vec<usize>,
}

/// 1-based CLI position to 0-based index.
fn index(position: usize) -> Result<usize, ClientError> {
    position
        .checked_sub(1)
        .ok_or_else(|| ClientError::validation("Positions start at 1"))
}

/// Largest position first, so earlier removals don't shift later ones.
fn descending(mut positions: Vec<usize>) -> Result<Vec<usize>, ClientError> {
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    positions.into_iter().map(index).collect()
}

fn parse_experience(raw: &str) -> Experience {
    let mut parts = raw.splitn(4, '|').map(|s| s.trim().to_string());
    Experience {
        title: parts.next().unwrap_or_default(),
        company: parts.next().unwrap_or_default(),
        duration: parts.next().unwrap_or_default(),
        description: parts.next().unwrap_or_default(),
    }
}

fn parse_education(raw: &str) -> Education {
    let mut parts = raw.splitn(3, '|').map(|s| s.trim().to_string());
    Education {
        degree: parts.next().unwrap_or_default(),
        institution: parts.next().unwrap_or_default(),
        year: parts.next().unwrap_or_default(),
    }
}

fn apply_edits(view: &mut ResumeView, edits: Edits) -> Result<(), ClientError> {
    view.begin_edit()?;

    for (field, value) in edits.scalars {
        if let Some(value) = value {
            view.set_field(field, &value)?;
        }
    }
    for raw in &edits.set_skill {
        let (position, skill) = raw
            .split_once('=')
            .ok_or_else(|| ClientError::validation(format!("Expected N=SKILL, got '{raw}'")))?;
        let position: usize = position
            .trim()
            .parse()
            .map_err(|_| ClientError::validation(format!("'{position}' is not a position")))?;
        view.update_skill(index(position)?, skill)?;
    }

    for i in descending(edits.remove_skill)? {
        view.remove_skill(i)?;
    }
    for i in descending(edits.remove_experience)? {
        view.remove_experience(i)?;
    }
    for i in descending(edits.remove_education)? {
        view.remove_education(i)?;
    }

    for skill in &edits.add_skill {
        view.add_skill(skill)?;
    }
    for raw in &edits.add_experience {
        view.add_experience(parse_experience(raw))?;
    }
    for raw in &edits.add_education {
        view.add_education(parse_education(raw))?;
    }
    Ok(())
}

async fn jobs_command(command: JobsCommand, app: &App) -> ExitCode {
    let mut view = JobsView::new(app.context());
    match command {
        JobsCommand::List => {
            view.load().await;
            if view.core.status() == ViewStatus::Idle {
                print!("{}", render::jobs(&view.jobs));
            }
        }

        JobsCommand::Add {
            title,
            company,
            description,
            requirements,
            location,
            url,
        } => {
            let form = NewJob {
                title,
                company,
                location,
                url,
                description,
                requirements,
            };
            if view.create(form).await.is_some() {
                print!("{}", render::jobs(&view.jobs));
            }
        }

        JobsCommand::Delete { id, yes } => {
            view.load().await;
            if view.core.status() != ViewStatus::Idle {
                return finish(&mut view.core);
            }
            let confirmed = if yes {
                view.delete(&id, &AssumeYes).await
            } else {
                view.delete(&id, &StdinConfirm).await
            };
            if !confirmed && view.core.notification().is_none() {
                println!("Not deleted.");
            }
        }

        JobsCommand::Apply { id } => {
            eprintln!("Generating tailored documents; this can take up to two minutes...");
            if let Some(application) = view.apply(&id).await {
                print!("{}", render::application_detail(&application));
            }
        }
    }
    finish(&mut view.core)
}

async fn applications_command(command: ApplicationsCommand, app: &App) -> ExitCode {
    match command {
        ApplicationsCommand::List { status } => {
            let mut view = ApplicationsView::new(app.context());
            view.filter = status;
            view.load().await;
            if view.core.status() == ViewStatus::Idle {
                print!("{}", render::applications(&view.visible()));
            }
            finish(&mut view.core)
        }

        ApplicationsCommand::Show { id } => {
            let mut view = ApplicationDetailView::new(app.context());
            view.load(&id).await;
            if let Some(application) = &view.application {
                print!("{}", render::application_detail(application));
            }
            finish(&mut view.core)
        }

        ApplicationsCommand::Status { id, status } => {
            let mut view = ApplicationsView::new(app.context());
            if view.update_status(&id, status).await {
                let updated: Vec<_> = view.applications.iter().filter(|a| a.id == id).collect();
                print!("{}", render::applications(&updated));
            }
            finish(&mut view.core)
        }
    }
}

/// Navigates through the guard; `false` means the user landed on the login screen.
fn enter(app: &mut App, route: Route) -> bool {
    app.navigate(route) != &Route::Login
}

/// Prints the view's last notification and maps its final status to an exit code.
fn finish(core: &mut ViewCore) -> ExitCode {
    if let Some(note) = core.take_notification() {
        match note.level {
            Level::Success => println!("{}", render::notification(&note)),
            Level::Warning | Level::Error => eprintln!("{}", render::notification(&note)),
        }
    }
    match core.status() {
        ViewStatus::Idle => ExitCode::SUCCESS,
        ViewStatus::RedirectToLogin => not_logged_in(),
        ViewStatus::Loading | ViewStatus::Error => ExitCode::FAILURE,
    }
}

fn report_error(err: ClientError) -> ExitCode {
    let note = Notification {
        level: Level::Error,
        message: err.user_message(),
    };
    eprintln!("{}", render::notification(&note));
    ExitCode::FAILURE
}

/// Uses `--password` when given, otherwise reads it from the terminal without echo.
fn password_or_prompt(password: Option<String>) -> io::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: "),
    }
}

fn not_logged_in() -> ExitCode {
    eprintln!("Not logged in. Run `jobtrack login --email <address>` first.");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_status_argument() {
        let cli = Cli::try_parse_from(["jobtrack", "applications", "status", "a1", "interview"])
            .unwrap();
        match cli.command {
            Commands::Applications {
                command: ApplicationsCommand::Status { id, status },
            } => {
                assert_eq!(id, "a1");
                assert_eq!(status, ApplicationStatus::Interview);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_status() {
        assert!(
            Cli::try_parse_from(["jobtrack", "applications", "status", "a1", "ghosted"]).is_err()
        );
    }

    #[test]
    fn test_password_flag_skips_prompt() {
        assert_eq!(password_or_prompt(Some("s3cret".to_string())).unwrap(), "s3cret");
    }

    #[test]
    fn test_descending_positions() {
        assert_eq!(descending(vec![1, 3, 3, 2]).unwrap(), vec![2, 1, 0]);
        assert!(descending(vec![0]).is_err());
    }

    #[test]
    fn test_parse_experience_fills_missing_parts() {
        let entry = parse_experience("Engineer | Acme | 2020-2023");
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.duration, "2020-2023");
        assert!(entry.description.is_empty());
    }

    #[test]
    fn test_parse_education() {
        let entry = parse_education("BSc|MIT|2019");
        assert_eq!(entry.institution, "MIT");
        assert_eq!(entry.year, "2019");
    }
}
