//! Command line front end for the knowledge base.
//!
//! # Responsibility
//! - Run the core screen and form controllers against a SQLite file.
//! - Keep output plain text and line oriented.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use knowbase_core::db::open_db;
use knowbase_core::view::screen::{NO_PROJECT_LABEL, RETRY_LABEL};
use knowbase_core::{
    default_log_level, init_logging, CardDetail, CardView, ConfirmPrompt, DeleteOutcome,
    IssuePriority, KnowledgeBaseScreen, Project, ProjectDirectory, ProjectService, RecordService,
    RecordType, ScreenContent, SqliteProjectRepository, SqliteRecordRepository, SubmitOutcome,
    TypeFilter,
};
use log::info;
use uuid::Uuid;

/// Knowbase: browse and manage project knowledge records.
#[derive(Parser)]
#[command(name = "knowbase", version, about)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "KNOWBASE_DB_PATH", default_value = "knowbase.sqlite3", global = true)]
    db: PathBuf,

    /// Write rolling logs into this directory.
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, default_value = default_log_level(), global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core linkage info.
    Ping,

    /// Manage projects.
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Browse and manage records of a project.
    #[command(subcommand)]
    Record(RecordCommand),
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project.
    Add {
        name: String,
    },
    /// List projects by name.
    List,
}

#[derive(Subcommand)]
enum RecordCommand {
    /// Show the record cards of a project.
    List {
        /// Project id or exact name (optional when only one project exists).
        #[arg(short, long)]
        project: Option<String>,

        /// `all` or one of context|issue|inquiry|product.
        #[arg(short = 't', long = "type", default_value = "all", value_parser = parse_filter)]
        filter: TypeFilter,

        /// Case-insensitive search over title, description and content.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Also search tags.
        #[arg(long)]
        tags: bool,
    },
    /// Add a record.
    Add {
        #[arg(short, long)]
        project: Option<String>,

        #[arg(short = 't', long = "type", default_value = "context", value_parser = parse_kind)]
        kind: RecordType,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        content: String,

        /// Comma-separated tags.
        #[arg(long, default_value = "")]
        tags: String,

        /// Product price.
        #[arg(long, default_value = "")]
        price: String,

        /// Issue priority (low|medium|high|critical).
        #[arg(long, value_parser = parse_priority)]
        priority: Option<IssuePriority>,
    },
    /// Delete a record after confirmation.
    Delete {
        id: Uuid,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Reads the answer to a yes/no question from stdin.
struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        std::io::stderr().flush().ok();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = absolute_dir(log_dir)?;
        init_logging(&cli.log_level, &log_dir.to_string_lossy()).map_err(|err| anyhow!(err))?;
    }

    match cli.command {
        Commands::Ping => {
            println!("knowbase_core ping={}", knowbase_core::ping());
            println!("knowbase_core version={}", knowbase_core::core_version());
            Ok(())
        }
        Commands::Project(command) => run_project(&cli.db, command),
        Commands::Record(command) => run_record(&cli.db, command),
    }
}

fn run_project(db: &Path, command: ProjectCommand) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn)?);

    match command {
        ProjectCommand::Add { name } => {
            let project = projects.create_project(&name)?;
            println!("{}  {}", project.id, project.name);
        }
        ProjectCommand::List => {
            let listed = projects.projects()?;
            if listed.is_empty() {
                println!("No projects.");
            }
            for project in listed {
                println!("{}  {}", project.id, project.name);
            }
        }
    }
    Ok(())
}

fn run_record(db: &Path, command: RecordCommand) -> Result<()> {
    let conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let projects = ProjectService::new(SqliteProjectRepository::try_new(&conn)?);
    let records = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    match command {
        RecordCommand::List {
            project,
            filter,
            query,
            tags,
        } => {
            let mut screen = KnowledgeBaseScreen::new().with_tag_search(tags);
            screen.sync_projects(&projects)?;
            select(&mut screen, project.as_deref())?;
            screen.set_filter(filter);
            screen.set_search_term(query);
            screen.refresh(&records);
            print_content(&screen)
        }
        RecordCommand::Add {
            project,
            kind,
            title,
            description,
            content,
            tags,
            price,
            priority,
        } => {
            let mut screen = KnowledgeBaseScreen::new();
            screen.sync_projects(&projects)?;
            select(&mut screen, project.as_deref())?;
            screen.open_add_dialog();
            let form = screen.form_mut();
            form.kind = kind;
            form.title = title;
            form.description = description;
            form.content = content;
            form.tags = tags;
            form.price = price;
            form.priority = priority;

            let outcome = screen.submit(&records);
            let message = last_notification(&mut screen);
            match outcome {
                SubmitOutcome::Created(record) => {
                    println!("{message}");
                    println!("{}", record.id);
                    Ok(())
                }
                SubmitOutcome::Invalid(_) | SubmitOutcome::Failed(_) => bail!(message),
            }
        }
        RecordCommand::Delete { id, yes } => {
            let record = records
                .get_record(id)?
                .ok_or_else(|| anyhow!("record not found: {id}"))?;

            let mut screen = KnowledgeBaseScreen::new();
            screen.sync_projects(&projects)?;
            screen.select_project(record.project_id);
            screen.refresh(&records);

            let outcome = if yes {
                screen.delete_record(id, &records, &mut |_: &str| true)
            } else {
                screen.delete_record(id, &records, &mut StdinPrompt)
            };
            match outcome {
                DeleteOutcome::Deleted => {
                    info!("event=cli_delete module=cli status=ok");
                    println!("{}", last_notification(&mut screen));
                    Ok(())
                }
                DeleteOutcome::Cancelled => {
                    println!("Cancelled.");
                    Ok(())
                }
                DeleteOutcome::Unknown => bail!("record not found: {id}"),
                DeleteOutcome::Failed(_) => bail!(last_notification(&mut screen)),
            }
        }
    }
}

/// Selects `project` by id or exact name; `None` keeps the screen's auto-selection.
fn select(screen: &mut KnowledgeBaseScreen, project: Option<&str>) -> Result<()> {
    let Some(wanted) = project else {
        if screen.selected_project().is_none() {
            bail!("{NO_PROJECT_LABEL}: pass --project <id|name>");
        }
        return Ok(());
    };
    let id = find_project(screen.projects(), wanted)
        .ok_or_else(|| anyhow!("project not found: {wanted}"))?;
    screen.select_project(id);
    Ok(())
}

fn find_project(projects: &[Project], wanted: &str) -> Option<Uuid> {
    let wanted = wanted.trim();
    if let Ok(id) = Uuid::parse_str(wanted) {
        return projects
            .iter()
            .find(|project| project.id == id)
            .map(|project| project.id);
    }
    projects
        .iter()
        .find(|project| project.name == wanted)
        .map(|project| project.id)
}

fn print_content(screen: &KnowledgeBaseScreen) -> Result<()> {
    println!("# {}", screen.selected_project_name());
    match screen.content() {
        ScreenContent::Loading { .. } => println!("Loading..."),
        ScreenContent::FetchError { message, .. } => {
            bail!("{message} ({RETRY_LABEL} with the same command)")
        }
        ScreenContent::Empty { empty } => {
            println!("{}", empty.title);
            println!("{}", empty.message);
        }
        ScreenContent::Cards { cards } => {
            for card in &cards {
                print_card(card);
            }
        }
    }
    Ok(())
}

fn print_card(card: &CardView) {
    println!("[{}] {}  ({})  {}", card.badge, card.title, card.date, card.id);
    if let Some(description) = &card.description {
        println!("    {description}");
    }
    match &card.detail {
        CardDetail::Issue {
            priority,
            reference,
            report_count,
        } => {
            let priority = priority
                .as_ref()
                .map_or_else(String::new, |badge| format!("{} ", badge.label));
            println!("    {priority}{reference}  {report_count} reports");
        }
        CardDetail::Product { price: Some(price) } => println!("    {price}"),
        CardDetail::Inquiry { channel } => println!("    {channel}"),
        CardDetail::Product { price: None } | CardDetail::Plain => {}
    }
    if !card.tags.is_empty() {
        let mut line = card.tags.join(", ");
        if let Some(overflow) = &card.tag_overflow {
            line.push_str(&format!(" {overflow}"));
        }
        println!("    tags: {line}");
    }
}

fn last_notification(screen: &mut KnowledgeBaseScreen) -> String {
    screen
        .drain_notifications()
        .into_iter()
        .last()
        .map(|toast| toast.message)
        .unwrap_or_default()
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot determine CWD")?;
    Ok(cwd.join(dir))
}

fn parse_filter(value: &str) -> Result<TypeFilter, String> {
    TypeFilter::parse(value).ok_or_else(|| format!("unsupported type filter `{value}`"))
}

fn parse_kind(value: &str) -> Result<RecordType, String> {
    RecordType::parse(value).ok_or_else(|| format!("unsupported record type `{value}`"))
}

fn parse_priority(value: &str) -> Result<IssuePriority, String> {
    IssuePriority::parse(value).ok_or_else(|| format!("unsupported priority `{value}`"))
}
