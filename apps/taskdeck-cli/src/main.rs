use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use api_client::{ApiClient, AuthSignal};
use auth_session::{FileSessionStorage, SessionStore};
use runtime::{AppConfig, CliArgs};
use task_cache::{NewTask, TaskFilter, TaskPatch, TaskStore};
use tokio::sync::broadcast::error::RecvError;

/// TaskDeck - task management from the terminal
#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "TaskDeck - task management from the terminal")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email address
    Login {
        email: String,
        /// Register the email when the server does not know it yet
        #[arg(long)]
        register: bool,
    },
    /// Drop the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Work with the logged-in user's tasks
    #[command(subcommand)]
    Task(TaskCommands),
    /// Check configuration
    Check,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks, newest first
    List {
        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
        /// Filter by a case-insensitive substring of title or description
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Change a task's title or description
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Toggle a task between pending and completed
    Done { id: String },
    /// Delete a task
    Rm { id: String },
    /// Show task counts
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::debug!("TaskDeck starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Commands::Check => check_config(&config),
        command => run_command(config, command).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_command(config: AppConfig, command: Commands) -> Result<()> {
    let api = Arc::new(ApiClient::new(&config.api)?);
    let storage = Arc::new(FileSessionStorage::new(config.session_file_path()));
    let session = SessionStore::new(api.clone(), storage);
    let tasks = Arc::new(TaskStore::new(api.clone()));

    // Transport-level 401s fire this channel no matter which store made the
    // call; the terminal equivalent of a redirect to the login screen.
    let mut auth_signals = api.subscribe_auth_signals();
    tokio::spawn(async move {
        loop {
            match auth_signals.recv().await {
                Ok(AuthSignal::SessionExpired) => {
                    eprintln!("Session expired - please log in again.");
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    match command {
        Commands::Login { email, register } => login(&session, &email, register).await,
        Commands::Logout => {
            session.logout();
            tasks.clear();
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => {
            match session.current_user() {
                Some(user) => {
                    println!("{} (id {})", user.email, user.id);
                    println!("member since {}", user.created_at.format("%Y-%m-%d"));
                }
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Commands::Task(task_command) => {
            let user_id = session.current_user_id().ok_or_else(|| {
                anyhow!("Not logged in. Run `taskdeck login <email>` first.")
            })?;
            run_task_command(&tasks, &user_id, task_command).await
        }
        Commands::Check => unreachable!("handled in main"),
    }
}

async fn login(session: &SessionStore, email: &str, register: bool) -> Result<()> {
    validation::validate_login_email(email).map_err(|violation| anyhow!("{violation}"))?;

    match session.login(email).await? {
        Some(user) => println!("Logged in as {} (id {})", user.email, user.id),
        None if register => {
            let user = session.create_user(email).await?;
            println!("Registered and logged in as {} (id {})", user.email, user.id);
        }
        None => {
            println!("{email} is not registered.");
            println!("Run `taskdeck login {email} --register` to create the account.");
        }
    }
    Ok(())
}

async fn run_task_command(
    tasks: &Arc<TaskStore>,
    user_id: &str,
    command: TaskCommands,
) -> Result<()> {
    match command {
        TaskCommands::List {
            completed,
            pending,
            search,
        } => {
            let filter = if completed {
                TaskFilter::completed_only()
            } else if pending {
                TaskFilter::pending_only()
            } else {
                TaskFilter::default()
            };

            let listed = tasks.list(user_id, filter).await?;
            let shown = match search.as_deref() {
                Some(term) => tasks.search(term),
                None => listed,
            };

            if shown.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            for task in &shown {
                println!(
                    "[{}] {}  {}  ({})",
                    if task.completed { "x" } else { " " },
                    task.id,
                    task.title,
                    task.created_at.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }
        TaskCommands::Add { title, description } => {
            validation::validate_task_title(&title).map_err(|v| anyhow!("title: {v}"))?;
            validation::validate_task_description(&description)
                .map_err(|v| anyhow!("description: {v}"))?;

            let task = tasks
                .create(NewTask {
                    title,
                    description,
                    user_id: user_id.to_string(),
                })
                .await?;
            println!("Created task {} - {}", task.id, task.title);
            Ok(())
        }
        TaskCommands::Edit {
            id,
            title,
            description,
        } => {
            if title.is_none() && description.is_none() {
                return Err(anyhow!("nothing to change: pass --title and/or --description"));
            }
            if let Some(title) = &title {
                validation::validate_task_title(title).map_err(|v| anyhow!("title: {v}"))?;
            }
            if let Some(description) = &description {
                validation::validate_task_description(description)
                    .map_err(|v| anyhow!("description: {v}"))?;
            }

            let task = tasks
                .update(
                    &id,
                    TaskPatch {
                        title,
                        description,
                        completed: None,
                    },
                )
                .await?;
            println!("Updated task {} - {}", task.id, task.title);
            Ok(())
        }
        TaskCommands::Done { id } => {
            let task = tasks.get_by_id(&id).await?;
            let updated = tasks.toggle_completion(&task).await?;
            println!(
                "Task {} is now {}",
                updated.id,
                if updated.completed { "completed" } else { "pending" }
            );
            Ok(())
        }
        TaskCommands::Rm { id } => {
            tasks.delete(&id).await?;
            println!("Deleted task {id}");
            Ok(())
        }
        TaskCommands::Stats => {
            tasks.list(user_id, TaskFilter::default()).await?;
            println!("total:     {}", tasks.total_count());
            println!("completed: {}", tasks.completed_count());
            println!("pending:   {}", tasks.pending_count());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_login_with_register_flag() {
        let cli = Cli::try_parse_from(["taskdeck", "login", "a@b.co", "--register"]).unwrap();
        match cli.command {
            Commands::Login { email, register } => {
                assert_eq!(email, "a@b.co");
                assert!(register);
            }
            _ => panic!("expected login command"),
        }
    }

    #[test]
    fn parses_task_list_filters() {
        let cli =
            Cli::try_parse_from(["taskdeck", "task", "list", "--pending", "--search", "milk"])
                .unwrap();
        match cli.command {
            Commands::Task(TaskCommands::List {
                completed,
                pending,
                search,
            }) => {
                assert!(!completed);
                assert!(pending);
                assert_eq!(search.as_deref(), Some("milk"));
            }
            _ => panic!("expected task list command"),
        }
    }

    #[test]
    fn completed_and_pending_filters_conflict() {
        let result =
            Cli::try_parse_from(["taskdeck", "task", "list", "--completed", "--pending"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_flag_counts_occurrences() {
        let cli = Cli::try_parse_from(["taskdeck", "-vv", "whoami"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
