use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use std::path::{Path, PathBuf};
use todostore::{Config, Task, TaskStore, codec, factorial};
use tracing::Level;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Single-user task tracker backed by a flat text file")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Task file to use (default: from config, else ./todo.txt)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/todostore/config.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        description: String,
        due_date: String,
    },

    /// List tasks
    List {
        /// Only show tasks that are not completed
        #[arg(long)]
        pending: bool,

        /// Print tasks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark task N (1-based) as completed
    Done { number: usize },

    /// Remove task N (1-based)
    Remove { number: usize },

    /// Compute n!
    Factorial { n: u32 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let file = cli.file.as_deref();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Add { description, due_date } => {
            let (path, mut store) = open_store(file, config)?;
            store.add(&description, &due_date)?;
            save_store(&store, &path)?;
            println!("Added task {}", store.size());
        }
        Commands::List { pending, json } => {
            let (_, store) = open_store(file, config)?;
            if json {
                let tasks: Vec<&Task> = store.list().iter().filter(|t| !pending || !t.completed).collect();
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print_tasks(&store, pending);
            }
        }
        Commands::Done { number } => {
            let (path, mut store) = open_store(file, config)?;
            store.mark_completed(to_index(number, &store)?)?;
            save_store(&store, &path)?;
            println!("Marked task {} as completed", number);
        }
        Commands::Remove { number } => {
            let (path, mut store) = open_store(file, config)?;
            let removed = store.remove(to_index(number, &store)?)?;
            save_store(&store, &path)?;
            println!("Removed task {}: {}", number, removed.description);
        }
        Commands::Factorial { n } => {
            println!("Factorial of {} is: {}", n, factorial(n)?);
        }
    }

    Ok(())
}

/// Resolve the task file and load it into a store
///
/// `--file` wins over the config file's `file` key.
fn open_store(file: Option<&Path>, config: Option<&Path>) -> Result<(PathBuf, TaskStore)> {
    let config = Config::resolve(config)?;
    let path = file.map(Path::to_path_buf).unwrap_or(config.file);

    let decoded = codec::load(&path).wrap_err("Failed to load tasks")?;
    for skipped in &decoded.skipped {
        eprintln!("{} {}: {}", "warning:".yellow().bold(), path.display(), skipped);
    }

    let store = TaskStore::from_tasks(decoded.tasks, config.initial_capacity);
    Ok((path, store))
}

fn save_store(store: &TaskStore, path: &Path) -> Result<()> {
    codec::save(store, path).wrap_err("Failed to save tasks")
}

/// Convert a 1-based task number into a store index
fn to_index(number: usize, store: &TaskStore) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| eyre!("Task numbers start at 1 (store holds {})", store.size()))
}

fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed
        && NaiveDate::parse_from_str(task.due_date.as_str(), "%Y-%m-%d")
            .map(|due| due < today)
            .unwrap_or(false)
}

fn print_tasks(store: &TaskStore, pending_only: bool) {
    if store.is_empty() {
        println!("No tasks.");
        return;
    }

    let today = Local::now().date_naive();
    for (i, task) in store.list().iter().enumerate() {
        if pending_only && task.completed {
            continue;
        }

        let status = if task.completed {
            task.status_label().green()
        } else {
            task.status_label().yellow()
        };
        let due = if is_overdue(task, today) {
            format!("{} (overdue)", task.due_date).red().to_string()
        } else {
            task.due_date.to_string()
        };

        println!("{}. {} (Due: {}) [{}]", i + 1, task.description, due, status);
    }
}
