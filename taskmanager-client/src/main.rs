//! # Task Manager Client
//!
//! Terminal front end for the Task Manager API. Every command loads the task
//! list, applies one action through the view model, and prints the result.
//!
//! ## Usage
//!
//! ```bash
//! taskmanager list
//! taskmanager add "Buy milk"
//! taskmanager toggle 1
//! taskmanager edit 1 "Buy oat milk"
//! taskmanager rm 1
//! taskmanager --base-url http://tasks.internal:8080 users
//! ```

use clap::{Parser, Subcommand};
use taskmanager_client::{
    api::{HttpClient, TaskApi},
    view::{BannerKind, Key, TaskView},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "taskmanager")]
#[command(about = "Manage tasks on a Task Manager server", long_about = None)]
#[command(version)]
struct Cli {
    /// Server base URL
    #[arg(long, env = "TASKMANAGER_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List tasks
    List,

    /// Create a task
    Add {
        /// Task title (1-200 characters)
        title: String,
    },

    /// Flip a task between done and not done
    Toggle {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Rename a task
    Edit {
        #[arg(value_name = "ID")]
        id: i64,

        /// New title
        title: String,
    },

    /// Delete a task
    Rm {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// List users with their tasks
    Users,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmanager_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = HttpClient::new(&cli.base_url)?;
    tracing::debug!(base_url = client.base_url(), "Using server");

    match cli.command {
        Command::Users => print_users(&client).await,
        command => run_task_command(TaskView::new(client), command).await,
    }
}

async fn print_users(client: &HttpClient) -> anyhow::Result<()> {
    for user in client.list_users().await? {
        println!("#{} {} ({} tasks)", user.id, user.email, user.tasks.len());
        for task in &user.tasks {
            println!("    [{}] #{} {}", mark(task.is_done), task.id, task.title);
        }
    }
    Ok(())
}

async fn run_task_command<A: TaskApi>(mut view: TaskView<A>, command: Command) -> anyhow::Result<()> {
    if !view.load().await {
        return finish(&view, false);
    }

    let ok = match command {
        Command::List | Command::Users => true,
        Command::Add { title } => view.create(&title).await,
        Command::Toggle { id } => view.toggle(id).await,
        Command::Edit { id, title } => {
            if view.begin_edit(id) {
                view.set_edit_text(title);
                view.handle_key(Key::Enter).await;
                view.editing().is_none()
            } else {
                eprintln!("No task with ID {}", id);
                false
            }
        }
        Command::Rm { id } => view.delete(id).await,
    };

    finish(&view, ok)
}

fn mark(done: bool) -> char {
    if done {
        'x'
    } else {
        ' '
    }
}

/// Prints the banner and task list, failing the process if the action failed
fn finish<A: TaskApi>(view: &TaskView<A>, ok: bool) -> anyhow::Result<()> {
    if let Some(banner) = view.banner() {
        match banner.kind {
            BannerKind::Success => println!("{}", banner.message),
            BannerKind::Error => eprintln!("error: {}", banner.message),
        }
    }

    if view.is_loaded() {
        for task in view.tasks() {
            println!("[{}] #{} {}", mark(task.is_done), task.id, task.title);
        }
        let summary = view.summary();
        println!("Total: {} | Completed: {}", summary.total, summary.completed);
    }

    if ok {
        Ok(())
    } else {
        anyhow::bail!("command failed")
    }
}
