//! Command-line front end for the todo list core.
//!
//! # Responsibility
//! - Load configuration and pick the persistence backend once at startup.
//! - Map subcommands onto `TodoService` use-cases and print the results.
//!
//! The session backend lives only for one process run, so it is mostly
//! useful for trying out the seeded dataset.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use todolists_core::auth::hash_password;
use todolists_core::{
    init_from_config, Backend, ListId, SessionStore, SqliteTodoStore, StoreConfig, TodoId,
    TodoPersistence, TodoService,
};

#[derive(Debug, Parser)]
#[command(name = "todolists", version, about = "Manage todo lists")]
struct Cli {
    /// User whose lists are read and changed (sqlite backend).
    #[arg(long, short, env = "TODOLISTS_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every list, open lists first.
    Lists,
    /// Show one list with its todos.
    Show { list_id: ListId },
    /// Create a list.
    NewList { title: String },
    /// Rename a list.
    Rename { list_id: ListId, title: String },
    /// Add a todo to a list.
    Add { list_id: ListId, title: String },
    /// Flip a todo between done and not done.
    Toggle { list_id: ListId, todo_id: TodoId },
    /// Mark every todo of a list done.
    Complete { list_id: ListId },
    /// Delete a todo.
    Delete { list_id: ListId, todo_id: TodoId },
    /// Delete a list and all of its todos.
    DeleteList { list_id: ListId },
    /// Check a username/password pair (sqlite backend only).
    Signin { username: String, password: String },
    /// Provision a user account (sqlite backend only).
    AddUser { username: String, password: String },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = StoreConfig::from_env()?;
    init_from_config(&config).context("failed to start logging")?;
    info!(
        "event=cli_start module=cli status=ok production={} version={}",
        config.is_production(),
        todolists_core::core_version()
    );

    check_backend(&cli.command, &config.backend)?;
    let mut sessions = SessionStore::new();
    let store: Box<dyn TodoPersistence + '_> = match &config.backend {
        Backend::Sqlite { db_path } => {
            let user = cli.user.clone().unwrap_or_default();
            let store = SqliteTodoStore::open(db_path, user)
                .with_context(|| format!("failed to open database `{}`", db_path.display()))?;
            info!(
                "event=store_open module=cli status=ok backend=sqlite db_path={}",
                store.db_path().display()
            );
            if let Command::AddUser { username, password } = &cli.command {
                let created = store.register_user(username, &hash_password(password)?)?;
                if !created {
                    bail!("user `{username}` already exists");
                }
                println!("ok");
                return Ok(());
            }
            if store.username().is_empty() {
                bail!("--user is required for the sqlite backend");
            }
            Box::new(store)
        }
        Backend::Session => {
            let id = sessions.create_session();
            let store = sessions
                .open_session(id)
                .context("freshly created session is missing")?;
            Box::new(store)
        }
    };

    run(TodoService::new(store), cli.command)
}

fn run<P: TodoPersistence>(mut service: TodoService<P>, command: Command) -> Result<()> {
    match command {
        Command::Lists => print_json(&service.list_overview()?)?,
        Command::Show { list_id } => print_json(&service.list_detail(list_id)?)?,
        Command::NewList { title } => {
            service.create_list(&title)?;
            println!("ok");
        }
        Command::Rename { list_id, title } => {
            service.rename_list(list_id, &title)?;
            println!("ok");
        }
        Command::Add { list_id, title } => {
            service.add_todo(list_id, &title)?;
            println!("ok");
        }
        Command::Toggle { list_id, todo_id } => print_json(&service.toggle_todo(list_id, todo_id)?)?,
        Command::Complete { list_id } => {
            service.complete_list(list_id)?;
            println!("ok");
        }
        Command::Delete { list_id, todo_id } => {
            service.delete_todo(list_id, todo_id)?;
            println!("ok");
        }
        Command::DeleteList { list_id } => {
            service.delete_list(list_id)?;
            println!("ok");
        }
        Command::Signin { username, password } => {
            if service.sign_in(&username, &password)? {
                println!("Welcome, {}!", username.trim());
            } else {
                bail!("invalid credentials");
            }
        }
        Command::AddUser { .. } => bail!("add-user is handled before the store is opened"),
    }
    Ok(())
}

/// Session stores carry no accounts, so account commands need sqlite.
fn check_backend(command: &Command, backend: &Backend) -> Result<()> {
    let uses_accounts = matches!(command, Command::AddUser { .. } | Command::Signin { .. });
    if uses_accounts && *backend == Backend::Session {
        bail!("accounts live in the sqlite backend; set TODOLISTS_BACKEND=sqlite");
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
