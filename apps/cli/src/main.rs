use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AuthService, ClientError, FileTokenStore, HttpApi, ProfileViewModel, Registration,
    SessionContext, SortColumn, TodoDraft, TodoListViewModel,
};
use shared::domain::{TodoId, TodoStatus};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::{error_text, parse_due_time, parse_status, render_list, render_profile};

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Manage your todo list from the terminal")]
struct Cli {
    /// Config file; defaults to ./todo.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        firstname: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Ask the backend whether the stored token is still valid.
    Check,
    List {
        #[arg(long)]
        sort: Option<SortColumn>,
        #[arg(long)]
        desc: bool,
    },
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TodoStatus>,
        #[arg(long, value_parser = parse_due_time)]
        due: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TodoStatus>,
        #[arg(long, value_parser = parse_due_time)]
        due: Option<String>,
    },
    Delete {
        id: String,
    },
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommand>,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Email { email: String },
    Password { password: String },
}

fn shown(err: ClientError) -> anyhow::Error {
    anyhow!(error_text(&err))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(token_path) = cli.token_path {
        settings.token_path = token_path;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let api = Arc::new(HttpApi::new(&settings.server_url).map_err(shown)?);
    debug!(
        server_url = api.server_url(),
        token_path = %settings.token_path.display(),
        "settings loaded"
    );
    let session = SessionContext::new(Arc::new(FileTokenStore::new(&settings.token_path)));
    let auth = AuthService::new(api.clone(), session.clone());

    match cli.command {
        Command::Register {
            email,
            password,
            name,
            firstname,
        } => {
            auth.register(Registration {
                email,
                password,
                name,
                firstname,
            })
            .await
            .map_err(shown)?;
            println!("Account created; you are signed in.");
        }
        Command::Login { email, password } => {
            auth.login(&email, &password).await.map_err(shown)?;
            println!("Signed in.");
        }
        Command::Logout => {
            auth.sign_out().map_err(shown)?;
            println!("Signed out.");
        }
        Command::Check => {
            if auth.check_token().await.map_err(shown)? {
                println!("Token is valid");
            } else {
                println!("Not signed in or token expired");
            }
        }
        Command::List { sort, desc } => {
            let mut todos = TodoListViewModel::new(api, session);
            todos.fetch_all().await;
            let column = sort.unwrap_or(SortColumn::Id);
            if column != todos.sort_state().column {
                todos.sort_by(column);
            }
            if desc {
                todos.sort_by(column);
            }
            println!(
                "{}",
                render_list(&todos.view(), todos.sort_state()).trim_end()
            );
        }
        Command::Add {
            title,
            description,
            status,
            due,
        } => {
            let mut todos = TodoListViewModel::new(api, session.clone());
            if !session.is_authenticated() {
                println!("{}", render::SIGN_IN_PLACEHOLDER);
                return Ok(());
            }
            todos.open_create();
            *todos.create_draft_mut() = TodoDraft {
                title,
                description: description.unwrap_or_default(),
                status: status.unwrap_or_default(),
                due_time: due,
            };
            todos.submit_create().await.map_err(shown)?;
            println!("Todo created.");
        }
        Command::Edit {
            id,
            title,
            description,
            status,
            due,
        } => {
            let mut todos = TodoListViewModel::new(api, session.clone());
            if !session.is_authenticated() {
                println!("{}", render::SIGN_IN_PLACEHOLDER);
                return Ok(());
            }
            todos.fetch_all().await;
            todos.open_edit(&TodoId(id)).map_err(shown)?;
            if let Some(fields) = todos.edit_fields_mut() {
                if let Some(title) = title {
                    fields.title = title;
                }
                if let Some(description) = description {
                    fields.description = description;
                }
                if let Some(status) = status {
                    fields.status = status;
                }
                if let Some(due) = due {
                    fields.due_time = due;
                }
            }
            todos.submit_edit().await.map_err(shown)?;
            println!("Todo updated.");
        }
        Command::Delete { id } => {
            let mut todos = TodoListViewModel::new(api, session.clone());
            if !session.is_authenticated() {
                println!("{}", render::SIGN_IN_PLACEHOLDER);
                return Ok(());
            }
            todos.request_delete(TodoId(id));
            todos.confirm_delete().await;
            println!("Delete requested.");
        }
        Command::Profile { action } => {
            let mut profile = ProfileViewModel::new(api, session.clone());
            if !session.is_authenticated() {
                println!("{}", render::SIGN_IN_PLACEHOLDER);
                return Ok(());
            }
            profile.load().await.map_err(shown)?;
            match action.unwrap_or(ProfileCommand::Show) {
                ProfileCommand::Show => {}
                ProfileCommand::Email { email } => {
                    profile.begin_edit_email();
                    profile.set_email(email);
                    profile.save_email().await.map_err(shown)?;
                    println!("Email updated.");
                }
                ProfileCommand::Password { password } => {
                    profile.begin_edit_password();
                    profile.set_password(password);
                    profile.save_password().await.map_err(shown)?;
                    println!("Password updated.");
                }
            }
            if let Some(user) = profile.profile() {
                print!("{}", render_profile(user));
            }
        }
    }

    Ok(())
}
