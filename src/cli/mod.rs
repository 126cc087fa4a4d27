//! CLI entry point for the CRM client.

pub mod auth;
pub mod users;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::CrmConfig;
use crate::error::Result;
use crate::http::{ApiClient, Navigator};

/// CRM command-line client
#[derive(Parser, Debug)]
#[command(name = "crm", version, about = "Employee-records CRM command-line client")]
pub struct Cli {
    /// Backend base URL (overrides CRM_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthArgs),
    /// Employee records
    Users(UsersArgs),
    /// Show departments, positions and grades
    Structure(StructureArgs),
    /// Print a freshly generated strong password
    GeneratePassword,
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

/// Auth subcommands for login, status, and logout.
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in with email and password
    Login(LoginArgs),
    /// Show whether a credential is stored and who it belongs to
    Status,
    /// Log out and remove stored credentials
    Logout,
}

/// Arguments for `crm auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account email
    pub email: String,

    /// Password (read from stdin when omitted)
    #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the `users` subcommand group.
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// List users, optionally filtered
    List(ListArgs),
    /// Full-text search
    Search(SearchArgs),
    /// Show one user's page
    Show(ShowArgs),
    /// Show the signed-in user's profile
    Me,
}

#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub grade: Option<String>,
    /// Work schedule code (default, shift_schedule)
    #[arg(long)]
    pub schedule: Option<String>,
    /// Shift preference code (morning, day, night, mixed)
    #[arg(long)]
    pub shift: Option<String>,
    #[arg(long)]
    pub page: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query
    pub query: String,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// User id
    pub id: String,
}

#[derive(Parser, Debug, Default)]
pub struct StructureArgs {
    /// Only show positions of this department
    #[arg(long)]
    pub department: Option<String>,
    /// Only show grades of this position
    #[arg(long)]
    pub position: Option<String>,
}

/// Redirects become a hint: there is no login page to navigate to.
#[derive(Debug, Default)]
pub struct CliNavigator;

impl Navigator for CliNavigator {
    fn redirect_to_login(&self, _login_path: &str) {
        eprintln!("Session expired. Run `crm auth login <email>` to sign in again.");
    }
}

/// Build a client from env config plus CLI overrides.
pub fn build_client(base_url: Option<&str>) -> Result<ApiClient> {
    let mut config = CrmConfig::from_env();
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    ApiClient::builder(config)
        .navigator(Arc::new(CliNavigator))
        .build()
}
