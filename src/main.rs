//! CRM CLI binary entry point.

use clap::Parser;
use crm_client::cli::{self, AuthCommands, Cli, Commands, UsersCommands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> crm_client::error::Result<()> {
    if let Commands::GeneratePassword = cli.command {
        println!("{}", crm_client::util::generate_strong_password());
        return Ok(());
    }

    let client = cli::build_client(cli.base_url.as_deref())?;
    match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login(args) => {
                cli::auth::handle_login(client, &args.email, args.password).await
            }
            AuthCommands::Status => cli::auth::handle_status(client).await,
            AuthCommands::Logout => cli::auth::handle_logout(client).await,
        },
        Commands::Users(users_args) => match users_args.command {
            UsersCommands::List(args) => cli::users::handle_list(client, args).await,
            UsersCommands::Search(args) => cli::users::handle_search(client, &args.query).await,
            UsersCommands::Show(args) => cli::users::handle_show(client, &args.id).await,
            UsersCommands::Me => cli::users::handle_me(client).await,
        },
        Commands::Structure(args) => cli::users::handle_structure(client, args).await,
        Commands::GeneratePassword => Ok(()),
    }
}
