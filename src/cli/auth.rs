//! CLI auth command handlers for login, status, and logout.

use std::io::BufRead;

use crate::auth::{AuthService, LoginCredentials};
use crate::error::{CrmError, Result};
use crate::http::ApiClient;

/// Handle `crm auth login <email>`.
pub async fn handle_login(client: ApiClient, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };
    let auth = AuthService::new(client);
    auth.login(&LoginCredentials::new(email, password)).await?;

    match auth.profile().await {
        Ok(user) => println!("✅ Logged in as {} ({:?})", user.name, user.role),
        Err(e) => println!("✅ Logged in (profile unavailable: {})", e.message()),
    }
    Ok(())
}

/// Handle `crm auth status`.
pub async fn handle_status(client: ApiClient) -> Result<()> {
    let auth = AuthService::new(client);
    println!("🔐 Authentication Status\n");

    match auth.client().store().get(crate::auth::ACCESS_TOKEN_KEY)? {
        Some(credential) => {
            println!(
                "  Credential: ✅ stored {}",
                credential.saved_at.format("%Y-%m-%d %H:%M")
            );
            match auth.profile().await {
                Ok(user) => println!("  User: {} ({:?})", user.name, user.role),
                Err(e) if e.is_session_fatal() => println!("  User: ❌ session expired"),
                Err(e) => println!("  User: ⚠️  {}", e.message()),
            }
        }
        None => println!("  Credential: ❌ Not logged in"),
    }
    println!("  Backend: {}", auth.client().base_url());
    Ok(())
}

/// Handle `crm auth logout`.
pub async fn handle_logout(client: ApiClient) -> Result<()> {
    let auth = AuthService::new(client);
    if !auth.is_authenticated()? {
        println!("Not logged in.");
        return Ok(());
    }
    auth.logout().await?;
    println!("✅ Logged out");
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(CrmError::InvalidArgument("no password provided".into()));
    }
    Ok(password)
}
