//! CRM client: typed access to the employee-records backend.
//!
//! Every request goes through [`http::ApiClient`], which attaches the stored
//! bearer credential and recovers from an expired one. When the backend
//! rejects the access credential, one refresh is started and every request
//! that failed meanwhile waits for it, then replays once with the new
//! credential. A failed refresh ends the session for all of them.
//!
//! # Quick Start
//!
//! ```no_run
//! use crm_client::prelude::*;
//!
//! # async fn example() -> crm_client::error::Result<()> {
//! let client = ApiClient::builder(CrmConfig::from_env()).build()?;
//! AuthService::new(client.clone())
//!     .login(&LoginCredentials::new("lead@example.com", "s3cret"))
//!     .await?;
//!
//! let users = UsersApi::new(client).search_users("Иванов").await?;
//! println!("{} matches", users.meta.total);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod prelude;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
