//! Typed endpoints of the CRM backend.

pub mod types;
pub mod users;

pub use types::*;
pub use users::UsersApi;
