//! Convenience re-exports for common use.

pub use crate::api::{CompanyStructure, FindUsersDto, User, UserProfile, UsersApi};
pub use crate::auth::{
    AuthService, CredentialStore, FileCredentialStore, LoginCredentials, MemoryCredentialStore,
};
pub use crate::config::CrmConfig;
pub use crate::error::{CrmError, ErrorCategory, Result};
pub use crate::http::{ApiClient, ApiRequest, ApiResponse, Navigator, Notifier};
