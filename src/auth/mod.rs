//! Session credentials: storage, refresh, and the login/logout service.

pub mod refresher;
pub mod service;
pub mod store;
pub mod token;

pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use service::AuthService;
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
};
pub use token::{AccessTokenResponse, AuthUser, LoginCredentials, SessionRole, StoredCredential};
