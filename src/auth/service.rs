use super::store::ACCESS_TOKEN_KEY;
use super::token::{AccessTokenResponse, AuthUser, LoginCredentials};
use crate::error::{CrmError, Result};
use crate::http::{ApiClient, ApiRequest};

const AUTH_BASE: &str = "auth";

/// Login, logout and session status on top of an [`ApiClient`].
///
/// All I/O decisions (printing, prompting, exit codes) belong to the caller.
/// `AuthService` only returns typed results and errors.
///
/// # Example
/// ```no_run
/// use crm_client::auth::{AuthService, LoginCredentials};
/// use crm_client::config::CrmConfig;
/// use crm_client::http::ApiClient;
///
/// # async fn example() -> crm_client::error::Result<()> {
/// let client = ApiClient::builder(CrmConfig::from_env()).build()?;
/// let auth = AuthService::new(client);
/// auth.login(&LoginCredentials::new("lead@example.com", "s3cret")).await?;
/// let me = auth.profile().await?;
/// println!("signed in as {}", me.name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Exchange email/password for an access credential and store it.
    ///
    /// The backend sets the refresh credential as a cookie on the shared jar.
    /// A rejected login is returned as-is: it never triggers a token refresh.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AccessTokenResponse> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(CrmError::InvalidArgument(
                "email and password are required".into(),
            ));
        }
        let request = ApiRequest::post(format!("{AUTH_BASE}/login")).json(credentials)?;
        let response: AccessTokenResponse = self.client.execute_direct(request).await?.json()?;
        self.client
            .store()
            .set(ACCESS_TOKEN_KEY, &response.access_token)?;
        tracing::info!(email = %credentials.email, "Logged in");
        Ok(response)
    }

    /// End the session on the backend, then drop local credentials.
    ///
    /// Local credentials are kept when the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        self.client
            .execute(ApiRequest::post(format!("{AUTH_BASE}/logout")))
            .await?;
        self.client.store().clear_session()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// The signed-in user.
    pub async fn profile(&self) -> Result<AuthUser> {
        self.client
            .execute_json(ApiRequest::get(format!("{AUTH_BASE}/profile")))
            .await
    }

    /// Force a credential refresh (joins one already in flight).
    pub async fn refresh(&self) -> Result<String> {
        self.client.refresh_access_token().await
    }

    /// Whether an access credential is stored. Says nothing about validity.
    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.client.store().access_token()?.is_some())
    }
}
