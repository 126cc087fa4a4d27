//! Authenticated HTTP client with transparent access-token refresh.

use std::fmt;
use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use super::coordinator::{RefreshFailure, RefreshRole, TokenRefreshCoordinator};
use super::hooks::{LoggingNavigator, LoggingNotifier, Navigator, Notifier};
use super::request::{ApiRequest, RequestEnvelope};
use super::response::{ApiResponse, ResponseClass};
use crate::auth::refresher::{HttpTokenRefresher, TokenRefresher};
use crate::auth::store::{CredentialStore, FileCredentialStore, ACCESS_TOKEN_KEY};
use crate::config::CrmConfig;
use crate::error::{CrmError, Result};

/// What the response stage decided for one response.
enum Disposition {
    Done(Result<ApiResponse>),
    Refresh,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    login_path: String,
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    coordinator: TokenRefreshCoordinator,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

/// HTTP client for the CRM backend.
///
/// Every call attaches the stored bearer credential. When the backend rejects
/// it, the client refreshes once (coalescing concurrent failures into a single
/// refresh call) and replays the request. If the session cannot be recovered,
/// local credentials are cleared and the [`Navigator`] is asked to show the
/// login view.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use crm_client::auth::MemoryCredentialStore;
/// use crm_client::config::CrmConfig;
/// use crm_client::http::{ApiClient, ApiRequest};
///
/// # async fn example() -> crm_client::error::Result<()> {
/// let client = ApiClient::builder(CrmConfig::from_env())
///     .credential_store(Arc::new(MemoryCredentialStore::new()))
///     .build()?;
/// let response = client.execute(ApiRequest::get("users")).await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("login_path", &self.inner.login_path)
            .field("refreshing", &self.inner.coordinator.is_refreshing())
            .finish()
    }
}

impl ApiClient {
    pub fn builder(config: CrmConfig) -> ApiClientBuilder {
        ApiClientBuilder::new(config)
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.inner.login_path
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    pub fn coordinator(&self) -> &TokenRefreshCoordinator {
        &self.inner.coordinator
    }

    /// Issue a request through both interception stages.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut envelope = RequestEnvelope::new(request);
        let mut bearer: Option<String> = None;
        loop {
            let response = self.send(envelope.request(), bearer.as_deref()).await?;
            match self.disposition(&envelope, response) {
                Disposition::Done(result) => return result,
                Disposition::Refresh => {
                    envelope.mark_retried();
                    bearer = Some(self.refresh_access_token().await?);
                }
            }
        }
    }

    /// Issue a request and decode a JSON body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.json()
    }

    /// Issue a request with the bearer attached but without the response
    /// stage: failures are returned as-is and never trigger a refresh.
    pub async fn execute_direct(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.send(&request, None).await?;
        if response.status.as_u16() >= 400 {
            return Err(response.into_error());
        }
        Ok(response)
    }

    /// Obtain a fresh access credential, joining an in-flight refresh if one
    /// is running. On failure the session is ended.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let guard = match self.inner.coordinator.begin_refresh() {
            RefreshRole::Waiter(pending) => {
                tracing::debug!("Waiting on in-flight token refresh");
                return pending
                    .wait()
                    .await
                    .map_err(|failure| CrmError::SessionExpired(failure.to_string()));
            }
            RefreshRole::Leader(guard) => guard,
        };

        match self.inner.refresher.refresh().await {
            Ok(token) => {
                if let Err(e) = self.inner.store.set(ACCESS_TOKEN_KEY, &token) {
                    tracing::warn!(error = %e, "Failed to persist refreshed access token");
                }
                let waiters = guard.settle(Ok(token.clone()));
                tracing::info!(waiters, "Access token refreshed");
                Ok(token)
            }
            Err(error) => {
                let waiters = guard.settle(Err(RefreshFailure::Failed(error.message())));
                tracing::warn!(waiters, error = %error, "Access token refresh failed");
                self.end_session();
                Err(CrmError::SessionExpired(error.message()))
            }
        }
    }

    /// Clear local credentials and send the user to the login view.
    pub fn end_session(&self) {
        if let Err(e) = self.inner.store.clear_session() {
            tracing::warn!(error = %e, "Failed to clear stored credentials");
        }
        self.inner.navigator.redirect_to_login(&self.inner.login_path);
    }

    fn disposition(&self, envelope: &RequestEnvelope, response: ApiResponse) -> Disposition {
        let class = response.classify();
        let status = response.status.as_u16();
        match class {
            ResponseClass::Success => Disposition::Done(Ok(response)),
            ResponseClass::RefreshTokenExpired => {
                tracing::warn!(status, path = %envelope.request().path, "Refresh token expired");
                let error = response.into_error();
                self.end_session();
                Disposition::Done(Err(CrmError::SessionExpired(error.message())))
            }
            ResponseClass::AccessTokenInvalid if envelope.is_retried() => {
                tracing::warn!(
                    status,
                    path = %envelope.request().path,
                    "Replayed request rejected again"
                );
                self.end_session();
                Disposition::Done(Err(response.into_error()))
            }
            ResponseClass::AccessTokenInvalid => Disposition::Refresh,
            ResponseClass::ServerError => {
                let error = response.into_error();
                self.inner.notifier.notify_server_error(status, &error.message());
                Disposition::Done(Err(error))
            }
            ResponseClass::OtherError => Disposition::Done(Err(response.into_error())),
        }
    }

    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder = self.authorize(builder, bearer);

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "Response received"
        );
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Request stage: attach `Authorization: Bearer ...` when a credential is
    /// known. An explicit `bearer` wins over the stored one.
    fn authorize(&self, builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        let token = match bearer {
            Some(token) => Some(token.to_string()),
            None => match self.inner.store.access_token() {
                Ok(token) => token,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stored access token");
                    None
                }
            },
        };
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CrmError::InvalidArgument(format!("invalid request path {path:?}: {e}")))
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: CrmConfig,
    store: Option<Arc<dyn CredentialStore>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClientBuilder {
    pub fn new(config: CrmConfig) -> Self {
        Self {
            config,
            store: None,
            refresher: None,
            navigator: Arc::new(LoggingNavigator),
            notifier: Arc::new(LoggingNotifier),
        }
    }

    /// Defaults to a [`FileCredentialStore`] under the configured directory.
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Defaults to [`HttpTokenRefresher`] sharing this client's cookie jar.
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let base_url = self.config.parsed_base_url()?;
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .timeout(self.config.timeout())
            .cookie_provider(jar.clone())
            .build()?;

        let refresher = match self.refresher {
            Some(refresher) => refresher,
            None => {
                let refresh_http = reqwest::Client::builder()
                    .timeout(self.config.timeout())
                    .cookie_provider(jar)
                    .build()?;
                Arc::new(HttpTokenRefresher::new(refresh_http, &base_url)?)
            }
        };
        let store = self.store.unwrap_or_else(|| {
            Arc::new(FileCredentialStore::new(
                self.config.credentials_dir().clone(),
            ))
        });

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                login_path: self.config.login_path().to_string(),
                store,
                refresher,
                coordinator: TokenRefreshCoordinator::new(),
                navigator: self.navigator,
                notifier: self.notifier,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryCredentialStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRefresher {
        calls: AtomicUsize,
        outcome: std::result::Result<&'static str, u16>,
    }

    #[async_trait::async_trait]
    impl TokenRefresher for CountingRefresher {
        async fn refresh(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(token) => Ok(token.to_string()),
                Err(status) => Err(CrmError::api(status, "refresh rejected")),
            }
        }
    }

    fn client_with(
        store: Arc<MemoryCredentialStore>,
        refresher: Arc<CountingRefresher>,
    ) -> ApiClient {
        ApiClient::builder(CrmConfig::new().with_base_url("http://127.0.0.1:9"))
            .credential_store(store)
            .refresher(refresher)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn refresh_access_token_persists_new_token() {
        let store = Arc::new(MemoryCredentialStore::with_access_token("T1"));
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
            outcome: Ok("T2"),
        });
        let client = client_with(store.clone(), refresher.clone());

        assert_eq!(client.refresh_access_token().await.unwrap(), "T2");
        assert_eq!(store.access_token().unwrap().as_deref(), Some("T2"));
        assert_eq!(refresher.calls.load(Ordering::SeqCst), 1);
        assert!(!client.coordinator().is_refreshing());
    }

    #[tokio::test]
    async fn failed_refresh_clears_session() {
        let store = Arc::new(MemoryCredentialStore::with_access_token("T1"));
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
            outcome: Err(499),
        });
        let client = client_with(store.clone(), refresher);

        let err = client.refresh_access_token().await.unwrap_err();
        assert!(err.is_session_fatal());
        assert!(store.access_token().unwrap().is_none());
        assert!(!client.coordinator().is_refreshing());
    }

    #[test]
    fn url_for_joins_relative_paths() {
        let store = Arc::new(MemoryCredentialStore::new());
        let refresher = Arc::new(CountingRefresher {
            calls: AtomicUsize::new(0),
            outcome: Ok("T"),
        });
        let client = client_with(store, refresher);
        assert_eq!(
            client.url_for("/users/search").unwrap().as_str(),
            "http://127.0.0.1:9/users/search"
        );
        assert_eq!(
            client.url_for("company/structure").unwrap().as_str(),
            "http://127.0.0.1:9/company/structure"
        );
    }
}
