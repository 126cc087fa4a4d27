use async_trait::async_trait;
use reqwest::Url;

use super::token::AccessTokenResponse;
use crate::error::CrmError;
use crate::http::response::ResponseClass;

/// Mints a new access credential from the ambient refresh credential.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Result<String, CrmError>;
}

/// Calls `auth/refresh` on a client with no interception of its own.
///
/// The refresh credential is an HTTP-only cookie, so `http` must share its
/// cookie jar with the client that performed the login.
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    url: Url,
}

impl HttpTokenRefresher {
    pub const PATH: &'static str = "auth/refresh";

    pub fn new(http: reqwest::Client, base_url: &Url) -> Result<Self, CrmError> {
        let url = base_url
            .join(Self::PATH)
            .map_err(|e| CrmError::Configuration(format!("invalid refresh URL: {e}")))?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self) -> Result<String, CrmError> {
        tracing::debug!(url = %self.url, "Refreshing access token");
        let response = self.http.post(self.url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if !(200..300).contains(&status) {
            let error = CrmError::from_response(status, &body);
            let message = match &error {
                CrmError::Api { body: Some(json), .. } => {
                    json.get("message").and_then(|m| m.as_str()).map(str::to_string)
                }
                _ => None,
            };
            if ResponseClass::of(status, message.as_deref()) == ResponseClass::RefreshTokenExpired
            {
                return Err(CrmError::SessionExpired(error.message()));
            }
            return Err(error);
        }

        let parsed: AccessTokenResponse = serde_json::from_slice(&body)?;
        if parsed.access_token.trim().is_empty() {
            return Err(CrmError::Authentication(
                "refresh response carried an empty access token".into(),
            ));
        }
        Ok(parsed.access_token)
    }
}
