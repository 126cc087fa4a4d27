use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::codes;
use crate::error::CrmError;

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CrmError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `message` field of a JSON error body, if it is a plain string.
    pub fn error_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        value.get("message")?.as_str().map(str::to_string)
    }

    pub fn classify(&self) -> ResponseClass {
        ResponseClass::of(self.status.as_u16(), self.error_message().as_deref())
    }

    pub fn into_error(self) -> CrmError {
        CrmError::from_response(self.status.as_u16(), &self.body)
    }
}

/// How the response stage treats a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    /// The refresh credential is gone; the session cannot be recovered.
    RefreshTokenExpired,
    /// The access credential was rejected; a refresh may recover it.
    AccessTokenInvalid,
    ServerError,
    OtherError,
}

impl ResponseClass {
    /// Among error responses, refresh expiry wins over every other signal, so
    /// a 401 carrying the refresh-expired message never triggers a refresh.
    pub fn of(status: u16, message: Option<&str>) -> Self {
        if status < 400 {
            return Self::Success;
        }
        if status == codes::REFRESH_TOKEN_EXPIRED
            || message == Some(codes::REFRESH_TOKEN_EXPIRED_MESSAGE)
        {
            return Self::RefreshTokenExpired;
        }
        if status == codes::ACCESS_TOKEN_INVALID
            || status == codes::UNAUTHORIZED
            || message == Some(codes::ACCESS_TOKEN_INVALID_MESSAGE)
        {
            return Self::AccessTokenInvalid;
        }
        if status == codes::SERVER_ERROR {
            return Self::ServerError;
        }
        Self::OtherError
    }
}
