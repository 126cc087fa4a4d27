//! Authenticated HTTP plumbing: request envelopes, response classification,
//! single-flight token refresh, and the client tying them together.

pub mod client;
pub mod codes;
pub mod coordinator;
pub mod hooks;
pub mod request;
pub mod response;

pub use client::{ApiClient, ApiClientBuilder};
pub use coordinator::{PendingRefresh, RefreshFailure, RefreshGuard, RefreshRole, TokenRefreshCoordinator};
pub use hooks::{LoggingNavigator, LoggingNotifier, Navigator, Notifier};
pub use request::{ApiRequest, RequestEnvelope};
pub use response::{ApiResponse, ResponseClass};
