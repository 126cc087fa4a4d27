//! Shared test helpers: a client wired to a mock server plus recording hooks.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use crm_client::auth::{CredentialStore, MemoryCredentialStore};
use crm_client::config::CrmConfig;
use crm_client::http::{ApiClient, Navigator, Notifier};
use serde_json::json;
use wiremock::MockServer;

/// Records every login redirect.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self, login_path: &str) {
        self.redirects.lock().unwrap().push(login_path.to_string());
    }
}

/// Records every server-error notification.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(u16, String)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(u16, String)> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_server_error(&self, status: u16, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((status, message.to_string()));
    }
}

/// A client pointed at `server`, holding `access_token` (if any) in memory.
pub struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryCredentialStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(server: &MockServer, access_token: Option<&str>) -> Self {
        let store = Arc::new(match access_token {
            Some(token) => MemoryCredentialStore::with_access_token(token),
            None => MemoryCredentialStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let client = ApiClient::builder(CrmConfig::new().with_base_url(server.uri()))
            .credential_store(store.clone())
            .navigator(navigator.clone())
            .notifier(notifier.clone())
            .build()
            .unwrap();
        Self {
            client,
            store,
            navigator,
            notifier,
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.access_token().unwrap()
    }
}

pub fn users_page(names: &[&str]) -> serde_json::Value {
    let data: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": format!("u{}", i + 1),
                "fullName": name,
                "department": "IT",
                "position": "backend",
                "grade": "middle",
                "workSchedule": "default",
                "shiftPreference": null
            })
        })
        .collect();
    json!({
        "data": data,
        "meta": { "total": names.len(), "page": 1, "limit": 10, "totalPages": 1 }
    })
}
