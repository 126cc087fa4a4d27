//! Side channels the client reports session events to.

/// Sends the user agent to the login view once the session is unrecoverable.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Best-effort, user-visible error surfacing.
pub trait Notifier: Send + Sync {
    fn notify_server_error(&self, status: u16, message: &str);
}

/// Default navigator: there is no browser to drive, so the redirect is logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::info!(login_path, "Session ended; login required");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify_server_error(&self, status: u16, message: &str) {
        tracing::warn!(status, message, "Server error");
    }
}
