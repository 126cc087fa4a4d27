//! Status codes and message signals the backend uses for auth failures.

/// The access credential was rejected (custom code).
pub const ACCESS_TOKEN_INVALID: u16 = 498;

/// The refresh credential itself is invalid or expired (custom code).
pub const REFRESH_TOKEN_EXPIRED: u16 = 499;

pub const UNAUTHORIZED: u16 = 401;

pub const SERVER_ERROR: u16 = 500;

// String signals are brittle; they should give way to stable error codes once
// the backend provides them.
pub const REFRESH_TOKEN_EXPIRED_MESSAGE: &str = "Invalid or expired refresh token";
pub const ACCESS_TOKEN_INVALID_MESSAGE: &str = "Could not validate credentials";
