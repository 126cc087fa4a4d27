//! Utility modules: password generation.

pub mod password;

pub use password::generate_strong_password;
