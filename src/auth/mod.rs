pub mod extractor;
pub mod jwt;
pub mod password;

/// Cookie carrying the dashboard session token.
pub const ADMIN_COOKIE: &str = "admin_token";
