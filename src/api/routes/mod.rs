//! API Routes
//!
//! Route handlers organized by functionality.

pub mod collections;
pub mod export;
pub mod health;
pub mod metrics;

use axum::http::HeaderMap;

/// Header naming the caller whose data is read or written
pub const USER_HEADER: &str = "x-user-id";

/// Caller used when the header is absent or blank
pub const DEFAULT_USER: &str = "default-user";

/// Resolve the caller identity from request headers
pub fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_USER)
        .to_string()
}
