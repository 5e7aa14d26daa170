//! Client Configuration
//!
//! The backend address is ambiguous in local setups, so the client keeps an
//! ordered list of candidate origins: the compile-time configured origin
//! first, then the fixed development defaults.

/// Configured at build time, the trunk analogue of a `.env` entry.
const CONFIGURED_ORIGIN: Option<&str> = option_env!("TASKSPHERE_API_URL");

const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:8081", "http://localhost:8080"];

/// Storage key for the persisted session token.
pub const TOKEN_KEY: &str = "token";

/// Candidate origins in probe order: configured origin (if any) first, then
/// the defaults. Trailing slashes are stripped, duplicates and empty entries
/// dropped, order preserved. Never empty.
pub fn api_candidates() -> Vec<String> {
    candidates_from(CONFIGURED_ORIGIN)
}

fn candidates_from(configured: Option<&str>) -> Vec<String> {
    let mut bases = Vec::new();
    for origin in configured.into_iter().chain(DEFAULT_ORIGINS) {
        let origin = origin.trim().trim_end_matches('/');
        if !origin.is_empty() && !bases.iter().any(|b| b == origin) {
            bases.push(origin.to_string());
        }
    }
    bases
}
