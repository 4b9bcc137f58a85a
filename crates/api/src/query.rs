//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default number of rows returned by "recent" listings.
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Upper bound on `?limit=` for "recent" listings.
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Optional `?limit=` parameter.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Clamp a client-provided limit into `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_applies_default_and_bounds() {
        assert_eq!(clamp_limit(None, 10, 100), 10);
        assert_eq!(clamp_limit(Some(0), 10, 100), 1);
        assert_eq!(clamp_limit(Some(-5), 10, 100), 1);
        assert_eq!(clamp_limit(Some(500), 10, 100), 100);
        assert_eq!(clamp_limit(Some(25), 10, 100), 25);
    }
}
