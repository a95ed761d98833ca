//! Per-call solver configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Options accepted by `solve` and `solve_all`
///
/// `instance_limit` of `None` runs to exhaustion; `Some(0)` returns at once;
/// `Some(n)` stops after `n` full results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    pub instance_limit: Option<usize>,
    pub accept_partials: bool,
}

impl SolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance_limit(mut self, limit: usize) -> Self {
        self.instance_limit = Some(limit);
        self
    }

    pub fn with_partials(mut self, accept_partials: bool) -> Self {
        self.accept_partials = accept_partials;
        self
    }

    /// Map the integer convention (-1 unbounded) onto options
    pub fn from_raw_limit(limit: i64, accept_partials: bool) -> Result<Self> {
        let instance_limit = match limit {
            -1 => None,
            n if n >= 0 => Some(n as usize),
            n => {
                return Err(SolverError::Configuration(format!(
                    "instance limit {} must be -1 or non-negative",
                    n
                )))
            }
        };
        Ok(Self {
            instance_limit,
            accept_partials,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SolverError::Configuration(format!("invalid solve options: {}", e)))
    }

    /// True once `count` full results reach the cap
    pub fn limit_reached(&self, count: usize) -> bool {
        matches!(self.instance_limit, Some(limit) if count >= limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_limit() {
        assert_eq!(SolveOptions::from_raw_limit(-1, false).unwrap().instance_limit, None);
        assert_eq!(SolveOptions::from_raw_limit(3, true).unwrap().instance_limit, Some(3));
        assert!(SolveOptions::from_raw_limit(-2, false).is_err());
    }

    #[test]
    fn test_from_json() {
        let options = SolveOptions::from_json(r#"{"instance_limit": 5}"#).unwrap();
        assert_eq!(options, SolveOptions::new().with_instance_limit(5));

        let options = SolveOptions::from_json(r#"{"accept_partials": true}"#).unwrap();
        assert_eq!(options.instance_limit, None);
        assert!(options.accept_partials);

        assert!(SolveOptions::from_json("{\"instance_limit\": -4}").is_err());
    }

    #[test]
    fn test_limit_reached() {
        assert!(!SolveOptions::new().limit_reached(1_000));
        assert!(SolveOptions::new().with_instance_limit(2).limit_reached(2));
        assert!(!SolveOptions::new().with_instance_limit(2).limit_reached(1));
    }
}
