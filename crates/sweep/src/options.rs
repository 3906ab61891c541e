//! Tunables for a scan.

use crate::ScanError;

/// Branch names that are never treated as orphans unless the caller replaces
/// the pattern list.
pub const DEFAULT_EXCLUDE_PATTERNS: [&str; 5] =
    ["main", "master", "develop", "release/*", "hotfix/*"];

pub const DEFAULT_STALE_DAYS_THRESHOLD: u32 = 7;

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Upper bound on [`ScanOptions::concurrency`].
pub const MAX_CONCURRENCY: usize = 100;

/// Options shared by the classifier and the scanners.
///
/// Treated as immutable once a scan starts; the scanners hold it behind an
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Branches without a pull request are `stale` once this many whole days
    /// have passed since their last commit.
    pub stale_days_threshold: u32,
    /// Report branches without a pull request that are not yet stale.
    pub include_recent_no_pr: bool,
    /// Exact names or shell-style globs; a match excludes the branch outright.
    pub exclude_patterns: Vec<String>,
    /// Classify protected branches too.
    pub include_protected: bool,
    /// Maximum number of repositories scanned at the same time.
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            stale_days_threshold: DEFAULT_STALE_DAYS_THRESHOLD,
            include_recent_no_pr: false,
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            include_protected: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ScanOptions {
    /// Rejects options a scan cannot run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidOptions {
                message: "concurrency must be at least 1".to_string(),
            });
        }
        if self.concurrency > MAX_CONCURRENCY {
            return Err(ScanError::InvalidOptions {
                message: format!("concurrency must be at most {MAX_CONCURRENCY}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = ScanOptions::default();
        assert_eq!(opts.stale_days_threshold, 7);
        assert!(!opts.include_recent_no_pr);
        assert!(!opts.include_protected);
        assert_eq!(opts.concurrency, 5);
        assert_eq!(
            opts.exclude_patterns,
            vec!["main", "master", "develop", "release/*", "hotfix/*"]
        );
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let opts = ScanOptions {
            concurrency: 0,
            ..ScanOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(ScanError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn concurrency_above_the_cap_is_rejected() {
        let at_cap = ScanOptions {
            concurrency: MAX_CONCURRENCY,
            ..ScanOptions::default()
        };
        assert!(at_cap.validate().is_ok());

        for concurrency in [MAX_CONCURRENCY + 1, usize::MAX] {
            let opts = ScanOptions {
                concurrency,
                ..ScanOptions::default()
            };
            assert!(matches!(
                opts.validate(),
                Err(ScanError::InvalidOptions { .. })
            ));
        }
    }
}
