use std::sync::{Mutex, PoisonError};

use crate::registry::Registry;
use crate::types::PackageVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStatus {
    Deleted,
    Failed(String),
    /// Dry run; no request was made.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub version: PackageVersion,
    pub status: DeletionStatus,
}

/// Outcomes recorded as each deletion finishes.
///
/// Lives outside the run so that what was already deleted can still be
/// reported when the run is cancelled part way through.
#[derive(Debug, Default)]
pub struct DeletionLog {
    outcomes: Mutex<Vec<DeletionOutcome>>,
}

impl DeletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, outcome: DeletionOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
    }

    pub fn outcomes(&self) -> Vec<DeletionOutcome> {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn deleted(&self) -> Vec<PackageVersion> {
        self.outcomes()
            .into_iter()
            .filter(|o| o.status == DeletionStatus::Deleted)
            .map(|o| o.version)
            .collect()
    }

    /// Log what was deleted before the run was cut short.
    pub fn log_interrupted(&self) {
        let outcomes = self.outcomes();
        let deleted = self.deleted();
        tracing::warn!(
            "Run interrupted after {} deletion attempts; {} versions were deleted:",
            outcomes.len(),
            deleted.len()
        );
        for version in &deleted {
            tracing::warn!("  {}", version);
        }
    }
}

/// Delete one version. Failures are reported in the outcome, not returned.
pub async fn delete_version(registry: &dyn Registry, version: &PackageVersion) -> DeletionOutcome {
    tracing::info!("Deleting version {}...", version);
    let status = match registry.delete_version(version).await {
        Ok(()) => {
            tracing::info!("Finished deleting version {}", version);
            DeletionStatus::Deleted
        }
        Err(e) => {
            tracing::warn!("There was an error deleting version {}: {}", version, e);
            DeletionStatus::Failed(e.to_string())
        }
    };
    DeletionOutcome {
        version: version.clone(),
        status,
    }
}

/// Delete each version in order, carrying on past failures.
///
/// Every outcome is also recorded in `log` as soon as it is known.
pub async fn delete_versions(
    registry: &dyn Registry,
    versions: &[PackageVersion],
    dry_run: bool,
    log: &DeletionLog,
) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::with_capacity(versions.len());
    for version in versions {
        let outcome = if dry_run {
            tracing::info!("Dry run: would delete version {}", version);
            DeletionOutcome {
                version: version.clone(),
                status: DeletionStatus::Skipped,
            }
        } else {
            delete_version(registry, version).await
        };
        log.record(outcome.clone());
        outcomes.push(outcome);
    }
    outcomes
}
