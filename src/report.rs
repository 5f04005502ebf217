use std::fmt;

use crate::delete::{DeletionOutcome, DeletionStatus};
use crate::enumerate::EnumerationOutcome;
use crate::filter::FilterOutcome;
use crate::types::PackageVersion;

/// What a run looked at and what became of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub selected_packages: Vec<String>,
    pub missing_packages: Vec<String>,
    /// Packages whose versions could not be listed, with the reason.
    pub failed_packages: Vec<(String, String)>,
    pub inspected: usize,
    pub retained: usize,
    pub deleted: Vec<PackageVersion>,
    pub failed: Vec<(PackageVersion, String)>,
    pub skipped: Vec<PackageVersion>,
}

impl RunReport {
    pub fn new(
        selected_packages: Vec<String>,
        enumeration: EnumerationOutcome,
        filtered: &FilterOutcome,
        deletions: Vec<DeletionOutcome>,
    ) -> Self {
        let mut report = RunReport {
            selected_packages,
            missing_packages: enumeration.missing,
            failed_packages: enumeration.failed,
            inspected: enumeration.versions.len(),
            retained: filtered.retained.len(),
            ..RunReport::default()
        };

        for DeletionOutcome { version, status } in deletions {
            match status {
                DeletionStatus::Deleted => report.deleted.push(version),
                DeletionStatus::Failed(reason) => report.failed.push((version, reason)),
                DeletionStatus::Skipped => report.skipped.push(version),
            }
        }
        report
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || !self.failed_packages.is_empty()
    }

    /// Emit the summary, one log line per line of the report.
    pub fn log(&self) {
        let summary = self.to_string();
        for line in summary.lines() {
            if self.has_failures() {
                tracing::warn!("{}", line);
            } else {
                tracing::info!("{}", line);
            }
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  packages inspected: {}", self.selected_packages.len())?;
        if !self.missing_packages.is_empty() {
            writeln!(f, "  packages not found: {}", self.missing_packages.join(", "))?;
        }
        for (package, reason) in &self.failed_packages {
            writeln!(f, "  could not list {}: {}", package, reason)?;
        }
        writeln!(f, "  versions inspected: {}", self.inspected)?;
        writeln!(f, "  versions matching: {}", self.retained)?;
        writeln!(f, "  versions deleted: {}", self.deleted.len())?;
        if !self.skipped.is_empty() {
            writeln!(f, "  versions skipped (dry run): {}", self.skipped.len())?;
        }
        write!(f, "  versions failed: {}", self.failed.len())?;
        for (version, reason) in &self.failed {
            write!(f, "\n    {}: {}", version, reason)?;
        }
        Ok(())
    }
}
