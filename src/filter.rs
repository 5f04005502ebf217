use std::collections::BTreeSet;
use std::fmt;

use crate::config::{Config, PackageScope};
use crate::pattern::MatchPattern;
use crate::prerelease::is_prerelease;
use crate::types::PackageVersion;

/// What a version must satisfy to be deleted.
#[derive(Debug, Clone)]
pub struct SelectionCriteria {
    /// When set, versions of any other package are kept.
    pub explicit_package_names: Option<BTreeSet<String>>,
    pub require_prerelease: bool,
    pub pattern: MatchPattern,
}

impl SelectionCriteria {
    pub fn from_config(config: &Config) -> Self {
        let explicit_package_names = match &config.scope {
            PackageScope::Explicit(names) => Some(names.iter().cloned().collect()),
            PackageScope::Repository(_) => None,
        };
        SelectionCriteria {
            explicit_package_names,
            require_prerelease: config.prerelease_only,
            pattern: config.pattern.clone(),
        }
    }

    /// The first predicate `version` fails, if any. Predicates are checked
    /// in a fixed order: package, prerelease, pattern.
    pub fn exclusion(&self, version: &PackageVersion) -> Option<Exclusion> {
        if let Some(names) = &self.explicit_package_names
            && !names.contains(&version.package_name)
        {
            return Some(Exclusion::PackageNotSelected);
        }
        if self.require_prerelease && !is_prerelease(&version.version_label) {
            return Some(Exclusion::NotPrerelease);
        }
        if !self.pattern.matches(&version.version_label) {
            return Some(Exclusion::PatternMismatch);
        }
        None
    }
}

/// Why a version was kept out of the deletion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    PackageNotSelected,
    NotPrerelease,
    PatternMismatch,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::PackageNotSelected => "package was not selected",
            Exclusion::NotPrerelease => "not a prerelease version",
            Exclusion::PatternMismatch => "does not contain the branch pattern",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub retained: Vec<PackageVersion>,
    pub rejected: Vec<(PackageVersion, Exclusion)>,
}

/// Split `versions` into those to delete and those to keep.
pub fn filter_versions(versions: &[PackageVersion], criteria: &SelectionCriteria) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for version in versions {
        match criteria.exclusion(version) {
            Some(reason) => {
                tracing::info!("Version {} will not be deleted: {}", version, reason);
                outcome.rejected.push((version.clone(), reason));
            }
            None => outcome.retained.push(version.clone()),
        }
    }

    if outcome.retained.is_empty() {
        tracing::info!(
            "No versions match '{}', there is nothing to remove",
            criteria.pattern
        );
    } else {
        tracing::info!(
            "{} versions match '{}' and will be removed:",
            outcome.retained.len(),
            criteria.pattern
        );
        for version in &outcome.retained {
            tracing::info!("  {}", version);
        }
    }

    outcome
}
