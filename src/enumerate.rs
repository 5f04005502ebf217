use crate::error::RegistryError;
use crate::registry::Registry;
use crate::types::PackageVersion;

/// Versions gathered across every selected package.
#[derive(Debug, Default)]
pub struct EnumerationOutcome {
    /// Sorted by package name, then version label.
    pub versions: Vec<PackageVersion>,
    /// Packages the registry does not know about.
    pub missing: Vec<String>,
    /// Packages whose listing failed, with the reason.
    pub failed: Vec<(String, String)>,
}

/// List the versions of each package in turn.
///
/// A package that cannot be listed contributes no versions; the others are
/// still listed.
pub async fn enumerate_versions(
    registry: &dyn Registry,
    packages: &[String],
) -> EnumerationOutcome {
    let mut outcome = EnumerationOutcome::default();

    for package in packages {
        match registry.list_versions(package).await {
            Ok(versions) => {
                tracing::info!("Found {} versions of package {}", versions.len(), package);
                outcome.versions.extend(versions);
            }
            Err(RegistryError::PackageNotFound(_)) => {
                tracing::info!("Package {} was not found, skipping it", package);
                outcome.missing.push(package.clone());
            }
            Err(e) => {
                tracing::warn!("Failed to list versions of package {}: {}", package, e);
                outcome.failed.push((package.clone(), e.to_string()));
            }
        }
    }

    outcome.versions.sort_by(|a, b| {
        a.package_name
            .cmp(&b.package_name)
            .then_with(|| a.version_label.cmp(&b.version_label))
    });
    outcome
}
