use crate::config::PackageScope;
use crate::error::RegistryError;
use crate::registry::Registry;

/// Decide which packages to inspect.
///
/// Explicit names are returned as given without touching the registry.
/// Otherwise the organization's packages are listed and those linked to the
/// repository are kept, sorted by name. A failed listing is returned as an
/// error; an empty result is not.
pub async fn select_packages(
    scope: &PackageScope,
    registry: &dyn Registry,
) -> Result<Vec<String>, RegistryError> {
    match scope {
        PackageScope::Explicit(names) => {
            tracing::info!("Using the provided packages: {}", names.join(", "));
            Ok(names.clone())
        }
        PackageScope::Repository(repository) => {
            tracing::info!("Discovering packages linked to repository '{}'...", repository);
            let packages = registry.list_packages().await?;
            let total = packages.len();

            let mut names: Vec<String> = packages
                .into_iter()
                .filter(|p| p.belongs_to(repository))
                .map(|p| p.name)
                .collect();
            names.sort();
            names.dedup();

            if names.is_empty() {
                tracing::info!(
                    "No packages found for repository '{}' ({} packages checked)",
                    repository,
                    total
                );
            } else {
                tracing::info!(
                    "Found {} of {} packages linked to '{}': {}",
                    names.len(),
                    total,
                    repository,
                    names.join(", ")
                );
            }
            Ok(names)
        }
    }
}
