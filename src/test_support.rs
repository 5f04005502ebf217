use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::registry::Registry;
use crate::types::{Package, PackageVersion, VersionId};

/// Registry fake backed by plain collections.
#[derive(Default)]
pub(crate) struct InMemoryRegistry {
    packages: Vec<Package>,
    versions: BTreeMap<String, Vec<PackageVersion>>,
    failing_packages: HashSet<String>,
    failing_deletes: HashSet<VersionId>,
    stalling_deletes: HashSet<VersionId>,
    discovery_fails: bool,
    list_packages_calls: Mutex<usize>,
    delete_attempts: Mutex<Vec<VersionId>>,
}

impl InMemoryRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    pub(crate) fn with_versions(mut self, package: &str, labels: &[(&str, u64)]) -> Self {
        let versions = labels
            .iter()
            .map(|(label, id)| PackageVersion::new(package, *label, *id))
            .collect();
        self.versions.insert(package.to_string(), versions);
        self
    }

    pub(crate) fn failing_versions_for(mut self, package: &str) -> Self {
        self.failing_packages.insert(package.to_string());
        self
    }

    pub(crate) fn failing_delete_of(mut self, id: u64) -> Self {
        self.failing_deletes.insert(VersionId::from(id));
        self
    }

    /// Deletes of `id` never complete.
    pub(crate) fn stalling_delete_of(mut self, id: u64) -> Self {
        self.stalling_deletes.insert(VersionId::from(id));
        self
    }

    pub(crate) fn failing_discovery(mut self) -> Self {
        self.discovery_fails = true;
        self
    }

    pub(crate) fn list_packages_calls(&self) -> usize {
        *self.list_packages_calls.lock().unwrap()
    }

    pub(crate) fn delete_attempts(&self) -> Vec<VersionId> {
        self.delete_attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError> {
        *self.list_packages_calls.lock().unwrap() += 1;
        if self.discovery_fails {
            return Err(RegistryError::Graphql("discovery unavailable".to_string()));
        }
        Ok(self.packages.clone())
    }

    async fn list_versions(&self, package: &str) -> Result<Vec<PackageVersion>, RegistryError> {
        if self.failing_packages.contains(package) {
            return Err(RegistryError::Graphql(format!("cannot list {}", package)));
        }
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| RegistryError::PackageNotFound(package.to_string()))
    }

    async fn delete_version(&self, version: &PackageVersion) -> Result<(), RegistryError> {
        self.delete_attempts
            .lock()
            .unwrap()
            .push(version.version_id.clone());
        if self.stalling_deletes.contains(&version.version_id) {
            std::future::pending::<()>().await;
        }
        if self.failing_deletes.contains(&version.version_id) {
            return Err(RegistryError::Graphql(format!("cannot delete {}", version)));
        }
        Ok(())
    }
}
