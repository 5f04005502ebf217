//! Package registry access.
//!
//! The sweep only needs three things from a registry: the packages of the
//! configured type owned by the organization, every version of one package,
//! and deleting one version. [`rest::RestRegistry`] and
//! [`graphql::GraphqlRegistry`] provide them over GitHub's two APIs.

pub mod graphql;
pub mod paging;
pub mod rest;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::RegistryError;
use crate::types::{Package, PackageVersion};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait Registry: Send + Sync {
    /// Every package of the configured type owned by the organization.
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError>;

    /// Every version of `package`, across all pages.
    async fn list_versions(&self, package: &str) -> Result<Vec<PackageVersion>, RegistryError>;

    async fn delete_version(&self, version: &PackageVersion) -> Result<(), RegistryError>;
}

/// HTTP client shared by both adapters.
pub fn build_client() -> Result<Client, RegistryError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Turn a non-success response into a [`RegistryError::Status`].
pub(crate) fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RegistryError::Status {
            status,
            url: response.url().to_string(),
        })
    }
}
