use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use url::Url;

use super::paging::{Offset, Page, PagedFetch, collect_pages};
use super::{Registry, check_status};
use crate::error::RegistryError;
use crate::types::{Package, PackageVersion};

pub const DEFAULT_PER_PAGE: u32 = 50;
pub const API_VERSION: &str = "2022-11-28";

const MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub Packages over the REST API, paging by page number.
#[derive(Clone)]
pub struct RestRegistry {
    client: Client,
    base: Url,
    token: String,
    org: String,
    package_type: String,
    per_page: u32,
}

#[derive(Deserialize)]
struct RestPackage {
    name: String,
    #[serde(default)]
    repository: Option<RestRepository>,
}

#[derive(Deserialize)]
struct RestRepository {
    name: String,
}

#[derive(Deserialize)]
struct RestVersion {
    id: u64,
    name: String,
}

impl RestRegistry {
    pub fn new(
        client: Client,
        base: Url,
        token: impl Into<String>,
        org: impl Into<String>,
        package_type: impl Into<String>,
    ) -> Self {
        RestRegistry {
            client,
            base,
            token: token.into(),
            org: org.into(),
            package_type: package_type.into(),
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Append `segments` to the base URL, each percent-encoded as one path
    /// segment so scoped names like `@scope/pkg` stay intact.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RegistryError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| RegistryError::InvalidBaseUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    fn packages_url(&self) -> Result<Url, RegistryError> {
        self.endpoint(&["orgs", &self.org, "packages"])
    }

    fn versions_url(&self, package: &str) -> Result<Url, RegistryError> {
        self.endpoint(&[
            "orgs",
            &self.org,
            "packages",
            &self.package_type,
            package,
            "versions",
        ])
    }

    fn version_url(&self, version: &PackageVersion) -> Result<Url, RegistryError> {
        self.endpoint(&[
            "orgs",
            &self.org,
            "packages",
            &self.package_type,
            &version.package_name,
            "versions",
            version.version_id.as_str(),
        ])
    }
}

struct PackagePages<'a> {
    registry: &'a RestRegistry,
}

#[async_trait]
impl<'a> PagedFetch for PackagePages<'a> {
    type Item = Package;
    type Cursor = Offset;

    fn first_page(&self) -> Offset {
        Offset::first(self.registry.per_page)
    }

    async fn fetch_page(&self, cursor: &Offset) -> Result<Page<Package, Offset>, RegistryError> {
        let url = self.registry.packages_url()?;
        tracing::debug!("GET {} page {}", url, cursor.page);

        let response = self
            .registry
            .request(Method::GET, url)
            .query(&[("package_type", self.registry.package_type.as_str())])
            .query(&[("per_page", cursor.per_page), ("page", cursor.page)])
            .send()
            .await?;
        let packages: Vec<RestPackage> = check_status(response)?.json().await?;

        let next = cursor.next_after(packages.len());
        let items = packages
            .into_iter()
            .map(|p| Package {
                name: p.name,
                repository: p.repository.map(|r| r.name),
            })
            .collect();
        Ok(Page { items, next })
    }
}

struct VersionPages<'a> {
    registry: &'a RestRegistry,
    package: &'a str,
}

#[async_trait]
impl<'a> PagedFetch for VersionPages<'a> {
    type Item = PackageVersion;
    type Cursor = Offset;

    fn first_page(&self) -> Offset {
        Offset::first(self.registry.per_page)
    }

    async fn fetch_page(
        &self,
        cursor: &Offset,
    ) -> Result<Page<PackageVersion, Offset>, RegistryError> {
        let url = self.registry.versions_url(self.package)?;
        tracing::debug!("GET {} page {}", url, cursor.page);

        let response = self
            .registry
            .request(Method::GET, url)
            .query(&[("per_page", cursor.per_page), ("page", cursor.page)])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(RegistryError::PackageNotFound(self.package.to_string()));
        }
        let versions: Vec<RestVersion> = check_status(response)?.json().await?;

        let next = cursor.next_after(versions.len());
        let items = versions
            .into_iter()
            .map(|v| PackageVersion::new(self.package, v.name, v.id))
            .collect();
        Ok(Page { items, next })
    }
}

#[async_trait]
impl Registry for RestRegistry {
    async fn list_packages(&self) -> Result<Vec<Package>, RegistryError> {
        collect_pages(&PackagePages { registry: self }).await
    }

    async fn list_versions(&self, package: &str) -> Result<Vec<PackageVersion>, RegistryError> {
        collect_pages(&VersionPages {
            registry: self,
            package,
        })
        .await
    }

    async fn delete_version(&self, version: &PackageVersion) -> Result<(), RegistryError> {
        let url = self.version_url(version)?;
        tracing::debug!("DELETE {}", url);

        let response = self.request(Method::DELETE, url).send().await?;
        check_status(response)?;
        Ok(())
    }
}
