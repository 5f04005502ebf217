use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::paging::{Cursor, Page, PagedFetch, collect_pages};
use super::{Registry, check_status};
use crate::error::RegistryError;
use crate::types::{Package, PackageVersion};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

// Package deletion over GraphQL is still gated behind this preview.
const MEDIA_TYPE: &str = "application/vnd.github.package-deletes-preview+json";

const PACKAGES_QUERY: &str = r#"
query($org: String!, $packageType: PackageType!, $first: Int!, $after: String) {
  organization(login: $org) {
    packages(first: $first, after: $after, packageType: $packageType) {
      nodes { name repository { name } }
      pageInfo { hasNextPage endCursor }
    }
  }
}"#;

const VERSIONS_QUERY: &str = r#"
query($org: String!, $packageType: PackageType!, $name: String!, $first: Int!, $after: String) {
  organization(login: $org) {
    packages(first: 1, names: [$name], packageType: $packageType) {
      nodes {
        name
        versions(first: $first, after: $after) {
          nodes { id version }
          pageInfo { hasNextPage endCursor }
        }
      }
    }
  }
}"#;

const DELETE_MUTATION: &str = r#"
mutation($id: ID!) {
  deletePackageVersion(input: { packageVersionId: $id }) { success }
}"#;

/// GitHub Packages over the GraphQL API, paging by cursor.
#[derive(Clone)]
pub struct GraphqlRegistry {
    client: Client,
    endpoint: Url,
    token: String,
    org: String,
    package_type: String,
    page_size: u32,
}

#[derive(Deserialize)]
struct Response<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
    nodes: Vec<T>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
struct Organization<P> {
    organization: Option<Packages<P>>,
}

#[derive(Deserialize)]
struct Packages<P> {
    packages: P,
}

#[derive(Deserialize)]
struct PackageNode {
    name: String,
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
struct RepositoryNode {
    name: String,
}

#[derive(Deserialize)]
struct PackageNodes {
    nodes: Vec<VersionedPackageNode>,
}

#[derive(Deserialize)]
struct VersionedPackageNode {
    versions: Connection<VersionNode>,
}

#[derive(Deserialize)]
struct VersionNode {
    id: String,
    version: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteData {
    delete_package_version: Option<DeletePayload>,
}

#[derive(Deserialize)]
struct DeletePayload {
    success: bool,
}

impl GraphqlRegistry {
    pub fn new(
        client: Client,
        endpoint: Url,
        token: impl Into<String>,
        org: impl Into<String>,
        package_type: impl Into<String>,
    ) -> Self {
        GraphqlRegistry {
            client,
            endpoint,
            token: token.into(),
            org: org.into(),
            package_type: package_type.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// GraphQL spells package types as upper-case enum values.
    fn package_type_enum(&self) -> String {
        self.package_type.to_ascii_uppercase()
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, RegistryError> {
        tracing::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, MEDIA_TYPE)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let body: Response<T> = check_status(response)?.json().await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(RegistryError::Graphql(messages.join("; ")));
        }
        body.data
            .ok_or_else(|| RegistryError::Graphql("response contained no data".to_string()))
    }

    fn missing_organization(&self) -> RegistryError {
        RegistryError::Graphql(format!("organization `{}` was not found", self.org))
    }
}

struct PackagePages<'a> {
    registry: &'a GraphqlRegistry,
}

#[async_trait]
impl<'a> PagedFetch for PackagePages<'a> {
    type Item = Package;
    type Cursor = Cursor;

    fn first_page(&self) -> Cursor {
        Cursor::start(self.registry.page_size)
    }

    async fn fetch_page(&self, cursor: &Cursor) -> Result<Page<Package, Cursor>, RegistryError> {
        let data: Organization<Connection<PackageNode>> = self
            .registry
            .execute(
                PACKAGES_QUERY,
                json!({
                    "org": self.registry.org,
                    "packageType": self.registry.package_type_enum(),
                    "first": cursor.first,
                    "after": cursor.after,
                }),
            )
            .await?;
        let packages = data
            .organization
            .ok_or_else(|| self.registry.missing_organization())?
            .packages;

        let next = cursor.next_after(
            packages.page_info.has_next_page,
            packages.page_info.end_cursor,
        );
        let items = packages
            .nodes
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
    registry: &'a GraphqlRegistry,
    package: &'a str,
}

#[async_trait]
impl<'a> PagedFetch for VersionPages<'a> {
    type Item = PackageVersion;
    type Cursor = Cursor;

    fn first_page(&self) -> Cursor {
        Cursor::start(self.registry.page_size)
    }

    async fn fetch_page(
        &self,
        cursor: &Cursor,
    ) -> Result<Page<PackageVersion, Cursor>, RegistryError> {
        let data: Organization<PackageNodes> = self
            .registry
            .execute(
                VERSIONS_QUERY,
                json!({
                    "org": self.registry.org,
                    "packageType": self.registry.package_type_enum(),
                    "name": self.package,
                    "first": cursor.first,
                    "after": cursor.after,
                }),
            )
            .await?;
        let versions = data
            .organization
            .ok_or_else(|| self.registry.missing_organization())?
            .packages
            .nodes
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::PackageNotFound(self.package.to_string()))?
            .versions;

        let next = cursor.next_after(
            versions.page_info.has_next_page,
            versions.page_info.end_cursor,
        );
        let items = versions
            .nodes
            .into_iter()
            .map(|v| PackageVersion::new(self.package, v.version, v.id))
            .collect();
        Ok(Page { items, next })
    }
}

#[async_trait]
impl Registry for GraphqlRegistry {
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
        let data: DeleteData = self
            .execute(
                DELETE_MUTATION,
                json!({ "id": version.version_id.as_str() }),
            )
            .await?;
        match data.delete_package_version {
            Some(DeletePayload { success: true }) => Ok(()),
            _ => Err(RegistryError::Graphql(format!(
                "deletion of {} was not successful",
                version
            ))),
        }
    }
}
