use std::fmt;

/// Opaque identifier the registry assigns to a package version.
///
/// The REST API hands out numeric ids while the GraphQL API uses node ids,
/// so both are carried as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(id: impl Into<String>) -> Self {
        VersionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for VersionId {
    fn from(id: u64) -> Self {
        VersionId(id.to_string())
    }
}

impl From<String> for VersionId {
    fn from(id: String) -> Self {
        VersionId(id)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single published version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersion {
    pub package_name: String,
    pub version_label: String,
    pub version_id: VersionId,
}

impl PackageVersion {
    pub fn new(
        package_name: impl Into<String>,
        version_label: impl Into<String>,
        version_id: impl Into<VersionId>,
    ) -> Self {
        PackageVersion {
            package_name: package_name.into(),
            version_label: version_label.into(),
            version_id: version_id.into(),
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{} ({})",
            self.package_name, self.version_label, self.version_id
        )
    }
}

/// A package as reported by registry discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Name of the repository the package is linked to, if any.
    pub repository: Option<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, repository: Option<&str>) -> Self {
        Package {
            name: name.into(),
            repository: repository.map(str::to_string),
        }
    }

    /// Repository names compare case-insensitively, like GitHub does.
    pub fn belongs_to(&self, repository: &str) -> bool {
        self.repository
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(repository))
    }
}
