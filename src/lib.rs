//! Deletes the prerelease package versions a branch published once the
//! branch is done with.
//!
//! A run selects packages (an explicit list, or every package linked to a
//! repository), lists all of their versions, keeps the ones whose label
//! carries the branch pattern, and deletes those one at a time.

pub mod config;
pub mod delete;
pub mod enumerate;
pub mod error;
pub mod filter;
pub mod parsing;
pub mod pattern;
pub mod prerelease;
pub mod registry;
pub mod report;
pub mod run;
pub mod select;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ApiKind, Config, Options, PackageScope};
pub use delete::DeletionLog;
pub use error::{Error, RegistryError};
pub use pattern::{MatchMode, MatchPattern, normalize_branch};
pub use prerelease::is_prerelease;
pub use registry::Registry;
pub use registry::graphql::GraphqlRegistry;
pub use registry::rest::RestRegistry;
pub use report::RunReport;
pub use run::{run, run_with_log};
pub use types::{Package, PackageVersion, VersionId};
