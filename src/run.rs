use anyhow::Context as _;

use crate::config::Config;
use crate::delete::{DeletionLog, delete_versions};
use crate::enumerate::enumerate_versions;
use crate::filter::{SelectionCriteria, filter_versions};
use crate::registry::Registry;
use crate::report::RunReport;
use crate::select::select_packages;

/// Select, enumerate, filter and delete, once.
///
/// Only a failed package discovery aborts the run. Per-package and
/// per-version failures end up in the returned report.
pub async fn run(config: &Config, registry: &dyn Registry) -> anyhow::Result<RunReport> {
    run_with_log(config, registry, &DeletionLog::new()).await
}

/// Like [`run`], recording each deletion outcome in `log` as it happens.
pub async fn run_with_log(
    config: &Config,
    registry: &dyn Registry,
    log: &DeletionLog,
) -> anyhow::Result<RunReport> {
    tracing::info!(
        "Gathering {} package versions in '{}' matching '{}'...",
        config.package_type,
        config.organization,
        config.pattern
    );

    let packages = select_packages(&config.scope, registry)
        .await
        .with_context(|| format!("failed to list packages of {}", config.organization))?;

    let enumeration = enumerate_versions(registry, &packages).await;
    let criteria = SelectionCriteria::from_config(config);
    let filtered = filter_versions(&enumeration.versions, &criteria);
    let deletions = delete_versions(registry, &filtered.retained, config.dry_run, log).await;

    let report = RunReport::new(packages, enumeration, &filtered, deletions);
    report.log();
    Ok(report)
}
