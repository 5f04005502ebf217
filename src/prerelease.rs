use std::sync::LazyLock;

use regex::Regex;

// Unanchored: the numeric core may appear anywhere in the label.
static PRERELEASE_CORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+-.").expect("prerelease regex is valid"));

/// Whether `label` carries a semver prerelease, `MAJOR.MINOR.PATCH-suffix`
/// with a non-empty suffix.
pub fn is_prerelease(label: &str) -> bool {
    PRERELEASE_CORE.is_match(label)
}
