use std::ffi::OsStr;

use clap::builder::{Arg, Command, PossibleValue, TypedValueParser};

/// Split a comma-separated package list.
///
/// Entries are trimmed, empty entries dropped, and duplicates removed keeping
/// the first occurrence so the input order is preserved.
pub fn parse_package_names(input: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Split an `owner/name` repository slug, as found in `GITHUB_REPOSITORY`.
pub fn parse_repository_slug(slug: &str) -> Option<(&str, &str)> {
    let (owner, name) = slug.trim().split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

/// Treat blank input the same as missing input.
///
/// GitHub Actions passes unset optional inputs as empty strings.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Clap value parser that reads a blank value as the argument's default.
///
/// Wraps another parser, which still validates every non-blank value.
#[derive(Clone)]
pub struct BlankIsDefault<P>(pub P);

impl<P: TypedValueParser> TypedValueParser for BlankIsDefault<P> {
    type Value = P::Value;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let blank = value.to_str().is_some_and(|v| v.trim().is_empty());
        match arg.and_then(|a| a.get_default_values().first()) {
            Some(default) if blank => self.0.parse_ref(cmd, arg, default.as_os_str()),
            _ => self.0.parse_ref(cmd, arg, value),
        }
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        self.0.possible_values()
    }
}
