use std::fmt;
use std::time::Duration;

use clap::ArgAction;
use clap::builder::{
    BoolishValueParser, EnumValueParser, RangedU64ValueParser, StringValueParser,
};
use url::Url;

use crate::error::{Error, Result};
use crate::parsing::{BlankIsDefault, non_blank, parse_package_names, parse_repository_slug};
use crate::pattern::{MatchMode, MatchPattern};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Which GitHub API backs the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ApiKind {
    #[default]
    Rest,
    Graphql,
}

/// Command-line flags. Every flag can also come from the environment
/// variable GitHub Actions sets for the matching action input; a blank
/// input falls back to the flag's default.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub struct Options {
    /// Token used to authenticate against the package registry
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Organization owning the packages (defaults to the repository owner)
    #[arg(long, env = "INPUT_ORGANIZATION")]
    pub organization: Option<String>,

    /// Repository whose packages are discovered when no package names are given
    #[arg(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// Package ecosystem: npm, maven, rubygems, docker, nuget or container
    #[arg(long, env = "INPUT_PACKAGE-TYPE")]
    pub package_type: String,

    /// Comma-separated packages to inspect instead of discovering them
    #[arg(long, env = "INPUT_PACKAGE-NAMES")]
    pub package_names: Option<String>,

    /// Branch name or ref the prerelease versions were published from
    #[arg(long, env = "INPUT_BRANCH-NAME")]
    pub branch_name: String,

    /// Match `-<branch>.` instead of the bare branch token
    #[arg(
        long,
        env = "INPUT_STRICT-MATCH",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BlankIsDefault(BoolishValueParser::new())
    )]
    pub strict_match: bool,

    /// Only delete versions shaped like MAJOR.MINOR.PATCH-suffix
    #[arg(
        long,
        env = "INPUT_PRERELEASE-ONLY",
        default_value_t = true,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BlankIsDefault(BoolishValueParser::new())
    )]
    pub prerelease_only: bool,

    /// Registry API to talk to
    #[arg(
        long,
        env = "INPUT_API",
        default_value = "rest",
        value_parser = BlankIsDefault(EnumValueParser::<ApiKind>::new())
    )]
    pub api: ApiKind,

    /// Base URL of the REST API
    #[arg(
        long,
        env = "GITHUB_API_URL",
        default_value = DEFAULT_API_URL,
        value_parser = BlankIsDefault(StringValueParser::new())
    )]
    pub api_url: String,

    /// Endpoint of the GraphQL API
    #[arg(
        long,
        env = "GITHUB_GRAPHQL_URL",
        default_value = DEFAULT_GRAPHQL_URL,
        value_parser = BlankIsDefault(StringValueParser::new())
    )]
    pub graphql_url: String,

    /// Log what would be deleted without deleting anything
    #[arg(
        long,
        env = "INPUT_DRY-RUN",
        default_value_t = false,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BlankIsDefault(BoolishValueParser::new())
    )]
    pub dry_run: bool,

    /// Give up on the whole run after this many seconds
    #[arg(
        long,
        env = "INPUT_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = BlankIsDefault(RangedU64ValueParser::<u64>::new())
    )]
    pub timeout: u64,

    /// `owner/name` of the repository running the workflow
    #[arg(long, env = "GITHUB_REPOSITORY", hide = true)]
    pub github_repository: Option<String>,

    /// Use verbose output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// Registry token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Token(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Which packages a run inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageScope {
    /// Caller-supplied names, used verbatim.
    Explicit(Vec<String>),
    /// Every package linked to this repository.
    Repository(String),
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: Token,
    pub organization: String,
    pub package_type: String,
    pub scope: PackageScope,
    pub pattern: MatchPattern,
    pub prerelease_only: bool,
    pub api: ApiKind,
    pub api_url: Url,
    pub graphql_url: Url,
    pub dry_run: bool,
    pub timeout: Duration,
}

impl Config {
    pub fn from_options(options: Options) -> Result<Self> {
        let token = non_blank(Some(options.github_token))
            .ok_or_else(|| Error::config("a registry token is required"))?;
        let package_type = non_blank(Some(options.package_type))
            .ok_or_else(|| Error::config("a package type is required"))?
            .to_ascii_lowercase();

        let slug = non_blank(options.github_repository);
        let (default_owner, default_repo) = match slug.as_deref().map(parse_repository_slug) {
            Some(Some((owner, name))) => (Some(owner.to_string()), Some(name.to_string())),
            Some(None) => {
                tracing::warn!(
                    "Ignoring malformed repository slug '{}'",
                    slug.as_deref().unwrap_or_default()
                );
                (None, None)
            }
            None => (None, None),
        };

        let organization = non_blank(options.organization)
            .or(default_owner)
            .ok_or_else(|| {
                Error::config("no organization given and GITHUB_REPOSITORY is not set")
            })?;

        let explicit = options
            .package_names
            .as_deref()
            .map(parse_package_names)
            .filter(|names| !names.is_empty());
        let scope = match explicit {
            Some(names) => PackageScope::Explicit(names),
            None => {
                let repository = non_blank(options.repository).or(default_repo).ok_or_else(|| {
                    Error::config(
                        "no package names given and no repository to discover packages for",
                    )
                })?;
                PackageScope::Repository(repository)
            }
        };

        let mode = if options.strict_match {
            MatchMode::Strict
        } else {
            MatchMode::Loose
        };
        let pattern = MatchPattern::new(&options.branch_name, mode)?;

        if options.timeout == 0 {
            return Err(Error::config("timeout must be at least one second"));
        }

        Ok(Config {
            token: Token::new(token),
            organization,
            package_type,
            scope,
            pattern,
            prerelease_only: options.prerelease_only,
            api: options.api,
            api_url: parse_url("API URL", &options.api_url)?,
            graphql_url: parse_url("GraphQL URL", &options.graphql_url)?,
            dry_run: options.dry_run,
            timeout: Duration::from_secs(options.timeout),
        })
    }
}

fn parse_url(what: &str, value: &str) -> Result<Url> {
    Url::parse(value.trim())
        .map_err(|e| Error::config(format!("invalid {} `{}`: {}", what, value, e)))
}
