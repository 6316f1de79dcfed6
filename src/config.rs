use crate::generate::Selection;
use crate::github::RetryPolicy;
use chrono::FixedOffset;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "stat-cards")]
#[command(about = "Generate GitHub profile stat cards (streaks, languages, visitors, recents, general stats) as SVG")]
pub struct Args {
    /// Card to generate
    #[arg(value_enum, default_value_t = Selection::All)]
    pub card: Selection,

    /// GitHub token (requires read:user and repo scopes); GITHUB_TOKEN is used as a fallback
    #[arg(short, long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Login to report on (defaults to the owner of the token)
    #[arg(short, long, env = "GITHUB_ACTOR")]
    pub username: Option<String>,

    /// Comma-separated repositories to leave out, as `name` or `owner/name`
    #[arg(long, env = "EXCLUDED_REPOS", default_value = "")]
    pub excluded_repos: String,

    /// Comma-separated languages to leave out of the languages card
    #[arg(long, env = "EXCLUDED_LANGS", default_value = "")]
    pub excluded_langs: String,

    /// Output directory
    #[arg(short, long, env = "STATS_OUTPUT_DIR", default_value = "output")]
    pub output: PathBuf,

    /// Reference offset for "today" and footer timestamps, e.g. `UTC` or `+03:00`
    #[arg(long, env = "STATS_UTC_OFFSET", default_value = "UTC", value_parser = parse_utc_offset)]
    pub utc_offset: FixedOffset,

    /// Leave the "last updated" footer off the cards
    #[arg(long)]
    pub no_last_update: bool,

    /// Prefix card titles with the login
    #[arg(long)]
    pub show_username: bool,

    /// How many times to poll REST statistics that are still being computed
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_polls: u32,

    /// Delay between polls, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_delay_ms: u64,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = "https://api.github.com/graphql")]
    pub graphql_url: String,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ACCESS_TOKEN is not defined (pass --token or set ACCESS_TOKEN / GITHUB_TOKEN)")]
    MissingToken,
    #[error("Invalid UTC offset '{0}', expected e.g. UTC, +03:00 or -05:30")]
    InvalidOffset(String),
}

/// Repositories and languages left out of the aggregates, lowercased
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub repos: Vec<String>,
    pub langs: Vec<String>,
}

impl Exclusions {
    pub fn new(repos: &str, langs: &str) -> Self {
        Self {
            repos: split_list(repos),
            langs: split_list(langs),
        }
    }

    /// Match `owner/name` or the bare name, case-insensitively
    pub fn excludes_repo(&self, name: &str) -> bool {
        let full = name.to_lowercase();
        let short = full.rsplit('/').next().unwrap_or(full.as_str());
        self.repos.iter().any(|r| *r == full || r == short)
    }

    pub fn excludes_language(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.langs.iter().any(|l| *l == name)
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub selection: Selection,
    pub token: String,
    pub username: Option<String>,
    pub exclusions: Exclusions,
    pub output: PathBuf,
    pub utc_offset: FixedOffset,
    pub show_last_update: bool,
    pub show_username: bool,
    pub retry: RetryPolicy,
    pub graphql_url: String,
    pub api_url: String,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let token = args
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let username = args
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            selection: args.card,
            token,
            username,
            exclusions: Exclusions::new(&args.excluded_repos, &args.excluded_langs),
            output: args.output,
            utc_offset: args.utc_offset,
            show_last_update: !args.no_last_update,
            show_username: args.show_username,
            retry: RetryPolicy {
                max_attempts: args.max_polls,
                delay: Duration::from_millis(args.poll_delay_ms),
            },
            graphql_url: args.graphql_url,
            api_url: args.api_url,
        })
    }
}

/// Split a comma-separated list, trimming and lowercasing entries
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Parse `UTC`, `Z`, `+03:00`, `UTC-05:30` style offsets
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();

    if upper == "UTC" || upper == "Z" || upper == "GMT" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let offset = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(upper.as_str());

    offset.parse::<FixedOffset>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["stat-cards", "commits"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn splits_comma_lists() {
        assert_eq!(split_list(" Foo, bar ,,BAZ "), vec!["foo", "bar", "baz"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn excludes_by_full_or_short_name() {
        let exclusions = Exclusions::new("octocat/Dotfiles, scratch", "HTML");

        assert!(exclusions.excludes_repo("octocat/Dotfiles"));
        assert!(!exclusions.excludes_repo("someone/dotfiles"));
        assert!(exclusions.excludes_repo("someone/Scratch"));
        assert!(Exclusions::new("dotfiles", "").excludes_repo("someone/dotfiles"));
        assert!(!exclusions.excludes_repo("octocat/website"));
        assert!(exclusions.excludes_language("html"));
        assert!(!exclusions.excludes_language("Rust"));
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+03:00").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("utc-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert_eq!(
            parse_utc_offset("Europe/Moscow"),
            Err(ConfigError::InvalidOffset("Europe/Moscow".to_string()))
        );
    }

    #[test]
    fn blank_token_is_a_config_error() {
        let err = Config::try_from(args(&["--token", "  "])).unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);

        let mut without = args(&[]);
        without.token = None;
        assert_eq!(Config::try_from(without).unwrap_err(), ConfigError::MissingToken);
    }

    #[test]
    fn builds_config_from_args() {
        let config = Config::try_from(args(&[
            "--token",
            "ghp_abc",
            "--username",
            "octocat",
            "--excluded-repos",
            "a,b",
            "--utc-offset",
            "+02:00",
            "--no-last-update",
            "--max-polls",
            "5",
            "--poll-delay-ms",
            "10",
        ]))
        .unwrap();

        assert_eq!(config.selection, Selection::Commits);
        assert_eq!(config.token, "ghp_abc");
        assert_eq!(config.username.as_deref(), Some("octocat"));
        assert_eq!(config.exclusions.repos, vec!["a", "b"]);
        assert_eq!(config.utc_offset.local_minus_utc(), 7200);
        assert!(!config.show_last_update);
        assert_eq!(
            config.retry,
            RetryPolicy {
                max_attempts: 5,
                delay: Duration::from_millis(10),
            }
        );
    }

    #[test]
    fn rejects_zero_polls() {
        let argv = ["stat-cards", "commits", "--token", "t", "--max-polls", "0"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
