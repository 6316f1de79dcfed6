use crate::calendar::{canonical_day, describe_offset, format_timestamp};
use crate::config::Config;
use crate::github::{
    fetch_contribution_history, fetch_contributor_stats, fetch_owned_repositories, fetch_profile,
    fetch_repo_details, fetch_traffic_views, fetch_user_created_at, list_user_repos, GitHubClient,
    RepoOrder, Repository,
};
use crate::streak::ContributionHistory;
use crate::tiles::{
    lines_changed, select_recent, total_views, CommitStreaks, GeneralStats, Languages, RecentRepo,
    Recents, RenderConfig, RepoVisitors, Tile, Visitors, MAX_RECENTS,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A single stat card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Commits,
    Languages,
    General,
    Visitors,
    Recents,
}

impl Card {
    pub const ALL: [Card; 5] = [Card::Commits, Card::Languages, Card::General, Card::Visitors, Card::Recents];

    pub fn as_str(self) -> &'static str {
        match self {
            Card::Commits => "commits",
            Card::Languages => "languages",
            Card::General => "general",
            Card::Visitors => "visitors",
            Card::Recents => "recents",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Selection {
    All,
    Commits,
    Languages,
    General,
    Visitors,
    Recents,
}

impl Selection {
    pub fn cards(self) -> Vec<Card> {
        match self {
            Selection::All => Card::ALL.to_vec(),
            Selection::Commits => vec![Card::Commits],
            Selection::Languages => vec![Card::Languages],
            Selection::General => vec![Card::General],
            Selection::Visitors => vec![Card::Visitors],
            Selection::Recents => vec![Card::Recents],
        }
    }
}

/// Fetch, aggregate, render and write one card; returns the written path
pub async fn generate(card: Card, client: &GitHubClient, config: &Config, login: &str) -> Result<PathBuf> {
    info!("Generating {} card for {}", card, login);
    let now = Utc::now();

    let tile: Box<dyn Tile> = match card {
        Card::Commits => Box::new(commit_streaks(client, config, login, now).await?),
        Card::Languages => Box::new(languages(client, config, login).await?),
        Card::General => Box::new(general_stats(client, config, login).await?),
        Card::Visitors => Box::new(visitors(client, config, login).await?),
        Card::Recents => Box::new(recents(client, config, login).await?),
    };

    let last_update = config
        .show_last_update
        .then(|| format!("{} {}", format_timestamp(now, config.utc_offset), describe_offset(config.utc_offset)));
    let render_config = RenderConfig::new(login, config.show_username).with_last_update(last_update);

    write_tile(tile.as_ref(), &render_config, &config.output)
}

/// Render a tile into `<dir>/stats_<name>.svg`, creating the directory if needed
pub fn write_tile(tile: &dyn Tile, config: &RenderConfig, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(tile.filename());
    fs::write(&path, tile.render(config)).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("SVG file created: {}", path.display());
    Ok(path)
}

async fn commit_streaks(
    client: &GitHubClient,
    config: &Config,
    login: &str,
    now: DateTime<Utc>,
) -> Result<CommitStreaks> {
    let today = canonical_day(now, config.utc_offset);
    let Some(created_at) = fetch_user_created_at(client, login).await? else {
        warn!("User {} not found, rendering an empty streak card", login);
        return Ok(CommitStreaks::from_history(&ContributionHistory::new(Vec::new(), today), None));
    };

    let days = fetch_contribution_history(client, login, created_at, now).await?;
    let history = ContributionHistory::new(days, today);

    if history.is_empty() {
        warn!("No contribution records for {}", login);
    }

    Ok(CommitStreaks::from_history(
        &history,
        Some(canonical_day(created_at, config.utc_offset)),
    ))
}

async fn languages(client: &GitHubClient, config: &Config, login: &str) -> Result<Languages> {
    let repos = fetch_owned_repositories(client, login).await?;
    Ok(Languages::from_repositories(&repos, &config.exclusions))
}

async fn general_stats(client: &GitHubClient, config: &Config, login: &str) -> Result<GeneralStats> {
    let profile = fetch_profile(client, login).await?;
    let repos = fetch_owned_repositories(client, login).await?;
    let included: Vec<&Repository> = repos
        .iter()
        .filter(|r| !config.exclusions.excludes_repo(&r.name_with_owner))
        .collect();
    debug!("{} of {} repositories included", included.len(), repos.len());

    let mut contributors = Vec::with_capacity(included.len());
    let mut traffic = Vec::with_capacity(included.len());
    for repo in &included {
        let name = &repo.name_with_owner;
        contributors.push((name.clone(), fetch_contributor_stats(client, name).await));
        traffic.push((name.clone(), fetch_traffic_views(client, name).await));
    }

    Ok(GeneralStats::new(
        login,
        profile.as_ref(),
        &included,
        lines_changed(login, &contributors),
        total_views(&traffic),
    ))
}

async fn visitors(client: &GitHubClient, config: &Config, login: &str) -> Result<Visitors> {
    let repos = list_user_repos(client, login, RepoOrder::Default).await?;

    let mut rows = Vec::new();
    for repo in repos.iter().filter(|r| !config.exclusions.excludes_repo(&r.full_name)) {
        match fetch_traffic_views(client, &repo.full_name).await {
            Ok(traffic) => rows.extend(RepoVisitors::summarize(&repo.full_name, &traffic, config.utc_offset)),
            Err(err) => warn!("Skipping visitors of {}: {:#}", repo.full_name, err),
        }
    }

    Ok(Visitors::new(rows))
}

async fn recents(client: &GitHubClient, config: &Config, login: &str) -> Result<Recents> {
    let repos = list_user_repos(client, login, RepoOrder::RecentlyPushed).await?;
    let selected = select_recent(repos, &config.exclusions, MAX_RECENTS);

    let mut rows = Vec::with_capacity(selected.len());
    for repo in &selected {
        match fetch_repo_details(client, &repo.full_name).await {
            Ok(details) => rows.push(RecentRepo::new(&repo.full_name, &details)),
            Err(err) => warn!("Dropping {} from recents: {:#}", repo.full_name, err),
        }
    }

    Ok(Recents::new(rows, config.utc_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Exclusions;
    use crate::github::{test_server, RetryPolicy};
    use crate::streak::ContributionDay;
    use chrono::{FixedOffset, NaiveDate};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn config(output: &Path, graphql_url: &str, api_url: &str) -> Config {
        Config {
            selection: Selection::Commits,
            token: "token".to_string(),
            username: None,
            exclusions: Exclusions::default(),
            output: output.to_path_buf(),
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            show_last_update: false,
            show_username: false,
            retry: RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
            },
            graphql_url: graphql_url.to_string(),
            api_url: api_url.to_string(),
        }
    }

    #[test]
    fn selection_expands_to_cards() {
        assert_eq!(Selection::All.cards(), Card::ALL.to_vec());
        assert_eq!(Selection::Visitors.cards(), vec![Card::Visitors]);
        assert_eq!(Card::Recents.to_string(), "recents");
    }

    #[test]
    fn writes_tile_into_new_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested/output");
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let history = ContributionHistory::new(vec![ContributionDay::new(day, 5)], day);
        let tile = CommitStreaks::from_history(&history, None);

        let path = write_tile(&tile, &RenderConfig::new("octocat", false), &dir).unwrap();

        assert_eq!(path, dir.join("stats_commits.svg"));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Mar 1, 2024 - Mar 1, 2024"));
    }

    #[tokio::test]
    async fn unknown_user_renders_empty_streak_card() {
        let (url, hits) = test_server::serve("200 OK", r#"{"data":{"user":null}}"#);
        let temp = tempfile::tempdir().unwrap();
        let config = config(temp.path(), &format!("{}/graphql", url), &url);
        let client = GitHubClient::new(config.token.clone(), config.retry)
            .with_endpoints(config.graphql_url.clone(), config.api_url.clone());

        let path = generate(Card::Commits, &client, &config, "ghost-user").await.unwrap();

        assert_eq!(path, temp.path().join("stats_commits.svg"));
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains(">N/A<"));
        assert!(svg.contains(">0<"));
    }
}
