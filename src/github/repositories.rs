use super::{
    ContributorStats, GitHubClient, PageInfo, Profile, RepositoriesUser, Repository,
    RepositoryDetails, RestRepository, TrafficViews, UserData,
};
use anyhow::{Context, Result};
use log::debug;

// Query limits
const MAX_PER_PAGE: u32 = 100;
const MAX_LANGUAGES_PER_REPO: u32 = 10;

/// Sort order for the REST repository listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOrder {
    Default,
    RecentlyPushed,
}

impl RepoOrder {
    fn query(self) -> &'static str {
        match self {
            RepoOrder::Default => "",
            RepoOrder::RecentlyPushed => "&sort=pushed&direction=desc",
        }
    }
}

/// All repositories owned by `login`, with stars, forks and their largest languages
pub async fn fetch_owned_repositories(client: &GitHubClient, login: &str) -> Result<Vec<Repository>> {
    let query = format!(
        r#"
        query ($login: String!, $cursor: String) {{
            user(login: $login) {{
                repositories(first: {max_per_page}, after: $cursor, ownerAffiliations: OWNER) {{
                    nodes {{
                        nameWithOwner
                        stargazers {{
                            totalCount
                        }}
                        forkCount
                        languages(first: {max_languages}, orderBy: {{field: SIZE, direction: DESC}}) {{
                            edges {{
                                size
                                node {{
                                    name
                                    color
                                }}
                            }}
                        }}
                    }}
                    pageInfo {{
                        hasNextPage
                        endCursor
                    }}
                }}
            }}
        }}
    "#,
        max_per_page = MAX_PER_PAGE,
        max_languages = MAX_LANGUAGES_PER_REPO
    );

    let mut all_repos = Vec::new();
    let mut page_info = PageInfo {
        has_next_page: true,
        end_cursor: None,
    };

    while page_info.has_next_page {
        debug!("Fetching repositories of {} (cursor: {:?})", login, page_info.end_cursor);

        let variables = serde_json::json!({
            "login": login,
            "cursor": page_info.end_cursor,
        });
        let data: UserData<RepositoriesUser> = client
            .execute_query(&query, variables)
            .await
            .with_context(|| format!("Failed to fetch repositories of {}", login))?;

        let Some(user) = data.user else {
            debug!("User {} not found, no repositories", login);
            break;
        };

        all_repos.extend(user.repositories.nodes);
        page_info = user.repositories.page_info;

        if page_info.has_next_page && page_info.end_cursor.is_none() {
            anyhow::bail!("Missing cursor for next page of repositories");
        }

        debug!("Fetched {} total repositories so far", all_repos.len());
    }

    debug!("Finished fetching all {} repositories", all_repos.len());
    Ok(all_repos)
}

/// Display name and commit contributions of the current year
pub async fn fetch_profile(client: &GitHubClient, login: &str) -> Result<Option<Profile>> {
    let query = r#"
        query ($login: String!) {
            user(login: $login) {
                name
                contributionsCollection {
                    totalCommitContributions
                }
            }
        }
    "#;

    let data: UserData<Profile> = client
        .execute_query(query, serde_json::json!({ "login": login }))
        .await
        .with_context(|| format!("Failed to fetch profile of {}", login))?;

    Ok(data.user)
}

/// List the public repositories of `login` through the paginated REST listing
pub async fn list_user_repos(
    client: &GitHubClient,
    login: &str,
    order: RepoOrder,
) -> Result<Vec<RestRepository>> {
    let mut repos = Vec::new();

    for page in 1.. {
        let endpoint = format!(
            "/users/{}/repos?page={}&per_page={}{}",
            login,
            page,
            MAX_PER_PAGE,
            order.query()
        );
        let batch: Vec<RestRepository> = client
            .get_rest(&endpoint)
            .await
            .with_context(|| format!("Failed to list repositories of {} (page {})", login, page))?;

        if batch.is_empty() {
            break;
        }

        debug!("Page {}: {} repositories", page, batch.len());
        repos.extend(batch);
    }

    debug!("Listed {} repositories of {}", repos.len(), login);
    Ok(repos)
}

pub async fn fetch_repo_details(client: &GitHubClient, full_name: &str) -> Result<RepositoryDetails> {
    client
        .get_rest(&format!("/repos/{}", full_name))
        .await
        .with_context(|| format!("Failed to fetch details of {}", full_name))
}

/// Page views of the last 14 days
pub async fn fetch_traffic_views(client: &GitHubClient, full_name: &str) -> Result<TrafficViews> {
    client
        .get_rest(&format!("/repos/{}/traffic/views", full_name))
        .await
        .with_context(|| format!("Failed to fetch traffic of {}", full_name))
}

/// Weekly additions and deletions per contributor; empty for repositories without history
pub async fn fetch_contributor_stats(client: &GitHubClient, full_name: &str) -> Result<Vec<ContributorStats>> {
    let stats: Option<Vec<ContributorStats>> = client
        .get_rest(&format!("/repos/{}/stats/contributors", full_name))
        .await
        .with_context(|| format!("Failed to fetch contributor stats of {}", full_name))?;

    Ok(stats.unwrap_or_default())
}
