mod contributions;
mod error;
mod repositories;
#[cfg(test)]
pub(crate) mod test_server;
mod types;

pub use contributions::{fetch_contribution_history, fetch_user_created_at, fetch_viewer_login};
pub use error::ApiError;
pub use repositories::{
    fetch_contributor_stats, fetch_owned_repositories, fetch_profile, fetch_repo_details,
    fetch_traffic_views, list_user_repos, RepoOrder,
};
pub use types::*;

use log::debug;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

const GRAPHQL_API: &str = "https://api.github.com/graphql";
const REST_API: &str = "https://api.github.com";
const CLIENT_USER_AGENT: &str = "stat-cards";

/// How long to keep polling REST endpoints that answer `202 Accepted`
/// while GitHub computes statistics in the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            delay: Duration::from_secs(1),
        }
    }
}

/// Authenticated client for the GitHub GraphQL and REST APIs
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    graphql_url: String,
    rest_url: String,
    retry: RetryPolicy,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            graphql_url: GRAPHQL_API.to_string(),
            rest_url: REST_API.to_string(),
            retry,
        }
    }

    /// Point the client at other endpoints, e.g. a GitHub Enterprise host
    pub fn with_endpoints(mut self, graphql_url: impl Into<String>, rest_url: impl Into<String>) -> Self {
        self.graphql_url = graphql_url.into();
        self.rest_url = rest_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn rest_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.rest_url, endpoint)
    }

    /// Execute a GraphQL query and return the parsed `data` payload
    pub async fn execute_query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ApiError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        debug!("Sending GraphQL request to {}", self.graphql_url);

        let response = self
            .http
            .post(&self.graphql_url)
            .bearer_auth(&self.token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                url: self.graphql_url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let response: GraphQLResponse<T> =
            serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
                url: self.graphql_url.clone(),
                source,
            })?;

        if let Some(errors) = response.errors {
            let messages = errors.into_iter().map(|e| e.message).collect();
            return Err(ApiError::GraphQl(messages));
        }

        debug!("Successfully fetched data from GitHub GraphQL API");

        response.data.ok_or(ApiError::MissingData)
    }

    /// GET a REST endpoint, polling while GitHub answers `202 Accepted`.
    ///
    /// `204 No Content` decodes as JSON `null`, so request an `Option<T>` where
    /// an endpoint may have nothing to say.
    pub async fn get_rest<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let url = self.rest_url(endpoint);

        for attempt in 1..=self.retry.max_attempts {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header(USER_AGENT, CLIENT_USER_AGENT)
                .header(ACCEPT, "application/vnd.github+json")
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::ACCEPTED {
                debug!(
                    "{} is still being computed (attempt {}/{})",
                    url, attempt, self.retry.max_attempts
                );
                if attempt < self.retry.max_attempts {
                    tokio::time::sleep(self.retry.delay).await;
                }
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::Status {
                    url,
                    status: status.as_u16(),
                    body,
                });
            }

            if status == StatusCode::NO_CONTENT {
                return serde_json::from_str("null").map_err(|source| ApiError::Decode { url, source });
            }

            let bytes = response.bytes().await?;
            return serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { url, source });
        }

        Err(ApiError::PollTimeout {
            url,
            attempts: self.retry.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    fn stub_client(url: &str, max_attempts: u32) -> GitHubClient {
        let retry = RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        };
        GitHubClient::new("token", retry).with_endpoints(format!("{}/graphql", url), url)
    }

    #[test]
    fn rest_urls_join_without_double_slash() {
        let client = GitHubClient::new("token", RetryPolicy::default())
            .with_endpoints("https://ghe.example.com/api/graphql", "https://ghe.example.com/api/v3/");
        assert_eq!(
            client.rest_url("/repos/octocat/hello/traffic/views"),
            "https://ghe.example.com/api/v3/repos/octocat/hello/traffic/views"
        );
    }

    #[test]
    fn api_errors_describe_the_failure() {
        let err = ApiError::GraphQl(vec!["first".into(), "second".into()]);
        assert_eq!(err.to_string(), "GraphQL errors: first, second");

        let err = ApiError::PollTimeout {
            url: "https://api.github.com/repos/a/b/stats/contributors".into(),
            attempts: 3,
        };
        assert!(err.to_string().contains("after 3 attempts"));
    }

    #[tokio::test]
    async fn accepted_is_polled_until_attempts_run_out() {
        let (url, hits) = test_server::serve("202 Accepted", "");
        let client = stub_client(&url, 3);

        let err = client
            .get_rest::<Option<Vec<ContributorStats>>>("/repos/octocat/hello/stats/contributors")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::PollTimeout { attempts: 3, .. }), "{:?}", err);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn no_content_decodes_as_null() {
        let (url, hits) = test_server::serve("204 No Content", "");
        let client = stub_client(&url, 3);

        let stats: Option<Vec<ContributorStats>> = client
            .get_rest("/repos/octocat/empty/stats/contributors")
            .await
            .unwrap();

        assert!(stats.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (url, _) = test_server::serve("403 Forbidden", r#"{"message":"Must have push access"}"#);
        let client = stub_client(&url, 3);

        let err = client.get_rest::<TrafficViews>("/repos/a/b/traffic/views").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 403, .. }), "{:?}", err);
    }
}
