use super::{CalendarUser, ContributionCalendar, GitHubClient, UserCreatedAt, UserData, ViewerData};
use crate::calendar::year_windows;
use crate::streak::ContributionDay;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::time::Duration;

/// Pause between yearly calendar requests
const CHUNK_DELAY: Duration = Duration::from_millis(250);

/// Login of the user owning the token
pub async fn fetch_viewer_login(client: &GitHubClient) -> Result<String> {
    let query = r#"
        query {
            viewer {
                login
            }
        }
    "#;

    let data: ViewerData = client
        .execute_query(query, serde_json::json!({}))
        .await
        .context("Failed to resolve the authenticated user")?;

    debug!("Resolved viewer login: {}", data.viewer.login);
    Ok(data.viewer.login)
}

/// Account creation time, or `None` if the user does not exist
pub async fn fetch_user_created_at(client: &GitHubClient, login: &str) -> Result<Option<DateTime<Utc>>> {
    let query = r#"
        query ($login: String!) {
            user(login: $login) {
                createdAt
            }
        }
    "#;

    let data: UserData<UserCreatedAt> = client
        .execute_query(query, serde_json::json!({ "login": login }))
        .await
        .with_context(|| format!("Failed to fetch creation date of {}", login))?;

    if data.user.is_none() {
        warn!("User {} not found", login);
    }

    Ok(data.user.map(|user| user.created_at))
}

/// Fetch every daily contribution record between `from` and `to`.
///
/// GitHub limits a contributions query to one year, so the range is fetched in
/// yearly windows and the results concatenated. Windows share their boundary day;
/// streak computation reconciles the duplicates.
pub async fn fetch_contribution_history(
    client: &GitHubClient,
    login: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<ContributionDay>> {
    let windows = year_windows(from, to);
    debug!("Fetching contributions of {} in {} yearly windows", login, windows.len());

    let mut days = Vec::new();
    for (i, (start, end)) in windows.into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(CHUNK_DELAY).await;
        }

        let calendar = fetch_calendar(client, login, start, end).await?;
        debug!(
            "Window {} - {}: {} contributions",
            start.date_naive(),
            end.date_naive(),
            calendar.total_contributions
        );
        days.extend(calendar.into_days());
    }

    debug!("Fetched {} daily records", days.len());
    Ok(days)
}

async fn fetch_calendar(
    client: &GitHubClient,
    login: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<ContributionCalendar> {
    let query = r#"
        query ($login: String!, $from: DateTime!, $to: DateTime!) {
            user(login: $login) {
                contributionsCollection(from: $from, to: $to) {
                    contributionCalendar {
                        totalContributions
                        weeks {
                            contributionDays {
                                date
                                contributionCount
                            }
                        }
                    }
                }
            }
        }
    "#;

    let variables = serde_json::json!({
        "login": login,
        "from": from.to_rfc3339(),
        "to": to.to_rfc3339(),
    });

    let data: UserData<CalendarUser> = client
        .execute_query(query, variables)
        .await
        .with_context(|| format!("Failed to fetch contributions from {} to {}", from, to))?;

    Ok(data
        .user
        .map(|user| user.contributions_collection.contribution_calendar)
        .unwrap_or_default())
}
