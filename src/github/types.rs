use crate::streak::ContributionDay;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CountConnection {
    pub total_count: u64,
}

// GraphQL: viewer / user

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedAt {
    pub created_at: DateTime<Utc>,
}

// GraphQL: contribution calendar

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUser {
    pub contributions_collection: CalendarCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDayNode {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

impl From<ContributionDayNode> for ContributionDay {
    fn from(node: ContributionDayNode) -> Self {
        ContributionDay::new(node.date, node.contribution_count)
    }
}

impl ContributionCalendar {
    /// Flatten the week grid into daily records
    pub fn into_days(self) -> impl Iterator<Item = ContributionDay> {
        self.weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(ContributionDay::from)
    }
}

// GraphQL: owned repositories

#[derive(Debug, Deserialize)]
pub struct RepositoriesUser {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub nodes: Vec<Repository>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name_with_owner: String,
    pub stargazers: CountConnection,
    pub fork_count: u64,
    pub languages: Option<LanguageConnection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LanguageConnection {
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LanguageEdge {
    pub size: u64,
    pub node: Language,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Language {
    pub name: String,
    pub color: Option<String>,
}

// GraphQL: profile

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: Option<String>,
    pub contributions_collection: CommitContributions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitContributions {
    pub total_commit_contributions: u64,
}

// REST

#[derive(Debug, Deserialize, Clone)]
pub struct RestRepository {
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub pushed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryDetails {
    pub updated_at: DateTime<Utc>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrafficViews {
    #[serde(default)]
    pub uniques: u64,
    #[serde(default)]
    pub views: Vec<ViewCount>,
}

#[derive(Debug, Deserialize)]
pub struct ViewCount {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct ContributorStats {
    pub author: Option<Author>,
    #[serde(default)]
    pub weeks: Vec<ContributorWeek>,
}

#[derive(Debug, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct ContributorWeek {
    #[serde(rename = "a", default)]
    pub additions: u64,
    #[serde(rename = "d", default)]
    pub deletions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_contribution_calendar() {
        let json = r#"{
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": 7,
                        "weeks": [
                            {"contributionDays": [
                                {"date": "2023-12-31", "contributionCount": 3},
                                {"date": "2024-01-01", "contributionCount": 0}
                            ]},
                            {"contributionDays": [
                                {"date": "2024-01-02", "contributionCount": 4}
                            ]}
                        ]
                    }
                }
            }
        }"#;

        let data: UserData<CalendarUser> = serde_json::from_str(json).unwrap();
        let calendar = data.user.unwrap().contributions_collection.contribution_calendar;
        assert_eq!(calendar.total_contributions, 7);

        let days: Vec<_> = calendar.into_days().collect();
        assert_eq!(
            days,
            vec![
                ContributionDay::new(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 3),
                ContributionDay::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 0),
                ContributionDay::new(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 4),
            ]
        );
    }

    #[test]
    fn decodes_graphql_errors_without_data() {
        let json = r#"{"data": null, "errors": [{"message": "Could not resolve to a User"}]}"#;
        let response: GraphQLResponse<UserData<UserCreatedAt>> = serde_json::from_str(json).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap()[0].message, "Could not resolve to a User");
    }

    #[test]
    fn decodes_contributor_stats_with_missing_fields() {
        let json = r#"[
            {"author": {"login": "octocat"}, "total": 3, "weeks": [{"w": 1, "a": 10, "d": 2, "c": 1}, {"w": 2, "c": 0}]},
            {"author": null, "weeks": []}
        ]"#;
        let stats: Vec<ContributorStats> = serde_json::from_str(json).unwrap();
        assert_eq!(stats[0].author.as_ref().unwrap().login, "octocat");
        assert_eq!(stats[0].weeks[0].additions, 10);
        assert_eq!(stats[0].weeks[1].deletions, 0);
        assert!(stats[1].author.is_none());
    }

    #[test]
    fn decodes_traffic_views() {
        let json = r#"{"count": 14, "uniques": 3, "views": [
            {"timestamp": "2024-05-06T00:00:00Z", "count": 9, "uniques": 2},
            {"timestamp": "2024-05-09T00:00:00Z", "count": 5, "uniques": 1}
        ]}"#;
        let traffic: TrafficViews = serde_json::from_str(json).unwrap();
        assert_eq!(traffic.uniques, 3);
        assert_eq!(traffic.views.iter().map(|v| v.count).sum::<u64>(), 14);
    }
}
