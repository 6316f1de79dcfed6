use super::{frame, RenderConfig, Tile, FONT_SIZE, PADDING_X};
use crate::github::{ContributorStats, Profile, Repository, TrafficViews};
use crate::icons;
use crate::svg::format_number;
use anyhow::Result;
use log::{debug, warn};

const WIDTH: usize = 380;

/// Statistics summed over the owned, non-excluded repositories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralStats {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
    pub contributions: u64,
    pub lines_changed: u64,
    pub views: u64,
    pub repos: usize,
}

impl GeneralStats {
    /// `repos` must already have exclusions applied. The display name falls back
    /// to the login, and a missing profile counts as zero contributions.
    pub fn new(login: &str, profile: Option<&Profile>, repos: &[&Repository], lines_changed: u64, views: u64) -> Self {
        let name = profile
            .and_then(|p| p.name.clone())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| login.to_string());

        Self {
            name,
            stars: repos.iter().map(|r| r.stargazers.total_count).sum(),
            forks: repos.iter().map(|r| r.fork_count).sum(),
            contributions: profile
                .map(|p| p.contributions_collection.total_commit_contributions)
                .unwrap_or(0),
            lines_changed,
            views,
            repos: repos.len(),
        }
    }
}

/// Additions plus deletions authored by `login`. Repositories whose stats could
/// not be fetched contribute nothing.
pub fn lines_changed(login: &str, per_repo: &[(String, Result<Vec<ContributorStats>>)]) -> u64 {
    let mut total = 0;

    for (repo, stats) in per_repo {
        let stats = match stats {
            Ok(stats) => stats,
            Err(err) => {
                warn!("Ignoring contributor stats of {}: {:#}", repo, err);
                continue;
            }
        };

        let changed: u64 = stats
            .iter()
            .filter(|s| s.author.as_ref().is_some_and(|a| a.login.eq_ignore_ascii_case(login)))
            .flat_map(|s| &s.weeks)
            .map(|w| w.additions + w.deletions)
            .sum();

        debug!("{}: {} lines changed", repo, changed);
        total += changed;
    }

    total
}

/// Page views summed over repositories. Failed lookups count as zero.
pub fn total_views(per_repo: &[(String, Result<TrafficViews>)]) -> u64 {
    per_repo
        .iter()
        .map(|(repo, traffic)| match traffic {
            Ok(traffic) => traffic.views.iter().map(|v| v.count).sum(),
            Err(err) => {
                warn!("Ignoring traffic of {}: {:#}", repo, err);
                0
            }
        })
        .sum()
}

impl Tile for GeneralStats {
    fn name(&self) -> &'static str {
        "general"
    }

    fn render(&self, config: &RenderConfig) -> String {
        let title = format!("{}'s GitHub Statistics", self.name);

        let items: [(&str, u64, &str); 6] = [
            ("Total Stars", self.stars, icons::STAR),
            ("Total Forks", self.forks, icons::FORK),
            ("Commits This Year", self.contributions, icons::COMMIT),
            ("Lines Changed", self.lines_changed, icons::DIFF),
            ("Views (14 days)", self.views, icons::EYE),
            ("Repositories", self.repos as u64, icons::REPO),
        ];

        let mut rows = String::new();
        for (i, (label, value, icon)) in items.iter().enumerate() {
            let row = i / 2;
            let col = i % 2;
            let x = PADDING_X + col * 175;
            let y = row * 35;

            rows.push_str(&format!(
                r#"
    <g class="fade" style="animation-delay: {:.2}s" transform="translate({}, {})">
      <g class="icon" transform="scale(0.875)">{}</g>
      <text x="22" y="12" class="text" font-size="{}">{}: <tspan font-weight="bold">{}</tspan></text>
    </g>"#,
                0.3 + i as f64 * 0.15,
                x,
                y,
                icon,
                FONT_SIZE,
                label,
                format_number(*value)
            ));
        }

        frame(WIDTH, 3 * 35, &title, &rows, config)
    }
}
