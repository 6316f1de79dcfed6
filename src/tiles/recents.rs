use super::{animation_delays, empty_svg, frame, short_name, RenderConfig, Tile, CHAR_WIDTH, FONT_SIZE, FONT_SIZE_SMALL, PADDING_X};
use crate::calendar::{canonical_day, format_date};
use crate::config::Exclusions;
use crate::github::{RepositoryDetails, RestRepository};
use crate::icons;
use crate::svg::escape;
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;

pub const MAX_RECENTS: usize = 5;
const UNKNOWN_LANGUAGE: &str = "Unknown";
const START_DELAY: f64 = 1.4;
const END_DELAY: f64 = 2.9;

// Layout constants
const MIN_WIDTH: usize = 360;
const ROW_HEIGHT: usize = 24;

/// Public, non-excluded repositories ordered by their latest push, newest first
pub fn select_recent(mut repos: Vec<RestRepository>, exclusions: &Exclusions, limit: usize) -> Vec<RestRepository> {
    repos.retain(|repo| {
        let keep = !repo.private && !exclusions.excludes_repo(&repo.full_name);
        if !keep {
            debug!("Leaving out {}", repo.full_name);
        }
        keep
    });
    repos.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at));
    repos.truncate(limit);
    repos
}

/// A recently updated repository as shown on the card
#[derive(Debug, Clone, PartialEq)]
pub struct RecentRepo {
    pub name: String,
    pub updated_at: DateTime<Utc>,
    pub language: String,
    pub delay: f64,
}

impl RecentRepo {
    pub fn new(name: &str, details: &RepositoryDetails) -> Self {
        Self {
            name: name.to_string(),
            updated_at: details.updated_at,
            language: details
                .language
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            delay: 0.0,
        }
    }
}

/// Recently updated repositories, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct Recents {
    pub repos: Vec<RecentRepo>,
    pub offset: FixedOffset,
}

impl Recents {
    pub fn new(mut repos: Vec<RecentRepo>, offset: FixedOffset) -> Self {
        repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let delays = animation_delays(repos.len(), START_DELAY, END_DELAY);
        for (repo, delay) in repos.iter_mut().zip(delays) {
            repo.delay = delay;
        }

        Self { repos, offset }
    }
}

impl Tile for Recents {
    fn name(&self) -> &'static str {
        "recents"
    }

    fn render(&self, config: &RenderConfig) -> String {
        if self.repos.is_empty() {
            return empty_svg("No Recent Repositories", config);
        }

        let longest = self.repos.iter().map(|r| short_name(&r.name).chars().count()).max().unwrap_or(0);
        let language_x = (longest as f64 * CHAR_WIDTH).ceil() + 35.0;
        let date_x = language_x + 95.0;
        let width = ((PADDING_X * 2) as f64 + date_x + 100.0).max(MIN_WIDTH as f64) as usize;

        let mut rows = String::new();
        for (i, repo) in self.repos.iter().enumerate() {
            let updated = format_date(canonical_day(repo.updated_at, self.offset));
            rows.push_str(&format!(
                r#"
    <g class="fade" style="animation-delay: {:.2}s" transform="translate({}, {})">
      <g class="icon" transform="scale(0.8)">{}</g>
      <text x="20" y="11" class="text" font-size="{}">{}</text>
      <text x="{:.0}" y="11" class="muted" font-size="{}">{}</text>
      <g class="icon" transform="translate({:.0}, 0) scale(0.75)">{}</g>
      <text x="{:.0}" y="11" class="muted" font-size="{}">{}</text>
    </g>"#,
                repo.delay,
                PADDING_X,
                i * ROW_HEIGHT,
                icons::REPO,
                FONT_SIZE,
                escape(short_name(&repo.name)),
                language_x,
                FONT_SIZE_SMALL,
                escape(&repo.language),
                date_x,
                icons::CLOCK,
                date_x + 16.0,
                FONT_SIZE_SMALL,
                updated
            ));
        }

        let content_height = self.repos.len() * ROW_HEIGHT;
        frame(width, content_height, &config.title("Recently Updated"), &rows, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn rest(full_name: &str, private: bool, pushed: Option<DateTime<Utc>>) -> RestRepository {
        RestRepository {
            full_name: full_name.to_string(),
            private,
            pushed_at: pushed,
        }
    }

    fn details(updated_at: DateTime<Utc>, language: Option<&str>) -> RepositoryDetails {
        RepositoryDetails {
            updated_at,
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn selects_public_unexcluded_by_push() {
        let repos = vec![
            rest("me/old", false, Some(at(1, 0))),
            rest("me/secret", true, Some(at(9, 0))),
            rest("me/dotfiles", false, Some(at(8, 0))),
            rest("me/never", false, None),
            rest("me/new", false, Some(at(7, 0))),
        ];

        let selected = select_recent(repos, &Exclusions::new("dotfiles", ""), MAX_RECENTS);
        let names: Vec<&str> = selected.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["me/new", "me/old", "me/never"]);
    }

    #[test]
    fn selection_respects_limit() {
        let repos = (1..=8).map(|d| rest(&format!("me/r{}", d), false, Some(at(d, 0)))).collect();
        let selected = select_recent(repos, &Exclusions::default(), MAX_RECENTS);

        assert_eq!(selected.len(), MAX_RECENTS);
        assert_eq!(selected[0].full_name, "me/r8");
    }

    #[test]
    fn missing_language_is_unknown() {
        assert_eq!(RecentRepo::new("me/a", &details(at(1, 0), None)).language, UNKNOWN_LANGUAGE);
        assert_eq!(RecentRepo::new("me/a", &details(at(1, 0), Some("Rust"))).language, "Rust");
    }

    #[test]
    fn orders_by_update_and_spreads_delays() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let card = Recents::new(
            vec![
                RecentRepo::new("me/a", &details(at(2, 0), None)),
                RecentRepo::new("me/b", &details(at(5, 0), None)),
                RecentRepo::new("me/c", &details(at(3, 0), None)),
            ],
            utc,
        );

        let names: Vec<&str> = card.repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["me/b", "me/c", "me/a"]);
        assert_eq!(card.repos[0].delay, START_DELAY);
        assert!((card.repos[1].delay - 2.15).abs() < 1e-9);
        assert_eq!(card.repos[2].delay, END_DELAY);
    }

    #[test]
    fn renders_dates_in_reference_offset() {
        let ahead = FixedOffset::east_opt(5 * 3600).unwrap();
        let card = Recents::new(vec![RecentRepo::new("me/a", &details(at(4, 22), Some("Rust")))], ahead);
        let svg = card.render(&RenderConfig::new("octocat", false));

        assert_eq!(card.filename(), "stats_recents.svg");
        assert!(svg.contains("Jun 5, 2024"));
        assert!(svg.contains(">Rust<"));
        assert!(svg.contains(">a<"));
        assert!(!svg.contains("me/a"));
    }

    #[test]
    fn empty_renders_placeholder() {
        let card = Recents::new(Vec::new(), FixedOffset::east_opt(0).unwrap());
        assert!(card.render(&RenderConfig::new("octocat", false)).contains("No Recent Repositories"));
    }
}
