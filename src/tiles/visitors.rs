use super::{animation_delays, empty_svg, frame, short_name, RenderConfig, Tile, CHAR_WIDTH, FONT_SIZE, FONT_SIZE_SMALL, PADDING_X};
use crate::calendar::{canonical_day, format_day_month, NOT_AVAILABLE};
use crate::github::TrafficViews;
use crate::icons;
use crate::svg::{escape, format_number};
use chrono::FixedOffset;

const MAX_ROWS: usize = 5;
const START_DELAY: f64 = 1.4;
const END_DELAY: f64 = 2.9;

// Layout constants
const MIN_WIDTH: usize = 320;
const TABLE_HEIGHT: f64 = 100.0;
const VALUE_COLUMN: f64 = 70.0;

/// Unique visitors of one repository over the traffic window
#[derive(Debug, Clone, PartialEq)]
pub struct RepoVisitors {
    pub name: String,
    pub uniques: u64,
    pub date_range: String,
    pub delay: f64,
}

impl RepoVisitors {
    /// `None` when nobody visited. The range spans the first and last recorded view.
    pub fn summarize(name: &str, traffic: &TrafficViews, offset: FixedOffset) -> Option<Self> {
        if traffic.uniques == 0 {
            return None;
        }

        let first = traffic.views.iter().map(|v| v.timestamp).min();
        let last = traffic.views.iter().map(|v| v.timestamp).max();
        let date_range = match (first, last) {
            (Some(first), Some(last)) => format!(
                "{} - {}",
                format_day_month(canonical_day(first, offset)),
                format_day_month(canonical_day(last, offset))
            ),
            _ => NOT_AVAILABLE.to_string(),
        };

        Some(Self {
            name: name.to_string(),
            uniques: traffic.uniques,
            date_range,
            delay: 0.0,
        })
    }
}

/// Most visited repositories
#[derive(Debug, Clone, PartialEq)]
pub struct Visitors {
    pub repos: Vec<RepoVisitors>,
}

impl Visitors {
    /// Keep the five repositories with the most unique visitors, ties in input order
    pub fn new(mut repos: Vec<RepoVisitors>) -> Self {
        repos.sort_by(|a, b| b.uniques.cmp(&a.uniques));
        repos.truncate(MAX_ROWS);

        let delays = animation_delays(repos.len(), START_DELAY, END_DELAY);
        for (repo, delay) in repos.iter_mut().zip(delays) {
            repo.delay = delay;
        }

        Self { repos }
    }

    pub fn row_height(&self) -> f64 {
        TABLE_HEIGHT / self.repos.len().max(1) as f64
    }
}

impl Tile for Visitors {
    fn name(&self) -> &'static str {
        "visitors"
    }

    fn render(&self, config: &RenderConfig) -> String {
        if self.repos.is_empty() {
            return empty_svg("No Visitors Yet", config);
        }

        let longest = self.repos.iter().map(|r| short_name(&r.name).chars().count()).max().unwrap_or(0);
        let name_column = (longest as f64 * CHAR_WIDTH).ceil() + 30.0;
        let range_x = name_column + VALUE_COLUMN;
        let width = ((PADDING_X * 2) as f64 + range_x + 90.0).max(MIN_WIDTH as f64) as usize;
        let row_height = self.row_height();

        let mut rows = String::new();
        for (i, repo) in self.repos.iter().enumerate() {
            rows.push_str(&format!(
                r#"
    <g class="fade" style="animation-delay: {:.2}s" transform="translate({}, {:.2})">
      <g class="icon" transform="scale(0.8)">{}</g>
      <text x="20" y="11" class="text" font-size="{}">{}</text>
      <text x="{:.0}" y="11" class="text" font-size="{}" font-weight="bold" text-anchor="end">{}</text>
      <text x="{:.0}" y="11" class="muted" font-size="{}">{}</text>
    </g>"#,
                repo.delay,
                PADDING_X,
                i as f64 * row_height,
                icons::EYE,
                FONT_SIZE,
                escape(short_name(&repo.name)),
                name_column + VALUE_COLUMN - 15.0,
                FONT_SIZE,
                format_number(repo.uniques),
                range_x,
                FONT_SIZE_SMALL,
                escape(&repo.date_range)
            ));
        }

        frame(width, TABLE_HEIGHT as usize, &config.title("Repository Visitors"), &rows, config)
    }
}
