use super::{frame, RenderConfig, Tile, FONT_SIZE};
use crate::calendar::format_range;
use crate::icons;
use crate::streak::{ContributionHistory, Streaks};
use chrono::NaiveDate;
use log::debug;

// Layout constants
const WIDTH: usize = 495;
const COLUMN_WIDTH: f64 = 165.0;
const CONTENT_HEIGHT: usize = 140;
const RING_RADIUS: usize = 40;

/// Contribution totals and streaks, pre-formatted for the streak card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStreaks {
    pub total_contributions: u64,
    pub commit_date_range: String,
    pub current_streak: u32,
    pub current_streak_range: String,
    pub longest_streak: u32,
    pub longest_streak_range: String,
}

impl CommitStreaks {
    /// Summarize a reconciled history. `joined` is the account creation day; the
    /// first active day stands in when it is unknown.
    pub fn from_history(history: &ContributionHistory, joined: Option<NaiveDate>) -> Self {
        let Streaks { longest, current } = history.streaks();
        let since = joined.or_else(|| history.first_active_day());
        if current.is_empty() {
            debug!("No active streak as of {}", history.as_of());
        }

        debug!(
            "Streaks as of {}: current {} ({:?} - {:?}), longest {} ({:?} - {:?})",
            history.as_of(),
            current.length,
            current.start,
            current.end,
            longest.length,
            longest.start,
            longest.end
        );

        Self {
            total_contributions: history.total(),
            commit_date_range: format_range(since, since.map(|_| history.as_of())),
            current_streak: current.length,
            current_streak_range: format_range(current.start, current.end),
            longest_streak: longest.length,
            longest_streak_range: format_range(longest.start, longest.end),
        }
    }
}

fn column_center(index: usize) -> f64 {
    COLUMN_WIDTH * index as f64 + COLUMN_WIDTH / 2.0
}

fn stat_column(index: usize, value: &str, label: &str, range: &str, delay: f64) -> String {
    format!(
        r#"<g class="fade" style="animation-delay: {delay:.2}s">
      <text x="{x}" y="52" class="text" font-size="28" font-weight="700" text-anchor="middle">{value}</text>
      <text x="{x}" y="88" class="text" font-size="14" text-anchor="middle">{label}</text>
      <text x="{x}" y="112" class="muted" font-size="{font}" text-anchor="middle">{range}</text>
    </g>"#,
        delay = delay,
        x = column_center(index),
        value = value,
        label = label,
        range = range,
        font = FONT_SIZE,
    )
}

impl Tile for CommitStreaks {
    fn name(&self) -> &'static str {
        "commits"
    }

    fn render(&self, config: &RenderConfig) -> String {
        debug!("Rendering commits tile");
        let center = column_center(1);

        let total = stat_column(
            0,
            &self.total_contributions.to_string(),
            "Total Contributions",
            &self.commit_date_range,
            0.6,
        );
        let longest = stat_column(
            2,
            &self.longest_streak.to_string(),
            "Longest Streak",
            &self.longest_streak_range,
            1.4,
        );

        let current = format!(
            r#"<g class="fade" style="animation-delay: 1.0s">
      <circle cx="{cx}" cy="{cy}" r="{r}" class="ring" fill="none" stroke-width="5"/>
      <g class="accent" transform="translate({fx}, {fy})">{flame}</g>
      <text x="{cx}" y="{vy}" class="text" font-size="28" font-weight="700" text-anchor="middle">{value}</text>
      <text x="{cx}" y="110" class="accent" font-size="14" font-weight="600" text-anchor="middle">Current Streak</text>
      <text x="{cx}" y="130" class="muted" font-size="{font}" text-anchor="middle">{range}</text>
    </g>"#,
            cx = center,
            cy = RING_RADIUS,
            r = RING_RADIUS,
            fx = center - 8.0,
            fy = -8,
            flame = icons::FLAME,
            vy = RING_RADIUS + 10,
            value = self.current_streak,
            font = FONT_SIZE,
            range = self.current_streak_range,
        );

        let dividers = format!(
            r#"<line x1="{a}" y1="10" x2="{a}" y2="120" class="ring" stroke-width="1"/>
    <line x1="{b}" y1="10" x2="{b}" y2="120" class="ring" stroke-width="1"/>"#,
            a = COLUMN_WIDTH,
            b = COLUMN_WIDTH * 2.0,
        );

        let body = format!("{}\n    {}\n    {}\n    {}", dividers, total, current, longest);
        frame(WIDTH, CONTENT_HEIGHT, &config.title("Contribution Streaks"), &body, config)
    }
}
