use super::{animation_delays, empty_svg, frame, RenderConfig, Tile, FONT_SIZE, FONT_SIZE_SMALL};
use crate::config::Exclusions;
use crate::github::Repository;
use crate::svg::escape;
use log::debug;
use std::collections::HashMap;

/// Languages holding this share of all bytes or more are left out
const DOMINANCE_THRESHOLD: f64 = 0.9;
const MAX_LANGUAGES: usize = 11;
const DEFAULT_COLOR: &str = "#858585";
const START_DELAY: f64 = 0.85;
const END_DELAY: f64 = 2.9;

// Layout constants
const WIDTH: usize = 350;
const BAR_WIDTH: f64 = 300.0;
const BAR_HEIGHT: usize = 8;
const LEGEND_TOP: usize = 26;
const ROW_HEIGHT: usize = 22;
const COLUMN_WIDTH: usize = 150;

/// One language and its share of the counted bytes
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub percent: f64,
    pub color: String,
    pub delay: f64,
}

/// Languages data extracted from owned repositories
#[derive(Debug, Clone, PartialEq)]
pub struct Languages {
    pub languages: Vec<LanguageShare>,
}

struct LanguageTotal {
    name: String,
    bytes: u64,
    color: String,
}

impl Languages {
    /// Aggregate language bytes across repositories.
    ///
    /// Excluded repositories are skipped entirely. A language is dropped when it is
    /// excluded by name or holds at least 90% of all bytes; shares are then computed
    /// against what remains. Order is by share, ties keep first-seen order.
    pub fn from_repositories(repos: &[Repository], exclusions: &Exclusions) -> Self {
        let mut totals: Vec<LanguageTotal> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for repo in repos {
            if exclusions.excludes_repo(&repo.name_with_owner) {
                debug!("Skipping excluded repository {}", repo.name_with_owner);
                continue;
            }
            let Some(languages) = &repo.languages else {
                continue;
            };
            for edge in &languages.edges {
                let slot = *index.entry(edge.node.name.clone()).or_insert_with(|| {
                    totals.push(LanguageTotal {
                        name: edge.node.name.clone(),
                        bytes: 0,
                        color: edge
                            .node
                            .color
                            .clone()
                            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                    });
                    totals.len() - 1
                });
                totals[slot].bytes += edge.size;
            }
        }

        let grand_total: u64 = totals.iter().map(|l| l.bytes).sum();
        if grand_total == 0 {
            return Self { languages: Vec::new() };
        }

        let mut kept: Vec<LanguageTotal> = totals
            .into_iter()
            .filter(|lang| {
                let share = lang.bytes as f64 / grand_total as f64;
                let keep = !exclusions.excludes_language(&lang.name) && share < DOMINANCE_THRESHOLD;
                if !keep {
                    debug!("Leaving out {} ({:.1}% of bytes)", lang.name, share * 100.0);
                }
                keep
            })
            .collect();

        let kept_total: u64 = kept.iter().map(|l| l.bytes).sum();
        kept.sort_by(|a, b| b.bytes.cmp(&a.bytes));
        kept.truncate(MAX_LANGUAGES);

        let delays = animation_delays(kept.len(), START_DELAY, END_DELAY);
        let languages = kept
            .into_iter()
            .zip(delays)
            .map(|(lang, delay)| LanguageShare {
                percent: if kept_total > 0 {
                    lang.bytes as f64 / kept_total as f64 * 100.0
                } else {
                    0.0
                },
                name: lang.name,
                color: lang.color,
                delay,
            })
            .collect();

        Self { languages }
    }
}

impl Tile for Languages {
    fn name(&self) -> &'static str {
        "languages"
    }

    fn render(&self, config: &RenderConfig) -> String {
        if self.languages.is_empty() {
            return empty_svg("No Languages Found", config);
        }

        // Stacked progress bar
        let mut segments = String::new();
        let mut offset = 0.0_f64;
        for lang in &self.languages {
            let width = BAR_WIDTH * lang.percent / 100.0;
            segments.push_str(&format!(
                r#"<rect class="grow" style="animation-delay: {:.2}s" x="{:.2}" y="0" width="{:.2}" height="{}" fill="{}"/>"#,
                lang.delay,
                offset,
                width,
                BAR_HEIGHT,
                escape(&lang.color)
            ));
            offset += width;
        }

        // Two-column legend
        let rows = self.languages.len().div_ceil(2);
        let mut legend = String::new();
        for (i, lang) in self.languages.iter().enumerate() {
            let x = (i / rows) * COLUMN_WIDTH;
            let y = LEGEND_TOP + (i % rows) * ROW_HEIGHT;
            legend.push_str(&format!(
                r#"<g class="fade" style="animation-delay: {:.2}s" transform="translate({}, {})">
        <circle cx="5" cy="6" r="5" fill="{}"/>
        <text x="16" y="10" class="text" font-size="{}">{}</text>
        <text x="{}" y="10" class="muted" font-size="{}" text-anchor="end">{:.2}%</text>
      </g>"#,
                lang.delay,
                x,
                y,
                escape(&lang.color),
                FONT_SIZE,
                escape(&lang.name),
                COLUMN_WIDTH - 10,
                FONT_SIZE_SMALL,
                lang.percent
            ));
        }

        let body = format!(
            r#"<g transform="translate({px}, 0)">
      <rect class="track" width="{bw}" height="{bh}" rx="4"/>
      <mask id="bar-mask"><rect width="{bw}" height="{bh}" rx="4" fill="white"/></mask>
      <g mask="url(#bar-mask)">{segments}</g>
      {legend}
    </g>"#,
            px = super::PADDING_X,
            bw = BAR_WIDTH,
            bh = BAR_HEIGHT,
            segments = segments,
            legend = legend,
        );

        let content_height = LEGEND_TOP + rows * ROW_HEIGHT;
        frame(WIDTH, content_height, &config.title("Most Used Languages"), &body, config)
    }
}
