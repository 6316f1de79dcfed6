mod commits;
mod general;
mod languages;
mod recents;
mod visitors;

pub use commits::CommitStreaks;
pub use general::{lines_changed, total_views, GeneralStats};
pub use languages::Languages;
pub use recents::{select_recent, RecentRepo, Recents, MAX_RECENTS};
pub use visitors::{RepoVisitors, Visitors};

use crate::svg::escape;
use crate::theme::{Theme, DARK, LIGHT};

// Layout constants
pub const BORDER_RADIUS: f64 = 4.5;
pub const PADDING_X: usize = 25;
pub const TITLE_Y: usize = 35;
pub const CONTENT_Y: usize = 55;
pub const FOOTER_HEIGHT: usize = 22;
pub const FONT_SIZE: usize = 12;
pub const FONT_SIZE_SMALL: usize = 11;
pub const CHAR_WIDTH: f64 = 7.0;

/// Configuration for rendering a tile
pub struct RenderConfig<'a> {
    pub username: &'a str,
    pub show_username: bool,
    pub light: Theme,
    pub dark: Theme,
    pub last_update: Option<String>,
}

impl<'a> RenderConfig<'a> {
    pub fn new(username: &'a str, show_username: bool) -> Self {
        Self {
            username,
            show_username,
            light: LIGHT,
            dark: DARK,
            last_update: None,
        }
    }

    pub fn with_last_update(mut self, last_update: Option<String>) -> Self {
        self.last_update = last_update;
        self
    }

    /// Generate title with optional username prefix
    pub fn title(&self, base_title: &str) -> String {
        if self.show_username {
            format!("{}'s {}", self.username, base_title)
        } else {
            base_title.to_string()
        }
    }
}

/// Trait for generating SVG tiles
pub trait Tile {
    /// The base name of the tile (e.g., "commits", "languages")
    fn name(&self) -> &'static str;

    /// Render the tile as an SVG string
    fn render(&self, config: &RenderConfig) -> String;

    /// Output filename
    fn filename(&self) -> String {
        format!("stats_{}.svg", self.name())
    }
}

/// Repository name without its owner: `octocat/hello` becomes `hello`
pub fn short_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}

/// Evenly spaced animation delays, first row at `start` and last row at `end`
pub fn animation_delays(count: usize, start: f64, end: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// Common CSS styles for SVG tiles
pub const SVG_STYLES: &str = "text { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; } \
.title { font-size: 16px; font-weight: 600; } \
.fade { opacity: 0; animation: fade-in 0.6s ease-in-out forwards; } \
.grow { transform-box: fill-box; transform-origin: left; transform: scaleX(0); animation: grow 0.8s ease-out forwards; } \
@keyframes fade-in { to { opacity: 1; } } \
@keyframes grow { to { transform: scaleX(1); } }";

fn palette(theme: &Theme) -> String {
    format!(
        ".overlay {{ fill: {}; stroke: {}; }} \
.card {{ fill: {}; stroke: {}; }} \
.title {{ fill: {}; }} \
.text {{ fill: {}; }} \
.muted {{ fill: {}; }} \
.accent {{ fill: {}; }} \
.ring {{ stroke: {}; }} \
.icon {{ fill: {}; }} \
.track {{ fill: {}; stroke: {}; }}",
        theme.overlay,
        theme.border,
        theme.card_fill,
        theme.card_stroke,
        theme.title,
        theme.text,
        theme.muted,
        theme.accent,
        theme.accent,
        theme.icon,
        theme.track,
        theme.track_outline,
    )
}

/// Stylesheet with the light palette and the dark one behind a media query
pub fn stylesheet(config: &RenderConfig) -> String {
    format!(
        "{} {} @media (prefers-color-scheme: dark) {{ {} }}",
        SVG_STYLES,
        palette(&config.light),
        palette(&config.dark)
    )
}

/// Wrap card content in the outer frame: background, border, title and footer.
///
/// `content_height` covers everything below the title; the footer is added when
/// a last-update timestamp is configured.
pub fn frame(width: usize, content_height: usize, title: &str, body: &str, config: &RenderConfig) -> String {
    let footer_height = if config.last_update.is_some() { FOOTER_HEIGHT } else { 0 };
    let height = CONTENT_Y + content_height + footer_height;

    let footer = config
        .last_update
        .as_deref()
        .map(|updated| {
            format!(
                r#"<text x="{}" y="{}" class="muted" font-size="10" text-anchor="end">Updated {}</text>"#,
                width - PADDING_X / 2,
                height - 9,
                escape(updated)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <style>{style}</style>
  <rect class="overlay" x="0.5" y="0.5" width="{iw}" height="{ih}" rx="{r}"/>
  <rect class="card" x="4.5" y="4.5" width="{cw}" height="{ch}" rx="{r}"/>
  <text x="{px}" y="{ty}" class="title">{title}</text>
  <g transform="translate(0, {cy})">
    {body}
  </g>
  {footer}
</svg>"#,
        w = width,
        h = height,
        style = stylesheet(config),
        iw = width - 1,
        ih = height - 1,
        cw = width - 9,
        ch = height - 9,
        r = BORDER_RADIUS,
        px = PADDING_X,
        ty = TITLE_Y,
        title = escape(title),
        cy = CONTENT_Y,
        body = body,
        footer = footer,
    )
}

/// Generate an empty placeholder SVG
pub fn empty_svg(message: &str, config: &RenderConfig) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="350" height="100" viewBox="0 0 350 100">
  <style>{}</style>
  <rect class="overlay" x="0.5" y="0.5" width="349" height="99" rx="{}"/>
  <text x="175" y="55" class="text" font-size="14" text-anchor="middle">{}</text>
</svg>"#,
        stylesheet(config),
        BORDER_RADIUS,
        escape(message)
    )
}
