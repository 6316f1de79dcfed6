/// Card palette. Every card embeds both palettes and switches with `prefers-color-scheme`.
#[derive(Clone, Copy)]
pub struct Theme {
    pub overlay: &'static str,
    pub border: &'static str,
    pub card_fill: &'static str,
    pub card_stroke: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub icon: &'static str,
    pub track: &'static str,
    pub track_outline: &'static str,
}

pub const LIGHT: Theme = Theme {
    overlay: "rgba(225, 228, 232, 0.1)",
    border: "rgb(225, 228, 232)",
    card_fill: "none",
    card_stroke: "rgb(225, 228, 232)",
    title: "#006AFF",
    text: "#1f2328",
    muted: "rgb(88, 96, 105)",
    accent: "#006AFF",
    icon: "rgb(88, 96, 105)",
    track: "#e1e4e8",
    track_outline: "rgb(225, 228, 232)",
};

pub const DARK: Theme = Theme {
    overlay: "none",
    border: "rgba(225, 228, 232, 0.5)",
    card_fill: "none",
    card_stroke: "rgba(225, 228, 232, 0.5)",
    title: "#006AFF",
    text: "#c9d1d9",
    muted: "#8b949e",
    accent: "#006AFF",
    icon: "#8b949e",
    track: "rgba(110, 118, 129, 0.4)",
    track_outline: "#393f47",
};
