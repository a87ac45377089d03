//! Chart Color Tables
//!
//! Presentation policy for the chart renderer, kept as plain lookups so it
//! can be checked without rendering anything.

/// Fixed color per named sentiment
pub const SENTIMENT_COLORS: [(&str, &str); 5] = [
    ("Best", "#4caf50"),
    ("Good", "#8bc34a"),
    ("Average", "#ffc107"),
    ("Fair", "#ff9800"),
    ("Bad", "#f44336"),
];

/// Used for sentiments missing from [`SENTIMENT_COLORS`]
pub const SENTIMENT_FALLBACK: &str = "#9e9e9e";

/// Category bars cycle through this palette by position
pub const CATEGORY_PALETTE: [&str; 8] = [
    "#667eea", "#764ba2", "#f093fb", "#f5576c", "#43e97b", "#38f9d7", "#4facfe", "#00f2fe",
];

pub const RATING_HIGH: &str = "#4caf50";
pub const RATING_MEDIUM: &str = "#ffc107";
pub const RATING_LOW: &str = "#f44336";

/// Stroke and marker color of the timeline series
pub const TIMELINE_COLOR: &str = "#667eea";

/// Color of a sentiment slice. Names match exactly.
pub fn sentiment_color(name: &str) -> &'static str {
    SENTIMENT_COLORS
        .iter()
        .find(|(sentiment, _)| *sentiment == name)
        .map(|(_, color)| *color)
        .unwrap_or(SENTIMENT_FALLBACK)
}

/// Color of the category bar at `index`
pub fn category_color(index: usize) -> &'static str {
    CATEGORY_PALETTE[index % CATEGORY_PALETTE.len()]
}

/// Threshold-coded color of an average rating
pub fn rating_color(rating: f64) -> &'static str {
    if rating >= 4.0 {
        RATING_HIGH
    } else if rating >= 3.0 {
        RATING_MEDIUM
    } else {
        RATING_LOW
    }
}
