//! Chart Section
//!
//! Maps a [`ChartsData`] onto four ECharts visualizations. Every visual
//! encoding is a direct lookup from an input field; nothing is sorted,
//! bucketed or aggregated here.

use charming::{
    component::{Axis, Grid, Legend},
    datatype::DataPointItem,
    element::{AxisType, ItemStyle, Label, Tooltip, Trigger},
    series::{Bar, Line, Pie},
    Chart,
};
use maud::{html, Markup, PreEscaped};

use crate::backend::{CategoryRating, ChartsData, NamedValue};
use crate::palette;

/// The four charts of the dashboard, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Sentiment,
    Category,
    Rating,
    Timeline,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Sentiment,
        ChartKind::Category,
        ChartKind::Rating,
        ChartKind::Timeline,
    ];

    /// Stable key, used as `data-chart` attribute
    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::Sentiment => "sentiment",
            ChartKind::Category => "category",
            ChartKind::Rating => "rating",
            ChartKind::Timeline => "timeline",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Sentiment => "Sentiment Distribution",
            ChartKind::Category => "Complaints by Category",
            ChartKind::Rating => "Average Rating by Category",
            ChartKind::Timeline => "Complaints Timeline",
        }
    }

    /// Id of the element the chart is mounted on
    pub fn element_id(&self) -> String {
        format!("{}-chart", self.key())
    }
}

/// A chart ready to embed: its kind plus serialized ECharts options
pub struct DashboardChart {
    pub kind: ChartKind,
    pub options: String,
}

/// One colored datum of a pie or bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct ColoredValue {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

pub fn sentiment_slices(data: &[NamedValue]) -> Vec<ColoredValue> {
    data.iter()
        .map(|entry| ColoredValue {
            label: entry.name.clone(),
            value: entry.value,
            color: palette::sentiment_color(&entry.name),
        })
        .collect()
}

pub fn category_bars(data: &[NamedValue]) -> Vec<ColoredValue> {
    data.iter()
        .enumerate()
        .map(|(index, entry)| ColoredValue {
            label: entry.name.clone(),
            value: entry.value,
            color: palette::category_color(index),
        })
        .collect()
}

pub fn rating_bars(data: &[CategoryRating]) -> Vec<ColoredValue> {
    data.iter()
        .map(|entry| ColoredValue {
            label: entry.category.clone(),
            value: entry.rating,
            color: palette::rating_color(entry.rating),
        })
        .collect()
}

fn colored_items(values: &[ColoredValue]) -> Vec<DataPointItem> {
    values
        .iter()
        .map(|v| {
            DataPointItem::new(v.value)
                .name(v.label.clone())
                .item_style(ItemStyle::new().color(v.color))
        })
        .collect()
}

fn labels(values: &[ColoredValue]) -> Vec<String> {
    values.iter().map(|v| v.label.clone()).collect()
}

fn grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

pub fn sentiment_chart(data: &[NamedValue]) -> Chart {
    let slices = sentiment_slices(data);

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name("Sentiment")
                .radius("60%")
                .label(Label::new().show(true).formatter("{b}: {c}"))
                .data(colored_items(&slices)),
        )
}

pub fn category_chart(data: &[NamedValue]) -> Chart {
    let bars = category_bars(data);

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels(&bars)))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Count").data(colored_items(&bars)))
}

/// Horizontal bars on a fixed 0-5 scale
pub fn rating_chart(data: &[CategoryRating]) -> Chart {
    let bars = rating_bars(data);

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Value).min(0).max(5))
        .y_axis(Axis::new().type_(AxisType::Category).data(labels(&bars)))
        .series(Bar::new().name("Avg Rating").data(colored_items(&bars)))
}

pub fn timeline_chart(data: &[crate::backend::DatedCount]) -> Chart {
    let dates: Vec<String> = data.iter().map(|p| p.date.clone()).collect();
    let counts: Vec<f64> = data.iter().map(|p| p.count).collect();

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .grid(grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(dates))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Line::new()
                .name("Complaints")
                .item_style(ItemStyle::new().color(palette::TIMELINE_COLOR))
                .data(counts),
        )
}

/// Build all four charts, one per [`ChartKind`]
pub fn build_charts(charts: &ChartsData) -> Vec<DashboardChart> {
    ChartKind::ALL
        .iter()
        .map(|&kind| {
            let chart = match kind {
                ChartKind::Sentiment => sentiment_chart(&charts.sentiment_distribution),
                ChartKind::Category => category_chart(&charts.category_distribution),
                ChartKind::Rating => rating_chart(&charts.rating_by_category),
                ChartKind::Timeline => timeline_chart(&charts.time_series),
            };
            DashboardChart {
                kind,
                options: chart.to_string(),
            }
        })
        .collect()
}

/// Chart section: placeholder when there is no data, four cards otherwise
pub fn charts_view(charts: Option<&ChartsData>) -> Markup {
    let Some(data) = charts else {
        return html! {
            div class="charts-empty" {
                p { "No data available for charts" }
            }
        };
    };

    let built = build_charts(data);

    html! {
        div class="charts-container" {
            @if data.has_summary() {
                (summary_strip(data))
            }
            div class="charts-grid" {
                @for (index, chart) in built.iter().enumerate() {
                    div class="chart-card card fade-in"
                        data-chart=(chart.kind.key())
                        style=(format!("animation-delay: {:.1}s", index as f64 * 0.1))
                    {
                        div class="card-header" {
                            h3 class="card-title" { (chart.kind.title()) }
                        }
                        div id=(chart.kind.element_id()) class="chart-canvas" {}
                    }
                }
            }
            (charts_script(&built))
        }
    }
}

fn summary_strip(data: &ChartsData) -> Markup {
    html! {
        div class="summary-strip" {
            @if let Some(total) = data.total_complaints {
                div class="summary-stat card" {
                    span class="summary-value" { (total) }
                    span class="summary-label" { "Total Complaints" }
                }
            }
            @if let Some(priority) = data.priority_count {
                div class="summary-stat card" {
                    span class="summary-value" { (priority) }
                    span class="summary-label" { "Priority Issues" }
                }
            }
            @if let Some(mean) = data.confidence_stats.as_ref().and_then(|s| s.mean) {
                div class="summary-stat card" {
                    span class="summary-value" { (format!("{:.1}%", mean * 100.0)) }
                    span class="summary-label" { "Mean Confidence" }
                }
            }
        }
    }
}

/// Inline script mounting each chart; follows the page's `data-theme`
fn charts_script(charts: &[DashboardChart]) -> Markup {
    let mounts = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
    const dom = document.getElementById("{}");
    if (!dom || typeof echarts === "undefined") return;
    const dark = document.documentElement.getAttribute("data-theme") === "dark";
    const chart = echarts.init(dom, dark ? "dark" : null);
    chart.setOption({});
    window.addEventListener("resize", () => chart.resize());
}})();"#,
                chart.kind.element_id(),
                script_safe(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    html! {
        script { (PreEscaped(mounts)) }
    }
}

/// Keep backend-supplied strings from closing the surrounding script tag
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
