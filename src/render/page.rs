//! Dashboard Page
//!
//! Full HTML document for one [`ViewState`] snapshot: header with actions,
//! one of the four view branches, and the transient toast.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::charts::charts_view;
use super::report::report_view;
use super::STYLESHEET;
use crate::controller::{Toast, ViewBranch, ViewState};
use crate::theme::Theme;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// How the page is served
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Render action forms and poll while busy. Off for static snapshots.
    pub interactive: bool,
    /// Reload delay while a request is in flight
    pub refresh_interval_ms: u64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            refresh_interval_ms: 1000,
        }
    }
}

impl PageOptions {
    /// Self-contained page without actions, for saving to disk
    pub fn snapshot() -> Self {
        Self {
            interactive: false,
            ..Default::default()
        }
    }
}

/// Render the dashboard.
///
/// `downloads` are URLs fetched as file downloads once, on load.
pub fn render_page(view: &ViewState, downloads: &[String], options: &PageOptions) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(view.theme.as_str()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "CRM Analytics Dashboard" }
                @if options.interactive {
                    link rel="stylesheet" href="/assets/dashboard.css";
                } @else {
                    style { (PreEscaped(STYLESHEET)) }
                }
                script src=(ECHARTS_CDN) {}
            }
            body {
                div class="admin-panel" {
                    (header(view, options))
                    main class="admin-content" {
                        (body(view))
                    }
                }
                @if let Some(t) = &view.toast {
                    (toast(t))
                }
                @if options.interactive {
                    (open_downloads(downloads))
                    @if view.is_busy() {
                        script {
                            (PreEscaped(format!(
                                "setTimeout(() => window.location.replace(\"/\"), {});",
                                options.refresh_interval_ms
                            )))
                        }
                    }
                }
            }
        }
    }
}

fn header(view: &ViewState, options: &PageOptions) -> Markup {
    let next_theme = view.theme.toggled();

    html! {
        header class="admin-header" {
            div class="header-content" {
                div class="title-section" {
                    h1 class="main-title" { "CRM Analytics Dashboard" }
                    p class="subtitle" { "AI-Powered Customer Feedback Analysis" }
                }
                @if options.interactive {
                    div class="header-actions" {
                        form method="post" action="/actions/toggle-theme" {
                            button class="theme-toggle" type="submit"
                                aria-label="Toggle theme"
                                title=(format!("Switch to {} mode", next_theme))
                            {
                                (theme_icon(view.theme))
                            }
                        }
                        form method="post" action="/actions/generate-report" {
                            button class="btn btn-primary" type="submit"
                                data-action="generate-report"
                                disabled[!view.can_generate()]
                            {
                                @if view.loading {
                                    span class="spinner-small" {}
                                    "Generating..."
                                } @else {
                                    "Generate Report"
                                }
                            }
                        }
                        @if view.has_report() {
                            form method="post" action="/actions/export-pdf" {
                                button class="btn btn-secondary" type="submit"
                                    data-action="export-pdf"
                                    disabled[!view.can_export()]
                                {
                                    @if view.pdf_generating {
                                        span class="spinner-small" {}
                                        "Creating PDF..."
                                    } @else {
                                        "Download PDF"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn theme_icon(theme: Theme) -> Markup {
    // Moon while light, sun while dark
    let glyph = match theme {
        Theme::Light => "\u{263E}",
        Theme::Dark => "\u{2600}",
    };
    html! { span class="theme-icon" { (glyph) } }
}

fn body(view: &ViewState) -> Markup {
    html! {
        @if !view.loading {
            @if let Some(error) = &view.error {
                div class="error-message card" role="alert" {
                    span { (error) }
                }
            }
        }
        @match view.branch() {
            ViewBranch::Loading => {
                div class="loading-container" {
                    div class="spinner" {}
                    p class="loading-text" { "Analyzing data and generating insights..." }
                }
            }
            ViewBranch::Empty => {
                div class="empty-state card" {
                    h2 { "No Report Generated Yet" }
                    p {
                        "Click \"Generate Report\" to analyze your customer feedback data "
                        "and get AI-powered insights."
                    }
                }
            }
            ViewBranch::Error => {
                @if let Some(charts) = &view.charts_data {
                    (charts_section(Some(charts)))
                }
            }
            ViewBranch::Populated => {
                @if let Some(charts) = &view.charts_data {
                    (charts_section(Some(charts)))
                }
                @if let Some(report) = &view.report_data {
                    (report_view(&report.report, Some(&report.insights)))
                }
            }
        }
    }
}

fn charts_section(charts: Option<&crate::backend::ChartsData>) -> Markup {
    html! {
        div class="charts-wrapper" {
            h2 class="section-title" { "Data Visualizations" }
            (charts_view(charts))
        }
    }
}

/// The client-side timer only covers what is left of the server-side one
fn toast(toast: &Toast) -> Markup {
    html! {
        div class="success-toast" id="toast" role="status" { (toast.message) }
        script {
            (PreEscaped(format!(
                "setTimeout(() => {{ const t = document.getElementById(\"toast\"); if (t) t.remove(); }}, {});",
                toast.remaining.as_millis()
            )))
        }
    }
}

/// Clicks a temporary `download` anchor; unlike `window.open` this is not
/// subject to popup blocking on a page load with no user gesture.
const DOWNLOAD_HELPER: &str = "function downloadFile(url) { \
const a = document.createElement(\"a\"); \
a.href = url; a.download = \"\"; a.rel = \"noopener\"; \
document.body.appendChild(a); a.click(); a.remove(); }";

fn open_downloads(urls: &[String]) -> Markup {
    if urls.is_empty() {
        return html! {};
    }

    let calls = urls
        .iter()
        .map(|url| {
            let literal = serde_json::to_string(url).unwrap_or_else(|_| "\"\"".to_string());
            format!("downloadFile({});", literal.replace("</", "<\\/"))
        })
        .collect::<Vec<_>>()
        .join("\n");

    html! {
        script data-role="downloads" {
            (PreEscaped(DOWNLOAD_HELPER))
            "\n"
            (PreEscaped(calls))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CategoryRating, ChartsData, NamedValue, ReportData};
    use std::time::Duration;

    fn charts() -> ChartsData {
        ChartsData {
            sentiment_distribution: vec![NamedValue {
                name: "Good".into(),
                value: 10.0,
            }],
            rating_by_category: vec![CategoryRating {
                category: "Shipping".into(),
                rating: 4.2,
            }],
            ..Default::default()
        }
    }

    fn populated() -> ViewState {
        ViewState {
            charts_data: Some(charts()),
            report_data: Some(ReportData::new(
                "## Findings\n\nShipping is **great**.",
                vec!["Insight one".into()],
            )),
            ..Default::default()
        }
    }

    fn render(view: &ViewState) -> String {
        render_page(view, &[], &PageOptions::default()).into_string()
    }

    #[test]
    fn test_empty_state() {
        let html = render(&ViewState::default());
        assert!(html.contains("No Report Generated Yet"));
        assert!(!html.contains("loading-container"));
        assert!(!html.contains("data-chart"));
        assert!(!html.contains("data-action=\"export-pdf\""));
        assert!(html.contains("data-theme=\"light\""));
    }

    #[test]
    fn test_populated_view_renders_all_charts_and_report() {
        let html = render(&populated());
        for key in ["sentiment", "category", "rating", "timeline"] {
            let marker = format!("data-chart=\"{}\"", key);
            assert_eq!(html.matches(&marker).count(), 1, "{}", key);
        }
        assert_eq!(html.matches("class=\"report-body\"").count(), 1);
        assert!(html.contains("<h2 class=\"markdown-h2\">Findings</h2>"));
        assert!(!html.contains("empty-state"));
        assert!(!html.contains("loading-container"));
        assert!(html.contains("data-action=\"export-pdf\""));
    }

    #[test]
    fn test_loading_disables_generate_and_polls() {
        let view = ViewState {
            loading: true,
            ..Default::default()
        };
        let html = render(&view);
        assert!(html.contains("loading-container"));
        assert!(html.contains("Generating..."));
        assert!(html.contains("data-action=\"generate-report\" disabled"));
        assert!(html.contains("window.location.replace"));
        assert!(!html.contains("empty-state"));
    }

    #[test]
    fn test_error_banner_with_partial_charts() {
        let view = ViewState {
            charts_data: Some(charts()),
            error: Some("Error generating report: timeout".into()),
            ..Default::default()
        };
        let html = render(&view);
        assert!(html.contains("error-message"));
        assert!(html.contains("Error generating report: timeout"));
        assert!(html.contains("data-chart=\"sentiment\""));
        assert!(!html.contains("report-body"));
        assert!(!html.contains("empty-state"));
    }

    #[test]
    fn test_pdf_error_shown_above_report() {
        let mut view = populated();
        view.error = Some("Failed to generate PDF. Please try again.".into());
        let html = render(&view);
        assert!(html.contains("error-message"));
        assert!(html.contains("report-body"));
    }

    #[test]
    fn test_pdf_generating_button() {
        let mut view = populated();
        view.pdf_generating = true;
        let html = render(&view);
        assert!(html.contains("Creating PDF..."));
        assert!(html.contains("data-action=\"export-pdf\" disabled"));
    }

    #[test]
    fn test_export_disabled_while_report_loading() {
        let mut view = populated();
        view.loading = true;
        let html = render(&view);
        assert!(html.contains("Download PDF"));
        assert!(html.contains("data-action=\"export-pdf\" disabled"));
    }

    #[test]
    fn test_toast_and_download_script() {
        let mut view = populated();
        view.toast = Some(Toast {
            message: "PDF downloaded successfully!".into(),
            remaining: Duration::from_millis(3000),
        });
        let downloads = vec!["http://localhost:8000/api/download-pdf/r.pdf".to_string()];
        let html = render_page(&view, &downloads, &PageOptions::default()).into_string();

        assert_eq!(html.matches("class=\"success-toast\"").count(), 1);
        assert!(html.contains("}, 3000);"));
        assert!(html.contains("function downloadFile(url)"));
        assert!(html.contains("a.download = \"\";"));
        assert!(html.contains(
            "downloadFile(\"http://localhost:8000/api/download-pdf/r.pdf\");"
        ));
        assert!(!html.contains("window.open"));
    }

    #[test]
    fn test_toast_timer_uses_remaining_time() {
        let mut view = populated();
        view.toast = Some(Toast {
            message: "PDF downloaded successfully!".into(),
            remaining: Duration::from_millis(500),
        });
        let html = render(&view);
        assert!(html.contains("}, 500);"));
        assert!(!html.contains("}, 3000);"));
    }

    #[test]
    fn test_dark_theme_attribute_and_toggle_title() {
        let view = ViewState {
            theme: Theme::Dark,
            ..Default::default()
        };
        let html = render(&view);
        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("Switch to light mode"));
    }

    #[test]
    fn test_snapshot_is_self_contained() {
        let html = render_page(&populated(), &[], &PageOptions::snapshot()).into_string();
        assert!(!html.contains("<form"));
        assert!(!html.contains("/assets/dashboard.css"));
        assert!(html.contains(".admin-panel"));
    }
}
