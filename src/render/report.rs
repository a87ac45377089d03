//! Report Display
//!
//! Quick-insight cards followed by the markdown report body. Parsing is left
//! to pulldown-cmark; this module only decides which class each structural
//! element gets.

use maud::{html, Markup, PreEscaped};
use pulldown_cmark::{html as cmark_html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Structural markdown elements that receive a style class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading(u8),
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Strong,
}

impl ElementKind {
    /// HTML tag name
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Heading(1) => "h1",
            ElementKind::Heading(2) => "h2",
            ElementKind::Heading(3) => "h3",
            ElementKind::Heading(4) => "h4",
            ElementKind::Heading(5) => "h5",
            ElementKind::Heading(_) => "h6",
            ElementKind::Paragraph => "p",
            ElementKind::UnorderedList => "ul",
            ElementKind::OrderedList => "ol",
            ElementKind::ListItem => "li",
            ElementKind::Strong => "strong",
        }
    }

    /// Style class; headings below h3 are left unstyled
    pub fn class(&self) -> Option<&'static str> {
        match self {
            ElementKind::Heading(1) => Some("markdown-h1"),
            ElementKind::Heading(2) => Some("markdown-h2"),
            ElementKind::Heading(3) => Some("markdown-h3"),
            ElementKind::Heading(_) => None,
            ElementKind::Paragraph => Some("markdown-p"),
            ElementKind::UnorderedList => Some("markdown-ul"),
            ElementKind::OrderedList => Some("markdown-ol"),
            ElementKind::ListItem => Some("markdown-li"),
            ElementKind::Strong => Some("markdown-strong"),
        }
    }

    fn open_tag(&self, start: Option<u64>) -> String {
        let mut tag = format!("<{}", self.tag());
        if let Some(class) = self.class() {
            tag.push_str(&format!(" class=\"{}\"", class));
        }
        if let Some(start) = start.filter(|&n| n != 1) {
            tag.push_str(&format!(" start=\"{}\"", start));
        }
        tag.push('>');
        tag
    }

    /// Block elements end with a newline like pulldown-cmark's own output
    fn close_tag(&self) -> String {
        if self.is_block() {
            format!("</{}>\n", self.tag())
        } else {
            format!("</{}>", self.tag())
        }
    }

    fn is_block(&self) -> bool {
        !matches!(self, ElementKind::Strong)
    }
}

fn heading_number(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Element kind (and ordered-list start) of an opening tag we restyle
fn start_kind(tag: &Tag<'_>) -> Option<(ElementKind, Option<u64>)> {
    match tag {
        Tag::Heading { level, .. } => Some((ElementKind::Heading(heading_number(*level)), None)),
        Tag::Paragraph => Some((ElementKind::Paragraph, None)),
        Tag::List(None) => Some((ElementKind::UnorderedList, None)),
        Tag::List(Some(start)) => Some((ElementKind::OrderedList, Some(*start))),
        Tag::Item => Some((ElementKind::ListItem, None)),
        Tag::Strong => Some((ElementKind::Strong, None)),
        _ => None,
    }
}

fn end_kind(tag: &TagEnd) -> Option<ElementKind> {
    match tag {
        TagEnd::Heading(level) => Some(ElementKind::Heading(heading_number(*level))),
        TagEnd::Paragraph => Some(ElementKind::Paragraph),
        TagEnd::List(false) => Some(ElementKind::UnorderedList),
        TagEnd::List(true) => Some(ElementKind::OrderedList),
        TagEnd::Item => Some(ElementKind::ListItem),
        TagEnd::Strong => Some(ElementKind::Strong),
        _ => None,
    }
}

fn markup_event(kind: ElementKind, markup: String) -> Event<'static> {
    if kind.is_block() {
        Event::Html(CowStr::from(markup))
    } else {
        Event::InlineHtml(CowStr::from(markup))
    }
}

/// Render report markdown to HTML with the dashboard's element classes.
///
/// GFM tables, strikethrough and task lists are enabled. Raw HTML in the
/// source is shown as text.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Start(tag) => match start_kind(&tag) {
            Some((kind, start)) => markup_event(kind, kind.open_tag(start)),
            None => Event::Start(tag),
        },
        Event::End(tag) => match end_kind(&tag) {
            Some(kind) => markup_event(kind, kind.close_tag()),
            None => Event::End(tag),
        },
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    cmark_html::push_html(&mut out, events);
    out
}

/// Insight cards and report body. Renders nothing for an empty report.
pub fn report_view(report: &str, insights: Option<&[String]>) -> Markup {
    if report.is_empty() {
        return html! {};
    }

    let insights = insights.filter(|list| !list.is_empty());

    html! {
        div class="report-display" {
            @if let Some(insights) = insights {
                div class="insights-section" {
                    h3 class="insights-title" { "Quick Insights" }
                    div class="insights-grid" {
                        @for insight in insights {
                            div class="insight-card glass" {
                                p { (insight) }
                            }
                        }
                    }
                }
            }
            div class="report-content card" {
                div class="report-header" {
                    h2 { "AI-Generated Analysis Report" }
                }
                div class="report-body" {
                    (PreEscaped(render_markdown(report)))
                }
            }
        }
    }
}
