//! Source cards and the search summary block
//!
//! Summary text is split into literal and citation spans; activating a
//! citation adds a preview card for that source below the summary.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use reqwest::Url;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::citations::{split_citations, CitationSegment, ExpandedCitations};
use crate::search::{SearchSummary, WebSearchSource};

use super::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_MUTED, COLOR_PRIMARY};

const CARD_INDENT: &str = "      ";

/// Snippets are clamped to about two terminal lines
const SNIPPET_MAX_WIDTH: usize = 160;

/// Host part of a source URL; the raw text when it does not parse.
pub fn hostname(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

/// Cut `text` to at most `max_width` display columns, ending in `...`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// `NN% match` for a positive relevance score
pub fn match_label(relevance_score: f64) -> Option<String> {
    (relevance_score > 0.0).then(|| format!("{}% match", (relevance_score * 100.0).round() as i64))
}

/// One source as a small card: `[n] title`, snippet, host and match score.
pub fn render_source_card(index: usize, source: &WebSearchSource) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("  [{}] ", index + 1),
            Style::default().fg(COLOR_PRIMARY),
        ),
        Span::styled(
            source.title.clone(),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    if !source.snippet.is_empty() {
        lines.push(Line::from(vec![
            Span::raw(CARD_INDENT),
            Span::styled(
                truncate_to_width(&source.snippet, SNIPPET_MAX_WIDTH),
                Style::default().fg(COLOR_MUTED),
            ),
        ]));
    }

    let mut footer = vec![
        Span::raw(CARD_INDENT),
        Span::styled(hostname(&source.url), Style::default().fg(COLOR_DIM)),
    ];
    if let Some(label) = match_label(source.relevance_score) {
        footer.push(Span::styled(" \u{00B7} ", Style::default().fg(COLOR_DIM)));
        footer.push(Span::styled(label, Style::default().fg(COLOR_PRIMARY)));
    }
    lines.push(Line::from(footer));

    lines
}

/// The expanded source list under a tool strip
pub fn render_sources(sources: &[WebSearchSource]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "  All Sources:",
        Style::default().fg(COLOR_MUTED),
    ))];
    for (index, source) in sources.iter().enumerate() {
        lines.extend(render_source_card(index, source));
    }
    lines
}

/// Summary block: header, text with citation spans, then one preview per
/// expanded citation in the order they were expanded.
pub fn render_summary(
    summary: &SearchSummary,
    sources: &[WebSearchSource],
    expanded: &ExpandedCitations,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            "  Summary",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" \u{2022} {} sources", sources.len()),
            Style::default().fg(COLOR_MUTED),
        ),
    ])];

    lines.extend(render_summary_text(&summary.text, sources.len()));

    let previews: Vec<_> = expanded
        .iter()
        .filter_map(|index| sources.get(index).map(|source| (index, source)))
        .collect();
    if !previews.is_empty() {
        lines.push(Line::from(Span::styled(
            "  \u{2500}\u{2500}\u{2500}\u{2500}",
            Style::default().fg(COLOR_DIM),
        )));
        for (index, source) in previews {
            lines.extend(render_source_card(index, source));
        }
    }

    lines
}

/// Summary text as lines, with resolved citation markers highlighted.
pub fn render_summary_text(text: &str, source_count: usize) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(COLOR_ACCENT);
    let citation_style = Style::default()
        .fg(COLOR_PRIMARY)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = vec![Span::raw("  ")];

    for segment in split_citations(text, source_count) {
        match segment {
            CitationSegment::Text(text) => {
                let mut pieces = text.split('\n');
                if let Some(first) = pieces.next() {
                    if !first.is_empty() {
                        current.push(Span::styled(first.to_string(), text_style));
                    }
                }
                for piece in pieces {
                    lines.push(Line::from(std::mem::replace(
                        &mut current,
                        vec![Span::raw("  ")],
                    )));
                    if !piece.is_empty() {
                        current.push(Span::styled(piece.to_string(), text_style));
                    }
                }
            }
            CitationSegment::Reference { marker, .. } => {
                current.push(Span::styled(marker, citation_style));
            }
        }
    }
    lines.push(Line::from(current));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(title: &str, url: &str, score: f64) -> WebSearchSource {
        WebSearchSource {
            title: title.to_string(),
            url: url.to_string(),
            snippet: "snippet".to_string(),
            favicon: String::new(),
            relevance_score: score,
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_hostname() {
        assert_eq!(hostname("https://docs.rs/regex/latest"), "docs.rs");
        assert_eq!(hostname("not a url"), "not a url");
    }

    #[test]
    fn test_match_label() {
        assert_eq!(match_label(0.853).as_deref(), Some("85% match"));
        assert_eq!(match_label(0.0), None);
        assert_eq!(match_label(-1.0), None);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 8), "abcde...");
        // wide characters take two columns each
        assert_eq!(truncate_to_width("\u{4F60}\u{597D}\u{4E16}\u{754C}", 7), "\u{4F60}\u{597D}...");
    }

    #[test]
    fn test_source_card() {
        let lines = render_source_card(1, &source("Rust", "https://www.rust-lang.org/learn", 0.5));
        let rendered = text(&lines);
        assert!(rendered.contains("[2] Rust"));
        assert!(rendered.contains("snippet"));
        assert!(rendered.contains("www.rust-lang.org \u{00B7} 50% match"));
    }

    #[test]
    fn test_source_card_without_score() {
        let rendered = text(&render_source_card(0, &source("A", "http://a.example", 0.0)));
        assert!(!rendered.contains("match"));
    }

    #[test]
    fn test_summary_citation_spans() {
        let sources = vec![source("A", "http://a.example", 0.0)];
        let summary = SearchSummary {
            text: "Ref [1] and [9]".to_string(),
            citations: Vec::new(),
        };

        let lines = render_summary(&summary, &sources, &ExpandedCitations::new());
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[..1]), "  Summary \u{2022} 1 sources");

        let body = &lines[1];
        let contents: Vec<&str> = body.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["  ", "Ref ", "[1]", " and ", "[9]"]);
        assert_eq!(body.spans[2].style.fg, Some(COLOR_PRIMARY));
        assert_eq!(body.spans[4].style.fg, Some(COLOR_ACCENT));
    }

    #[test]
    fn test_summary_previews_follow_expansion() {
        let sources = vec![
            source("First", "http://a.example", 0.0),
            source("Second", "http://b.example", 0.9),
        ];
        let summary = SearchSummary {
            text: "See [1] [2]".to_string(),
            citations: Vec::new(),
        };
        let mut expanded = ExpandedCitations::new();
        expanded.toggle(1);

        let rendered = text(&render_summary(&summary, &sources, &expanded));
        assert!(rendered.contains("[2] Second"));
        assert!(rendered.contains("90% match"));
        assert!(!rendered.contains("[1] First"));
    }

    #[test]
    fn test_multiline_summary() {
        let lines = render_summary_text("a\nb [1]", 1);
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines), "  a\n  b [1]");
    }
}
