//! Mode selector and per-message mode indicator

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::models::{OperationalMode, UiMessage};

use super::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_MODE_FAST, COLOR_MODE_THINKING, COLOR_MUTED};

/// Icon shown next to a mode label
pub fn mode_icon(mode: OperationalMode) -> &'static str {
    match mode {
        OperationalMode::Fast => "\u{26A1}",
        OperationalMode::Thinking => "\u{1F4A1}",
        OperationalMode::Auto => "\u{2728}",
    }
}

fn mode_color(mode: OperationalMode) -> ratatui::style::Color {
    match mode {
        OperationalMode::Fast => COLOR_MODE_FAST,
        OperationalMode::Thinking => COLOR_MODE_THINKING,
        OperationalMode::Auto => COLOR_ACCENT,
    }
}

/// Render the mode selector: one row per mode, the current one marked.
///
/// When `disabled` (a send is in flight) every row is dimmed.
pub fn render_mode_selector(current: OperationalMode, disabled: bool) -> Vec<Line<'static>> {
    OperationalMode::ALL
        .iter()
        .map(|&mode| {
            let selected = mode == current;
            let marker = if selected { "\u{25CF} " } else { "\u{25CB} " };

            let (label_style, description_style) = if disabled {
                (Style::default().fg(COLOR_DIM), Style::default().fg(COLOR_DIM))
            } else if selected {
                (
                    Style::default()
                        .fg(mode_color(mode))
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(COLOR_MUTED),
                )
            } else {
                (Style::default().fg(COLOR_ACCENT), Style::default().fg(COLOR_DIM))
            };

            Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{} ", mode_icon(mode)), label_style),
                Span::styled(format!("{:<10}", mode.label()), label_style),
                Span::styled(mode.description(), description_style),
            ])
        })
        .collect()
}

/// Badge for the mode an assistant message was produced with.
///
/// Only fast and thinking are shown; `(Auto)` is appended when the server
/// picked the mode itself.
pub fn render_mode_indicator(message: &UiMessage) -> Option<Vec<Span<'static>>> {
    let mode = message.effective_mode()?;

    let mut spans = vec![
        Span::styled(
            format!("{} ", mode_icon(mode)),
            Style::default().fg(mode_color(mode)),
        ),
        Span::styled(mode.label(), Style::default().fg(COLOR_MUTED)),
    ];
    if message.was_auto_selected() {
        spans.push(Span::styled(" (Auto)", Style::default().fg(COLOR_DIM)));
    }
    Some(spans)
}
