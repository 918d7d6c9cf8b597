//! Terminal rendering for conversations
//!
//! Pure functions from message models to ratatui `Line`s:
//! - `parts`: message bodies, tool strips and footers
//! - `tool_status` / `sources`: web-search status, source cards, summaries
//! - `mode`: mode selector and per-message mode badge
//! - `time`: relative timestamps
//!
//! Nothing here touches the terminal. [`lines_to_plain`] flattens rendered
//! lines for non-interactive output.

mod mode;
mod parts;
mod sources;
mod theme;
mod time;
mod tool_status;

pub use mode::{mode_icon, render_mode_indicator, render_mode_selector};
pub use parts::{message_text, render_message, render_part, MessageViewState, PartViewState};
pub use sources::{
    hostname, match_label, render_source_card, render_sources, render_summary, truncate_to_width,
};
pub use theme::{
    COLOR_ACCENT, COLOR_DIM, COLOR_MODE_FAST, COLOR_MODE_THINKING, COLOR_MUTED, COLOR_PRIMARY,
    COLOR_TOOL_ERROR, COLOR_TOOL_ICON, COLOR_TOOL_RUNNING, COLOR_TOOL_SUCCESS, COLOR_USER,
};
pub use time::{format_relative_str, format_relative_time};
pub use tool_status::{
    is_expandable, is_web_search, render_tool_strip, status_text, tool_label, ToolStatus,
};

use ratatui::text::Line;

/// Flatten rendered lines into plain text, one line per row, styles dropped.
pub fn lines_to_plain(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
