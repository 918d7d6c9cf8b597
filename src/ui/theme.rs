//! Color theme constants for the chat view
//!
//! Defines the minimal dark color palette used throughout the UI.

use ratatui::style::Color;

// ============================================================================
// Minimal Dark Color Theme
// ============================================================================

/// Accent color - white for highlights and important elements
pub const COLOR_ACCENT: Color = Color::White;

/// Dim text for less important info
pub const COLOR_DIM: Color = Color::DarkGray;

/// Secondary text (snippets, descriptions)
pub const COLOR_MUTED: Color = Color::Gray;

/// Primary color for citations, match scores and the selected mode
pub const COLOR_PRIMARY: Color = Color::Rgb(0, 122, 204); // blue #007ACC

/// User message label
pub const COLOR_USER: Color = Color::Rgb(0, 122, 204);

// ============================================================================
// Tool Colors
// ============================================================================

/// Tool icon color
pub const COLOR_TOOL_ICON: Color = Color::Rgb(0, 122, 204);

/// Tool running state - gray
pub const COLOR_TOOL_RUNNING: Color = Color::Rgb(128, 128, 128);

/// Tool success state - green
pub const COLOR_TOOL_SUCCESS: Color = Color::Rgb(4, 181, 117); // green #04B575

/// Tool error state - red
pub const COLOR_TOOL_ERROR: Color = Color::Red;

// ============================================================================
// Mode Colors
// ============================================================================

pub const COLOR_MODE_FAST: Color = Color::LightBlue;

pub const COLOR_MODE_THINKING: Color = Color::LightMagenta;
