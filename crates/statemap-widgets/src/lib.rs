//! Reusable egui widget components for the statemap UI.
//!
//! - **Tooltip**: pointer-following tooltip overlay
//! - **Layout**: panel frames, section labels, the footer credit line

pub mod layout;
pub mod tooltip;

pub use layout::{footer_frame, header_frame, section_label};
pub use tooltip::Tooltip;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
    /// Tooltip inner padding
    pub const TOOLTIP_PADDING: i8 = 6;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
    /// Tooltip background
    pub const TOOLTIP_BG: Color32 = Color32::from_rgba_premultiplied(40, 40, 40, 235);
    /// Tooltip text
    pub const TOOLTIP_TEXT: Color32 = Color32::from_rgb(245, 245, 245);
}
