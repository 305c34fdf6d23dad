//! Layout helpers: panel frames and labels for the page shell.

use egui::{CornerRadius, Frame, Margin, Stroke, Ui};

use crate::{sizing, theme};

/// Frame for the title header overlay.
pub fn header_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::symmetric(16, 8))
}

/// Frame for the footer bar overlay.
pub fn footer_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(sizing::PANEL_RADIUS))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::symmetric(12, 6))
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(10.0)
            .color(theme::TEXT_MUTED),
    );
}
