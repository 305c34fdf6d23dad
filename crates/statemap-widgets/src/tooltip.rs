//! Pointer-following tooltip overlay.

use egui::{Area, Context, CornerRadius, Frame, Id, Margin, Order, Pos2, RichText, Stroke};

use crate::{sizing, theme};

/// A small floating label anchored near the pointer.
///
/// The widget is stateless: the caller decides visibility (by calling
/// `show` or not) and supplies the anchor each frame, so the tooltip
/// follows the pointer continuously.
pub struct Tooltip<'a> {
    text: &'a str,
    anchor: Pos2,
}

impl<'a> Tooltip<'a> {
    pub fn new(text: &'a str, anchor: Pos2) -> Self {
        Self { text, anchor }
    }

    /// Draw the tooltip at its anchor, above all other UI.
    pub fn show(self, ctx: &Context) {
        Area::new(Id::new("map_tooltip"))
            .order(Order::Tooltip)
            .fixed_pos(self.anchor)
            .interactable(false)
            .show(ctx, |ui| {
                Frame::new()
                    .fill(theme::TOOLTIP_BG)
                    .corner_radius(CornerRadius::same(sizing::CORNER_RADIUS))
                    .stroke(Stroke::new(1.0, theme::BORDER))
                    .inner_margin(Margin::same(sizing::TOOLTIP_PADDING))
                    .show(ui, |ui| {
                        ui.label(RichText::new(self.text).size(13.0).color(theme::TOOLTIP_TEXT));
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_keeps_its_anchor() {
        let tooltip = Tooltip::new("California", Pos2::new(120.0, 140.0));
        assert_eq!(tooltip.anchor, Pos2::new(120.0, 140.0));
        assert_eq!(tooltip.text, "California");
    }
}
