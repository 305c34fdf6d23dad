//! UI overlays using egui: page shell (title header, footer credit) and
//! the tooltip.
//!
//! The map itself is drawn by the Vello renderer underneath; everything
//! here floats above it.

use egui::{Align2, Context, Id, Pos2, RichText};
use statemap_core::widget::TooltipContent;
use statemap_widgets::{footer_frame, header_frame, section_label, theme, Tooltip};

/// UI state mirrored between frames.
pub struct UiState {
    /// Page title shown in the header.
    pub title: String,
    /// Current tooltip content policy (mirrored from the widget).
    pub tooltip_content: TooltipContent,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            title: "World Map".to_string(),
            tooltip_content: TooltipContent::default(),
        }
    }
}

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Switch what the tooltip displays.
    SetTooltipContent(TooltipContent),
}

/// Render the page shell and tooltip. Returns an action if the user
/// changed a setting this frame.
pub fn render_ui(
    ctx: &Context,
    ui_state: &mut UiState,
    tooltip: Option<(&str, Pos2)>,
) -> Option<UiAction> {
    let mut action = None;

    egui::Area::new(Id::new("header"))
        .anchor(Align2::CENTER_TOP, egui::vec2(0.0, 12.0))
        .show(ctx, |ui| {
            header_frame().show(ui, |ui| {
                ui.label(
                    RichText::new(&ui_state.title)
                        .size(20.0)
                        .strong()
                        .color(theme::TEXT),
                );
            });
        });

    egui::Area::new(Id::new("footer"))
        .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -12.0))
        .show(ctx, |ui| {
            footer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.hyperlink_to(
                        RichText::new("Powered by Vello").size(12.0),
                        "https://github.com/linebender/vello",
                    );
                    ui.add_space(12.0);
                    section_label(ui, "Tooltip");
                    let showing_name = ui_state.tooltip_content == TooltipContent::RegionName;
                    if ui.selectable_label(showing_name, "name").clicked() && !showing_name {
                        action = Some(UiAction::SetTooltipContent(TooltipContent::RegionName));
                    }
                    if ui.selectable_label(!showing_name, "static").clicked() && showing_name {
                        action = Some(UiAction::SetTooltipContent(TooltipContent::Static));
                    }
                });
            });
        });

    if let Some((text, anchor)) = tooltip {
        Tooltip::new(text, anchor).show(ctx);
    }

    action
}
