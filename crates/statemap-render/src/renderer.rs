//! Renderer trait abstraction and layer styling.

use kurbo::{BezPath, Size};
use peniko::Color;
use statemap_core::widget::MapWidget;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
#[allow(dead_code)]
pub type RenderResult<T> = Result<T, RendererError>;

/// Visual style of the three map layers.
#[derive(Debug, Clone, Copy)]
pub struct MapStyle {
    /// Default region fill.
    pub fill: Color,
    /// Fill of the hovered region.
    pub highlight: Color,
    /// National outline stroke color and width.
    pub nation_stroke: Color,
    pub nation_stroke_width: f64,
    /// State borders stroke color and width.
    pub state_stroke: Color,
    pub state_stroke_width: f64,
    /// Surface background.
    pub background: Color,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            fill: Color::from_rgba8(255, 255, 255, 255),
            highlight: Color::from_rgba8(255, 192, 203, 255), // pink
            nation_stroke: Color::from_rgba8(0, 0, 0, 255),
            nation_stroke_width: 1.0,
            state_stroke: Color::from_rgba8(0, 0, 0, 255),
            state_stroke_width: 0.5,
            background: Color::from_rgba8(250, 250, 250, 255),
        }
    }
}

impl MapStyle {
    /// Fill color for a region given its hover state.
    pub fn fill_for(&self, hovered: bool) -> Color {
        if hovered { self.highlight } else { self.fill }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Widget state: regions and hover.
    pub widget: &'a MapWidget,
    /// Merged national outline path.
    pub nation_outline: &'a BezPath,
    /// Merged state borders path.
    pub state_outline: &'a BezPath,
    /// Layer styling.
    pub style: MapStyle,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(
        widget: &'a MapWidget,
        nation_outline: &'a BezPath,
        state_outline: &'a BezPath,
        viewport_size: Size,
    ) -> Self {
        Self {
            widget,
            nation_outline,
            state_outline,
            style: MapStyle::default(),
            viewport_size,
            scale_factor: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the layer style.
    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering
/// engines.
pub trait Renderer {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame; prepares all drawing commands in layer
    /// order: fills, national outline, state outline.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.style.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_matches_layer_contract() {
        let style = MapStyle::default();
        assert_eq!(style.fill, Color::from_rgba8(255, 255, 255, 255));
        assert_eq!(style.nation_stroke_width, 1.0);
        assert_eq!(style.state_stroke_width, 0.5);
        assert_ne!(style.fill, style.highlight);
    }

    #[test]
    fn test_fill_for_hover() {
        let style = MapStyle::default();
        assert_eq!(style.fill_for(false), style.fill);
        assert_eq!(style.fill_for(true), style.highlight);
    }
}
