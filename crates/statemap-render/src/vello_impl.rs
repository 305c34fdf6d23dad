//! Vello-based map renderer.
//!
//! Builds a `vello::Scene` for the frame. The whole scene is reset and
//! rebuilt every frame from the projected layers; nothing is patched in
//! place.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, Cap, Join, Stroke};
use peniko::Fill;
use vello::Scene;

/// Vello scene builder for the three map layers.
#[derive(Default)]
pub struct MapScene {
    scene: Scene,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene built by the last `build_scene` call.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

/// Outline strokes use round joins and caps so shared borders meet
/// cleanly at sub-pixel widths.
fn outline_stroke(width: f64) -> Stroke {
    Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round)
}

impl Renderer for MapScene {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();
        let transform = Affine::scale(ctx.scale_factor);

        // Fill layer: one shape per region, hovered region highlighted.
        for (index, region) in ctx.widget.regions().iter().enumerate() {
            let hovered = ctx.widget.hovered() == Some(index);
            self.scene.fill(
                Fill::NonZero,
                transform,
                ctx.style.fill_for(hovered),
                None,
                &region.path,
            );
        }

        // National outline on top of the fills.
        self.scene.stroke(
            &outline_stroke(ctx.style.nation_stroke_width),
            transform,
            ctx.style.nation_stroke,
            None,
            ctx.nation_outline,
        );

        // State borders topmost.
        self.scene.stroke(
            &outline_stroke(ctx.style.state_stroke_width),
            transform,
            ctx.style.state_stroke,
            None,
            ctx.state_outline,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathGenerator;
    use crate::renderer::MapStyle;
    use kurbo::Size;
    use statemap_core::dataset::MapDataset;
    use statemap_core::projection::AlbersUsa;
    use statemap_core::widget::{MapWidget, TooltipContent};

    #[test]
    fn test_build_scene_is_idempotent() {
        let dataset = MapDataset::bundled().unwrap();
        let layers = PathGenerator::new(AlbersUsa::fitted(1000.0, 600.0)).layers(&dataset);
        let widget = MapWidget::new(layers.regions, TooltipContent::RegionName);

        let mut renderer = MapScene::new();
        let ctx = RenderContext::new(
            &widget,
            &layers.nation_outline,
            &layers.state_outline,
            Size::new(1000.0, 600.0),
        )
        .with_style(MapStyle::default());

        // Re-initialization must not accumulate layers: the scene is
        // reset and rebuilt from scratch on every call.
        renderer.build_scene(&ctx);
        renderer.build_scene(&ctx);
        assert_eq!(widget.regions().len(), 51);
    }
}
