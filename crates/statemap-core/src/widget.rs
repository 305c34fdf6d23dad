//! Map widget state: regions, hover tracking, tooltip.
//!
//! The widget owns all interactive state. Pointer events are fed in by
//! the host shell while the widget is mounted and stop when it is
//! dropped; nothing is registered globally, so creating and destroying
//! instances cannot leak listeners.

use kurbo::{BezPath, Point, Shape};

/// Screen offset between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f64 = 20.0;

/// Placeholder text shown when the tooltip is configured as static.
pub const STATIC_TOOLTIP_TEXT: &str = "Tooltip";

/// What the tooltip displays for a hovered region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipContent {
    /// The hovered region's name.
    #[default]
    RegionName,
    /// A fixed placeholder string.
    Static,
}

/// One hoverable fill shape, already projected to screen space.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    pub path: BezPath,
}

/// Interactive state of one map widget instance.
#[derive(Debug, Clone)]
pub struct MapWidget {
    regions: Vec<Region>,
    /// Index of the hovered region; at most one region is ever hovered.
    hover: Option<usize>,
    /// Last known pointer position, tracked on every move.
    pointer: Point,
    tooltip_content: TooltipContent,
}

impl MapWidget {
    /// Create a widget over projected regions.
    pub fn new(regions: Vec<Region>, tooltip_content: TooltipContent) -> Self {
        Self {
            regions,
            hover: None,
            pointer: Point::ZERO,
            tooltip_content,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Index of the currently hovered region, if any.
    pub fn hovered(&self) -> Option<usize> {
        self.hover
    }

    pub fn tooltip_content(&self) -> TooltipContent {
        self.tooltip_content
    }

    pub fn set_tooltip_content(&mut self, content: TooltipContent) {
        self.tooltip_content = content;
    }

    /// Find the topmost region containing a point.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.regions
            .iter()
            .enumerate()
            .rev()
            .find(|(_, region)| region.path.contains(point))
            .map(|(index, _)| index)
    }

    /// Track a pointer move. Updates hover state and the tooltip anchor;
    /// returns true when the hovered region changed (a redraw is needed).
    pub fn pointer_moved(&mut self, point: Point) -> bool {
        self.pointer = point;
        let hit = self.hit_test(point);
        let changed = hit != self.hover;
        self.hover = hit;
        changed
    }

    /// The pointer left the widget's surface entirely.
    pub fn pointer_left(&mut self) -> bool {
        let changed = self.hover.is_some();
        self.hover = None;
        changed
    }

    /// Click on the outline layer. Placeholder extension point: logs the
    /// hit region and does nothing else.
    pub fn pointer_clicked(&mut self, point: Point) {
        if let Some(index) = self.hit_test(point) {
            log::debug!("state outline clicked: {}", self.regions[index].name);
        }
    }

    /// Tooltip text and anchor while a region is hovered.
    pub fn tooltip(&self) -> Option<(&str, Point)> {
        let index = self.hover?;
        let text = match self.tooltip_content {
            TooltipContent::RegionName => self.regions[index].name.as_str(),
            TooltipContent::Static => STATIC_TOOLTIP_TEXT,
        };
        Some((text, self.tooltip_anchor()))
    }

    /// Where the tooltip's top-left corner goes: the pointer position
    /// offset down-right, tracked continuously whether or not the pointer
    /// is over the map.
    pub fn tooltip_anchor(&self) -> Point {
        Point::new(
            self.pointer.x + TOOLTIP_OFFSET,
            self.pointer.y + TOOLTIP_OFFSET,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((x, y));
        path.line_to((x + size, y));
        path.line_to((x + size, y + size));
        path.line_to((x, y + size));
        path.close_path();
        path
    }

    fn widget(content: TooltipContent) -> MapWidget {
        MapWidget::new(
            vec![
                Region { name: "Left".into(), path: square(0.0, 0.0, 100.0) },
                Region { name: "Right".into(), path: square(100.0, 0.0, 100.0) },
            ],
            content,
        )
    }

    #[test]
    fn test_initially_nothing_hovered() {
        let w = widget(TooltipContent::RegionName);
        assert_eq!(w.regions().len(), 2);
        assert_eq!(w.hovered(), None);
        assert!(w.tooltip().is_none());
    }

    #[test]
    fn test_hover_enter_shows_tooltip_with_name() {
        let mut w = widget(TooltipContent::RegionName);
        assert!(w.pointer_moved(Point::new(50.0, 50.0)));
        assert_eq!(w.hovered(), Some(0));
        let (text, anchor) = w.tooltip().unwrap();
        assert_eq!(text, "Left");
        assert_eq!(anchor, Point::new(70.0, 70.0));
    }

    #[test]
    fn test_hover_leave_hides_tooltip() {
        let mut w = widget(TooltipContent::RegionName);
        w.pointer_moved(Point::new(50.0, 50.0));
        assert!(w.pointer_moved(Point::new(300.0, 300.0)));
        assert_eq!(w.hovered(), None);
        assert!(w.tooltip().is_none());
    }

    #[test]
    fn test_at_most_one_region_hovered() {
        let mut w = widget(TooltipContent::RegionName);
        w.pointer_moved(Point::new(150.0, 50.0));
        assert_eq!(w.hovered(), Some(1));
        w.pointer_moved(Point::new(50.0, 50.0));
        assert_eq!(w.hovered(), Some(0));
    }

    #[test]
    fn test_move_within_region_reports_no_change() {
        let mut w = widget(TooltipContent::RegionName);
        assert!(w.pointer_moved(Point::new(50.0, 50.0)));
        assert!(!w.pointer_moved(Point::new(60.0, 60.0)));
    }

    #[test]
    fn test_static_tooltip_content() {
        let mut w = widget(TooltipContent::Static);
        w.pointer_moved(Point::new(50.0, 50.0));
        let (text, _) = w.tooltip().unwrap();
        assert_eq!(text, STATIC_TOOLTIP_TEXT);

        w.set_tooltip_content(TooltipContent::RegionName);
        let (text, _) = w.tooltip().unwrap();
        assert_eq!(text, "Left");
    }

    #[test]
    fn test_anchor_tracks_pointer_off_map() {
        let mut w = widget(TooltipContent::RegionName);
        w.pointer_moved(Point::new(640.0, 17.0));
        assert_eq!(w.tooltip_anchor(), Point::new(660.0, 37.0));
    }

    #[test]
    fn test_pointer_left_clears_hover() {
        let mut w = widget(TooltipContent::RegionName);
        w.pointer_moved(Point::new(50.0, 50.0));
        assert!(w.pointer_left());
        assert_eq!(w.hovered(), None);
        assert!(!w.pointer_left());
    }

    #[test]
    fn test_overlapping_regions_prefer_topmost() {
        let mut w = MapWidget::new(
            vec![
                Region { name: "Below".into(), path: square(0.0, 0.0, 100.0) },
                Region { name: "Above".into(), path: square(50.0, 50.0, 100.0) },
            ],
            TooltipContent::RegionName,
        );
        w.pointer_moved(Point::new(75.0, 75.0));
        assert_eq!(w.hovered(), Some(1));
    }
}
