//! Pointer input state.
//!
//! The windowing layer reports button events without a position, so the
//! shell keeps one of these per window to pair clicks with the last known
//! cursor position.

use kurbo::Point;
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Down { button: MouseButton },
    Up { button: MouseButton },
    Move { position: Point },
}

/// Tracks pointer state across frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in logical surface coordinates.
    position: Point,
    /// Previous pointer position for delta calculations.
    previous_position: Point,
    pressed: HashSet<MouseButton>,
    just_pressed: HashSet<MouseButton>,
    just_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the start of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_position = self.position;
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { button } => {
                if self.pressed.insert(button) {
                    self.just_pressed.insert(button);
                }
            }
            PointerEvent::Up { button } => {
                if self.pressed.remove(&button) {
                    self.just_released.insert(button);
                }
            }
            PointerEvent::Move { position } => {
                self.position = position;
            }
        }
    }

    /// Current pointer position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Pointer movement since the previous frame.
    pub fn delta(&self) -> kurbo::Vec2 {
        self.position - self.previous_position
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn is_just_pressed(&self, button: MouseButton) -> bool {
        self.just_pressed.contains(&button)
    }

    pub fn is_just_released(&self, button: MouseButton) -> bool {
        self.just_released.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Down { button: MouseButton::Left });
        assert!(input.is_pressed(MouseButton::Left));
        assert!(input.is_just_pressed(MouseButton::Left));
        assert!(!input.is_pressed(MouseButton::Right));

        input.handle_pointer_event(PointerEvent::Up { button: MouseButton::Left });
        assert!(!input.is_pressed(MouseButton::Left));
        assert!(input.is_just_released(MouseButton::Left));
    }

    #[test]
    fn test_begin_frame_clears_just_flags() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Down { button: MouseButton::Left });
        input.begin_frame();
        assert!(!input.is_just_pressed(MouseButton::Left));
        assert!(input.is_pressed(MouseButton::Left));
    }

    #[test]
    fn test_position_tracking() {
        let mut input = InputState::new();
        input.handle_pointer_event(PointerEvent::Move { position: Point::new(10.0, 20.0) });
        input.begin_frame();
        input.handle_pointer_event(PointerEvent::Move { position: Point::new(25.0, 26.0) });
        assert_eq!(input.position(), Point::new(25.0, 26.0));
        let delta = input.delta();
        assert!((delta.x - 15.0).abs() < f64::EPSILON);
        assert!((delta.y - 6.0).abs() < f64::EPSILON);
    }
}
