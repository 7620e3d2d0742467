//! Pointer and keyboard input for the course canvas.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Pointer event in stage coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keys the editors react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Character(String),
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Backspace" => Key::Backspace,
            _ if key.chars().count() == 1 => Key::Character(key.to_string()),
            _ => Key::Other(key.to_string()),
        }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Minimum pointer travel before a press becomes a drag.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Tracks pointer state between events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in stage coordinates.
    pub pointer_position: Point,
    /// Whether the left button is held.
    pub is_pressed: bool,
    /// Start position of the current press.
    pub press_start: Option<Point>,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    last_click_time: Option<Instant>,
    last_click_position: Option<Point>,
    double_click_detected: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            is_pressed: false,
            press_start: None,
            modifiers: Modifiers::default(),
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.double_click_detected = false;
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                if button != MouseButton::Left {
                    return;
                }
                let now = Instant::now();
                let repeat = match (self.last_click_time, self.last_click_position) {
                    (Some(last_time), Some(last_pos)) => {
                        now.duration_since(last_time).as_millis() < DOUBLE_CLICK_TIME_MS
                            && (position - last_pos).hypot() < DOUBLE_CLICK_DISTANCE
                    }
                    _ => false,
                };
                if repeat {
                    self.double_click_detected = true;
                    // A third click starts a new sequence.
                    self.last_click_time = None;
                    self.last_click_position = None;
                } else {
                    self.last_click_time = Some(now);
                    self.last_click_position = Some(position);
                }
                self.is_pressed = true;
                self.press_start = Some(position);
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                if button == MouseButton::Left {
                    self.is_pressed = false;
                    self.press_start = None;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Whether the last pointer-down completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }

    /// Pointer travel since the press started.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.press_start.map(|start| self.pointer_position - start)
    }

    /// Whether the current press has travelled far enough to be a drag.
    pub fn is_dragging(&self) -> bool {
        self.drag_delta()
            .is_some_and(|delta| delta.hypot() >= DRAG_THRESHOLD)
    }
}
