//! Input event types delivered by the host, and double-tap detection.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;

/// Pointer button identifiers (mouse, touch contact and pen share this model).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left mouse button, touch contact or pen tip.
    Primary,
    Middle,
    Secondary,
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
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A single modifier key, used where behavior is bound to a configurable key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl ModifierKey {
    pub fn is_held(self, modifiers: &Modifiers) -> bool {
        match self {
            ModifierKey::Shift => modifiers.shift,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Meta => modifiers.meta,
        }
    }
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Position relative to the canvas, in CSS/logical pixels.
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// Pen/touch pressure in `[0, 1]`; mice report 1.0.
    pub pressure: f64,
    /// The event target is toolbar or overlay chrome rather than the canvas.
    pub over_chrome: bool,
    pub timestamp: Instant,
}

impl PointerInput {
    /// A primary-button event at `position`, timestamped now.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            pressure: 1.0,
            over_chrome: false,
            timestamp: Instant::now(),
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Instant) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn over_chrome(mut self) -> Self {
        self.over_chrome = true;
        self
    }

    /// Pressure clamped to `[0, 1]`, with non-finite values treated as 1.
    pub fn normalized_pressure(&self) -> f64 {
        if self.pressure.is_finite() {
            self.pressure.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// A wheel/trackpad scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Pointer position in screen coordinates.
    pub position: Point,
    /// Scroll delta in pixels.
    pub delta: Vec2,
    pub modifiers: Modifiers,
    pub over_chrome: bool,
}

impl WheelInput {
    pub fn new(position: Point, delta: Vec2) -> Self {
        Self {
            position,
            delta,
            modifiers: Modifiers::NONE,
            over_chrome: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A key press, with the key named as in DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Detects a second tap close in time and space to the previous one.
#[derive(Debug, Clone)]
pub struct TapTracker {
    window: Duration,
    distance: f64,
    last_tap: Option<(Instant, Point)>,
}

impl TapTracker {
    pub fn new(window: Duration, distance: f64) -> Self {
        Self {
            window,
            distance,
            last_tap: None,
        }
    }

    /// Register a tap; returns true when it completes a double-tap.
    pub fn register(&mut self, position: Point, now: Instant) -> bool {
        if let Some((last_time, last_pos)) = self.last_tap {
            let elapsed = now.saturating_duration_since(last_time);
            if elapsed < self.window && position.distance(last_pos) < self.distance {
                // Reset so a third tap does not count as another double-tap
                self.last_tap = None;
                return true;
            }
        }
        self.last_tap = Some((now, position));
        false
    }

    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}
