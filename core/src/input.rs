//! Adapters from raw UI events to direction intents.
//!
//! Adapters never touch the engine themselves: whatever they produce is fed to
//! [`GameEngine::set_direction_intent`](crate::GameEngine::set_direction_intent), which owns the
//! reversal guard.

use serde::{Deserialize, Serialize};

use crate::*;

/// Turns one raw event into zero or one direction.
pub trait InputAdapter {
    type Event<'e>;

    fn translate(&mut self, event: Self::Event<'_>) -> Option<Direction>;
}

/// Feeds one event through `adapter` into `engine`.
pub fn route_input<A: InputAdapter, P: FoodPlacer>(
    adapter: &mut A,
    engine: &mut GameEngine<P>,
    event: A::Event<'_>,
) -> Option<IntentOutcome> {
    adapter
        .translate(event)
        .map(|direction| engine.set_direction_intent(direction))
}

/// Arrow keys and WASD, matched on the DOM `KeyboardEvent.key` value.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct KeyboardAdapter;

impl KeyboardAdapter {
    pub fn direction_for_key(key: &str) -> Option<Direction> {
        use Direction::*;
        match key {
            "ArrowUp" | "w" | "W" => Some(Up),
            "ArrowDown" | "s" | "S" => Some(Down),
            "ArrowLeft" | "a" | "A" => Some(Left),
            "ArrowRight" | "d" | "D" => Some(Right),
            _ => None,
        }
    }
}

impl InputAdapter for KeyboardAdapter {
    type Event<'e> = &'e str;

    fn translate(&mut self, key: &str) -> Option<Direction> {
        Self::direction_for_key(key)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TouchEvent {
    /// `t` is a timestamp in milliseconds.
    Start { x: f64, y: f64, t: f64 },
    Move { x: f64, y: f64, t: f64 },
    End { x: f64, y: f64 },
    Cancel,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct TouchAnchor {
    x: f64,
    y: f64,
    last_emit: Option<f64>,
}

/// Swipe gestures: the dominant axis of the drag picks the direction.
#[derive(Clone, Debug, PartialEq)]
pub struct SwipeAdapter {
    threshold_px: f64,
    move_throttle_ms: f64,
    anchor: Option<TouchAnchor>,
}

impl SwipeAdapter {
    pub const DEFAULT_THRESHOLD_PX: f64 = 30.;
    pub const DEFAULT_MOVE_THROTTLE_MS: f64 = 80.;

    pub fn new(threshold_px: f64, move_throttle_ms: f64) -> Self {
        Self {
            threshold_px: threshold_px.max(0.),
            move_throttle_ms: move_throttle_ms.max(0.),
            anchor: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.anchor.is_some()
    }

    /// Direction for a drag of `(dx, dy)`, or `None` below the threshold. Ties go horizontal.
    pub fn classify(&self, dx: f64, dy: f64) -> Option<Direction> {
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }

        let (abs_x, abs_y) = (dx.abs(), dy.abs());
        if abs_x.max(abs_y) < self.threshold_px {
            return None;
        }

        Some(if abs_x >= abs_y {
            if dx > 0. {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0. {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

impl Default for SwipeAdapter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD_PX, Self::DEFAULT_MOVE_THROTTLE_MS)
    }
}

impl InputAdapter for SwipeAdapter {
    type Event<'e> = TouchEvent;

    fn translate(&mut self, event: TouchEvent) -> Option<Direction> {
        match event {
            TouchEvent::Start { x, y, .. } => {
                self.anchor = Some(TouchAnchor {
                    x,
                    y,
                    last_emit: None,
                });
                None
            }
            TouchEvent::Move { x, y, t } => {
                let anchor = self.anchor?;
                if let Some(last_emit) = anchor.last_emit {
                    if t - last_emit < self.move_throttle_ms {
                        return None;
                    }
                }
                let direction = self.classify(x - anchor.x, y - anchor.y)?;
                // re-anchor so a continued drag can steer again
                self.anchor = Some(TouchAnchor {
                    x,
                    y,
                    last_emit: Some(t),
                });
                Some(direction)
            }
            TouchEvent::End { x, y } => {
                let anchor = self.anchor.take()?;
                self.classify(x - anchor.x, y - anchor.y)
            }
            TouchEvent::Cancel => {
                self.anchor = None;
                None
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DPadButton {
    Up,
    Down,
    Left,
    Right,
}

impl DPadButton {
    pub const ALL: [DPadButton; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn label(self) -> &'static str {
        use DPadButton::*;
        match self {
            Up => "↑",
            Down => "↓",
            Left => "←",
            Right => "→",
        }
    }
}

/// On-screen D-pad.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ButtonAdapter;

impl InputAdapter for ButtonAdapter {
    type Event<'e> = DPadButton;

    fn translate(&mut self, button: DPadButton) -> Option<Direction> {
        Some(match button {
            DPadButton::Up => Direction::Up,
            DPadButton::Down => Direction::Down,
            DPadButton::Left => Direction::Left,
            DPadButton::Right => Direction::Right,
        })
    }
}
