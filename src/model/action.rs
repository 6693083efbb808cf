use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of input events the engines record and replay.
///
/// The serialized tags are part of the on-disk format and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    MouseMove,
    MouseLeftDown,
    MouseLeftUp,
    MouseRightDown,
    MouseRightUp,
    MouseMiddleDown,
    MouseMiddleUp,
    MouseWheel,
    KeyDown,
    KeyUp,
    KeyPress,
    Wait,
    Special,
}

impl ActionKind {
    /// True for every pointer-related kind, including moves and wheel.
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            ActionKind::MouseMove
                | ActionKind::MouseLeftDown
                | ActionKind::MouseLeftUp
                | ActionKind::MouseRightDown
                | ActionKind::MouseRightUp
                | ActionKind::MouseMiddleDown
                | ActionKind::MouseMiddleUp
                | ActionKind::MouseWheel
        )
    }

    /// True for key down/up/press.
    pub fn is_keyboard(self) -> bool {
        matches!(
            self,
            ActionKind::KeyDown | ActionKind::KeyUp | ActionKind::KeyPress
        )
    }

    /// True for the kinds that need the pointer positioned before injection
    /// (buttons and wheel, not plain moves).
    pub fn needs_pointer_placement(self) -> bool {
        matches!(
            self,
            ActionKind::MouseLeftDown
                | ActionKind::MouseLeftUp
                | ActionKind::MouseRightDown
                | ActionKind::MouseRightUp
                | ActionKind::MouseMiddleDown
                | ActionKind::MouseMiddleUp
                | ActionKind::MouseWheel
        )
    }

    fn display_name(self) -> &'static str {
        match self {
            ActionKind::MouseMove => "Mouse move",
            ActionKind::MouseLeftDown => "Left button down",
            ActionKind::MouseLeftUp => "Left button up",
            ActionKind::MouseRightDown => "Right button down",
            ActionKind::MouseRightUp => "Right button up",
            ActionKind::MouseMiddleDown => "Middle button down",
            ActionKind::MouseMiddleUp => "Middle button up",
            ActionKind::MouseWheel => "Mouse wheel",
            ActionKind::KeyDown => "Key down",
            ActionKind::KeyUp => "Key up",
            ActionKind::KeyPress => "Key press",
            ActionKind::Wait => "Wait",
            ActionKind::Special => "Special",
        }
    }
}

/// One discrete recorded or replayed input event.
///
/// Coordinates are absolute screen pixels; `delay_ms` is the gap to the
/// previous action in the log and drives replay timing. `timestamp` is the
/// wall-clock instant the event was observed and is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: Uuid,
    pub kind: ActionKind,
    pub x: i32,
    pub y: i32,
    pub virtual_key_code: i32,
    pub scan_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub wheel_delta: i32,
    pub delay_ms: i64,
    pub timestamp: DateTime<Utc>,
    pub flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Action {
    /// Create an empty action of the given kind, timestamped now.
    pub fn new(kind: ActionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x: 0,
            y: 0,
            virtual_key_code: 0,
            scan_code: 0,
            character: None,
            wheel_delta: 0,
            delay_ms: 0,
            timestamp: Utc::now(),
            flags: 0,
            description: None,
        }
    }

    /// A pointer action (move or button) at the given screen position.
    pub fn mouse(kind: ActionKind, x: i32, y: i32, delay_ms: i64) -> Self {
        Self {
            x,
            y,
            delay_ms: delay_ms.max(0),
            ..Self::new(kind)
        }
    }

    /// A wheel action at the given position. Positive delta scrolls up.
    pub fn wheel(x: i32, y: i32, delta: i32, delay_ms: i64) -> Self {
        Self {
            x,
            y,
            wheel_delta: delta,
            delay_ms: delay_ms.max(0),
            ..Self::new(ActionKind::MouseWheel)
        }
    }

    /// A keyboard action for the given virtual key and hardware scan code.
    pub fn key(kind: ActionKind, virtual_key_code: i32, scan_code: i32, delay_ms: i64) -> Self {
        Self {
            virtual_key_code,
            scan_code,
            character: crate::model::keys::key_label(virtual_key_code),
            delay_ms: delay_ms.max(0),
            ..Self::new(kind)
        }
    }

    /// A pure delay entry.
    pub fn wait(delay_ms: i64) -> Self {
        Self {
            delay_ms: delay_ms.max(0),
            ..Self::new(ActionKind::Wait)
        }
    }

    /// Check the structural invariants. Never panics.
    ///
    /// Invalid when the delay is negative, a mouse action carries a
    /// coordinate outside the signed 16-bit screen range, or a keyboard
    /// action carries a virtual key outside 0..=255.
    pub fn is_valid(&self) -> bool {
        if self.delay_ms < 0 {
            return false;
        }

        if self.kind.is_mouse() {
            let in_range = |v: i32| (-32768..=32767).contains(&v);
            if !in_range(self.x) || !in_range(self.y) {
                return false;
            }
        }

        if self.kind.is_keyboard() && !(0..=255).contains(&self.virtual_key_code) {
            return false;
        }

        true
    }

    /// Value-equal copy under a fresh identifier. Duplicated actions are
    /// distinct entities; use `clone()` for a plain field copy.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Human-readable one-line summary. Presentation only.
    pub fn describe(&self) -> String {
        let name = self.kind.display_name();
        match self.kind {
            ActionKind::MouseMove => format!("{} to ({}, {})", name, self.x, self.y),
            k if k.needs_pointer_placement() && k != ActionKind::MouseWheel => {
                format!("{} at ({}, {})", name, self.x, self.y)
            }
            ActionKind::MouseWheel => {
                let direction = if self.wheel_delta > 0 { "up" } else { "down" };
                format!("{} {} {} units", name, direction, self.wheel_delta.abs())
            }
            ActionKind::KeyDown | ActionKind::KeyUp | ActionKind::KeyPress => {
                let label = self
                    .character
                    .clone()
                    .unwrap_or_else(|| format!("VK:{}", self.virtual_key_code));
                format!("{} [{}]", name, label)
            }
            ActionKind::Wait => format!("{} {} ms", name, self.delay_ms),
            _ => name.to_string(),
        }
    }
}
