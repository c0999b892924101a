//! Input command model: what a caller may ask for and what it gets back.
//!
//! The surrounding service decodes its own wire payloads (HTTP bodies,
//! WebSocket frames) into these types.  Name parsing helpers live here so
//! every caller rejects malformed input the same way, but they run on the
//! caller's side of the facade: the facade itself only ever sees validated
//! enums and integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::KeyCode;

/// Scroll amount used when a gesture carries no (or a non-positive) amount.
pub const DEFAULT_SCROLL_AMOUNT: u32 = 3;

/// Message carried by an [`InputResult`] that was suppressed by the cooldown.
pub const COOLDOWN_MESSAGE: &str = "cooldown";

/// Malformed caller input (the "invalid command" family).
///
/// Produced only by the parsing helpers; the facade never returns it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unsupported key: {0}")]
    UnknownKey(String),
    #[error("unsupported mouse button: {0}")]
    UnknownButton(String),
    #[error("direction must be 'up' or 'down', got '{0}'")]
    UnknownDirection(String),
    #[error("key combo is empty")]
    EmptyCombo,
    #[error("unsupported gesture: {0}")]
    UnknownGesture(String),
    #[error("gesture is missing required argument '{0}'")]
    MissingArgument(&'static str),
}

/// Mouse buttons a gesture can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

impl FromStr for MouseButton {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            _ => Err(CommandError::UnknownButton(s.into())),
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
        })
    }
}

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    /// `+1` for up, `-1` for down: the sign convention of the OS wheel delta.
    pub fn sign(self) -> i32 {
        match self {
            ScrollDirection::Up => 1,
            ScrollDirection::Down => -1,
        }
    }
}

impl FromStr for ScrollDirection {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(ScrollDirection::Up),
            "down" => Ok(ScrollDirection::Down),
            _ => Err(CommandError::UnknownDirection(s.into())),
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        })
    }
}

/// Key of the cooldown table: one entry per kind of discrete action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    MoveImmediate,
    LeftClick,
    RightClick,
    DoubleClick,
    Scroll,
    KeyPress,
    KeyCombo,
}

impl ActionKind {
    /// The click kind for `button`.
    pub fn click(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => ActionKind::LeftClick,
            MouseButton::Right => ActionKind::RightClick,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::MoveImmediate => "move_immediate",
            ActionKind::LeftClick => "left_click",
            ActionKind::RightClick => "right_click",
            ActionKind::DoubleClick => "double_click",
            ActionKind::Scroll => "scroll",
            ActionKind::KeyPress => "key_press",
            ActionKind::KeyCombo => "key_combo",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single input primitive the facade can execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputCommand {
    /// Smoothed pointer move toward an absolute target.
    Move { x: i32, y: i32 },
    /// Unsmoothed pointer move.
    MoveImmediate { x: i32, y: i32 },
    Click { button: MouseButton },
    DoubleClick,
    Scroll { direction: ScrollDirection, amount: u32 },
    KeyPress { code: KeyCode },
    KeyCombo { codes: Vec<KeyCode> },
}

/// Optional arguments that accompany a gesture name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureArgs {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub amount: Option<i32>,
}

impl InputCommand {
    /// Maps a recognizer gesture name to a command.
    ///
    /// Supported names: `mouse_move`, `left_click`, `right_click`,
    /// `double_click`, `scroll_up`, `scroll_down`, `escape`, `enter`,
    /// `space`.  Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownGesture`] for any other name and
    /// [`CommandError::MissingArgument`] when `mouse_move` lacks coordinates.
    pub fn from_gesture(name: &str, args: GestureArgs) -> Result<Self, CommandError> {
        let scroll_amount = match args.amount {
            Some(n) if n > 0 => n as u32,
            _ => DEFAULT_SCROLL_AMOUNT,
        };
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "mouse_move" => InputCommand::Move {
                x: args.x.ok_or(CommandError::MissingArgument("x"))?,
                y: args.y.ok_or(CommandError::MissingArgument("y"))?,
            },
            "left_click" => InputCommand::Click {
                button: MouseButton::Left,
            },
            "right_click" => InputCommand::Click {
                button: MouseButton::Right,
            },
            "double_click" => InputCommand::DoubleClick,
            "scroll_up" => InputCommand::Scroll {
                direction: ScrollDirection::Up,
                amount: scroll_amount,
            },
            "scroll_down" => InputCommand::Scroll {
                direction: ScrollDirection::Down,
                amount: scroll_amount,
            },
            "escape" => InputCommand::KeyPress {
                code: KeyCode::Escape,
            },
            "enter" => InputCommand::KeyPress {
                code: KeyCode::Enter,
            },
            "space" => InputCommand::KeyPress {
                code: KeyCode::Space,
            },
            _ => return Err(CommandError::UnknownGesture(name.into())),
        };
        Ok(command)
    }

    /// The cooldown entry this command is gated by, if any.
    ///
    /// Pointer moves are never gated: tracking must stay responsive.
    pub fn cooldown_kind(&self) -> Option<ActionKind> {
        match self {
            InputCommand::Move { .. } | InputCommand::MoveImmediate { .. } => None,
            InputCommand::Click { button } => Some(ActionKind::click(*button)),
            InputCommand::DoubleClick => Some(ActionKind::DoubleClick),
            InputCommand::Scroll { .. } => Some(ActionKind::Scroll),
            InputCommand::KeyPress { .. } => Some(ActionKind::KeyPress),
            InputCommand::KeyCombo { .. } => Some(ActionKind::KeyCombo),
        }
    }

    /// Tag reported in [`InputResult::executed_action`] on success.
    pub fn action_tag(&self) -> String {
        match self {
            InputCommand::Move { .. } => "mouse_move".to_string(),
            InputCommand::MoveImmediate { .. } => "mouse_move_immediate".to_string(),
            InputCommand::Click { button } => ActionKind::click(*button).as_str().to_string(),
            InputCommand::DoubleClick => ActionKind::DoubleClick.as_str().to_string(),
            InputCommand::Scroll { direction, .. } => format!("scroll_{direction}"),
            InputCommand::KeyPress { code } => format!("key_{}", code.name()),
            InputCommand::KeyCombo { codes } => format!("combo_{}", KeyCode::combo_name(codes)),
        }
    }
}

/// Outcome of every facade operation.
///
/// Failures are data, not errors: `success == false` with a message.  A
/// cooldown suppression carries [`COOLDOWN_MESSAGE`] so callers can tell it
/// apart from a driver failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputResult {
    pub success: bool,
    pub message: String,
    pub executed_action: Option<String>,
}

impl InputResult {
    pub fn ok(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            executed_action: Some(action.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            executed_action: None,
        }
    }

    /// Result for an action that arrived inside its debounce window.
    pub fn cooldown() -> Self {
        Self::failed(COOLDOWN_MESSAGE)
    }

    /// Returns `true` when the action was suppressed by the cooldown gate.
    pub fn is_cooldown(&self) -> bool {
        !self.success && self.message == COOLDOWN_MESSAGE
    }
}

/// Combined screen and pointer query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub cursor_x: i32,
    pub cursor_y: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing_and_sign() {
        assert_eq!("UP".parse::<ScrollDirection>().unwrap(), ScrollDirection::Up);
        assert_eq!(ScrollDirection::Up.sign(), 1);
        assert_eq!(ScrollDirection::Down.sign(), -1);
        assert!(matches!(
            "sideways".parse::<ScrollDirection>(),
            Err(CommandError::UnknownDirection(_))
        ));
    }

    #[test]
    fn test_button_parsing() {
        assert_eq!("Left".parse::<MouseButton>().unwrap(), MouseButton::Left);
        assert!("middle".parse::<MouseButton>().is_err());
    }

    #[test]
    fn test_from_gesture_mouse_move_requires_coordinates() {
        let args = GestureArgs {
            x: Some(10),
            ..Default::default()
        };
        assert_eq!(
            InputCommand::from_gesture("mouse_move", args),
            Err(CommandError::MissingArgument("y"))
        );
    }

    #[test]
    fn test_from_gesture_scroll_defaults_amount_to_three() {
        let cmd = InputCommand::from_gesture("scroll_down", GestureArgs::default()).unwrap();
        assert_eq!(
            cmd,
            InputCommand::Scroll {
                direction: ScrollDirection::Down,
                amount: 3
            }
        );

        let negative = GestureArgs {
            amount: Some(-2),
            ..Default::default()
        };
        let cmd = InputCommand::from_gesture("SCROLL_UP", negative).unwrap();
        assert_eq!(
            cmd,
            InputCommand::Scroll {
                direction: ScrollDirection::Up,
                amount: 3
            }
        );
    }

    #[test]
    fn test_from_gesture_rejects_unknown_names() {
        assert!(matches!(
            InputCommand::from_gesture("wave", GestureArgs::default()),
            Err(CommandError::UnknownGesture(name)) if name == "wave"
        ));
    }

    #[test]
    fn test_moves_are_never_gated_by_cooldown() {
        assert_eq!(InputCommand::Move { x: 1, y: 1 }.cooldown_kind(), None);
        assert_eq!(InputCommand::MoveImmediate { x: 1, y: 1 }.cooldown_kind(), None);
        assert_eq!(
            InputCommand::Click {
                button: MouseButton::Right
            }
            .cooldown_kind(),
            Some(ActionKind::RightClick)
        );
    }

    #[test]
    fn test_action_tags() {
        assert_eq!(
            InputCommand::Scroll {
                direction: ScrollDirection::Up,
                amount: 1
            }
            .action_tag(),
            "scroll_up"
        );
        assert_eq!(
            InputCommand::KeyPress {
                code: KeyCode::Escape
            }
            .action_tag(),
            "key_esc"
        );
        assert_eq!(
            InputCommand::KeyCombo {
                codes: vec![KeyCode::Control, KeyCode::KeyV]
            }
            .action_tag(),
            "combo_ctrl+v"
        );
    }

    #[test]
    fn test_cooldown_result_is_distinguishable() {
        let r = InputResult::cooldown();
        assert!(r.is_cooldown());
        assert!(!InputResult::failed("driver failed").is_cooldown());
        assert!(!InputResult::ok("done", "left_click").is_cooldown());
    }
}
