//! Pointer events and the textual gesture scripts that drive the
//! editor from the command line.

use std::str::FromStr;

use crate::geometry::Point;

/// Pointer buttons the editor reacts to. Left manipulates objects,
/// middle pans the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
}

/// One pointer event in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, at: Point },
    Move { at: Point },
    Up { button: PointerButton },
    Wheel { delta: f32, at: Point },
}

/// Errors from parsing one gesture line.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GestureParseError {
    #[error("empty gesture")]
    Empty,

    #[error("unknown gesture command {0:?}")]
    UnknownCommand(String),

    #[error("unknown pointer button {0:?}, expected \"left\" or \"middle\"")]
    UnknownButton(String),

    #[error("{0:?} is not a number")]
    BadNumber(String),

    #[error("{command} takes {expected} arguments, got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
}

impl FromStr for PointerEvent {
    type Err = GestureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_gesture(s)
    }
}

/// Parse one gesture line into a pointer event.
///
/// Syntax, one command per line, whitespace separated:
///
/// ```text
/// down <left|middle> <x> <y>
/// move <x> <y>
/// up <left|middle>
/// wheel <delta> <x> <y>
/// ```
///
/// Coordinates and deltas are device-space floats.
pub fn parse_gesture(line: &str) -> Result<PointerEvent, GestureParseError> {
    let mut parts = line.split_whitespace();
    let command = parts.next().ok_or(GestureParseError::Empty)?;
    let args: Vec<&str> = parts.collect();

    match command {
        "down" => {
            expect_args("down", &args, 3)?;
            Ok(PointerEvent::Down {
                button: parse_button(args[0])?,
                at: Point::new(parse_number(args[1])?, parse_number(args[2])?),
            })
        }
        "move" => {
            expect_args("move", &args, 2)?;
            Ok(PointerEvent::Move {
                at: Point::new(parse_number(args[0])?, parse_number(args[1])?),
            })
        }
        "up" => {
            expect_args("up", &args, 1)?;
            Ok(PointerEvent::Up {
                button: parse_button(args[0])?,
            })
        }
        "wheel" => {
            expect_args("wheel", &args, 3)?;
            Ok(PointerEvent::Wheel {
                delta: parse_number(args[0])?,
                at: Point::new(parse_number(args[1])?, parse_number(args[2])?),
            })
        }
        other => Err(GestureParseError::UnknownCommand(other.to_string())),
    }
}

fn expect_args(
    command: &'static str,
    args: &[&str],
    expected: usize,
) -> Result<(), GestureParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(GestureParseError::Arity {
            command,
            expected,
            got: args.len(),
        })
    }
}

fn parse_button(word: &str) -> Result<PointerButton, GestureParseError> {
    match word {
        "left" => Ok(PointerButton::Left),
        "middle" => Ok(PointerButton::Middle),
        other => Err(GestureParseError::UnknownButton(other.to_string())),
    }
}

fn parse_number(word: &str) -> Result<f32, GestureParseError> {
    word.parse()
        .map_err(|_| GestureParseError::BadNumber(word.to_string()))
}
