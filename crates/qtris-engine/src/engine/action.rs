use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed vocabulary of decisions the controller can take on a tick.
///
/// The textual form is camelCase (`"downRight"`, `"rotateLeft"`, ...) for `Display`,
/// `FromStr` and serde alike.
///
/// ```
/// use qtris_engine::Action;
///
/// assert_eq!(Action::DownRight.to_string(), "downRight");
/// assert_eq!("rotateLeft".parse::<Action>().unwrap(), Action::RotateLeft);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Restart,
    Down,
    Up,
    Left,
    Right,
    DownRight,
    DownLeft,
    NoMove,
    RotateRight,
    RotateLeft,
}

impl Action {
    pub const ALL: [Self; 10] = [
        Action::Restart,
        Action::Down,
        Action::Up,
        Action::Left,
        Action::Right,
        Action::DownRight,
        Action::DownLeft,
        Action::NoMove,
        Action::RotateRight,
        Action::RotateLeft,
    ];

    /// Actions offered while a game is running, in tie-breaking order.
    ///
    /// The set is fixed; actions whose move or rotation would collide are still offered and
    /// degrade to no-ops when applied.
    pub const LEGAL: [Self; 7] = [
        Action::RotateRight,
        Action::RotateLeft,
        Action::Down,
        Action::Up,
        Action::DownRight,
        Action::DownLeft,
        Action::NoMove,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Restart => "restart",
            Action::Down => "down",
            Action::Up => "up",
            Action::Left => "left",
            Action::Right => "right",
            Action::DownRight => "downRight",
            Action::DownLeft => "downLeft",
            Action::NoMove => "noMove",
            Action::RotateRight => "rotateRight",
            Action::RotateLeft => "rotateLeft",
        }
    }

    /// Returns the movement this action asks for.
    ///
    /// Horizontal intents always fall diagonally: the piece moves down one row as it shifts.
    #[must_use]
    pub const fn movement(self) -> Move {
        match self {
            Action::Down => Move::Down,
            Action::Right | Action::DownRight => Move::DownRight,
            Action::Left | Action::DownLeft => Move::DownLeft,
            Action::Restart
            | Action::Up
            | Action::NoMove
            | Action::RotateRight
            | Action::RotateLeft => Move::NoMove,
        }
    }

    /// Returns the rotation this action asks for, if any.
    #[must_use]
    pub const fn rotation(self) -> Option<RotationDirection> {
        match self {
            Action::Up | Action::RotateRight => Some(RotationDirection::Clockwise),
            Action::RotateLeft => Some(RotationDirection::CounterClockwise),
            Action::Restart
            | Action::Down
            | Action::Left
            | Action::Right
            | Action::DownRight
            | Action::DownLeft
            | Action::NoMove => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action: {name:?}")]
pub struct ParseActionError {
    #[error(not(source))]
    name: String,
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseActionError { name: s.to_owned() })
    }
}

/// A resolved movement of the active piece, as recorded on the piece after a tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    #[default]
    NoMove,
    Down,
    DownRight,
    DownLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_tags_roundtrip() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{action}\""));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "hardDrop".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "unknown action: \"hardDrop\"");
    }

    #[test]
    fn test_movement_intents() {
        assert_eq!(Action::Down.movement(), Move::Down);
        assert_eq!(Action::Right.movement(), Move::DownRight);
        assert_eq!(Action::DownRight.movement(), Move::DownRight);
        assert_eq!(Action::Left.movement(), Move::DownLeft);
        assert_eq!(Action::DownLeft.movement(), Move::DownLeft);
        for action in [Action::Up, Action::NoMove, Action::RotateLeft, Action::Restart] {
            assert_eq!(action.movement(), Move::NoMove, "{action}");
        }
    }

    #[test]
    fn test_up_rotates_like_rotate_right() {
        assert_eq!(Action::Up.rotation(), Action::RotateRight.rotation());
        assert_eq!(
            Action::RotateLeft.rotation(),
            Some(RotationDirection::CounterClockwise)
        );
        assert_eq!(Action::Down.rotation(), None);
    }

    #[test]
    fn test_legal_actions_are_a_subset_of_all() {
        for action in Action::LEGAL {
            assert!(Action::ALL.contains(&action));
        }
        assert!(!Action::LEGAL.contains(&Action::Restart));
    }
}
