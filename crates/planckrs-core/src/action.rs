use std::fmt;
use std::str::FromStr;

use crate::host::SimulationError;
use crate::keymap::{MATRIX_COLS, MATRIX_ROWS};

/// Edge of a key event.
///
/// The host runtime reports only press and release; there is no repeat edge
/// at the firmware level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Release,
    Press,
}

impl Action {
    /// Returns true if this is a PRESS event
    pub fn is_pressed(self) -> bool {
        matches!(self, Action::Press)
    }

    /// Create Action from the runtime's pressed flag
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Action::Press
        } else {
            Action::Release
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Release => write!(f, "release"),
            Action::Press => write!(f, "press"),
        }
    }
}

/// Physical matrix position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check that the position lies inside the Planck matrix
    pub fn in_matrix(self) -> bool {
        (self.row as usize) < MATRIX_ROWS && (self.col as usize) < MATRIX_COLS
    }
}

impl fmt::Display for KeyPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// A key event as handed to the key-event hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyRecord {
    pub pos: KeyPos,
    pub action: Action,
}

impl KeyRecord {
    pub const fn press(row: u8, col: u8) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            action: Action::Press,
        }
    }

    pub const fn release(row: u8, col: u8) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            action: Action::Release,
        }
    }

    /// True on the press edge
    pub fn pressed(&self) -> bool {
        self.action.is_pressed()
    }
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge = if self.pressed() { 'p' } else { 'r' };
        write!(f, "{}:{}", edge, self.pos)
    }
}

/// Parses event scripts of the form `p:ROW,COL` or `r:ROW,COL`.
impl FromStr for KeyRecord {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SimulationError::BadEvent(s.to_string());

        let (edge, pos) = s.trim().split_once(':').ok_or_else(bad)?;
        let pressed = match edge {
            "p" | "press" => true,
            "r" | "release" => false,
            _ => return Err(bad()),
        };
        let (row, col) = pos.split_once(',').ok_or_else(bad)?;
        let row: u8 = row.trim().parse().map_err(|_| bad())?;
        let col: u8 = col.trim().parse().map_err(|_| bad())?;

        let pos = KeyPos::new(row, col);
        if !pos.in_matrix() {
            return Err(SimulationError::OutOfMatrix(pos));
        }
        Ok(KeyRecord {
            pos,
            action: Action::from_pressed(pressed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_properties() {
        assert!(Action::Press.is_pressed());
        assert!(!Action::Release.is_pressed());
        assert_eq!(Action::from_pressed(true), Action::Press);
        assert_eq!(Action::from_pressed(false), Action::Release);
    }

    #[test]
    fn test_parse_record() {
        assert_eq!("p:3,4".parse::<KeyRecord>(), Ok(KeyRecord::press(3, 4)));
        assert_eq!(
            "release: 0, 11".parse::<KeyRecord>(),
            Ok(KeyRecord::release(0, 11))
        );
        assert_eq!(KeyRecord::press(1, 2).to_string(), "p:1,2");
    }

    #[test]
    fn test_parse_record_rejects_garbage() {
        assert_eq!(
            "x:1,1".parse::<KeyRecord>(),
            Err(SimulationError::BadEvent("x:1,1".to_string()))
        );
        assert!(matches!(
            "p:1".parse::<KeyRecord>(),
            Err(SimulationError::BadEvent(_))
        ));
        assert_eq!(
            "p:4,0".parse::<KeyRecord>(),
            Err(SimulationError::OutOfMatrix(KeyPos::new(4, 0)))
        );
        assert_eq!(
            "p:0,12".parse::<KeyRecord>(),
            Err(SimulationError::OutOfMatrix(KeyPos::new(0, 12)))
        );
    }
}
