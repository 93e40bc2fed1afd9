//! Langton's ant.

use sim_garden_core::Turn;

use crate::Transition;

/// Turns left on white and right on black, flipping the cell either way.
#[must_use]
pub fn transition(color: u8) -> Transition {
    if color == 0 {
        Transition {
            write: 1,
            turn: Turn::Left,
            next_state: 0,
        }
    } else {
        Transition {
            write: 0,
            turn: Turn::Right,
            next_state: 0,
        }
    }
}
