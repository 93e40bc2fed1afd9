//! Transition tables for the turmite catalog.

use sim_garden_core::{TurmiteProgram, Turn};

use crate::Transition;

const fn t(write: u8, turn: Turn, next_state: u8) -> Transition {
    Transition {
        write,
        turn,
        next_state,
    }
}

// Tables are indexed `[state][color]`.

const LANGTON: &[[Transition; 2]] = &[[t(1, Turn::Left, 0), t(0, Turn::Right, 0)]];

const REVERSE_LANGTON: &[[Transition; 2]] = &[[t(1, Turn::Right, 0), t(0, Turn::Left, 0)]];

const FIBONACCI_SPIRAL: &[[Transition; 2]] = &[
    [t(1, Turn::Left, 1), t(1, Turn::Left, 1)],
    [t(1, Turn::Right, 1), t(0, Turn::None, 0)],
];

const SPIRAL_GROWTH: &[[Transition; 2]] = &[
    [t(1, Turn::None, 1), t(1, Turn::Left, 0)],
    [t(1, Turn::Right, 1), t(0, Turn::None, 0)],
];

/// Full transition table of a program.
#[must_use]
pub fn table(program: TurmiteProgram) -> &'static [[Transition; 2]] {
    match program {
        TurmiteProgram::Langton => LANGTON,
        TurmiteProgram::ReverseLangton => REVERSE_LANGTON,
        TurmiteProgram::FibonacciSpiral => FIBONACCI_SPIRAL,
        TurmiteProgram::SpiralGrowth => SPIRAL_GROWTH,
    }
}

/// Looks up `(state, color)` in the program's table.
///
/// States past the end of the table wrap around and any non-zero color reads
/// as black, so the lookup is total.
#[must_use]
pub fn transition(program: TurmiteProgram, state: u8, color: u8) -> Transition {
    let table = table(program);
    let row = &table[usize::from(state) % table.len()];
    row[usize::from(color.min(1))]
}

#[cfg(test)]
mod tests {
    use super::{table, transition};
    use sim_garden_core::{TurmiteProgram, Turn};

    #[test]
    fn every_transition_targets_a_valid_state() {
        for program in TurmiteProgram::ALL {
            let table = table(program);
            for row in table {
                for entry in row {
                    assert!(usize::from(entry.next_state) < table.len(), "{program:?}");
                    assert!(entry.write <= 1, "{program:?}");
                }
            }
        }
    }

    #[test]
    fn langton_program_matches_the_ant() {
        let white = transition(TurmiteProgram::Langton, 0, 0);
        assert_eq!((white.write, white.turn), (1, Turn::Left));
        let black = transition(TurmiteProgram::Langton, 0, 1);
        assert_eq!((black.write, black.turn), (0, Turn::Right));
    }

    #[test]
    fn out_of_range_inputs_wrap() {
        assert_eq!(
            transition(TurmiteProgram::FibonacciSpiral, 3, 7),
            transition(TurmiteProgram::FibonacciSpiral, 1, 1)
        );
    }
}
