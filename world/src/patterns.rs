//! Preset seeds stamped into fresh grids.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use sim_garden_core::Pattern;

const GLIDER: &[&str] = &[".O.", "..O", "OOO"];

const GLIDER_GUN: &[&str] = &[
    "........................O...........",
    "......................O.O...........",
    "............OO......OO............OO",
    "...........O...O....OO............OO",
    "OO........O.....O...OO..............",
    "OO........O...O.OO....O.O...........",
    "..........O.....O.......O...........",
    "...........O...O....................",
    "............OO......................",
];

const BLINKER: &[&str] = &["OOO"];

const BLOCK: &[&str] = &["OO", "OO"];

const R_PENTOMINO: &[&str] = &[".OO", "OO.", ".O."];

const LIGHTWEIGHT_SPACESHIP: &[&str] = &[".O..O", "O....", "O...O", "OOOO."];

const PULSAR: &[&str] = &[
    "..OOO...OOO..",
    ".............",
    "O....O.O....O",
    "O....O.O....O",
    "O....O.O....O",
    "..OOO...OOO..",
    ".............",
    "..OOO...OOO..",
    "O....O.O....O",
    "O....O.O....O",
    "O....O.O....O",
    ".............",
    "..OOO...OOO..",
];

/// Rows of the preset, `O` marking live cells. `None` for the random fill.
pub(crate) fn preset(pattern: Pattern) -> Option<&'static [&'static str]> {
    match pattern {
        Pattern::Random => None,
        Pattern::Glider => Some(GLIDER),
        Pattern::GliderGun => Some(GLIDER_GUN),
        Pattern::Blinker => Some(BLINKER),
        Pattern::Block => Some(BLOCK),
        Pattern::RPentomino => Some(R_PENTOMINO),
        Pattern::LightweightSpaceship => Some(LIGHTWEIGHT_SPACESHIP),
        Pattern::Pulsar => Some(PULSAR),
    }
}

/// Builds an otherwise empty grid with the preset centered in it.
///
/// Presets larger than the grid are clipped symmetrically.
pub(crate) fn stamp(preset: &[&str], rows: u32, columns: u32) -> Vec<u8> {
    let mut cells = vec![0; rows as usize * columns as usize];
    let height = preset.len() as i64;
    let width = preset.iter().map(|line| line.len()).max().unwrap_or(0) as i64;
    let top = (i64::from(rows) - height) / 2;
    let left = (i64::from(columns) - width) / 2;

    for (row_offset, line) in preset.iter().enumerate() {
        for (column_offset, symbol) in line.bytes().enumerate() {
            if symbol != b'O' {
                continue;
            }
            let row = top + row_offset as i64;
            let column = left + column_offset as i64;
            if row < 0 || column < 0 || row >= i64::from(rows) || column >= i64::from(columns) {
                continue;
            }
            cells[row as usize * columns as usize + column as usize] = 1;
        }
    }

    cells
}

/// Fills every cell independently alive with probability `density`.
pub(crate) fn random_fill(rows: u32, columns: u32, density: f32, rng: &mut ChaCha8Rng) -> Vec<u8> {
    let density = f64::from(density.clamp(0.0, 1.0));
    (0..rows as usize * columns as usize)
        .map(|_| u8::from(rng.gen_bool(density)))
        .collect()
}
