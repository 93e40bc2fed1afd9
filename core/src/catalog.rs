//! Closed catalogs of rules, options, patterns and turmite programs.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BoundaryPolicy, TickRate};

/// Cellular automaton rules available in the classic family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// B3/S23.
    Conway,
    /// B36/S23.
    HighLife,
    /// B3678/S34678.
    DayAndNight,
    /// B2/S.
    Seeds,
    /// Three-state off/on/dying automaton.
    BriansBrain,
}

impl Rule {
    /// Every rule in catalog order.
    pub const ALL: [Rule; 5] = [
        Rule::Conway,
        Rule::HighLife,
        Rule::DayAndNight,
        Rule::Seeds,
        Rule::BriansBrain,
    ];

    /// Stable identifier used in option ids.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Conway => "conway",
            Self::HighLife => "highLife",
            Self::DayAndNight => "dayAndNight",
            Self::Seeds => "seeds",
            Self::BriansBrain => "briansBrain",
        }
    }

    /// Display name of the rule.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Conway => "Conway's Game of Life",
            Self::HighLife => "High Life",
            Self::DayAndNight => "Day & Night",
            Self::Seeds => "Seeds",
            Self::BriansBrain => "Brian's Brain",
        }
    }

    /// Size of the cell alphabet the rule operates on.
    #[must_use]
    pub const fn cell_states(self) -> u8 {
        match self {
            Self::BriansBrain => 3,
            _ => 2,
        }
    }
}

/// Automaton families, each with its own stepper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// Cellular automata evaluated over the whole grid each tick.
    Classic,
    /// A single Langton's ant.
    Langton,
    /// A colony of turmites.
    Turmites,
}

impl Family {
    /// How coordinates leaving the grid are resolved for this family.
    #[must_use]
    pub const fn boundary_policy(self) -> BoundaryPolicy {
        match self {
            Self::Classic | Self::Turmites => BoundaryPolicy::Wrap,
            Self::Langton => BoundaryPolicy::Clamp,
        }
    }

    /// Highest tick rate accepted while the family is active.
    #[must_use]
    pub const fn tick_rate_cap(self) -> u32 {
        match self {
            Self::Classic => 5,
            Self::Langton | Self::Turmites => 1000,
        }
    }

    /// Step sizes offered by speed nudge controls.
    #[must_use]
    pub const fn speed_nudges(self) -> &'static [u32] {
        match self {
            Self::Classic => &[1],
            Self::Langton | Self::Turmites => &[10, 100],
        }
    }

    /// Clamps a rate into the range accepted by the family.
    #[must_use]
    pub fn clamp_rate(self, rate: TickRate) -> TickRate {
        rate.adjusted(0, self.tick_rate_cap())
    }
}

/// Selectable simulation, combining a family with its rule when relevant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimulationOption {
    /// Classic cellular automaton running the given rule.
    Classic(Rule),
    /// Langton's ant.
    Langton,
    /// Turmite colony.
    Turmites,
}

impl Default for SimulationOption {
    fn default() -> Self {
        Self::Classic(Rule::Conway)
    }
}

impl SimulationOption {
    /// Every option in menu order.
    pub const ALL: [SimulationOption; 7] = [
        SimulationOption::Classic(Rule::Conway),
        SimulationOption::Classic(Rule::HighLife),
        SimulationOption::Classic(Rule::DayAndNight),
        SimulationOption::Classic(Rule::Seeds),
        SimulationOption::Classic(Rule::BriansBrain),
        SimulationOption::Langton,
        SimulationOption::Turmites,
    ];

    /// Family the option belongs to.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Classic(_) => Family::Classic,
            Self::Langton => Family::Langton,
            Self::Turmites => Family::Turmites,
        }
    }

    /// Rule driving the option, if it is a cellular automaton.
    #[must_use]
    pub const fn rule(self) -> Option<Rule> {
        match self {
            Self::Classic(rule) => Some(rule),
            Self::Langton | Self::Turmites => None,
        }
    }

    /// Size of the cell alphabet used by the option's grid.
    #[must_use]
    pub const fn cell_states(self) -> u8 {
        match self {
            Self::Classic(rule) => rule.cell_states(),
            Self::Langton | Self::Turmites => 2,
        }
    }

    /// Display name of the option.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic(rule) => rule.name(),
            Self::Langton => "Langton's Ant",
            Self::Turmites => "Turmites",
        }
    }

    /// Multi-line description of the option's behaviour.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Classic(Rule::Conway) => {
                "Any live cell with 2 or 3 neighbors survives.\n\
                 Any dead cell with exactly 3 neighbors becomes alive.\n\
                 All other cells die or stay dead."
            }
            Self::Classic(Rule::HighLife) => {
                "Conway's rules plus one more:\n\
                 dead cells with 6 neighbors also become alive.\n\
                 Supports replicators."
            }
            Self::Classic(Rule::DayAndNight) => {
                "Live cells survive with 3, 4, 6, 7 or 8 neighbors.\n\
                 Dead cells become alive with 3, 6, 7 or 8 neighbors.\n\
                 Live and dead regions behave symmetrically."
            }
            Self::Classic(Rule::Seeds) => {
                "Live cells always die.\n\
                 Dead cells with exactly 2 neighbors become alive.\n\
                 Produces explosive growth."
            }
            Self::Classic(Rule::BriansBrain) => {
                "Three states: off, on and dying.\n\
                 Off cells turn on with exactly 2 on neighbors.\n\
                 On cells start dying, dying cells turn off."
            }
            Self::Langton => {
                "On a white cell turn left, on a black cell turn right.\n\
                 Flip the cell, then move forward.\n\
                 Stops at the grid edge instead of wrapping."
            }
            Self::Turmites => {
                "Several ants with internal state and their own transition tables.\n\
                 Each reads a cell, writes a color, turns and changes state.\n\
                 Wraps around the grid edges."
            }
        }
    }
}

impl fmt::Display for SimulationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic(rule) => write!(f, "classic/{}", rule.id()),
            Self::Langton => f.write_str("ants/langton"),
            Self::Turmites => f.write_str("ants/turmites"),
        }
    }
}

/// Error returned when an option id is not in the catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown simulation option `{id}`")]
pub struct ParseOptionError {
    /// Identifier that failed to parse.
    pub id: String,
}

impl FromStr for SimulationOption {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.to_string() == s)
            .ok_or_else(|| ParseOptionError { id: s.to_owned() })
    }
}

/// Seeds available for reinitialising the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// Every cell independently alive with the configured density.
    Random,
    /// 3×3 glider.
    Glider,
    /// 9×36 Gosper glider gun.
    GliderGun,
    /// 1×3 period-2 oscillator.
    Blinker,
    /// 2×2 still life.
    Block,
    /// 3×3 methuselah.
    RPentomino,
    /// 4×5 lightweight spaceship.
    LightweightSpaceship,
    /// 13×13 period-3 oscillator.
    Pulsar,
}

impl Pattern {
    /// Every pattern in catalog order.
    pub const ALL: [Pattern; 8] = [
        Pattern::Random,
        Pattern::Glider,
        Pattern::GliderGun,
        Pattern::Blinker,
        Pattern::Block,
        Pattern::RPentomino,
        Pattern::LightweightSpaceship,
        Pattern::Pulsar,
    ];

    /// Stable identifier of the pattern.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Glider => "glider",
            Self::GliderGun => "gliderGun",
            Self::Blinker => "blinker",
            Self::Block => "block",
            Self::RPentomino => "rPentomino",
            Self::LightweightSpaceship => "lightweightSpaceship",
            Self::Pulsar => "pulsar",
        }
    }

    /// Display name of the pattern.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Glider => "Glider",
            Self::GliderGun => "Glider Gun",
            Self::Blinker => "Blinker",
            Self::Block => "Block",
            Self::RPentomino => "R-pentomino",
            Self::LightweightSpaceship => "Lightweight Spaceship",
            Self::Pulsar => "Pulsar",
        }
    }

    /// Pattern following this one in catalog order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|pattern| *pattern == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a pattern id is not in the catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown pattern `{id}`")]
pub struct ParsePatternError {
    /// Identifier that failed to parse.
    pub id: String,
}

impl FromStr for Pattern {
    type Err = ParsePatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pattern| pattern.id() == s)
            .ok_or_else(|| ParsePatternError { id: s.to_owned() })
    }
}

/// Turmite programs known to the ants stepper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurmiteProgram {
    /// Single-state turmite equivalent to Langton's ant.
    Langton,
    /// Mirror image of Langton's ant: right on white, left on black.
    ReverseLangton,
    /// Two-state turmite that grows a spiral along Fibonacci-sized arms.
    FibonacciSpiral,
    /// Two-state turmite that grows a square spiral.
    SpiralGrowth,
}

impl TurmiteProgram {
    /// Every program in catalog order.
    pub const ALL: [TurmiteProgram; 4] = [
        TurmiteProgram::Langton,
        TurmiteProgram::ReverseLangton,
        TurmiteProgram::FibonacciSpiral,
        TurmiteProgram::SpiralGrowth,
    ];

    /// Display name of the program.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Langton => "Langton",
            Self::ReverseLangton => "Reverse Langton",
            Self::FibonacciSpiral => "Fibonacci Spiral",
            Self::SpiralGrowth => "Spiral Growth",
        }
    }
}
