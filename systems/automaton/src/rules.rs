//! Cell transition functions for every rule in the catalog.

use sim_garden_core::Rule;

/// Birth and survival neighbor counts of a two-state rule, as bitmasks.
#[derive(Clone, Copy, Debug)]
struct LifeLike {
    birth: u16,
    survival: u16,
}

impl LifeLike {
    const fn new(birth: &[u8], survival: &[u8]) -> Self {
        Self {
            birth: mask(birth),
            survival: mask(survival),
        }
    }

    const fn next(self, state: u8, live_neighbors: u8) -> u8 {
        let bit = 1u16 << live_neighbors;
        let lives = if state == 1 {
            self.survival & bit != 0
        } else {
            self.birth & bit != 0
        };
        lives as u8
    }
}

const fn mask(counts: &[u8]) -> u16 {
    let mut mask = 0;
    let mut index = 0;
    while index < counts.len() {
        mask |= 1 << counts[index];
        index += 1;
    }
    mask
}

const CONWAY: LifeLike = LifeLike::new(&[3], &[2, 3]);
const HIGH_LIFE: LifeLike = LifeLike::new(&[3, 6], &[2, 3]);
const DAY_AND_NIGHT: LifeLike = LifeLike::new(&[3, 6, 7, 8], &[3, 4, 6, 7, 8]);
const SEEDS: LifeLike = LifeLike::new(&[2], &[]);

/// Brian's Brain states.
const OFF: u8 = 0;
const ON: u8 = 1;
const DYING: u8 = 2;

/// Next state of a cell given its state and the number of live Moore neighbors.
///
/// Total over `live_neighbors` in `0..=8`. Cells in a state outside the rule's
/// alphabet are treated as dead.
#[must_use]
pub fn next_state(rule: Rule, state: u8, live_neighbors: u8) -> u8 {
    let live_neighbors = live_neighbors.min(8);
    match rule {
        Rule::Conway => CONWAY.next(state, live_neighbors),
        Rule::HighLife => HIGH_LIFE.next(state, live_neighbors),
        Rule::DayAndNight => DAY_AND_NIGHT.next(state, live_neighbors),
        Rule::Seeds => SEEDS.next(state, live_neighbors),
        Rule::BriansBrain => match state {
            OFF if live_neighbors == 2 => ON,
            ON => DYING,
            _ => OFF,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::next_state;
    use sim_garden_core::Rule;

    fn births(rule: Rule) -> Vec<u8> {
        (0..=8).filter(|n| next_state(rule, 0, *n) == 1).collect()
    }

    fn survivals(rule: Rule) -> Vec<u8> {
        (0..=8).filter(|n| next_state(rule, 1, *n) == 1).collect()
    }

    #[test]
    fn conway_is_b3_s23() {
        assert_eq!(births(Rule::Conway), vec![3]);
        assert_eq!(survivals(Rule::Conway), vec![2, 3]);
    }

    #[test]
    fn high_life_adds_birth_on_six() {
        assert_eq!(births(Rule::HighLife), vec![3, 6]);
        assert_eq!(survivals(Rule::HighLife), vec![2, 3]);
    }

    #[test]
    fn day_and_night_tables() {
        assert_eq!(births(Rule::DayAndNight), vec![3, 6, 7, 8]);
        assert_eq!(survivals(Rule::DayAndNight), vec![3, 4, 6, 7, 8]);
    }

    #[test]
    fn seeds_never_survive() {
        assert_eq!(births(Rule::Seeds), vec![2]);
        assert!(survivals(Rule::Seeds).is_empty());
    }

    #[test]
    fn brians_brain_cycles_on_dying_off() {
        assert_eq!(births(Rule::BriansBrain), vec![2]);
        for n in 0..=8 {
            assert_eq!(next_state(Rule::BriansBrain, 1, n), 2);
            assert_eq!(next_state(Rule::BriansBrain, 2, n), 0);
        }
    }
}
