use std::time::Duration;

use sim_garden_core::{CellCoord, Command, Epoch, Event, Pattern, Revision, Rule, SimulationOption};
use sim_garden_system_automaton::Automaton;
use sim_garden_world::{self as world, query, World};

const WAIT: Duration = Duration::from_secs(5);

fn world_with(rows: u32, columns: u32, pattern: Pattern) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    for command in [
        Command::ConfigureGrid { rows, columns },
        Command::ApplyPattern { pattern },
        Command::Start,
    ] {
        world::apply(&mut world, command, &mut events);
    }
    world
}

fn apply_commands(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn tick_inline(world: &mut World, automaton: &mut Automaton) -> Vec<Event> {
    let events = apply_commands(world, vec![Command::Tick]);
    let mut commands = Vec::new();
    automaton.handle(&events, &query::grid_snapshot(world), &mut commands);
    apply_commands(world, commands)
}

fn live_cells(world: &World) -> Vec<CellCoord> {
    let view = query::grid_view(world);
    view.coords()
        .filter(|cell| view.state(*cell) == Some(1))
        .collect()
}

#[test]
fn glider_translates_one_cell_diagonally_every_four_generations() {
    let mut world = world_with(10, 10, Pattern::Glider);
    let mut automaton = Automaton::inline();
    let start = live_cells(&world);

    for _ in 0..4 {
        let events = tick_inline(&mut world, &mut automaton);
        assert!(matches!(events[0], Event::GenerationCommitted { .. }));
    }

    let shifted: Vec<CellCoord> = start
        .iter()
        .map(|cell| CellCoord::new(cell.column() + 1, cell.row() + 1))
        .collect();
    let mut after = live_cells(&world);
    after.sort();
    let mut expected = shifted;
    expected.sort();
    assert_eq!(after, expected);
    assert_eq!(query::simulation_state(&world).step_count, 4);
}

#[test]
fn glider_gun_emits_a_glider_every_thirty_generations() {
    let mut world = world_with(100, 100, Pattern::GliderGun);
    let mut automaton = Automaton::inline();
    assert_eq!(query::grid_view(&world).population(), 36);

    for _ in 0..30 {
        let _ = tick_inline(&mut world, &mut automaton);
    }
    assert_eq!(query::grid_view(&world).population(), 41);

    for _ in 0..30 {
        let _ = tick_inline(&mut world, &mut automaton);
    }
    assert_eq!(query::grid_view(&world).population(), 46);
}

#[test]
fn inline_mode_steps_once_per_batch() {
    let world = world_with(5, 5, Pattern::Blinker);
    let mut automaton = Automaton::inline();
    let tick = Event::TickElapsed {
        epoch: query::epoch(&world),
        revision: query::revision(&world),
        option: SimulationOption::Classic(Rule::Conway),
    };
    let mut commands = Vec::new();
    automaton.handle(
        &[tick.clone(), tick],
        &query::grid_snapshot(&world),
        &mut commands,
    );

    assert_eq!(commands.len(), 1);
    assert_eq!(automaton.dropped_ticks(), 1);
    assert!(automaton.is_idle());
}

#[test]
fn ant_ticks_are_ignored() {
    let world = world_with(5, 5, Pattern::Block);
    let mut automaton = Automaton::inline();
    let mut commands = Vec::new();
    automaton.handle(
        &[Event::TickElapsed {
            epoch: Epoch::default(),
            revision: Revision::default(),
            option: SimulationOption::Langton,
        }],
        &query::grid_snapshot(&world),
        &mut commands,
    );
    assert!(commands.is_empty());
}

#[test]
fn background_generation_commits_through_the_world() {
    let mut world = world_with(5, 5, Pattern::Blinker);
    let mut automaton = Automaton::background().expect("spawn worker");

    let events = apply_commands(&mut world, vec![Command::Tick]);
    let mut commands = Vec::new();
    automaton.handle(&events, &query::grid_snapshot(&world), &mut commands);
    assert!(commands.is_empty(), "background mode answers asynchronously");
    assert!(!automaton.is_idle());

    assert!(automaton.wait(WAIT, &mut commands));
    let events = apply_commands(&mut world, commands);

    assert!(matches!(
        events[0],
        Event::GenerationCommitted { step_count: 1, .. }
    ));
    let vertical = vec![
        CellCoord::new(2, 1),
        CellCoord::new(2, 2),
        CellCoord::new(2, 3),
    ];
    assert_eq!(live_cells(&world), vertical);
}

#[test]
fn ticks_are_dropped_while_a_generation_is_in_flight() {
    let mut world = world_with(5, 5, Pattern::Blinker);
    let mut automaton = Automaton::background().expect("spawn worker");

    let events = apply_commands(&mut world, vec![Command::Tick, Command::Tick]);
    assert_eq!(events.len(), 2);
    let mut commands = Vec::new();
    automaton.handle(&events, &query::grid_snapshot(&world), &mut commands);
    assert_eq!(automaton.dropped_ticks(), 1);

    assert!(automaton.wait(WAIT, &mut commands));
    assert_eq!(commands.len(), 1);
    assert!(automaton.is_idle());
    assert!(!automaton.wait(Duration::from_millis(10), &mut commands));
}

#[test]
fn result_arriving_after_reset_is_not_applied() {
    let mut world = world_with(5, 5, Pattern::Blinker);
    let mut automaton = Automaton::background().expect("spawn worker");

    let events = apply_commands(&mut world, vec![Command::Tick]);
    let mut commands = Vec::new();
    automaton.handle(&events, &query::grid_snapshot(&world), &mut commands);

    let _ = apply_commands(&mut world, vec![Command::Reset]);
    assert!(automaton.wait(WAIT, &mut commands));
    let events = apply_commands(&mut world, commands);

    assert!(matches!(events[0], Event::StaleResultDiscarded { .. }));
    let state = query::simulation_state(&world);
    assert_eq!(query::grid_view(&world).population(), 0);
    assert_eq!(state.step_count, 0);
    assert!(!state.running);
    assert!(automaton.is_idle());
}

#[test]
fn toggle_during_background_step_is_merged_into_the_result() {
    let mut world = world_with(5, 5, Pattern::Blinker);
    let mut automaton = Automaton::background().expect("spawn worker");

    let events = apply_commands(&mut world, vec![Command::Tick]);
    let mut commands = Vec::new();
    automaton.handle(&events, &query::grid_snapshot(&world), &mut commands);

    let corner = CellCoord::new(0, 0);
    let _ = apply_commands(&mut world, vec![Command::ToggleCell { cell: corner }]);

    assert!(automaton.wait(WAIT, &mut commands));
    let _ = apply_commands(&mut world, commands);

    let view = query::grid_view(&world);
    assert_eq!(view.state(corner), Some(1));
    assert_eq!(view.population(), 4);
}
