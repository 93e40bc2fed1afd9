use sim_garden_core::{CellCoord, Command, Event, Pattern, PopulationReport};
use sim_garden_system_analytics::Analytics;
use sim_garden_world::{self as world, query, World};

fn apply(world: &mut World, analytics: &mut Analytics, command: Command) -> Vec<PopulationReport> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    let mut published = Vec::new();
    analytics.handle(
        &events,
        query::grid_view(world),
        query::cell_states(world),
        query::simulation_state(world).step_count,
        &mut published,
    );
    published
        .into_iter()
        .filter_map(|event| match event {
            Event::PopulationReported { report } => Some(report),
            _ => None,
        })
        .collect()
}

#[test]
fn pattern_application_publishes_a_report() {
    let mut world = World::new();
    let mut analytics = Analytics::new();

    let reports = apply(
        &mut world,
        &mut analytics,
        Command::ApplyPattern {
            pattern: Pattern::Glider,
        },
    );

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].population(), 5);
    assert_eq!(reports[0].total_cells(), 10_000);
    assert_eq!(reports[0].step(), 0);
    assert_eq!(analytics.last_report(), Some(&reports[0]));
}

#[test]
fn start_and_stop_do_not_republish() {
    let mut world = World::new();
    let mut analytics = Analytics::new();
    let _ = apply(
        &mut world,
        &mut analytics,
        Command::ApplyPattern {
            pattern: Pattern::Block,
        },
    );

    assert!(apply(&mut world, &mut analytics, Command::Start).is_empty());
    assert!(apply(&mut world, &mut analytics, Command::Stop).is_empty());
}

#[test]
fn toggles_update_the_population() {
    let mut world = World::new();
    let mut analytics = Analytics::new();
    let cell = CellCoord::new(3, 4);

    let on = apply(&mut world, &mut analytics, Command::ToggleCell { cell });
    assert_eq!(on[0].population(), 1);

    let off = apply(&mut world, &mut analytics, Command::ToggleCell { cell });
    assert_eq!(off[0].population(), 0);
}

#[test]
fn pattern_reports_are_reproducible() {
    let script = [
        Command::ConfigureGrid {
            rows: 40,
            columns: 60,
        },
        Command::ConfigureRandomFill {
            density: 0.3,
            seed: 42,
        },
        Command::ApplyPattern {
            pattern: Pattern::Random,
        },
        Command::ApplyPattern {
            pattern: Pattern::Pulsar,
        },
    ];

    let replay = || {
        let mut world = World::new();
        let mut analytics = Analytics::new();
        let mut reports = Vec::new();
        for command in script.clone() {
            reports.extend(apply(&mut world, &mut analytics, command));
        }
        reports
    };

    let first = replay();
    assert_eq!(first, replay(), "analytics replay diverged");
    assert_eq!(first.last().map(PopulationReport::population), Some(48));
}
