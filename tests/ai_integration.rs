//! Decision cycle integration tests

use hydroq_ai::ai::*;
use hydroq_ai::core::{AiConfig, Faction, Position};
use hydroq_ai::map::GridWorld;

fn world(rows: &[&str]) -> GridWorld {
    GridWorld::from_ascii(&rows.join("\n")).expect("valid test map")
}

#[test]
fn test_end_to_end_single_rig() {
    // One blue rig, one unclaimed rig five tiles east, water around
    let mut world = world(&[
        "B....U", //
        "~~~~~~",
        "~~~~~~",
    ]);
    let mut ai = AiController::new(Faction::Blue, AiConfig::default());

    let outcome = ai.process_tick(&mut world, 0, 0);
    assert!(outcome.is_dispatched());

    let task = ai.task();
    assert!(matches!(
        task.kind,
        TaskKind::CaptureUnclaimed | TaskKind::GotoUnclaimed
    ));
    assert_eq!(task.target, Some(Position::new(5, 0)));
    assert!(!task.positions.is_empty());
}

#[test]
fn test_goto_dropped_after_bridge_completes() {
    let mut world = world(&["B.~~~~~~~~.U"]);
    let mut ai = AiController::new(Faction::Blue, AiConfig::default());

    ai.process_tick(&mut world, 0, 0);
    assert_eq!(ai.task().kind, TaskKind::GotoUnclaimed);
    let first = ai.task().positions[0];

    // Nothing changed: the Goto stays
    assert_eq!(
        ai.process_tick(&mut world, 100, 2_000),
        CycleOutcome::Kept(TaskKind::GotoUnclaimed)
    );

    assert!(world.complete_bridge(first));
    let outcome = ai.process_tick(&mut world, 200, 4_000);
    assert!(!matches!(outcome, CycleOutcome::Kept(_)));
    assert!(ai.task().is_idle() || ai.task().created == 4_000);
    assert!(!ai.task().positions.contains(&first));
}

#[test]
fn test_capture_times_out_strictly_after_limit() {
    let mut world = world(&["B....U"]);
    let mut config = AiConfig::default();
    config.decision.interval_ticks = 1;
    let timeout = config.decision.task_timeout_ms;
    let mut ai = AiController::new(Faction::Blue, config);

    ai.process_tick(&mut world, 0, 0);
    assert_eq!(ai.task().kind, TaskKind::CaptureUnclaimed);

    assert_eq!(
        ai.process_tick(&mut world, 1, timeout),
        CycleOutcome::Kept(TaskKind::CaptureUnclaimed)
    );
    assert_eq!(ai.task().created, 0);

    // Past the limit the task is dropped and a fresh one chosen
    let outcome = ai.process_tick(&mut world, 2, timeout + 1);
    assert!(outcome.is_dispatched());
    assert_eq!(ai.task().created, timeout + 1);
}

#[test]
fn test_ownership_change_resets_any_task() {
    for rows in [&["B....U"][..], &["B.~~~~~~~~.U"][..]] {
        let mut world = world(rows);
        let mut ai = AiController::new(Faction::Blue, AiConfig::default());
        ai.process_tick(&mut world, 0, 0);
        assert!(!ai.task().is_idle());

        let event = world
            .capture_rig(Position::new(0, 0), Faction::Red)
            .expect("blue rig changes hands");
        ai.handle_event(&mut world, &event);

        assert!(ai.task().is_idle());
        assert!(world.attractors(Faction::Blue).is_empty());
    }
}

#[test]
fn test_event_leaves_other_faction_attractors() {
    let mut world = world(&["B..U..R"]);
    let mut blue = AiController::new(Faction::Blue, AiConfig::default());
    let mut red = AiController::new(Faction::Red, AiConfig::default());
    blue.process_tick(&mut world, 0, 0);
    red.process_tick(&mut world, 0, 0);
    assert!(!world.attractors(Faction::Red).is_empty());

    let event = world
        .capture_rig(Position::new(3, 0), Faction::Blue)
        .expect("unclaimed rig taken");
    assert_eq!(
        event,
        RigEvent::ownership_changed(
            Position::new(3, 0),
            Faction::Blue,
            ChangeKind::UnclaimedCaptured
        )
    );
    blue.handle_event(&mut world, &event);

    assert!(blue.task().is_idle());
    assert!(world.attractors(Faction::Blue).is_empty());
    assert!(!world.attractors(Faction::Red).is_empty());
}

#[test]
fn test_both_factions_plan_on_shared_map() {
    let mut world = world(&[
        "B.....~~~~.U", //
        "......~~~~..",
        "..U.........",
        "..........~R",
    ]);
    let mut blue = AiController::new(Faction::Blue, AiConfig::default());
    let mut red = AiController::new(Faction::Red, AiConfig::default());

    for outcome in [
        blue.process_tick(&mut world, 0, 0),
        red.process_tick(&mut world, 0, 0),
    ] {
        assert!(!matches!(
            outcome,
            CycleOutcome::Idle(_) | CycleOutcome::Skipped
        ));
    }

    let blue_view = blue.distances().view(Faction::Blue);
    assert_eq!(blue_view.to_unclaimed.len(), 2);
    assert_eq!(blue_view.to_enemy.len(), 1);
    assert_eq!(blue_view.enemy_to_own.len(), 1);
}

#[test]
fn test_same_seed_same_decision() {
    let rows = [
        "B.~~~.U", //
        "..~~~..",
        "U.....R",
    ];
    let run = || {
        let mut world = world(&rows);
        let mut ai = AiController::new(Faction::Blue, AiConfig::default());
        ai.process_tick(&mut world, 0, 0)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_default_profile_drives_controller() {
    let config = hydroq_ai::core::load_profile("default").expect("default profile");
    let mut world = world(&["B....U"]);
    let mut ai = AiController::new(Faction::Blue, config);
    assert!(ai.process_tick(&mut world, 0, 0).is_dispatched());
}

#[test]
fn test_overland_goto_expires_and_is_reissued() {
    let mut world = world(&["B.......U"]);
    let mut config = AiConfig::default();
    config.decision.interval_ticks = 1;
    let timeout = config.decision.task_timeout_ms;
    let mut ai = AiController::new(Faction::Blue, config);

    assert!(ai.process_tick(&mut world, 0, 0).is_dispatched());
    assert_eq!(ai.task().kind, TaskKind::GotoUnclaimed);
    assert!(world.bridge_marks(Faction::Blue).is_empty());

    assert_eq!(
        ai.process_tick(&mut world, 1, timeout),
        CycleOutcome::Kept(TaskKind::GotoUnclaimed)
    );
    assert!(ai.process_tick(&mut world, 2, timeout + 1).is_dispatched());
    assert_eq!(ai.task().created, timeout + 1);
}
