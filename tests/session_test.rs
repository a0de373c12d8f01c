//! Tests for TourSession wired through the service container

use std::sync::mpsc::Receiver;

use rstest::{fixture, rstest};

use tspdraw::application::services::TourSession;
use tspdraw::config::Settings;
use tspdraw::domain::{Phase, Point, Region, StepResult};
use tspdraw::infrastructure::di::ServiceContainer;
use tspdraw::infrastructure::ChannelListener;
use tspdraw::util::testing;

fn settings(seed: u64) -> Settings {
    Settings {
        step_interval_ms: 1,
        seed: Some(seed),
        ..Default::default()
    }
}

#[fixture]
fn session() -> (TourSession, Receiver<String>) {
    testing::init_test_setup();
    let container = ServiceContainer::new(settings(11));
    let (listener, results) = ChannelListener::channel();
    (container.session(Box::new(listener), None), results)
}

#[rstest]
fn given_manual_points_when_run_to_completion_then_cost_delivered(
    session: (TourSession, Receiver<String>),
) {
    // Arrange
    let (session, results) = session;
    session.add_point(0, 0).unwrap();
    session.add_point(10, 0).unwrap();
    session.add_point(0, 10).unwrap();

    // Act
    let steps = session.run_to_completion().unwrap();

    // Assert
    assert_eq!(steps.len(), 5);
    assert_eq!(steps.last(), Some(&StepResult::CycleCompleted { cost: 34 }));
    assert_eq!(results.try_recv().unwrap(), "Cost: 34");
    assert!(results.try_recv().is_err());
}

#[rstest]
fn given_auto_session_when_waiting_then_completes(session: (TourSession, Receiver<String>)) {
    let (mut session, results) = session;
    session.add_point(0, 0).unwrap();
    session.add_point(3, 4).unwrap();

    session.start_auto().unwrap();
    session.wait();

    assert!(!session.is_auto_running());
    assert_eq!(session.snapshot().unwrap().phase, Phase::Complete);
    assert_eq!(results.recv().unwrap(), "Cost: 10");
}

#[rstest]
fn given_default_region_when_generating_then_points_inside_it(
    session: (TourSession, Receiver<String>),
) {
    let (mut session, _results) = session;

    let generation = session.generate_random(20, None).unwrap();

    let region = session.default_region();
    assert_eq!(region, Region::new(0, 0, 874, 576));
    assert_eq!(generation.generated, 20);
    assert!(session
        .snapshot()
        .unwrap()
        .points
        .iter()
        .all(|p| (0..874).contains(&p.x()) && (0..576).contains(&p.y())));
}

#[test]
fn given_same_seed_when_generating_in_two_sessions_then_same_points() {
    let generate = || {
        let container = ServiceContainer::new(settings(5));
        let (listener, _results) = ChannelListener::channel();
        let mut session = container.session(Box::new(listener), None);
        session.generate_random(8, Some(Region::new(-50, -50, 100, 100))).unwrap();
        session.snapshot().unwrap().points
    };

    assert_eq!(generate(), generate());
}

#[rstest]
fn given_points_when_undo_and_reset_then_state_shrinks(session: (TourSession, Receiver<String>)) {
    let (session, _results) = session;
    session.add_point(1, 2).unwrap();
    session.add_point(3, 4).unwrap();

    session.undo().unwrap();
    assert_eq!(session.snapshot().unwrap().points, vec![Point::new(1, 2)]);

    session.reset().unwrap();
    assert_eq!(session.snapshot().unwrap().phase, Phase::Empty);
}

#[rstest]
fn given_container_settings_when_building_engine_then_attempt_budget_applied() {
    let container = ServiceContainer::new(Settings {
        attempts_per_point: 1,
        ..Default::default()
    });
    let (listener, _results) = ChannelListener::channel();
    let mut engine = container.engine(Box::new(listener));

    let mut partial = false;
    for seed in 0..20u64 {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
        let generation = engine.generate_random(4, Region::new(0, 0, 2, 2), &mut rng).unwrap();
        partial |= generation.is_partial();
    }
    assert!(partial);
}
