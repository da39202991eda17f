mod common;

use std::sync::Arc;

use appbar_motion::header::{state_at, total_duration, TIMELINE};
use appbar_motion::prelude::*;
use common::{init_logging, settle, VirtualClock};

/// Cumulative offsets and the state expected right at each one.
const CHECKPOINTS: [(u64, Phase, bool); 6] = [
    (800, Phase::Undefined, false),
    (1600, Phase::SearchTextShown, false),
    (3600, Phase::NotificationShown, false),
    (4600, Phase::NotificationTextShown, true),
    (6600, Phase::NotificationShown, true),
    (7100, Phase::SearchTextShown, true),
];

async fn started_driver() -> SequenceDriver {
    let mut driver = SequenceDriver::new();
    driver.start();
    settle().await;
    driver
}

#[tokio::test(start_paused = true)]
async fn phases_follow_the_virtual_clock() {
    init_logging();
    let driver = started_driver().await;
    let mut clock = VirtualClock::default();

    for (at, phase, bell) in CHECKPOINTS {
        clock.advance_to(at - 1).await;
        assert_ne!(driver.current_phase(), phase, "changed early at {}ms", at - 1);

        clock.advance_to(at).await;
        assert_eq!(driver.current_phase(), phase, "at {at}ms");
        assert_eq!(driver.bell_triggered(), bell, "bell at {at}ms");
    }
    assert_eq!(driver.status(), DriverStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn terminal_state_is_held() {
    let driver = started_driver().await;
    let mut clock = VirtualClock::default();

    clock.advance_to(7100).await;
    clock.advance_to(20_000).await;

    assert_eq!(driver.current_phase(), Phase::SearchTextShown);
    assert!(driver.bell_triggered());
    assert_eq!(driver.status(), DriverStatus::Finished);
}

#[tokio::test(start_paused = true)]
async fn driver_agrees_with_scrubbed_timeline() {
    let driver = started_driver().await;
    let mut clock = VirtualClock::default();
    let end = total_duration().as_millis() as u64 + 200;

    for t in (0..=end).step_by(100) {
        clock.advance_to(t).await;
        let expected = state_at(std::time::Duration::from_millis(t));
        assert_eq!(
            (driver.current_phase(), driver.bell_triggered()),
            expected,
            "at {t}ms"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn bell_is_monotonic() {
    let driver = started_driver().await;
    let mut clock = VirtualClock::default();
    let mut rung = false;

    for t in (0..=8000).step_by(50) {
        clock.advance_to(t).await;
        let bell = driver.bell_triggered();
        assert!(bell || !rung, "bell went back to false at {t}ms");
        rung = bell;
        assert!(Phase::ALL.contains(&driver.current_phase()));
    }
    assert!(rung);
}

#[tokio::test(start_paused = true)]
async fn cancel_freezes_state() {
    let player = Arc::new(LogBellPlayer::new());
    let mut driver = SequenceDriver::new().with_bell_player(player.clone());
    driver.start();
    settle().await;
    let mut clock = VirtualClock::default();

    clock.advance_to(2000).await;
    driver.cancel();
    let frozen = (driver.current_phase(), driver.bell_triggered());
    assert_eq!(frozen, (Phase::SearchTextShown, false));
    assert_eq!(driver.status(), DriverStatus::Cancelled);

    clock.advance_to(10_000).await;
    assert_eq!((driver.current_phase(), driver.bell_triggered()), frozen);
    assert_eq!(player.plays(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancel_is_idempotent() {
    let driver = started_driver().await;
    let mut clock = VirtualClock::default();

    clock.advance_to(900).await;
    driver.cancel();
    driver.cancel();
    let handle = driver.cancel_handle().expect("started driver has a handle");
    handle.cancel();

    clock.advance_to(5000).await;
    assert_eq!(driver.current_phase(), Phase::Undefined);
    assert_eq!(driver.status(), DriverStatus::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn cancel_at_every_step_boundary() {
    for (index, (at, phase, bell)) in CHECKPOINTS.iter().copied().enumerate() {
        let driver = started_driver().await;
        let mut clock = VirtualClock::default();

        clock.advance_to(at).await;
        driver.cancel();
        clock.advance_to(at + 5000).await;

        assert_eq!(driver.current_phase(), phase, "cancelled after step {}", index + 1);
        assert_eq!(driver.bell_triggered(), bell);
    }
}

#[tokio::test(start_paused = true)]
async fn reads_from_another_thread_are_consistent() {
    let driver = started_driver().await;
    let phase = driver.phase_signal();
    let mut clock = VirtualClock::default();

    clock.advance_to(4600).await;
    let seen = std::thread::spawn(move || phase.get())
        .join()
        .expect("reader thread panicked");
    assert_eq!(seen, Phase::NotificationTextShown);
}

#[test]
fn timeline_is_the_fixed_script() {
    let waits: Vec<_> = TIMELINE.iter().map(|s| s.wait.as_millis()).collect();
    assert_eq!(waits, vec![800, 800, 2000, 1000, 2000, 500]);
}
