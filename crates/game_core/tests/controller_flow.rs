use std::time::Duration;

use game_core::{ControllerConfig, GameController, GameHandle};
use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{HoleIndex, Screen},
    error::GameError,
    protocol::HitOutcome,
};
use tokio::{task::JoinHandle, time::sleep};

fn spawn_controller(seed: u64) -> (GameHandle, JoinHandle<()>) {
    GameController::spawn(ControllerConfig::default(), StdRng::seed_from_u64(seed))
}

fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value)
}

#[tokio::test(start_paused = true)]
async fn start_game_enters_playing_state() {
    let (handle, _task) = spawn_controller(1);
    assert_eq!(handle.current().screen, Screen::Welcome);

    let snapshot = handle.start_game().await.expect("start");
    assert_eq!(snapshot.screen, Screen::Playing);
    assert_eq!(snapshot.score, 0);
    assert_eq!(snapshot.time_left, 15);
    assert!(snapshot.active);
    assert_eq!(handle.current(), snapshot);
}

#[tokio::test(start_paused = true)]
async fn countdown_expires_after_fifteen_ticks() {
    let (handle, _task) = spawn_controller(2);
    handle.start_game().await.expect("start");

    sleep(secs(14.5)).await;
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.time_left, 1);
    assert_eq!(snapshot.screen, Screen::Playing);
    assert!(snapshot.active);

    sleep(secs(1.0)).await;
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.time_left, 0);
    assert_eq!(snapshot.screen, Screen::Welcome);
    assert!(!snapshot.active);
    assert_eq!(snapshot.high_scores, vec![5, 0]);
}

#[tokio::test(start_paused = true)]
async fn restart_records_score_and_stops_countdown() {
    let (handle, _task) = spawn_controller(3);
    handle.start_game().await.expect("start");
    for _ in 0..3 {
        handle.whack_mole().await.expect("whack");
    }
    sleep(secs(3.5)).await;

    let snapshot = handle.restart_game().await.expect("restart");
    assert_eq!(snapshot.score, 3);
    assert_eq!(snapshot.time_left, 12);
    assert_eq!(snapshot.screen, Screen::Welcome);
    assert!(!snapshot.active);
    assert_eq!(snapshot.high_scores, vec![5, 3, 0]);

    sleep(secs(20.0)).await;
    let later = handle.snapshot().await.expect("snapshot");
    assert_eq!(later, snapshot);
}

#[tokio::test(start_paused = true)]
async fn expiry_then_restart_records_score_once() {
    let (handle, _task) = spawn_controller(4);
    handle.start_game().await.expect("start");
    handle.whack_mole().await.expect("whack");
    handle.whack_mole().await.expect("whack");

    sleep(secs(16.0)).await;
    let expired = handle.snapshot().await.expect("snapshot");
    assert_eq!(expired.high_scores, vec![5, 2, 0]);

    let restarted = handle.restart_game().await.expect("restart");
    assert_eq!(restarted.high_scores, vec![5, 2, 0]);
}

#[tokio::test(start_paused = true)]
async fn starting_again_replaces_the_running_countdown() {
    let (handle, _task) = spawn_controller(5);
    handle.start_game().await.expect("start");
    sleep(secs(5.5)).await;
    assert_eq!(handle.snapshot().await.expect("snapshot").time_left, 10);

    let snapshot = handle.start_game().await.expect("restart countdown");
    assert_eq!(snapshot.time_left, 15);

    sleep(secs(1.5)).await;
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.time_left, 14);
    assert!(snapshot.active);
}

#[tokio::test(start_paused = true)]
async fn whack_before_start_is_ignored() {
    let (handle, _task) = spawn_controller(6);
    let before = handle.current();
    let after = handle.whack_mole().await.expect("whack");
    assert_eq!(after.score, before.score);
    assert_eq!(after.mole_position, before.mole_position);
}

#[tokio::test(start_paused = true)]
async fn hit_hole_distinguishes_hits_from_misses() {
    let (handle, _task) = spawn_controller(7);
    let snapshot = handle.start_game().await.expect("start");
    let mole = snapshot.mole_position;
    let empty = HoleIndex::all()
        .find(|hole| *hole != mole)
        .expect("empty hole");

    let (outcome, after_miss) = handle.hit_hole(empty).await.expect("miss");
    assert_eq!(outcome, HitOutcome::Miss);
    assert_eq!(after_miss.score, 0);
    assert_eq!(after_miss.mole_position, mole);

    let (outcome, after_hit) = handle.hit_hole(mole).await.expect("hit");
    assert_eq!(outcome, HitOutcome::Hit);
    assert_eq!(after_hit.score, 1);
    assert_ne!(after_hit.mole_position, mole);
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_countdown_ticks() {
    let (handle, _task) = spawn_controller(8);
    let mut updates = handle.subscribe();
    handle.start_game().await.expect("start");
    updates.borrow_and_update();

    updates.changed().await.expect("tick published");
    assert_eq!(updates.borrow_and_update().time_left, 14);
}

#[tokio::test(start_paused = true)]
async fn loop_ends_when_handles_are_dropped() {
    let (handle, task) = spawn_controller(9);
    let view = handle.clone();
    view.start_game().await.expect("start");
    drop(handle);
    drop(view);
    task.await.expect("controller exits cleanly");
}

#[tokio::test(start_paused = true)]
async fn commands_fail_loudly_without_a_running_controller() {
    let (handle, task) = spawn_controller(10);
    task.abort();
    let _ = task.await;

    assert_eq!(
        handle.start_game().await,
        Err(GameError::ControllerUnavailable)
    );
}
