use std::time::Duration;
use tetrs_crush::board::Point;
use tetrs_crush::runtime::{self, SessionClosed};
use tetrs_crush::{Command, GameSession, SessionConfig, Variant};
use tokio::runtime::Handle;

fn session(variant: Variant) -> GameSession {
    GameSession::new(SessionConfig::new(variant, 7)).unwrap()
}

#[tokio::test(start_paused = true)]
async fn reply_carries_post_command_snapshot() {
    let (handle, _task) = runtime::spawn(&Handle::current(), session(Variant::LineClear), None);
    let before = handle.snapshot().await.unwrap();

    let reply = handle.apply(Command::Move(1)).await.unwrap();
    assert!(reply.outcome.accepted);
    assert_eq!(reply.snapshot.piece.origin, before.piece.origin.offset(1, 0));

    let reply = handle.apply(Command::Move(5)).await.unwrap();
    assert!(!reply.outcome.accepted);
    assert_eq!(reply.snapshot.piece.origin, before.piece.origin.offset(1, 0));
}

#[tokio::test(start_paused = true)]
async fn gravity_ticks_once_per_period() {
    let tick = Duration::from_millis(1000);
    let (handle, _task) =
        runtime::spawn(&Handle::current(), session(Variant::LineClear), Some(tick));

    // No tick fires at start
    assert_eq!(handle.snapshot().await.unwrap().piece.origin.y, 0);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(handle.snapshot().await.unwrap().piece.origin.y, 1);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(handle.snapshot().await.unwrap().piece.origin.y, 3);
}

#[tokio::test(start_paused = true)]
async fn commands_interleave_with_ticks() {
    let tick = Duration::from_millis(500);
    let (handle, _task) = runtime::spawn(&Handle::current(), session(Variant::Match3), Some(tick));

    handle.apply(Command::SoftDrop).await.unwrap();
    tokio::time::sleep(Duration::from_millis(750)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.piece.origin.y, 2);
    // Only the soft drop scores; the tick does not
    assert_eq!(snapshot.score.points, 1);
}

#[tokio::test(start_paused = true)]
async fn paused_session_ignores_timer() {
    let tick = Duration::from_millis(100);
    let (handle, _task) = runtime::spawn(&Handle::current(), session(Variant::Match3), Some(tick));

    assert!(handle.apply(Command::TogglePause).await.unwrap().outcome.accepted);
    // Land between two ticks so resuming is not racing one
    tokio::time::sleep(Duration::from_millis(5050)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.paused);
    assert_eq!(snapshot.piece.origin.y, 0);

    handle.apply(Command::TogglePause).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(handle.snapshot().await.unwrap().piece.origin.y, 1);
}

#[tokio::test(start_paused = true)]
async fn zero_period_disables_timer() {
    let (handle, _task) = runtime::spawn(
        &Handle::current(),
        session(Variant::LineClear),
        Some(Duration::ZERO),
    );
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.snapshot().await.unwrap().piece.origin.y, 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_handles_returns_session() {
    let (handle, task) = runtime::spawn(&Handle::current(), session(Variant::Match3), None);
    let other = handle.clone();
    other.apply(Command::HardDrop).await.unwrap();
    let last = handle.snapshot().await.unwrap();
    drop(handle);
    drop(other);

    let session = task.await.unwrap();
    assert_eq!(session.snapshot(), last);
    assert!(session.score().points > 0);
}

#[tokio::test(start_paused = true)]
async fn aborted_task_reports_closed() {
    let (handle, task) = runtime::spawn(&Handle::current(), session(Variant::Match3), None);
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert_eq!(handle.apply(Command::Tick).await.unwrap_err(), SessionClosed);
    assert_eq!(handle.snapshot().await.unwrap_err(), SessionClosed);
}

#[test]
fn blocking_handle_from_sync_thread() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (handle, task) = runtime::spawn(rt.handle(), session(Variant::Match3), None);

    let reply = handle
        .blocking_apply(Command::Select(Point::new(0, 0)))
        .unwrap();
    assert!(!reply.outcome.accepted);
    assert!(reply.snapshot.selection.is_empty());

    handle.blocking_apply(Command::HardDrop).unwrap();
    let snapshot = handle.blocking_snapshot().unwrap();
    assert_eq!(snapshot.cells.iter().filter(|c| c.is_filled()).count(), 4);

    drop(handle);
    let session = rt.block_on(task).unwrap();
    assert_eq!(session.snapshot(), snapshot);
}
