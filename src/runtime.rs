//! Session task: a single tokio task owns the session and serializes user
//! commands with the gravity timer.

use crate::game::{Command, GameSession, Outcome, Snapshot};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Commands queued ahead of the session task before senders wait
const QUEUE_DEPTH: usize = 64;

/// Returned when the session task is gone
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("session task has stopped")]
pub struct SessionClosed;

/// Reply to an applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub outcome: Outcome,
    /// State right after the command
    pub snapshot: Snapshot,
}

enum Request {
    Apply(Command, oneshot::Sender<Reply>),
    Snapshot(oneshot::Sender<Snapshot>),
}

/// Cloneable sender side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Request>,
}

impl SessionHandle {
    pub async fn apply(&self, command: Command) -> Result<Reply, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Apply(command, reply_tx))
            .await
            .map_err(|_| SessionClosed)?;
        reply_rx.await.map_err(|_| SessionClosed)
    }

    pub async fn snapshot(&self) -> Result<Snapshot, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot(reply_tx))
            .await
            .map_err(|_| SessionClosed)?;
        reply_rx.await.map_err(|_| SessionClosed)
    }

    /// Blocking form of [`SessionHandle::apply`]. Must not be called from
    /// inside the runtime.
    pub fn blocking_apply(&self, command: Command) -> Result<Reply, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .blocking_send(Request::Apply(command, reply_tx))
            .map_err(|_| SessionClosed)?;
        reply_rx.blocking_recv().map_err(|_| SessionClosed)
    }

    /// Blocking form of [`SessionHandle::snapshot`]
    pub fn blocking_snapshot(&self) -> Result<Snapshot, SessionClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .blocking_send(Request::Snapshot(reply_tx))
            .map_err(|_| SessionClosed)?;
        reply_rx.blocking_recv().map_err(|_| SessionClosed)
    }
}

/// Move `session` into a task on `handle`. With `tick_every` set (and non-zero)
/// the task applies [`Command::Tick`] on that period, first tick one period
/// after start. The task ends once every [`SessionHandle`] is dropped and
/// yields the session back.
pub fn spawn(
    handle: &tokio::runtime::Handle,
    session: GameSession,
    tick_every: Option<Duration>,
) -> (SessionHandle, JoinHandle<GameSession>) {
    let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
    let tick_every = tick_every.filter(|period| !period.is_zero());
    let task = handle.spawn(session_loop(session, rx, tick_every));
    (SessionHandle { tx }, task)
}

async fn session_loop(
    mut session: GameSession,
    mut rx: mpsc::Receiver<Request>,
    tick_every: Option<Duration>,
) -> GameSession {
    debug!(?tick_every, "session task started");
    let mut ticker = tick_every.map(|period| {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    loop {
        tokio::select! {
            request = rx.recv() => match request {
                Some(Request::Apply(command, reply)) => {
                    let outcome = session.apply(command);
                    // The caller may have given up waiting
                    let _ = reply.send(Reply {
                        outcome,
                        snapshot: session.snapshot(),
                    });
                }
                Some(Request::Snapshot(reply)) => {
                    let _ = reply.send(session.snapshot());
                }
                None => break,
            },
            _ = next_tick(&mut ticker) => {
                session.apply(Command::Tick);
            }
        }
    }

    info!(score = session.score().points, "session task finished");
    session
}

/// Wait for the next tick, or forever without a timer
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
