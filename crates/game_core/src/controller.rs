//! Single-writer update loop that owns the [`GameSession`].
//!
//! User commands and countdown ticks arrive on separate queues but are
//! applied one at a time by the same task, so a tick can never interleave
//! with a half-applied command. Views only ever see [`SessionSnapshot`]s.

use std::time::Duration;

use rand::rngs::StdRng;
use shared::{
    domain::HoleIndex,
    error::GameError,
    protocol::{GameCommand, HitOutcome, SessionSnapshot},
};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::session::{GameSession, SessionConfig, TickOutcome};

const COMMAND_QUEUE_DEPTH: usize = 64;
const TICK_QUEUE_DEPTH: usize = 4;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    pub session: SessionConfig,
    pub tick_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    /// Set for hit commands only.
    pub outcome: Option<HitOutcome>,
    pub snapshot: SessionSnapshot,
}

enum ControlMessage {
    Command {
        command: GameCommand,
        reply: oneshot::Sender<CommandReply>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Tick {
    generation: u64,
}

struct Countdown {
    generation: u64,
    task: JoinHandle<()>,
}

pub struct GameController {
    session: GameSession,
    tick_interval: Duration,
    control_rx: mpsc::Receiver<ControlMessage>,
    tick_tx: mpsc::Sender<Tick>,
    tick_rx: mpsc::Receiver<Tick>,
    snapshots: watch::Sender<SessionSnapshot>,
    countdown: Option<Countdown>,
    next_generation: u64,
}

impl GameController {
    /// Starts the update loop on the current tokio runtime. The loop stops
    /// once every [`GameHandle`] clone has been dropped.
    pub fn spawn(config: ControllerConfig, rng: StdRng) -> (GameHandle, JoinHandle<()>) {
        let session = GameSession::new(config.session, rng);
        let (control_tx, control_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (tick_tx, tick_rx) = mpsc::channel(TICK_QUEUE_DEPTH);
        let (snapshots, snapshot_rx) = watch::channel(session.snapshot());

        let controller = Self {
            session,
            tick_interval: config.tick_interval,
            control_rx,
            tick_tx,
            tick_rx,
            snapshots,
            countdown: None,
            next_generation: 0,
        };
        let task = tokio::spawn(controller.run());

        (
            GameHandle {
                control_tx,
                snapshots: snapshot_rx,
            },
            task,
        )
    }

    async fn run(mut self) {
        info!(
            tick_interval_ms = self.tick_interval.as_millis() as u64,
            "game controller started"
        );
        loop {
            tokio::select! {
                message = self.control_rx.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => break,
                },
                Some(tick) = self.tick_rx.recv() => self.handle_tick(tick),
            }
        }
        self.cancel_countdown();
        info!("game controller stopped");
    }

    fn handle_message(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::Command { command, reply } => {
                let outcome = self.apply(command);
                let snapshot = self.publish();
                if reply.send(CommandReply { outcome, snapshot }).is_err() {
                    debug!(command = command.name(), "command caller went away");
                }
            }
            ControlMessage::Snapshot { reply } => {
                let _ = reply.send(self.session.snapshot());
            }
        }
    }

    fn apply(&mut self, command: GameCommand) -> Option<HitOutcome> {
        debug!(command = command.name(), "applying game command");
        match command {
            GameCommand::StartGame => {
                self.cancel_countdown();
                self.session.start_game();
                self.start_countdown();
                None
            }
            GameCommand::RestartGame => {
                self.cancel_countdown();
                self.session.restart_game();
                None
            }
            GameCommand::WhackMole => Some(if self.session.whack_mole() {
                HitOutcome::Hit
            } else {
                HitOutcome::Inactive
            }),
            GameCommand::HitHole { hole } => Some(self.session.hit_hole(hole)),
        }
    }

    fn handle_tick(&mut self, tick: Tick) {
        let live = self
            .countdown
            .as_ref()
            .is_some_and(|countdown| countdown.generation == tick.generation);
        if !live {
            debug!(generation = tick.generation, "dropping stale countdown tick");
            return;
        }

        match self.session.tick() {
            TickOutcome::Running { .. } => {}
            TickOutcome::Expired | TickOutcome::Idle => self.cancel_countdown(),
        }
        self.publish();
    }

    fn start_countdown(&mut self) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let period = self.tick_interval;
        let first_tick = Instant::now() + period;
        let tick_tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick_tx.send(Tick { generation }).await.is_err() {
                    break;
                }
            }
        });
        debug!(generation, "countdown scheduled");
        self.countdown = Some(Countdown { generation, task });
    }

    fn cancel_countdown(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.task.abort();
            debug!(generation = countdown.generation, "countdown cancelled");
        }
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        self.snapshots.send_replace(snapshot.clone());
        snapshot
    }
}

/// Cloneable entry point handed to views: commands go in, snapshots come out.
#[derive(Clone)]
pub struct GameHandle {
    control_tx: mpsc::Sender<ControlMessage>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl GameHandle {
    pub async fn start_game(&self) -> Result<SessionSnapshot, GameError> {
        Ok(self.dispatch(GameCommand::StartGame).await?.snapshot)
    }

    pub async fn restart_game(&self) -> Result<SessionSnapshot, GameError> {
        Ok(self.dispatch(GameCommand::RestartGame).await?.snapshot)
    }

    pub async fn whack_mole(&self) -> Result<SessionSnapshot, GameError> {
        Ok(self.dispatch(GameCommand::WhackMole).await?.snapshot)
    }

    pub async fn hit_hole(
        &self,
        hole: HoleIndex,
    ) -> Result<(HitOutcome, SessionSnapshot), GameError> {
        let reply = self.dispatch(GameCommand::HitHole { hole }).await?;
        let outcome = reply.outcome.unwrap_or(HitOutcome::Inactive);
        Ok((outcome, reply.snapshot))
    }

    pub async fn dispatch(&self, command: GameCommand) -> Result<CommandReply, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.control_tx
            .send(ControlMessage::Command {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GameError::ControllerUnavailable)?;
        reply_rx.await.map_err(|_| GameError::ReplyDropped {
            command: command.name(),
        })
    }

    /// Round-trips through the update loop, so every earlier command and tick
    /// is reflected in the result.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.control_tx
            .send(ControlMessage::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| GameError::ControllerUnavailable)?;
        reply_rx.await.map_err(|_| GameError::ReplyDropped {
            command: "snapshot",
        })
    }

    pub fn current(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }
}
