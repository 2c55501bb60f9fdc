//! Background worker that keeps the latest snapshot fresh.
//!
//! The worker reads on a fixed interval (or on request) and publishes the
//! outcome through a `watch` channel. Shutdown is only observed between polls:
//! a read that has started always runs to completion.

use std::sync::Arc;
use std::time::Duration;

use game_core::{ChainId, GameSnapshot};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::reader::StateReader;
use crate::traits::ContractReader;

/// Latest published poll outcome.
#[derive(Clone, Debug, Default)]
pub struct PollState {
    /// Most recent successful snapshot; kept when a later poll fails.
    pub latest: Option<Arc<GameSnapshot>>,

    /// Error of the most recent poll, cleared by the next success.
    pub last_error: Option<Arc<ClientError>>,

    /// Completed polls, successful or not.
    pub polls: u64,

    /// Completed polls that ended in an error.
    pub failures: u64,
}

/// Commands accepted by the poller worker.
#[derive(Debug)]
pub enum PollerCommand {
    /// Poll immediately instead of waiting for the next tick.
    Refresh,
    /// Stop after the current poll (if any) settles.
    Shutdown,
}

/// Polls a [`StateReader`] for a fixed set of chains.
pub struct SnapshotPoller<R> {
    reader: StateReader<R>,
    chains: Vec<ChainId>,
    interval: Duration,
}

impl<R> SnapshotPoller<R>
where
    R: ContractReader + 'static,
{
    pub fn new(reader: StateReader<R>, chains: Vec<ChainId>, interval: Duration) -> Self {
        Self {
            reader,
            chains,
            interval,
        }
    }

    /// Start the worker on the current tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let (state_tx, state_rx) = watch::channel(PollState::default());
        let (command_tx, command_rx) = mpsc::channel(8);

        let worker = PollerWorker {
            poller: self,
            state_tx,
            command_rx,
        };
        let task = tokio::spawn(worker.run());

        PollerHandle {
            state: state_rx,
            commands: command_tx,
            task,
        }
    }
}

struct PollerWorker<R> {
    poller: SnapshotPoller<R>,
    state_tx: watch::Sender<PollState>,
    command_rx: mpsc::Receiver<PollerCommand>,
}

impl<R: ContractReader + 'static> PollerWorker<R> {
    async fn run(mut self) {
        info!(
            chains = self.poller.chains.len(),
            interval_ms = self.poller.interval.as_millis() as u64,
            "Snapshot poller started"
        );

        let mut ticker = tokio::time::interval(self.poller.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                command = self.command_rx.recv() => match command {
                    Some(PollerCommand::Refresh) => debug!("Manual refresh requested"),
                    Some(PollerCommand::Shutdown) | None => break,
                },
                _ = ticker.tick() => {}
            }

            self.poll_once().await;
        }

        info!("Snapshot poller stopped");
    }

    async fn poll_once(&mut self) {
        let outcome = self.poller.reader.read(&self.poller.chains).await;

        self.state_tx.send_modify(|state| {
            state.polls += 1;
            match outcome {
                Ok(snapshot) => {
                    state.latest = Some(Arc::new(snapshot));
                    state.last_error = None;
                }
                Err(err) => {
                    warn!(kind = %err.kind(), error = %err, "Snapshot poll failed");
                    state.failures += 1;
                    state.last_error = Some(Arc::new(err));
                }
            }
        });
    }
}

/// Control handle for a running [`SnapshotPoller`].
pub struct PollerHandle {
    state: watch::Receiver<PollState>,
    commands: mpsc::Sender<PollerCommand>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Receiver notified after every completed poll.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    pub fn current(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Ask for an immediate poll. Returns `false` if the worker has stopped.
    pub async fn refresh(&self) -> bool {
        self.commands.send(PollerCommand::Refresh).await.is_ok()
    }

    /// Stop polling and wait for the worker to finish its current read.
    pub async fn stop(self) -> PollState {
        let _ = self.commands.send(PollerCommand::Shutdown).await;
        if let Err(err) = self.task.await {
            warn!(error = %err, "Snapshot poller task ended abnormally");
        }
        self.state.borrow().clone()
    }
}
