use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{
    compute::compute,
    config::{ConfigError, EngineConfig},
    contact::ContactDraft,
    persist::{PersistError, RosterSource},
    report::AwardReport,
    roster::Roster,
};

use super::events::AwardEvent;

/// Failures surfaced through an [`AwardServiceHandle`].
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Loading a roster from storage failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The service loop has stopped.
    #[error("award service is not running")]
    ChannelClosed,
    /// A blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(String),
}

/// Channel sizing for the service loop.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Pending commands before senders wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before the slowest one lags.
    pub event_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 64,
            event_capacity: 256,
        }
    }
}

/// Cloneable handle to a running award service.
pub struct AwardServiceHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<AwardEvent>,
}

impl Clone for AwardServiceHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    ReplaceRoster {
        roster: Roster,
        resp: oneshot::Sender<usize>,
    },
    ReloadRoster {
        source: Box<dyn RosterSource>,
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    AddContacts {
        drafts: Vec<ContactDraft>,
        resp: oneshot::Sender<usize>,
    },
    ClearContacts {
        resp: oneshot::Sender<()>,
    },
    Compute {
        resp: oneshot::Sender<Result<Arc<AwardReport>, RuntimeError>>,
    },
    Latest {
        resp: oneshot::Sender<Option<Arc<AwardReport>>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

struct ServiceState {
    roster: Arc<Roster>,
    contacts: Arc<Vec<ContactDraft>>,
    config: Arc<EngineConfig>,
    latest: Option<Arc<AwardReport>>,
    generation: u64,
}

/// Starts the service loop on the current tokio runtime.
pub fn spawn_award_service(
    roster: Roster,
    config: EngineConfig,
    service_config: ServiceConfig,
) -> AwardServiceHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(service_config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<AwardEvent>(service_config.event_capacity.max(1));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut state = ServiceState {
            roster: Arc::new(roster),
            contacts: Arc::new(Vec::new()),
            config: Arc::new(config),
            latest: None,
            generation: 0,
        };
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut state, &events_tx_loop).await {
                break;
            }
        }
        debug!("award service stopped");
    });

    AwardServiceHandle { cmd_tx, events_tx }
}

impl AwardServiceHandle {
    /// Subscribes to service events.
    pub fn subscribe(&self) -> broadcast::Receiver<AwardEvent> {
        self.events_tx.subscribe()
    }

    /// Swaps in a new roster snapshot. Returns its member count.
    pub async fn replace_roster(&self, roster: Roster) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ReplaceRoster { roster, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Loads a roster from `source` on the blocking pool and swaps it in.
    pub async fn reload_roster(&self, source: Box<dyn RosterSource>) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ReloadRoster { source, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Appends drafts. Returns the number of drafts now held.
    pub async fn add_contacts(&self, drafts: Vec<ContactDraft>) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::AddContacts { drafts, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Drops every held draft.
    pub async fn clear_contacts(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ClearContacts { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Computes a report over the held drafts and the current roster.
    pub async fn compute(&self) -> Result<Arc<AwardReport>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Compute { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Most recent finished report, if any.
    pub async fn latest(&self) -> Result<Option<Arc<AwardReport>>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Latest { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the loop after commands already queued.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    state: &mut ServiceState,
    events_tx: &broadcast::Sender<AwardEvent>,
) -> bool {
    match cmd {
        Command::ReplaceRoster { roster, resp } => {
            let members = roster.len();
            state.roster = Arc::new(roster);
            let _ = events_tx.send(AwardEvent::RosterReplaced { members });
            let _ = resp.send(members);
        }
        Command::ReloadRoster { source, resp } => {
            let normalizer = state.config.normalizer();
            let loaded = tokio::task::spawn_blocking(move || source.load_roster(&normalizer))
                .await
                .map_err(|e| RuntimeError::Join(e.to_string()))
                .and_then(|r| r.map_err(RuntimeError::from));
            let res = loaded.map(|roster| {
                let members = roster.len();
                state.roster = Arc::new(roster);
                info!(members, "roster reloaded");
                let _ = events_tx.send(AwardEvent::RosterReplaced { members });
                members
            });
            if let Err(err) = &res {
                warn!(error = %err, "roster reload failed");
            }
            let _ = resp.send(res);
        }
        Command::AddContacts { drafts, resp } => {
            let added = drafts.len();
            Arc::make_mut(&mut state.contacts).extend(drafts);
            let total = state.contacts.len();
            let _ = events_tx.send(AwardEvent::ContactsAdded { added, total });
            let _ = resp.send(total);
        }
        Command::ClearContacts { resp } => {
            state.contacts = Arc::new(Vec::new());
            let _ = events_tx.send(AwardEvent::ContactsCleared);
            let _ = resp.send(());
        }
        Command::Compute { resp } => {
            let res = run_compute(state).await;
            if let Ok(report) = &res {
                state.generation += 1;
                state.latest = Some(Arc::clone(report));
                let _ = events_tx.send(AwardEvent::ReportReady {
                    generation: state.generation,
                    achieved: report.headline().len(),
                });
            }
            let _ = resp.send(res);
        }
        Command::Latest { resp } => {
            let _ = resp.send(state.latest.clone());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }
    false
}

async fn run_compute(state: &ServiceState) -> Result<Arc<AwardReport>, RuntimeError> {
    let roster = Arc::clone(&state.roster);
    let drafts = Arc::clone(&state.contacts);
    let config = Arc::clone(&state.config);
    let report = tokio::task::spawn_blocking(move || compute(&drafts, &roster, &config))
        .await
        .map_err(|e| RuntimeError::Join(e.to_string()))??;
    Ok(Arc::new(report))
}
