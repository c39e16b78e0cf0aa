//! Presence connection manager
//!
//! ```text
//! Connecting ──fetch (≤ fetch_timeout)──▶ open socket ──▶ Live
//!                                             ▲             │ unclean close
//!                                             │ N × base    ▼
//!                                             └──────── Reconnecting
//!                                                           │ attempt > ceiling
//!                                                           ▼
//!                                                        Fallback (absorbing)
//! ```
//!
//! Clean closes and teardown end in `Closed` with no reconnect.

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::connection::{ConnectionState, ReconnectDecision};
use super::fallback::synthetic_snapshot;
use super::protocol::{parse_gateway_message, ClientOp, GatewayMessage};
use super::render::Renderer;
use super::source::{fetch_with_timeout, HttpSnapshotSource, SnapshotSource};
use super::surface::SharedPage;
use super::transport::{Connector, Transport, TransportError, WsConnector};
use super::types::PresenceSnapshot;
use crate::config::{millis, PresenceConfig};
use crate::lifecycle::Teardown;

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Connecting,
    Live,
    Reconnecting { attempt: u32, delay_ms: u64 },
    Fallback,
    Closed,
}

/// What to do with one inbound socket frame
#[derive(Debug, Clone, PartialEq)]
pub enum MessageAction {
    Reply(ClientOp),
    Render(PresenceSnapshot),
    Ignore,
}

pub fn handle_message(text: &str) -> MessageAction {
    match parse_gateway_message(text) {
        Some(GatewayMessage::Heartbeat) => MessageAction::Reply(ClientOp::HeartbeatAck),
        Some(GatewayMessage::InitState(s)) | Some(GatewayMessage::PresenceUpdate(s)) => MessageAction::Render(s),
        None => MessageAction::Ignore,
    }
}

enum SessionEnd {
    Clean,
    Teardown,
    Unclean(TransportError),
}

pub struct PresenceManager {
    config: PresenceConfig,
    source: Arc<dyn SnapshotSource>,
    connector: Arc<dyn Connector>,
    renderer: Renderer,
}

impl PresenceManager {
    pub fn new(
        config: PresenceConfig,
        source: Arc<dyn SnapshotSource>,
        connector: Arc<dyn Connector>,
        renderer: Renderer,
    ) -> Self {
        Self { config, source, connector, renderer }
    }

    /// Manager talking to the real REST endpoint and socket, rendering into `page`.
    pub fn live(config: PresenceConfig, page: SharedPage) -> Self {
        let source = Arc::new(HttpSnapshotSource::new(config.rest_base.clone()));
        let connector = Arc::new(WsConnector::new());
        Self::new(config, source, connector, Renderer::new(Arc::new(page)))
    }

    pub fn config(&self) -> &PresenceConfig {
        &self.config
    }

    /// Spawn the lifecycle task. Must be called inside a tokio runtime.
    pub fn start(self) -> PresenceHandle {
        let teardown = Teardown::new();
        let stop = teardown.subscribe();
        let (phase_tx, phase_rx) = watch::channel(Phase::Connecting);
        let task = tokio::spawn(self.run(stop, phase_tx));
        PresenceHandle { teardown, phase: phase_rx, task: Mutex::new(Some(task)) }
    }

    async fn run(self, mut stop: broadcast::Receiver<()>, phase: watch::Sender<Phase>) {
        tracing::info!(user_id = %self.config.user_id, "Presence starting");
        phase.send_replace(Phase::Connecting);

        let stopped = tokio::select! {
            _ = stop.recv() => true,
            fetched = fetch_with_timeout(self.source.as_ref(), &self.config.user_id, self.config.fetch_timeout()) => {
                match fetched {
                    Ok(Some(snapshot)) => { self.renderer.render(&snapshot); }
                    Ok(None) => tracing::debug!("Presence API returned no data"),
                    Err(e) => tracing::warn!("Initial presence fetch failed: {}", e),
                }
                false
            }
        };
        if stopped {
            phase.send_replace(Phase::Closed);
            return;
        }

        let mut state = ConnectionState::new(self.config.max_reconnect_attempts, self.config.reconnect_base());
        loop {
            let connected = tokio::select! {
                _ = stop.recv() => None,
                conn = self.connector.connect(&self.config.socket_url) => Some(conn),
            };
            let end = match connected {
                None => SessionEnd::Teardown,
                Some(Ok(transport)) => {
                    state.on_open();
                    self.drive(transport, &mut stop, &phase).await
                }
                Some(Err(e)) => SessionEnd::Unclean(e),
            };

            match end {
                SessionEnd::Teardown => {
                    tracing::info!("Presence torn down");
                    break;
                }
                SessionEnd::Clean => {
                    tracing::info!("Presence socket closed cleanly, not reconnecting");
                    break;
                }
                SessionEnd::Unclean(e) => {
                    tracing::warn!("Presence socket lost: {}", e);
                    match state.on_unclean_close() {
                        ReconnectDecision::Retry { attempt, delay } => {
                            tracing::info!("Reconnecting in {:?} (attempt {}/{})", delay, attempt, state.ceiling());
                            phase.send_replace(Phase::Reconnecting { attempt, delay_ms: millis(delay) });
                            let stopped = tokio::select! {
                                _ = stop.recv() => true,
                                _ = tokio::time::sleep(delay) => false,
                            };
                            if stopped {
                                break;
                            }
                        }
                        ReconnectDecision::Fallback => {
                            tracing::warn!(
                                "Giving up after {} reconnect attempts, switching to synthetic presence",
                                state.ceiling()
                            );
                            self.run_fallback(&mut stop, &phase).await;
                            break;
                        }
                    }
                }
            }
        }

        phase.send_replace(Phase::Closed);
    }

    async fn drive(
        &self,
        mut transport: Box<dyn Transport>,
        stop: &mut broadcast::Receiver<()>,
        phase: &watch::Sender<Phase>,
    ) -> SessionEnd {
        if let Err(e) = transport.send(ClientOp::subscribe(&self.config.user_id).to_json()).await {
            return SessionEnd::Unclean(e);
        }
        phase.send_replace(Phase::Live);
        tracing::info!("Presence socket live");

        loop {
            let incoming = tokio::select! {
                _ = stop.recv() => None,
                frame = transport.recv() => Some(frame),
            };

            let frame = match incoming {
                Some(frame) => frame,
                None => {
                    if let Err(e) = transport.close().await {
                        tracing::debug!("Close during teardown failed: {}", e);
                    }
                    return SessionEnd::Teardown;
                }
            };

            match frame {
                Ok(Some(text)) => match handle_message(&text) {
                    MessageAction::Reply(op) => {
                        if let Err(e) = transport.send(op.to_json()).await {
                            return SessionEnd::Unclean(e);
                        }
                    }
                    MessageAction::Render(snapshot) => {
                        self.renderer.render(&snapshot);
                    }
                    MessageAction::Ignore => tracing::trace!("Ignoring frame: {}", text),
                },
                Ok(None) => return SessionEnd::Clean,
                Err(e) => return SessionEnd::Unclean(e),
            }
        }
    }

    async fn run_fallback(&self, stop: &mut broadcast::Receiver<()>, phase: &watch::Sender<Phase>) {
        phase.send_replace(Phase::Fallback);

        let mut rng = StdRng::from_entropy();
        let mut ticker = tokio::time::interval(self.config.fallback_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = stop.recv() => break,
                _ = ticker.tick() => {
                    let snapshot = synthetic_snapshot(&self.config.fallback, &Local::now(), &mut rng);
                    self.renderer.render_synthetic(&snapshot);
                }
            }
        }
    }
}

/// Handle to a running manager
pub struct PresenceHandle {
    teardown: Teardown,
    phase: watch::Receiver<Phase>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PresenceHandle {
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase.clone()
    }

    /// Close any open connection and stop all timers. Safe in any phase, repeatable.
    pub async fn teardown(&self) {
        self.teardown.trigger().await;
        let task = self.task.lock().await.take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("Presence task ended abnormally: {}", e);
            }
        }
    }

    /// Wait until the manager reaches a phase matching `pred`.
    pub async fn wait_for<F>(&self, pred: F, timeout: Duration) -> Option<Phase>
    where
        F: Fn(&Phase) -> bool,
    {
        let mut rx = self.phase.clone();
        let result = tokio::time::timeout(timeout, rx.wait_for(|p| pred(p))).await;
        match result {
            Ok(Ok(phase)) => Some(*phase),
            _ => None,
        }
    }
}
