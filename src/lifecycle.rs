//! Page lifecycle - explicit ownership of the presence client and teardown
//!
//! There is no global connection singleton: a [`PageLifecycle`] owns the
//! running [`PresenceHandle`] and tears it down when the page goes away. In the
//! binary "going away" is SIGINT/SIGTERM.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::presence::{PresenceHandle, PresenceManager, SharedPage};

/// One-shot teardown broadcaster. Triggering twice is a no-op.
#[derive(Clone)]
pub struct Teardown {
    sender: broadcast::Sender<()>,
    triggered: Arc<RwLock<bool>>,
}

impl Default for Teardown {
    fn default() -> Self { Self::new() }
}

impl Teardown {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender, triggered: Arc::new(RwLock::new(false)) }
    }

    /// Receivers created before `trigger` always observe it.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.sender.subscribe()
    }

    pub async fn trigger(&self) {
        let mut triggered = self.triggered.write().await;
        if !*triggered {
            *triggered = true;
            let _ = self.sender.send(());
        }
    }

    pub async fn is_triggered(&self) -> bool {
        *self.triggered.read().await
    }
}

/// Install signal handlers; the returned teardown fires on SIGINT/SIGTERM.
pub fn install_signal_handlers() -> Teardown {
    let teardown = Teardown::new();
    let handle = teardown.clone();

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(mut sigterm), Ok(mut sigint)) => {
                    tokio::select! {
                        _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                        _ = sigint.recv() => tracing::info!("Received SIGINT"),
                    }
                }
                _ => {
                    tracing::warn!("Unix signal handlers unavailable, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Ctrl+C handler failed: {}", e);
                return;
            }
            tracing::info!("Received Ctrl+C");
        }

        handle.trigger().await;
    });

    teardown
}

/// Owns everything the page started. Dropping it without `unload` also ends the
/// presence task, because the teardown sender goes away with the handle.
pub struct PageLifecycle {
    page: SharedPage,
    presence: Option<PresenceHandle>,
}

impl PageLifecycle {
    pub fn new(page: SharedPage) -> Self {
        Self { page, presence: None }
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    /// Start the presence client. A previously started one is torn down first.
    pub async fn load(&mut self, manager: PresenceManager) -> &PresenceHandle {
        if let Some(previous) = self.presence.take() {
            previous.teardown().await;
        }
        self.presence.insert(manager.start())
    }

    pub fn presence(&self) -> Option<&PresenceHandle> {
        self.presence.as_ref()
    }

    /// Navigation away: close the connection and stop timers.
    pub async fn unload(&mut self) {
        if let Some(presence) = self.presence.take() {
            presence.teardown().await;
            tracing::info!("Page unloaded");
        }
    }
}
