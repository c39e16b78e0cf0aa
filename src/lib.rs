//! Pagepresence: live presence indicator and interaction models for a profile page.
//!
//! # Architecture
//!
//! ```text
//! PageLifecycle (load / unload)
//!   │
//!   ├── PresenceManager (one spawned task)
//!   │     ├── SnapshotSource  one-shot REST fetch, bounded by a timeout
//!   │     ├── Connector       real-time socket: subscribe, heartbeat ack, updates
//!   │     ├── ConnectionState linear backoff, reconnect ceiling
//!   │     ├── fallback        synthetic status once the socket is given up on
//!   │     └── Renderer ──▶ PresenceSurface (SharedPage / PageView)
//!   │
//!   └── effects (independent per-frame models)
//!         particles, cursor, tilt, ripple, loading, clock, tooltip, sound
//! ```
//!
//! # Phases
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | `connecting` | initial fetch and first socket attempt |
//! | `live` | socket open and subscribed |
//! | `reconnecting` | waiting `attempt × base` before the next try |
//! | `fallback` | synthetic status on a fixed interval, never leaves |
//! | `closed` | clean close or teardown |
//!
//! # Features
//!
//! - `server` (default) - axum view server exposing the rendered page state
//!
//! # Usage
//!
//! ```ignore
//! use pagepresence::{PageLifecycle, PresenceConfig, PresenceManager, SharedPage};
//!
//! let page = SharedPage::new();
//! let mut lifecycle = PageLifecycle::new(page.clone());
//! lifecycle.load(PresenceManager::live(PresenceConfig::new("94490510688792576"), page)).await;
//!
//! // ... later
//! lifecycle.unload().await;
//! ```

pub mod config;
pub mod effects;
pub mod lifecycle;
pub mod logging;
pub mod presence;

#[cfg(feature = "server")]
pub mod server;

pub use config::{ConfigError, PresenceConfig};
pub use lifecycle::{install_signal_handlers, PageLifecycle, Teardown};
pub use presence::{
    describe, Activity, PageView, Phase, PresenceHandle, PresenceManager, PresenceSnapshot, PresenceSurface,
    Renderer, SharedPage, Status,
};

#[cfg(feature = "server")]
pub use server::{create_router, create_router_with_state, AppState};
