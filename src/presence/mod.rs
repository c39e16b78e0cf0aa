//! Presence - live Discord status for the profile page
//!
//! Keeps a best-effort live view of one subscriber's presence through a
//! Lanyard-style API and falls back to synthetic presence when it is gone:
//! - One-shot REST fetch (bounded by a timeout) for the first render
//! - Persistent socket: subscribe, heartbeat acks, snapshot updates
//! - Linear reconnect, bounded by a ceiling
//! - Synthetic status on a fixed interval once reconnects are exhausted
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | `render` | status → indicator style, activity precedence |
//! | `fallback` | time-of-day weighted synthetic status |
//! | `manager` | connection lifecycle, [`PresenceHandle`] teardown |
//! | `transport` / `source` | socket and REST seams |
//! | `surface` | [`PresenceSurface`] and the in-memory [`SharedPage`] |

pub mod connection;
pub mod fallback;
pub mod manager;
pub mod protocol;
pub mod render;
pub mod source;
pub mod surface;
pub mod transport;
pub mod types;

pub use connection::{ConnectionState, ReconnectDecision};
pub use fallback::{synthetic_snapshot, FallbackPolicy, WeightedPair};
pub use manager::{handle_message, MessageAction, Phase, PresenceHandle, PresenceManager};
pub use protocol::{parse_gateway_message, ApiEnvelope, ClientOp, GatewayMessage};
pub use render::{describe, select_activity, style_for, RenderedPresence, Renderer, StatusStyle};
pub use source::{fetch_with_timeout, FetchError, HttpSnapshotSource, SnapshotSource};
pub use surface::{PageView, PresenceSurface, SharedPage, SurfaceError};
pub use transport::{Connector, Transport, TransportError, WsConnector};
pub use types::{Activity, PresenceSnapshot, Status};
