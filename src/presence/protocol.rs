//! Presence gateway wire messages
//!
//! Outbound:
//!
//! | Message | JSON |
//! |---------|------|
//! | subscribe | `{"op":2,"d":{"subscribe_to_id":"<id>"}}` |
//! | heartbeat ack | `{"op":3}` |
//!
//! Inbound:
//!
//! | Message | JSON |
//! |---------|------|
//! | heartbeat | `{"op":1, ...}` |
//! | data | `{"t":"INIT_STATE"\|"PRESENCE_UPDATE","d":<snapshot>}` |
//!
//! Anything else is ignored.

use serde::Deserialize;
use serde_json::{json, Value};

use super::types::PresenceSnapshot;

pub mod ops {
    pub const HEARTBEAT: u64 = 1;
    pub const SUBSCRIBE: u64 = 2;
    pub const HEARTBEAT_ACK: u64 = 3;
}

pub mod events {
    pub const INIT_STATE: &str = "INIT_STATE";
    pub const PRESENCE_UPDATE: &str = "PRESENCE_UPDATE";
}

/// Messages the client sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOp {
    Subscribe { subscribe_to_id: String },
    HeartbeatAck,
}

impl ClientOp {
    pub fn subscribe(id: impl Into<String>) -> Self {
        ClientOp::Subscribe { subscribe_to_id: id.into() }
    }

    pub fn to_json(&self) -> String {
        match self {
            ClientOp::Subscribe { subscribe_to_id } => {
                json!({"op": ops::SUBSCRIBE, "d": {"subscribe_to_id": subscribe_to_id}}).to_string()
            }
            ClientOp::HeartbeatAck => json!({"op": ops::HEARTBEAT_ACK}).to_string(),
        }
    }
}

/// Messages the server sends that the client acts on
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayMessage {
    Heartbeat,
    InitState(PresenceSnapshot),
    PresenceUpdate(PresenceSnapshot),
}

/// Parse one inbound text frame. Unknown or malformed frames yield `None`.
pub fn parse_gateway_message(text: &str) -> Option<GatewayMessage> {
    let value: Value = serde_json::from_str(text).ok()?;
    let obj = value.as_object()?;

    if let Some(t) = obj.get("t").and_then(Value::as_str) {
        let data = obj.get("d")?.clone();
        return match t {
            events::INIT_STATE => serde_json::from_value(data).ok().map(GatewayMessage::InitState),
            events::PRESENCE_UPDATE => serde_json::from_value(data).ok().map(GatewayMessage::PresenceUpdate),
            _ => None,
        };
    }

    match obj.get("op").and_then(Value::as_u64)? {
        ops::HEARTBEAT => Some(GatewayMessage::Heartbeat),
        _ => None,
    }
}

/// REST envelope: `{ success, data }`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<PresenceSnapshot>,
}

impl ApiEnvelope {
    /// The snapshot, when the envelope reports success and carries data.
    pub fn into_snapshot(self) -> Option<PresenceSnapshot> {
        if self.success { self.data } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::types::Status;

    #[test]
    fn outbound_shapes() {
        let sub: Value = serde_json::from_str(&ClientOp::subscribe("94490510688792576").to_json()).unwrap();
        assert_eq!(sub, json!({"op": 2, "d": {"subscribe_to_id": "94490510688792576"}}));

        let ack: Value = serde_json::from_str(&ClientOp::HeartbeatAck.to_json()).unwrap();
        assert_eq!(ack, json!({"op": 3}));
    }

    #[test]
    fn heartbeat_with_payload() {
        let msg = r#"{"op":1,"d":{"heartbeat_interval":30000}}"#;
        assert_eq!(parse_gateway_message(msg), Some(GatewayMessage::Heartbeat));
    }

    #[test]
    fn data_messages() {
        let init = r#"{"op":0,"seq":1,"t":"INIT_STATE","d":{"discord_status":"online","activities":[]}}"#;
        match parse_gateway_message(init) {
            Some(GatewayMessage::InitState(s)) => assert_eq!(s.discord_status, Status::Online),
            other => panic!("expected InitState, got {:?}", other),
        }

        let update = r#"{"t":"PRESENCE_UPDATE","d":{"discord_status":"dnd","activities":[]}}"#;
        match parse_gateway_message(update) {
            Some(GatewayMessage::PresenceUpdate(s)) => assert_eq!(s.discord_status, Status::Dnd),
            other => panic!("expected PresenceUpdate, got {:?}", other),
        }
    }

    #[test]
    fn ignored_shapes() {
        assert!(parse_gateway_message("not json").is_none());
        assert!(parse_gateway_message("[]").is_none());
        assert!(parse_gateway_message(r#"{"op":3}"#).is_none());
        assert!(parse_gateway_message(r#"{"t":"SOMETHING_ELSE","d":{}}"#).is_none());
        assert!(parse_gateway_message(r#"{"t":"PRESENCE_UPDATE"}"#).is_none());
        assert!(parse_gateway_message(r#"{"t":"PRESENCE_UPDATE","d":"oops"}"#).is_none());
    }

    #[test]
    fn envelope_requires_success() {
        let ok: ApiEnvelope =
            serde_json::from_str(r#"{"success":true,"data":{"discord_status":"idle"}}"#).unwrap();
        assert_eq!(ok.into_snapshot().unwrap().discord_status, Status::Idle);

        let failed: ApiEnvelope =
            serde_json::from_str(r#"{"success":false,"error":{"code":"user_not_monitored"}}"#).unwrap();
        assert!(failed.into_snapshot().is_none());
    }
}
