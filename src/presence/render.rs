//! Presence status renderer
//!
//! Maps a snapshot to indicator style and a single activity line, then writes
//! both into a [`PresenceSurface`]. The mapping itself ([`describe`]) is pure.

use serde::Serialize;
use std::sync::Arc;

use super::surface::PresenceSurface;
use super::types::{Activity, PresenceSnapshot, Status};

/// Indicator style for one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub color: &'static str,
    pub shadow: &'static str,
    pub label: &'static str,
}

const ONLINE: StatusStyle = StatusStyle { color: "#43b581", shadow: "0 0 8px #43b581", label: "Online" };
const IDLE: StatusStyle = StatusStyle { color: "#faa61a", shadow: "0 0 8px #faa61a", label: "Idle" };
const DND: StatusStyle = StatusStyle { color: "#f04747", shadow: "0 0 8px #f04747", label: "Do Not Disturb" };
const OFFLINE: StatusStyle = StatusStyle { color: "#747f8d", shadow: "none", label: "Offline" };

pub fn style_for(status: Status) -> StatusStyle {
    match status {
        Status::Online => ONLINE,
        Status::Idle => IDLE,
        Status::Dnd => DND,
        Status::Offline => OFFLINE,
    }
}

/// Style for a raw status code; unknown codes get the offline style.
pub fn style_for_code(code: &str) -> StatusStyle {
    style_for(Status::from_code(code))
}

/// Pick the one activity to show: playing, then music, then custom status.
/// Offline never shows an activity.
pub fn select_activity(snapshot: &PresenceSnapshot) -> Option<&Activity> {
    if snapshot.discord_status == Status::Offline {
        return None;
    }
    let acts = &snapshot.activities;
    acts.iter()
        .find(|a| a.is_playing())
        .or_else(|| acts.iter().find(|a| a.is_music()))
        .or_else(|| acts.iter().find(|a| a.is_custom_status()))
}

pub fn activity_line(activity: &Activity) -> Option<String> {
    if activity.is_music() {
        return Some(match (&activity.details, &activity.state) {
            (Some(song), Some(artist)) => format!("Listening to {} by {}", song, artist),
            (Some(song), None) => format!("Listening to {}", song),
            _ => "Listening to Spotify".to_string(),
        });
    }
    if activity.is_custom_status() {
        let emoji = activity.emoji.as_ref().map(|e| e.name.as_str()).unwrap_or("");
        let state = activity.state.as_deref().unwrap_or("");
        let line = format!("{} {}", emoji, state).trim().to_string();
        return if line.is_empty() { None } else { Some(line) };
    }
    Some(match &activity.details {
        Some(details) => format!("Playing {}: {}", activity.name, details),
        None => format!("Playing {}", activity.name),
    })
}

/// What the surface should show for a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPresence {
    pub status: Status,
    pub style: StatusStyle,
    pub activity: Option<String>,
}

pub fn describe(snapshot: &PresenceSnapshot) -> RenderedPresence {
    RenderedPresence {
        status: snapshot.discord_status,
        style: style_for(snapshot.discord_status),
        activity: select_activity(snapshot).and_then(activity_line),
    }
}

/// Writes rendered presence into a surface. Surface errors are logged and dropped.
#[derive(Clone)]
pub struct Renderer {
    surface: Arc<dyn PresenceSurface>,
}

impl Renderer {
    pub fn new(surface: Arc<dyn PresenceSurface>) -> Self {
        Self { surface }
    }

    pub fn render(&self, snapshot: &PresenceSnapshot) -> RenderedPresence {
        self.apply(snapshot, false)
    }

    pub fn render_synthetic(&self, snapshot: &PresenceSnapshot) -> RenderedPresence {
        self.apply(snapshot, true)
    }

    fn apply(&self, snapshot: &PresenceSnapshot, synthetic: bool) -> RenderedPresence {
        let rendered = describe(snapshot);
        tracing::debug!(status = rendered.status.as_str(), activity = ?rendered.activity, synthetic, "Rendering presence");

        if let Err(e) = self.surface.set_indicator(rendered.status, &rendered.style) {
            tracing::warn!("Presence indicator not rendered: {}", e);
        }
        if let Err(e) = self.surface.set_activity(rendered.activity.as_deref()) {
            tracing::warn!("Presence activity not rendered: {}", e);
        }
        self.surface.set_synthetic(synthetic);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::surface::SharedPage;
    use crate::presence::types::{kinds, MUSIC_ACTIVITY_NAME};

    fn spotify() -> Activity {
        Activity::new(kinds::LISTENING, MUSIC_ACTIVITY_NAME)
            .with_details("Teardrop")
            .with_state("Massive Attack")
    }

    #[test]
    fn status_table() {
        assert_eq!(style_for(Status::Online).color, "#43b581");
        assert_eq!(style_for(Status::Idle).label, "Idle");
        assert_eq!(style_for(Status::Dnd).label, "Do Not Disturb");
        assert_eq!(style_for(Status::Offline).shadow, "none");
        assert_eq!(style_for_code("streaming"), style_for(Status::Offline));
    }

    #[test]
    fn playing_beats_music_and_custom() {
        let snapshot = PresenceSnapshot::new(Status::Online)
            .with_activity(Activity::new(kinds::CUSTOM, "Custom Status").with_state("busy"))
            .with_activity(spotify())
            .with_activity(Activity::new(kinds::PLAYING, "Hollow Knight"));
        assert_eq!(describe(&snapshot).activity.as_deref(), Some("Playing Hollow Knight"));
    }

    #[test]
    fn music_beats_custom() {
        let snapshot = PresenceSnapshot::new(Status::Idle)
            .with_activity(Activity::new(kinds::CUSTOM, "Custom Status").with_emoji("☕").with_state("brb"))
            .with_activity(spotify());
        assert_eq!(
            describe(&snapshot).activity.as_deref(),
            Some("Listening to Teardrop by Massive Attack")
        );
    }

    #[test]
    fn custom_status_line() {
        let snapshot = PresenceSnapshot::new(Status::Dnd)
            .with_activity(Activity::new(kinds::CUSTOM, "Custom Status").with_emoji("🦀").with_state("rewriting it"));
        assert_eq!(describe(&snapshot).activity.as_deref(), Some("🦀 rewriting it"));

        let empty = PresenceSnapshot::new(Status::Dnd).with_activity(Activity::new(kinds::CUSTOM, "Custom Status"));
        assert_eq!(describe(&empty).activity, None);
    }

    #[test]
    fn offline_hides_activity() {
        let snapshot = PresenceSnapshot::new(Status::Offline)
            .with_activity(Activity::new(kinds::PLAYING, "Celeste"))
            .with_activity(spotify());
        let rendered = describe(&snapshot);
        assert_eq!(rendered.activity, None);
        assert_eq!(rendered.style.label, "Offline");
    }

    #[test]
    fn unmatched_activities_hide_line() {
        let snapshot = PresenceSnapshot::new(Status::Online)
            .with_activity(Activity::new(kinds::WATCHING, "YouTube"));
        assert_eq!(describe(&snapshot).activity, None);
    }

    #[test]
    fn renderer_writes_page() {
        let page = SharedPage::new();
        let renderer = Renderer::new(Arc::new(page.clone()));

        renderer.render(&PresenceSnapshot::new(Status::Online).with_activity(spotify()));
        let view = page.snapshot();
        assert_eq!(view.indicator.as_ref().unwrap().label, "Online");
        assert!(view.activity_visible);
        assert!(!view.synthetic);

        renderer.render_synthetic(&PresenceSnapshot::new(Status::Offline));
        let view = page.snapshot();
        assert_eq!(view.indicator.as_ref().unwrap().status, Status::Offline);
        assert!(!view.activity_visible);
        assert!(view.synthetic);
        assert_eq!(view.renders, 2);
    }

    #[test]
    fn detached_page_is_noop() {
        let page = SharedPage::detached();
        let renderer = Renderer::new(Arc::new(page.clone()));
        let rendered = renderer.render(&PresenceSnapshot::new(Status::Dnd));
        assert_eq!(rendered.style.label, "Do Not Disturb");
        assert!(page.snapshot().indicator.is_none());
    }
}
