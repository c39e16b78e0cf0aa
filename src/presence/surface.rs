//! Presence surface - the page elements the renderer writes into

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use super::render::StatusStyle;
use super::types::Status;

/// Element names of the presence markup.
pub mod elements {
    pub const STATUS_DOT: &str = ".status-dot";
    pub const ACTIVITY: &str = ".discord-activity";
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("Missing element: {0}")]
    MissingElement(&'static str),
}

/// Where rendered presence goes
pub trait PresenceSurface: Send + Sync {
    fn set_indicator(&self, status: Status, style: &StatusStyle) -> Result<(), SurfaceError>;
    /// `None` hides the activity line.
    fn set_activity(&self, line: Option<&str>) -> Result<(), SurfaceError>;
    /// Marks whether the current indicator comes from synthetic data.
    fn set_synthetic(&self, _synthetic: bool) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub status: Status,
    pub color: String,
    pub shadow: String,
    pub label: String,
}

/// In-memory rendering of the presence area of the page
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub indicator: Option<Indicator>,
    pub activity: Option<String>,
    pub activity_visible: bool,
    pub synthetic: bool,
    pub renders: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shared page view. A detached page has no presence markup; writes are rejected.
#[derive(Clone)]
pub struct SharedPage {
    view: Arc<RwLock<PageView>>,
    attached: bool,
}

impl Default for SharedPage {
    fn default() -> Self { Self::new() }
}

impl SharedPage {
    pub fn new() -> Self {
        Self { view: Arc::new(RwLock::new(PageView::default())), attached: true }
    }

    /// A page without the presence elements.
    pub fn detached() -> Self {
        Self { attached: false, ..Self::new() }
    }

    pub fn snapshot(&self) -> PageView {
        self.view.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, PageView> {
        self.view.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl PresenceSurface for SharedPage {
    fn set_indicator(&self, status: Status, style: &StatusStyle) -> Result<(), SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::MissingElement(elements::STATUS_DOT));
        }
        let mut view = self.write();
        view.indicator = Some(Indicator {
            status,
            color: style.color.to_string(),
            shadow: style.shadow.to_string(),
            label: style.label.to_string(),
        });
        view.renders += 1;
        view.updated_at = Some(Utc::now());
        Ok(())
    }

    fn set_activity(&self, line: Option<&str>) -> Result<(), SurfaceError> {
        if !self.attached {
            return Err(SurfaceError::MissingElement(elements::ACTIVITY));
        }
        let mut view = self.write();
        view.activity = line.map(str::to_string);
        view.activity_visible = line.is_some();
        Ok(())
    }

    fn set_synthetic(&self, synthetic: bool) {
        if self.attached {
            self.write().synthetic = synthetic;
        }
    }
}
