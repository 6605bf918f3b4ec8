//! Per-surface detector state

/// Lifecycle of one change detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Watching a live surface
    Attached,
    /// The surface left the page; polling has stopped
    Inert,
}

/// A monitored surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSurface {
    pub state: DetectorState,
    /// Content seen by the last poll or written by the engine
    pub last_observed: String,
}

impl TrackedSurface {
    pub fn new(content: String) -> Self {
        Self {
            state: DetectorState::Attached,
            last_observed: content,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.state == DetectorState::Inert
    }

    /// Record fresh content; returns true if it differs from the last observation
    pub fn observe(&mut self, content: &str) -> bool {
        if self.last_observed == content {
            return false;
        }
        self.last_observed = content.to_string();
        true
    }
}
