//! Sync model - the complete state of the engine
//!
//! Holds one tracked entry per discovered surface plus the settings every
//! handler reads. The width preference is reached through an injected
//! [`WidthStore`] and is never cached here.

pub mod surface;

pub use surface::{DetectorState, TrackedSurface};

use std::collections::BTreeMap;
use std::fmt;

use crate::config::{ResizerConfig, SyncTiming, WritePolicy};
use crate::host::SurfaceId;
use crate::preferences::WidthStore;

/// The complete engine model
pub struct SyncModel {
    /// Monitored surfaces. Entries are never removed.
    pub surfaces: BTreeMap<SurfaceId, TrackedSurface>,
    /// Poll and re-scan delays
    pub timing: SyncTiming,
    /// When rewritten text goes back to the surface
    pub write_policy: WritePolicy,
    prefs: Box<dyn WidthStore>,
}

impl SyncModel {
    pub fn new(prefs: Box<dyn WidthStore>, timing: SyncTiming, write_policy: WritePolicy) -> Self {
        Self {
            surfaces: BTreeMap::new(),
            timing,
            write_policy,
            prefs,
        }
    }

    /// Build a model from persisted settings
    pub fn from_config(config: &ResizerConfig, prefs: Box<dyn WidthStore>) -> Self {
        Self::new(prefs, config.sync, config.write_policy)
    }

    /// Current width preference, read fresh from the store
    pub fn width(&self) -> u32 {
        self.prefs.width()
    }

    pub fn prefs_mut(&mut self) -> &mut dyn WidthStore {
        self.prefs.as_mut()
    }

    /// Whether a detector was ever attached to `surface`
    pub fn is_monitored(&self, surface: SurfaceId) -> bool {
        self.surfaces.contains_key(&surface)
    }

    pub fn tracked(&self, surface: SurfaceId) -> Option<&TrackedSurface> {
        self.surfaces.get(&surface)
    }

    pub fn tracked_mut(&mut self, surface: SurfaceId) -> Option<&mut TrackedSurface> {
        self.surfaces.get_mut(&surface)
    }

    /// Number of detectors still watching a live surface
    pub fn active_detectors(&self) -> usize {
        self.surfaces
            .values()
            .filter(|tracked| tracked.state == DetectorState::Attached)
            .count()
    }
}

impl fmt::Debug for SyncModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncModel")
            .field("surfaces", &self.surfaces)
            .field("timing", &self.timing)
            .field("write_policy", &self.write_policy)
            .field("width", &self.width())
            .finish()
    }
}
