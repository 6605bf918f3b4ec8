//! Page capabilities the sync engine runs against
//!
//! The engine never touches a real page directly. Anything that can list
//! text surfaces, read and write their content and report page signals can
//! host it:
//!
//! - [`sim::SimulatedPage`]: in-memory node tree, used by tests
//! - [`files::DirectoryHost`]: Markdown files in a directory, used by `watch`
//!
//! Read access goes through [`PageView`] (what `update` sees); effects go
//! through [`PageHost`] (what the runtime executes).

pub mod files;
pub mod sim;

use std::fmt;

use crate::preferences::Notice;

/// A node on the page (element, file input, surface, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A text-editing surface. Every surface is also a node with the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn node(self) -> NodeId {
        NodeId(self.0)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Failures reported by a host. Never fatal to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The surface is no longer attached to the page
    Detached(SurfaceId),
    /// Underlying I/O failed
    Io(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached(surface) => write!(f, "{} is detached", surface),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

/// Read-only view of the page
pub trait PageView {
    /// Every surface currently attached, in document order
    fn surfaces(&self) -> Vec<SurfaceId>;

    /// Surfaces at or below `node` (empty if `node` is detached)
    fn surfaces_within(&self, node: NodeId) -> Vec<SurfaceId>;

    /// Nearest surface at or above `node`
    fn closest_surface(&self, node: NodeId) -> Option<SurfaceId>;

    /// Whether `node` is a file-selection input
    fn is_file_input(&self, node: NodeId) -> bool;

    /// Current text of a surface; `None` once it is detached
    fn read(&self, surface: SurfaceId) -> Option<String>;
}

/// Effects the runtime performs on behalf of `update`
pub trait PageHost: PageView {
    /// Replace a surface's text. Must not emit an input signal.
    fn write(&mut self, surface: SurfaceId, text: &str) -> Result<(), HostError>;

    /// Show an acknowledgement to the user
    fn notify(&mut self, notice: &Notice);

    /// Ask the user for a value; `None` when cancelled
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}
