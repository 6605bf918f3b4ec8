//! Message types for the Elm-style architecture
//!
//! Every page signal, timer and user command reaches the engine as a [`Msg`].

use crate::commands::CommandId;
use crate::host::{NodeId, SurfaceId};

/// Which surfaces a delayed re-scan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanScope {
    /// Every surface on the page at the time the timer fires
    All,
    /// A single surface
    One(SurfaceId),
}

/// All messages the engine handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    // === Surface registry ===
    /// Initial page scan
    Startup,
    /// Structural mutation: these nodes were inserted
    NodesAdded(Vec<NodeId>),

    // === Page signals ===
    /// Typing/input signal on `target`
    Input { target: NodeId },
    /// Text nodes inside a surface changed
    SurfaceMutated(SurfaceId),
    /// Paste anywhere on the page
    Paste,
    /// Drop onto `target`
    Drop { target: NodeId },
    /// Change signal from `target` (only file inputs matter)
    Change { target: NodeId },

    // === Timers ===
    /// Periodic content comparison for one surface
    PollTick(SurfaceId),
    /// Delayed re-scan scheduled by a page signal
    Rescan(RescanScope),

    // === User commands ===
    /// A registered command was invoked
    InvokeCommand(CommandId),
    /// The user answered the width prompt
    SetWidth(String),
}
