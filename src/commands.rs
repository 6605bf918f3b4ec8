//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::time::Duration;

use crate::host::SurfaceId;
use crate::messages::Msg;
use crate::preferences::Notice;

// ============================================================================
// User Command Registry
// ============================================================================

/// Identifies a command the user can invoke from outside the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    SetImageWidth,
}

/// A registered user command
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub id: CommandId,
    pub label: &'static str,
}

/// Static registry of all available commands
pub static COMMANDS: &[CommandDef] = &[CommandDef {
    id: CommandId::SetImageWidth,
    label: "Set Image Width",
}];

impl CommandId {
    /// Label shown in the host's command menu
    pub fn label(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|def| def.id == self)
            .map(|def| def.label)
            .unwrap_or("Unknown command")
    }
}

/// Text shown when prompting for a width
pub const WIDTH_PROMPT: &str = "Enter desired image width in px (number only):";

// ============================================================================
// Side-Effect Commands (returned from update)
// ============================================================================

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Replace a surface's content
    WriteSurface { surface: SurfaceId, text: String },
    /// Deliver `msg` after `delay`
    Schedule { delay: Duration, msg: Msg },
    /// Show an acknowledgement to the user
    Notify(Notice),
    /// Prompt for a new width, pre-filled with the current one
    PromptWidth { current: u32 },
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Collapse optional commands: nothing, a single command, or a batch
    pub fn collect(cmds: impl IntoIterator<Item = Option<Cmd>>) -> Option<Cmd> {
        let mut cmds: Vec<Cmd> = cmds.into_iter().flatten().collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::batch(cmds)),
        }
    }

    /// Count of surface writes, including nested batches
    pub fn write_count(&self) -> usize {
        match self {
            Cmd::WriteSurface { .. } => 1,
            Cmd::Batch(cmds) => cmds.iter().map(Cmd::write_count).sum(),
            _ => 0,
        }
    }
}
