//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions. Handlers read the
//! page through [`PageView`] and return side effects as [`Cmd`]s; they never
//! write to the page themselves.
//!
//! Several independent triggers converge on the same transformer pass:
//! attachment, typing, structural mutation, polling and the delayed
//! re-scans scheduled by paste/drop/file-input signals. Every pass re-reads
//! the surface and the transformer is idempotent, so redundant passes are
//! harmless.

mod bridge;
mod command;
mod detector;
mod registry;

use tracing::trace;

use crate::commands::Cmd;
use crate::host::PageView;
use crate::messages::Msg;
use crate::model::SyncModel;

pub use bridge::{rescan, update_drop, update_file_change, update_paste};
pub use command::{update_invoke, update_set_width};
pub use detector::{sync_surface, update_input, update_mutation, update_poll};
pub use registry::{attach, attach_added, attach_all};

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut SyncModel, page: &dyn PageView, msg: Msg) -> Option<Cmd> {
    trace!(?msg, "update");

    match msg {
        Msg::Startup => attach_all(model, page),
        Msg::NodesAdded(nodes) => attach_added(model, page, &nodes),
        Msg::Input { target } => update_input(model, page, target),
        Msg::SurfaceMutated(surface) => update_mutation(model, page, surface),
        Msg::Paste => update_paste(model),
        Msg::Drop { target } => update_drop(model, page, target),
        Msg::Change { target } => update_file_change(model, page, target),
        Msg::PollTick(surface) => update_poll(model, page, surface),
        Msg::Rescan(scope) => rescan(model, page, scope),
        Msg::InvokeCommand(id) => update_invoke(model, id),
        Msg::SetWidth(input) => update_set_width(model, &input),
    }
}
