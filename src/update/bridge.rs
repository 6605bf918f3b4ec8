//! Page-level signals that predict an upcoming asynchronous upload
//!
//! None of these act immediately: each schedules a re-scan after a delay
//! sized to how long that kind of upload usually takes to land.

use tracing::debug;

use crate::commands::Cmd;
use crate::host::{NodeId, PageView};
use crate::messages::{Msg, RescanScope};
use crate::model::SyncModel;

use super::detector::sync_surface;

/// Paste: the target surface is unknown, so re-scan everything
pub fn update_paste(model: &SyncModel) -> Option<Cmd> {
    Some(Cmd::Schedule {
        delay: model.timing.paste_delay(),
        msg: Msg::Rescan(RescanScope::All),
    })
}

/// Drop: re-scan the surface the drop landed in, if any
pub fn update_drop(model: &SyncModel, page: &dyn PageView, target: NodeId) -> Option<Cmd> {
    let Some(surface) = page.closest_surface(target) else {
        debug!("Drop outside any surface ignored");
        return None;
    };
    Some(Cmd::Schedule {
        delay: model.timing.drop_delay(),
        msg: Msg::Rescan(RescanScope::One(surface)),
    })
}

/// Change: only file selections start an upload
pub fn update_file_change(model: &SyncModel, page: &dyn PageView, target: NodeId) -> Option<Cmd> {
    if !page.is_file_input(target) {
        return None;
    }
    Some(Cmd::Schedule {
        delay: model.timing.file_input_delay(),
        msg: Msg::Rescan(RescanScope::All),
    })
}

/// Delayed re-scan. Covers surfaces whether or not a detector is attached.
pub fn rescan(model: &mut SyncModel, page: &dyn PageView, scope: RescanScope) -> Option<Cmd> {
    match scope {
        RescanScope::One(surface) => sync_surface(model, page, surface),
        RescanScope::All => Cmd::collect(
            page.surfaces()
                .into_iter()
                .map(|surface| sync_surface(model, page, surface))
                .collect::<Vec<_>>(),
        ),
    }
}
