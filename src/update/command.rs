//! User command handling

use std::time::Duration;

use crate::commands::{Cmd, CommandId};
use crate::messages::{Msg, RescanScope};
use crate::model::SyncModel;
use crate::preferences::{set_width, Notice};

pub fn update_invoke(model: &SyncModel, id: CommandId) -> Option<Cmd> {
    match id {
        CommandId::SetImageWidth => Some(Cmd::PromptWidth {
            current: model.width(),
        }),
    }
}

/// Validate and store a new width. On success every surface is re-scanned
/// right away so existing tags pick up the new width.
pub fn update_set_width(model: &mut SyncModel, input: &str) -> Option<Cmd> {
    let notice = set_width(model.prefs_mut(), input);
    let resync = matches!(notice, Notice::WidthSet(_)).then(|| Cmd::Schedule {
        delay: Duration::ZERO,
        msg: Msg::Rescan(RescanScope::All),
    });
    Cmd::collect([Some(Cmd::Notify(notice)), resync])
}
