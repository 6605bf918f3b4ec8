//! Per-surface change detection

use tracing::debug;

use crate::commands::Cmd;
use crate::config::WritePolicy;
use crate::host::{NodeId, PageView, SurfaceId};
use crate::messages::{Msg, RescanScope};
use crate::model::{DetectorState, SyncModel};
use crate::transform::{contains_markdown_image, transform};

use super::registry::attach;

/// Run the transformer over one surface and decide whether to write back.
///
/// A surface that has left the page is skipped silently.
pub fn sync_surface(model: &mut SyncModel, page: &dyn PageView, surface: SurfaceId) -> Option<Cmd> {
    let Some(content) = page.read(surface) else {
        debug!("{} is gone, skipping scan", surface);
        return None;
    };

    let outcome = transform(&content, model.width());
    let write = match model.write_policy {
        WritePolicy::MarkdownOnly => outcome.modified,
        WritePolicy::AnyChange => outcome.changed(),
    };

    if !write {
        if outcome.normalized {
            debug!("{}: width-only rewrite not written back", surface);
        }
        return None;
    }

    debug!(
        "{}: rewriting (markdown: {}, tags: {})",
        surface, outcome.modified, outcome.normalized
    );
    if let Some(tracked) = model.tracked_mut(surface) {
        tracked.last_observed = outcome.text.clone();
    }
    Some(Cmd::WriteSurface {
        surface,
        text: outcome.text,
    })
}

/// Typing signal. The surface's own listener converts immediately when a
/// Markdown reference is present; a delayed re-scan catches uploads whose
/// Markdown lands after the keystroke.
pub fn update_input(model: &mut SyncModel, page: &dyn PageView, target: NodeId) -> Option<Cmd> {
    let surface = page
        .closest_surface(target)
        .filter(|surface| surface.node() == target)?;

    let immediate = if is_live(model, surface)
        && page
            .read(surface)
            .is_some_and(|content| contains_markdown_image(&content))
    {
        sync_surface(model, page, surface)
    } else {
        None
    };

    let delayed = Cmd::Schedule {
        delay: model.timing.input_delay(),
        msg: Msg::Rescan(RescanScope::One(surface)),
    };

    Cmd::collect([immediate, Some(delayed)])
}

/// Structural change inside a monitored surface.
///
/// A surface whose detector went inert and that reappears (a file deleted
/// and recreated under the same path) gets its detector back.
pub fn update_mutation(
    model: &mut SyncModel,
    page: &dyn PageView,
    surface: SurfaceId,
) -> Option<Cmd> {
    match model.tracked(surface) {
        None => None,
        Some(tracked) if tracked.is_inert() => attach(model, page, surface),
        Some(_) => sync_surface(model, page, surface),
    }
}

/// Periodic comparison against the last observed content.
///
/// Catches content written programmatically (upload completion), which
/// fires no input signal. Reschedules itself until the surface detaches.
pub fn update_poll(model: &mut SyncModel, page: &dyn PageView, surface: SurfaceId) -> Option<Cmd> {
    let tracked = model.tracked_mut(surface)?;
    if tracked.is_inert() {
        return None;
    }

    let Some(content) = page.read(surface) else {
        debug!("{} detached, detector going inert", surface);
        tracked.state = DetectorState::Inert;
        return None;
    };

    let scan = if tracked.observe(&content) {
        debug!("{}: content changed since last poll", surface);
        sync_surface(model, page, surface)
    } else {
        None
    };

    let next = Cmd::Schedule {
        delay: model.timing.poll_interval(),
        msg: Msg::PollTick(surface),
    };

    Cmd::collect([scan, Some(next)])
}

fn is_live(model: &SyncModel, surface: SurfaceId) -> bool {
    model
        .tracked(surface)
        .is_some_and(|tracked| !tracked.is_inert())
}
