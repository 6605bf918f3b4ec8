//! Surface discovery and detector attachment

use tracing::{debug, info};

use crate::commands::Cmd;
use crate::host::{NodeId, PageView, SurfaceId};
use crate::messages::Msg;
use crate::model::{SyncModel, TrackedSurface};

use super::detector::sync_surface;

/// Attach a detector to `surface` unless a live one is already attached.
///
/// Runs the transformer once on the content already present and starts the
/// poll loop. Attaching twice is a no-op. An inert detector whose surface is
/// readable again is revived in place; its poll loop had already stopped.
pub fn attach(model: &mut SyncModel, page: &dyn PageView, surface: SurfaceId) -> Option<Cmd> {
    let revived = match model.tracked(surface) {
        Some(tracked) if !tracked.is_inert() => return None,
        Some(_) => true,
        None => false,
    };
    let content = page.read(surface)?;

    if revived {
        info!("{} is back, resuming monitoring", surface);
    } else {
        info!("Monitoring {}", surface);
    }
    model
        .surfaces
        .insert(surface, TrackedSurface::new(content));

    let initial = sync_surface(model, page, surface);
    let poll = Cmd::Schedule {
        delay: model.timing.poll_interval(),
        msg: Msg::PollTick(surface),
    };

    Cmd::collect([initial, Some(poll)])
}

/// Initial scan of the whole page
pub fn attach_all(model: &mut SyncModel, page: &dyn PageView) -> Option<Cmd> {
    let surfaces = page.surfaces();
    debug!("Startup scan found {} surfaces", surfaces.len());
    Cmd::collect(
        surfaces
            .into_iter()
            .map(|surface| attach(model, page, surface))
            .collect::<Vec<_>>(),
    )
}

/// Scan inserted subtrees (including the inserted nodes themselves)
pub fn attach_added(model: &mut SyncModel, page: &dyn PageView, nodes: &[NodeId]) -> Option<Cmd> {
    let surfaces: Vec<SurfaceId> = nodes
        .iter()
        .flat_map(|&node| page.surfaces_within(node))
        .collect();
    Cmd::collect(
        surfaces
            .into_iter()
            .map(|surface| attach(model, page, surface))
            .collect::<Vec<_>>(),
    )
}
