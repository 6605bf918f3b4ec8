//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::Duration;

use image_resizer::config::{SyncTiming, WritePolicy};
use image_resizer::host::sim::SimulatedPage;
use image_resizer::preferences::MemoryWidthStore;
use image_resizer::{Runtime, SyncModel};

pub const USER_IMAGE: &str = "https://user-images.githubusercontent.com/1/2.png";
pub const ATTACHMENT: &str = "https://github.com/user-attachments/assets/9";

/// `![alt](url)`
pub fn md(alt: &str, url: &str) -> String {
    format!("![{}]({})", alt, url)
}

/// The tag the transformer produces for `md(alt, url)`
pub fn tag(url: &str, alt: &str, width: u32) -> String {
    format!(r#"<img src="{}" alt="{}" width="{}">"#, url, alt, width)
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Timing with polling pushed far out, to isolate the other triggers
pub fn slow_poll() -> SyncTiming {
    SyncTiming {
        poll_interval_ms: 60_000,
        ..SyncTiming::default()
    }
}

/// Runtime over `page` with default timing, width 300 and `AnyChange`
pub fn test_runtime(page: SimulatedPage) -> Runtime<SimulatedPage> {
    test_runtime_with(
        page,
        MemoryWidthStore::default(),
        SyncTiming::default(),
        WritePolicy::AnyChange,
    )
}

pub fn test_runtime_with(
    page: SimulatedPage,
    store: MemoryWidthStore,
    timing: SyncTiming,
    policy: WritePolicy,
) -> Runtime<SimulatedPage> {
    let model = SyncModel::new(Box::new(store), timing, policy);
    Runtime::new(model, page)
}

/// Pending poll timers for any surface
pub fn pending_polls(runtime: &Runtime<SimulatedPage>) -> usize {
    runtime
        .scheduled()
        .filter(|msg| matches!(msg, image_resizer::Msg::PollTick(_)))
        .count()
}
