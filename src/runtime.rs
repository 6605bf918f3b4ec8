//! Command execution and timers
//!
//! The runtime owns the model, the host and a timer queue. It feeds messages
//! to [`update`], performs the returned commands, and fires scheduled
//! messages as its clock advances. The clock only moves when told to, so a
//! real event loop passes elapsed wall time while tests step it by hand.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::commands::{Cmd, WIDTH_PROMPT};
use crate::host::{HostError, PageHost};
use crate::messages::Msg;
use crate::model::SyncModel;
use crate::update::update;

/// Drives one engine against one host
pub struct Runtime<H: PageHost> {
    model: SyncModel,
    host: H,
    /// Pending messages keyed by (due time, insertion order)
    timers: BTreeMap<(Duration, u64), Msg>,
    now: Duration,
    next_seq: u64,
}

impl<H: PageHost> Runtime<H> {
    pub fn new(model: SyncModel, host: H) -> Self {
        Self {
            model,
            host,
            timers: BTreeMap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Run the initial page scan
    pub fn start(&mut self) {
        self.dispatch(Msg::Startup);
    }

    /// Handle one message and everything it triggers synchronously
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, &self.host, msg) {
            self.execute(cmd);
        }
    }

    fn execute(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::WriteSurface { surface, text } => match self.host.write(surface, &text) {
                Ok(()) => {}
                Err(HostError::Detached(_)) => {
                    debug!("{} detached before write-back, dropping", surface);
                }
                Err(e) => warn!("Write-back to {} failed: {}", surface, e),
            },
            Cmd::Schedule { delay, msg } => {
                let due = self.now + delay;
                self.timers.insert((due, self.next_seq), msg);
                self.next_seq += 1;
            }
            Cmd::Notify(notice) => self.host.notify(&notice),
            Cmd::PromptWidth { current } => {
                match self.host.prompt(WIDTH_PROMPT, &current.to_string()) {
                    Some(input) => self.dispatch(Msg::SetWidth(input)),
                    None => debug!("Width prompt cancelled"),
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
        }
    }

    /// Move the clock forward by `by`, firing every timer that falls due
    pub fn advance(&mut self, by: Duration) {
        self.advance_to(self.now + by);
    }

    /// Move the clock to `target`, firing due timers in order.
    ///
    /// Timers scheduled while firing are honored if they also fall due.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(entry) = self.timers.first_entry() {
            if entry.key().0 > target {
                break;
            }
            let ((due, _), msg) = entry.remove_entry();
            self.now = self.now.max(due);
            self.dispatch(msg);
        }
        self.now = self.now.max(target);
    }

    /// Fire everything currently due without moving the clock
    pub fn run_due(&mut self) {
        self.advance_to(self.now);
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// When the next timer fires, if any
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(due, _)| *due)
    }

    /// Messages waiting on timers, in firing order
    pub fn scheduled(&self) -> impl Iterator<Item = &Msg> {
        self.timers.values()
    }

    pub fn model(&self) -> &SyncModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut SyncModel {
        &mut self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
