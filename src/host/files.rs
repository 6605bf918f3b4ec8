//! Directory of Markdown files as a page
//!
//! Every Markdown or text file under the root is a surface; directories are
//! plain nodes. A debounced `notify` watcher turns file system changes into
//! engine messages: new paths become [`Msg::NodesAdded`], changes to known
//! surfaces become [`Msg::SurfaceMutated`]. Content that changes without an
//! event is still caught by the poll loop.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};

use super::{HostError, NodeId, PageHost, PageView, SurfaceId};
use crate::messages::Msg;
use crate::preferences::Notice;

/// File extensions treated as text surfaces
const SURFACE_EXTENSIONS: &[&str] = &["md", "markdown", "mdx", "txt"];

type DebouncedResult = Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>;

/// Stable ids for paths seen so far. The root directory is node 0.
#[derive(Debug, Default)]
struct PathIndex {
    ids: BTreeMap<PathBuf, u64>,
    paths: BTreeMap<u64, PathBuf>,
    next_id: u64,
}

impl PathIndex {
    fn id_for(&mut self, path: &Path) -> u64 {
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(path.to_path_buf(), id);
        self.paths.insert(id, path.to_path_buf());
        id
    }

    fn known(&self, path: &Path) -> Option<u64> {
        self.ids.get(path).copied()
    }

    fn path(&self, id: u64) -> Option<PathBuf> {
        self.paths.get(&id).cloned()
    }
}

/// Page backed by a directory tree
pub struct DirectoryHost {
    root: PathBuf,
    index: RefCell<PathIndex>,
    watcher: Option<DirectoryWatcher>,
}

impl DirectoryHost {
    /// Host over `root` without a file system watcher (poll loop only)
    pub fn new(root: PathBuf) -> Self {
        let mut index = PathIndex::default();
        index.id_for(&root);
        Self {
            root,
            index: RefCell::new(index),
            watcher: None,
        }
    }

    /// Host over `root` with change events from a debounced watcher
    pub fn watching(root: PathBuf) -> Result<Self, notify::Error> {
        let watcher = DirectoryWatcher::new(root.clone())?;
        let mut host = Self::new(root);
        host.watcher = Some(watcher);
        Ok(host)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path behind a node id, if it has been seen
    pub fn path_of(&self, node: NodeId) -> Option<PathBuf> {
        self.index.borrow().path(node.0)
    }

    /// Surface id for `path`, assigning one if needed
    pub fn surface_for(&self, path: &Path) -> Option<SurfaceId> {
        is_surface_path(path).then(|| SurfaceId(self.index.borrow_mut().id_for(path)))
    }

    /// Drain watcher events into engine messages (non-blocking)
    pub fn poll_events(&mut self) -> Vec<Msg> {
        let Some(watcher) = &self.watcher else {
            return Vec::new();
        };

        let mut added = Vec::new();
        let mut msgs = Vec::new();
        for path in watcher.poll_paths() {
            if !path.exists() {
                continue;
            }
            let known = self.index.borrow().known(&path);
            match known {
                Some(id) if is_surface_path(&path) => {
                    let msg = Msg::SurfaceMutated(SurfaceId(id));
                    if !msgs.contains(&msg) {
                        msgs.push(msg);
                    }
                }
                Some(_) => {}
                None => {
                    if path.is_dir() || is_surface_path(&path) {
                        added.push(NodeId(self.index.borrow_mut().id_for(&path)));
                    }
                }
            }
        }

        if !added.is_empty() {
            msgs.insert(0, Msg::NodesAdded(added));
        }
        msgs
    }

    fn walk(&self, dir: &Path, out: &mut Vec<SurfaceId>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| !should_ignore(&self.root, path))
            .collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.walk(&path, out);
            } else if let Some(surface) = self.surface_for(&path) {
                out.push(surface);
            }
        }
    }
}

impl PageView for DirectoryHost {
    fn surfaces(&self) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        self.walk(&self.root, &mut out);
        out
    }

    fn surfaces_within(&self, node: NodeId) -> Vec<SurfaceId> {
        let Some(path) = self.path_of(node) else {
            return Vec::new();
        };
        if path.is_dir() {
            let mut out = Vec::new();
            self.walk(&path, &mut out);
            out
        } else if path.is_file() && is_surface_path(&path) {
            vec![SurfaceId(node.0)]
        } else {
            Vec::new()
        }
    }

    fn closest_surface(&self, node: NodeId) -> Option<SurfaceId> {
        let path = self.path_of(node)?;
        (path.is_file() && is_surface_path(&path)).then_some(SurfaceId(node.0))
    }

    fn is_file_input(&self, _node: NodeId) -> bool {
        false
    }

    fn read(&self, surface: SurfaceId) -> Option<String> {
        let path = self.path_of(surface.node())?;
        std::fs::read_to_string(path).ok()
    }
}

impl PageHost for DirectoryHost {
    fn write(&mut self, surface: SurfaceId, text: &str) -> Result<(), HostError> {
        let path = self
            .path_of(surface.node())
            .ok_or(HostError::Detached(surface))?;
        if !path.is_file() {
            return Err(HostError::Detached(surface));
        }
        std::fs::write(&path, text)
            .map_err(|e| HostError::Io(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Rewrote image tags in {}", path.display());
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        eprintln!("{}", notice);
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        prompt_terminal(message, default)
    }
}

/// Ask on stderr, read one line from stdin.
///
/// An empty answer accepts `default`; end of input cancels.
pub fn prompt_terminal(message: &str, default: &str) -> Option<String> {
    eprint!("{} [{}] ", message, default);
    io::stderr().flush().ok()?;

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let answer = line.trim_end_matches(['\r', '\n']);
            if answer.trim().is_empty() {
                Some(default.to_string())
            } else {
                Some(answer.to_string())
            }
        }
    }
}

fn is_surface_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SURFACE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Check if a path should be ignored (hidden files, build artifacts, etc.)
fn should_ignore(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);

    for component in relative.components() {
        if let Component::Normal(name) = component {
            let name_str = name.to_string_lossy();

            if name_str.starts_with('.') {
                return true;
            }

            if matches!(
                name_str.as_ref(),
                "target" | "node_modules" | "__pycache__" | "Thumbs.db"
            ) {
                return true;
            }
        }
    }

    false
}

/// Debounced recursive watcher over the host root
struct DirectoryWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<DebouncedResult>,
    root: PathBuf,
}

impl DirectoryWatcher {
    /// Events are debounced with a 500ms delay to coalesce an editor's
    /// save-rename-write sequences into one change.
    fn new(root: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
        debouncer
            .watcher()
            .watch(&root, notify::RecursiveMode::Recursive)?;

        tracing::info!("Started file system watcher for: {}", root.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            root,
        })
    }

    /// Changed paths since the last call, deduplicated
    fn poll_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        if should_ignore(&self.root, &event.path) {
                            continue;
                        }
                        // Continuous events during active changes - wait for the final one
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        if !paths.contains(&event.path) {
                            paths.push(event.path);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("File system watcher error: {:?}", e);
                }
            }
        }

        if !paths.is_empty() {
            tracing::debug!("File system watcher detected {} changes", paths.len());
        }
        paths
    }
}
