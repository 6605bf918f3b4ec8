//! Sync engine over a directory of Markdown files

mod common;

use std::fs;

use common::{md, ms, tag, ATTACHMENT, USER_IMAGE};
use image_resizer::config::{ResizerConfig, WritePolicy};
use image_resizer::host::files::DirectoryHost;
use image_resizer::host::{NodeId, PageView};
use image_resizer::preferences::ConfigWidthStore;
use image_resizer::{Msg, Runtime, SyncModel};
use tempfile::tempdir;

fn directory_runtime(root: &std::path::Path, config: &ResizerConfig) -> Runtime<DirectoryHost> {
    let config_path = root.join(".config").join("config.yaml");
    config.save_to(&config_path).expect("config should save");
    let store = ConfigWidthStore::at(config_path);
    let model = SyncModel::from_config(config, Box::new(store));
    Runtime::new(model, DirectoryHost::new(root.to_path_buf()))
}

#[test]
fn test_startup_rewrites_existing_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let note = dir.path().join("note.md");
    fs::write(&note, md("shot", USER_IMAGE)).unwrap();

    let config = ResizerConfig {
        image_width: 420,
        ..ResizerConfig::default()
    };
    let mut rt = directory_runtime(dir.path(), &config);
    rt.start();

    assert_eq!(fs::read_to_string(&note).unwrap(), tag(USER_IMAGE, "shot", 420));
    // The hidden config directory is not a surface
    assert_eq!(rt.model().surfaces.len(), 1);
}

#[test]
fn test_poll_picks_up_external_edit() {
    let dir = tempdir().expect("Failed to create temp dir");
    let note = dir.path().join("note.md");
    fs::write(&note, "draft").unwrap();

    let mut rt = directory_runtime(dir.path(), &ResizerConfig::default());
    rt.start();

    fs::write(&note, format!("draft\n{}", md("a", ATTACHMENT))).unwrap();
    rt.advance(ms(800));

    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        format!("draft\n{}", tag(ATTACHMENT, "a", 300))
    );
}

#[test]
fn test_new_directory_is_discovered() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut rt = directory_runtime(dir.path(), &ResizerConfig::default());
    rt.start();
    assert!(rt.model().surfaces.is_empty());

    let sub = dir.path().join("issues");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("42.md"), md("bug", USER_IMAGE)).unwrap();

    // What the watcher reports for a freshly created directory
    let node = rt.host().surface_for(&sub).map(|s| s.node());
    assert_eq!(node, None);
    let dir_node = rt.host().surfaces_within(NodeId(0));
    assert_eq!(dir_node.len(), 1);

    rt.dispatch(Msg::NodesAdded(vec![NodeId(0)]));

    assert_eq!(rt.model().surfaces.len(), 1);
    assert_eq!(
        fs::read_to_string(sub.join("42.md")).unwrap(),
        tag(USER_IMAGE, "bug", 300)
    );
}

#[test]
fn test_deleted_file_goes_inert() {
    let dir = tempdir().expect("Failed to create temp dir");
    let note = dir.path().join("gone.md");
    fs::write(&note, "x").unwrap();

    let config = ResizerConfig {
        write_policy: WritePolicy::MarkdownOnly,
        ..ResizerConfig::default()
    };
    let mut rt = directory_runtime(dir.path(), &config);
    rt.start();

    fs::remove_file(&note).unwrap();
    rt.advance(ms(2_000));

    assert_eq!(rt.model().active_detectors(), 0);
    assert_eq!(rt.next_due(), None);
}

#[test]
fn test_recreated_file_is_monitored_again() {
    let dir = tempdir().expect("Failed to create temp dir");
    let note = dir.path().join("note.md");
    fs::write(&note, "x").unwrap();

    let mut rt = directory_runtime(dir.path(), &ResizerConfig::default());
    rt.start();
    let surface = rt.host().surface_for(&note).expect("markdown file is a surface");

    fs::remove_file(&note).unwrap();
    rt.advance(ms(800));
    assert_eq!(rt.model().active_detectors(), 0);

    // Same path, same id: what a branch switch looks like to the watcher
    fs::write(&note, md("a", USER_IMAGE)).unwrap();
    rt.dispatch(Msg::SurfaceMutated(surface));

    assert_eq!(fs::read_to_string(&note).unwrap(), tag(USER_IMAGE, "a", 300));
    assert_eq!(rt.model().active_detectors(), 1);

    // Polling resumed too
    fs::write(&note, md("b", ATTACHMENT)).unwrap();
    rt.advance(ms(800));
    assert_eq!(fs::read_to_string(&note).unwrap(), tag(ATTACHMENT, "b", 300));
}
