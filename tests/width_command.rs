//! "Set Image Width" command and width preference tests

mod common;

use common::{md, ms, slow_poll, tag, test_runtime_with, ATTACHMENT, USER_IMAGE};
use image_resizer::commands::CommandId;
use image_resizer::config::WritePolicy;
use image_resizer::host::sim::SimulatedPage;
use image_resizer::preferences::{MemoryWidthStore, Notice, WidthStore};
use image_resizer::Msg;

#[test]
fn test_command_prompts_with_current_width() {
    let mut page = SimulatedPage::new();
    page.answer_next_prompt(None);
    let store = MemoryWidthStore::new(275);
    let mut rt = test_runtime_with(page, store, slow_poll(), WritePolicy::AnyChange);

    rt.dispatch(Msg::InvokeCommand(CommandId::SetImageWidth));

    assert_eq!(rt.host().prompts().len(), 1);
    assert!(rt.host().prompts()[0].ends_with("[275]"));
    // Cancelling shows nothing and keeps the width
    assert!(rt.host().notices().is_empty());
    assert_eq!(rt.model().width(), 275);
}

#[test]
fn test_valid_width_is_stored_and_acknowledged() {
    let mut page = SimulatedPage::new();
    page.answer_next_prompt(Some("480"));
    let store = MemoryWidthStore::default();
    let mut rt = test_runtime_with(page, store.clone(), slow_poll(), WritePolicy::AnyChange);

    rt.dispatch(Msg::InvokeCommand(CommandId::SetImageWidth));

    assert_eq!(rt.host().notices(), &[Notice::WidthSet(480)]);
    assert_eq!(store.width(), 480);
}

#[test]
fn test_invalid_width_leaves_state_untouched() {
    let mut page = SimulatedPage::new();
    let s = page.add_surface(page.root(), &format!(r#"<img src="{}" width="300">"#, ATTACHMENT));
    page.answer_next_prompt(Some("wide"));
    page.answer_next_prompt(Some("0"));
    let store = MemoryWidthStore::default();
    let mut rt = test_runtime_with(page, store.clone(), slow_poll(), WritePolicy::AnyChange);
    rt.start();

    rt.dispatch(Msg::InvokeCommand(CommandId::SetImageWidth));
    rt.dispatch(Msg::InvokeCommand(CommandId::SetImageWidth));
    rt.run_due();

    assert_eq!(
        rt.host().notices(),
        &[Notice::InvalidWidth, Notice::InvalidWidth]
    );
    assert_eq!(store.width(), 300);
    assert_eq!(rt.host().write_count(s), 0);
}

#[test]
fn test_new_width_resyncs_existing_tags() {
    let mut page = SimulatedPage::new();
    let s = page.add_surface(page.root(), &md("a", USER_IMAGE));
    let mut rt = test_runtime_with(
        page,
        MemoryWidthStore::default(),
        slow_poll(),
        WritePolicy::AnyChange,
    );
    rt.start();
    assert_eq!(rt.host().content(s), Some(tag(USER_IMAGE, "a", 300).as_str()));

    rt.dispatch(Msg::SetWidth("640px".to_string()));
    rt.run_due();

    assert_eq!(rt.host().content(s), Some(tag(USER_IMAGE, "a", 640).as_str()));
    assert_eq!(rt.host().notices(), &[Notice::WidthSet(640)]);
}

#[test]
fn test_width_change_visible_to_next_scan() {
    let mut page = SimulatedPage::new();
    let s = page.add_surface(page.root(), "");
    let store = MemoryWidthStore::default();
    let mut rt = test_runtime_with(
        page,
        store.clone(),
        Default::default(),
        WritePolicy::MarkdownOnly,
    );
    rt.start();

    // Changed behind the engine's back; no cache to invalidate
    let mut handle = store.clone();
    handle.store_width(128).unwrap();

    rt.host_mut().set_value(s, &md("n", ATTACHMENT));
    rt.advance(ms(800));

    assert_eq!(rt.host().content(s), Some(tag(ATTACHMENT, "n", 128).as_str()));
}
