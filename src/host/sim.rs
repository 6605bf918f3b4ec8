//! In-memory page for tests and embedding
//!
//! A tree of nodes rooted at a body element. Surfaces hold text and a caret.
//! Programmatic writes ([`SimulatedPage::set_value`] and [`PageHost::write`])
//! emit no signals, the same way assigning a text area's value does not;
//! callers dispatch whatever signal their scenario needs.

use std::collections::{BTreeMap, VecDeque};

use super::{HostError, NodeId, PageHost, PageView, SurfaceId};
use crate::preferences::Notice;

#[derive(Debug, Clone)]
enum NodeKind {
    Element,
    FileInput,
    Surface { content: String, caret: usize },
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Simulated page
#[derive(Debug)]
pub struct SimulatedPage {
    nodes: BTreeMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    writes: Vec<(SurfaceId, String)>,
    notices: Vec<Notice>,
    prompts: Vec<String>,
    prompt_answers: VecDeque<Option<String>>,
}

impl Default for SimulatedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPage {
    /// Empty page with only a body node
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root,
            Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Element,
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            writes: Vec::new(),
            notices: Vec::new(),
            prompts: Vec::new(),
            prompt_answers: VecDeque::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // === Building ===

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                parent: None,
                children: Vec::new(),
                kind,
            },
        );
        id
    }

    /// Detached element, to be filled and inserted later with [`Self::append`]
    pub fn create_element(&mut self) -> NodeId {
        self.create(NodeKind::Element)
    }

    /// Detached surface
    pub fn create_surface(&mut self, content: &str) -> SurfaceId {
        let id = self.create(NodeKind::Surface {
            content: content.to_string(),
            caret: content.chars().count(),
        });
        SurfaceId(id.0)
    }

    /// Move `child` under `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    pub fn add_element(&mut self, parent: NodeId) -> NodeId {
        let id = self.create_element();
        self.append(parent, id);
        id
    }

    pub fn add_file_input(&mut self, parent: NodeId) -> NodeId {
        let id = self.create(NodeKind::FileInput);
        self.append(parent, id);
        id
    }

    pub fn add_surface(&mut self, parent: NodeId, content: &str) -> SurfaceId {
        let id = self.create_surface(content);
        self.append(parent, id.node());
        id
    }

    /// Take `node` (and its subtree) off the page
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&c| c != node);
        }
    }

    // === Editing ===

    /// Assign content directly, as an upload completing would. Caret moves to the end.
    pub fn set_value(&mut self, surface: SurfaceId, text: &str) {
        if let Some(NodeKind::Surface { content, caret }) = self.kind_mut(surface.node()) {
            *content = text.to_string();
            *caret = text.chars().count();
        }
    }

    /// Insert text at the caret, as typing or pasting would
    pub fn type_text(&mut self, surface: SurfaceId, text: &str) {
        if let Some(NodeKind::Surface { content, caret }) = self.kind_mut(surface.node()) {
            let byte = content
                .char_indices()
                .nth(*caret)
                .map_or(content.len(), |(i, _)| i);
            content.insert_str(byte, text);
            *caret += text.chars().count();
        }
    }

    pub fn set_caret(&mut self, surface: SurfaceId, position: usize) {
        if let Some(NodeKind::Surface { content, caret }) = self.kind_mut(surface.node()) {
            *caret = position.min(content.chars().count());
        }
    }

    /// Caret position in characters
    pub fn caret(&self, surface: SurfaceId) -> Option<usize> {
        match self.nodes.get(&surface.node()).map(|n| &n.kind) {
            Some(NodeKind::Surface { caret, .. }) => Some(*caret),
            _ => None,
        }
    }

    /// Content regardless of whether the surface is still attached
    pub fn content(&self, surface: SurfaceId) -> Option<&str> {
        match self.nodes.get(&surface.node()).map(|n| &n.kind) {
            Some(NodeKind::Surface { content, .. }) => Some(content),
            _ => None,
        }
    }

    fn kind_mut(&mut self, node: NodeId) -> Option<&mut NodeKind> {
        self.nodes.get_mut(&node).map(|n| &mut n.kind)
    }

    // === User interaction ===

    /// Queue the answer for the next prompt (`None` = cancel)
    pub fn answer_next_prompt(&mut self, answer: Option<&str>) {
        self.prompt_answers.push_back(answer.map(str::to_string));
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Prompt messages shown so far, with their pre-filled default
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    // === Inspection ===

    /// Every write-back in order
    pub fn writes(&self) -> &[(SurfaceId, String)] {
        &self.writes
    }

    pub fn write_count(&self, surface: SurfaceId) -> usize {
        self.writes.iter().filter(|(s, _)| *s == surface).count()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn collect_surfaces(&self, node: NodeId, out: &mut Vec<SurfaceId>) {
        let Some(n) = self.nodes.get(&node) else {
            return;
        };
        if matches!(n.kind, NodeKind::Surface { .. }) {
            out.push(SurfaceId(node.0));
        }
        for &child in &n.children {
            self.collect_surfaces(child, out);
        }
    }
}

impl PageView for SimulatedPage {
    fn surfaces(&self) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        self.collect_surfaces(self.root, &mut out);
        out
    }

    fn surfaces_within(&self, node: NodeId) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        if self.is_attached(node) {
            self.collect_surfaces(node, &mut out);
        }
        out
    }

    fn closest_surface(&self, node: NodeId) -> Option<SurfaceId> {
        if !self.is_attached(node) {
            return None;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            let n = self.nodes.get(&id)?;
            if matches!(n.kind, NodeKind::Surface { .. }) {
                return Some(SurfaceId(id.0));
            }
            current = n.parent;
        }
        None
    }

    fn is_file_input(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(&node).map(|n| &n.kind),
            Some(NodeKind::FileInput)
        )
    }

    fn read(&self, surface: SurfaceId) -> Option<String> {
        if !self.is_attached(surface.node()) {
            return None;
        }
        self.content(surface).map(str::to_string)
    }
}

impl PageHost for SimulatedPage {
    fn write(&mut self, surface: SurfaceId, text: &str) -> Result<(), HostError> {
        if !self.is_attached(surface.node()) {
            return Err(HostError::Detached(surface));
        }
        let Some(NodeKind::Surface { content, caret }) = self.kind_mut(surface.node()) else {
            return Err(HostError::Detached(surface));
        };

        *caret = remap_caret(content, text, *caret);
        *content = text.to_string();

        self.writes.push((surface, text.to_string()));
        Ok(())
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        self.prompts.push(format!("{} [{}]", message, default));
        self.prompt_answers.pop_front().flatten()
    }
}

/// Carry a caret across a rewrite of `old` into `new`.
///
/// A caret at the end stays at the end. A caret in the unchanged prefix keeps
/// its offset; one in the unchanged suffix keeps its distance from the end.
/// A caret inside the rewritten span lands just after the replacement.
fn remap_caret(old: &str, new: &str, caret: usize) -> usize {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let (old_len, new_len) = (old_chars.len(), new_chars.len());
    if caret >= old_len {
        return new_len;
    }

    let prefix = old_chars
        .iter()
        .zip(&new_chars)
        .take_while(|(a, b)| a == b)
        .count();
    if caret <= prefix {
        return caret;
    }

    let max_suffix = old_len.min(new_len) - prefix;
    let suffix = old_chars
        .iter()
        .rev()
        .zip(new_chars.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    let from_end = old_len - caret;
    if from_end <= suffix {
        new_len - from_end
    } else {
        new_len - suffix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces_in_document_order() {
        let mut page = SimulatedPage::new();
        let form = page.add_element(page.root());
        let a = page.add_surface(form, "a");
        let b = page.add_surface(page.root(), "b");

        assert_eq!(page.surfaces(), vec![a, b]);
    }

    #[test]
    fn test_removed_subtree_is_unreadable() {
        let mut page = SimulatedPage::new();
        let form = page.add_element(page.root());
        let s = page.add_surface(form, "text");

        page.remove(form);

        assert!(page.surfaces().is_empty());
        assert_eq!(page.read(s), None);
        assert_eq!(page.content(s), Some("text"));
        assert_eq!(page.write(s, "x"), Err(HostError::Detached(s)));
    }

    #[test]
    fn test_surfaces_within_includes_self() {
        let mut page = SimulatedPage::new();
        let s = page.add_surface(page.root(), "");
        assert_eq!(page.surfaces_within(s.node()), vec![s]);
    }

    #[test]
    fn test_closest_surface_walks_up() {
        let mut page = SimulatedPage::new();
        let s = page.add_surface(page.root(), "");
        let inner = page.add_element(s.node());
        let outside = page.add_element(page.root());

        assert_eq!(page.closest_surface(inner), Some(s));
        assert_eq!(page.closest_surface(outside), None);
    }

    #[test]
    fn test_type_text_inserts_at_caret() {
        let mut page = SimulatedPage::new();
        let s = page.add_surface(page.root(), "héllo");
        page.set_caret(s, 1);
        page.type_text(s, "XY");

        assert_eq!(page.content(s), Some("hXYéllo"));
        assert_eq!(page.caret(s), Some(3));
    }

    #[test]
    fn test_write_keeps_caret_at_end() {
        let mut page = SimulatedPage::new();
        let s = page.add_surface(page.root(), "abc");
        page.write(s, "abcdef").unwrap();
        assert_eq!(page.caret(s), Some(6));

        page.set_caret(s, 2);
        page.write(s, "a").unwrap();
        assert_eq!(page.caret(s), Some(1));
    }

    #[test]
    fn test_write_keeps_caret_in_unchanged_text() {
        let mut page = SimulatedPage::new();
        let s = page.add_surface(page.root(), "one [x] two");

        // Before the rewritten span
        page.set_caret(s, 2);
        page.write(s, "one [xyz] two").unwrap();
        assert_eq!(page.caret(s), Some(2));

        // After it: distance from the end is kept
        page.set_caret(s, 11);
        page.write(s, "one [x] two").unwrap();
        assert_eq!(page.caret(s), Some(9));
    }

    #[test]
    fn test_remap_caret_inside_rewrite_goes_after_replacement() {
        assert_eq!(remap_caret("a[bc]d", "a<tag>d", 3), 6);
        assert_eq!(remap_caret("", "x", 0), 1);
        assert_eq!(remap_caret("ééx", "éyx", 2), 2);
    }

    #[test]
    fn test_prompt_answers_in_order() {
        let mut page = SimulatedPage::new();
        page.answer_next_prompt(Some("10"));
        page.answer_next_prompt(None);

        assert_eq!(page.prompt("w?", "300"), Some("10".to_string()));
        assert_eq!(page.prompt("w?", "10"), None);
        assert_eq!(page.prompt("w?", "10"), None);
        assert_eq!(page.prompts().len(), 3);
    }
}
