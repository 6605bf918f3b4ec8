//! Image reference rewriting
//!
//! Two passes run on every scan:
//!
//! 1. Markdown image references pointing at uploaded images become sized
//!    `<img>` tags.
//! 2. Existing `<img>` tags pointing at uploaded images get their
//!    `width`/`height` replaced by the current width preference.
//!
//! Both passes are pure and idempotent: running the transformer on its own
//! output returns the same text.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

/// URL prefixes recognized as images uploaded to the hosting site
pub const RECOGNIZED_PREFIXES: &[&str] = &[
    "https://user-images.githubusercontent.com/",
    "https://private-user-images.githubusercontent.com/",
    "https://github.com/user-attachments/assets/",
];

/// Host part shared by every pattern below (must stay in sync with `RECOGNIZED_PREFIXES`)
macro_rules! upload_host {
    () => {
        r"https://(?:(?:private-)?user-images\.githubusercontent\.com|github\.com/user-attachments/assets)/"
    };
}

/// `![alt](url)` or `![alt](url "title")` for a recognized url
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"!\[([^\]\n]*)\]\(("#,
        upload_host!(),
        r#"[^)\s"'<>]+)(?:\s+"[^"\n]*")?\)"#
    ))
    .expect("markdown image pattern is valid")
});

/// Any `<img ...>` tag. Quoted attribute values are matched whole, so a `>`
/// inside one does not end the tag. Group 2 is everything up to the final `>`.
static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(<img)\b((?:"[^"]*"|'[^']*'|[^"'>])*)>"#)
        .expect("img tag pattern is valid")
});

/// `src=` attribute whose value starts with a recognized url
static UPLOAD_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r#"(?i:(?:^|\s)src\s*=\s*)["']?"#, upload_host!()))
        .expect("src pattern is valid")
});

/// `width=` / `height=` attribute in any quoting style, including leading whitespace
static SIZE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+(?:width|height)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+)"#)
        .expect("size attribute pattern is valid")
});

/// Result of one transformer pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutcome {
    /// Rewritten text
    pub text: String,
    /// At least one Markdown image reference was converted
    pub modified: bool,
    /// At least one existing tag had its size attributes rewritten
    pub normalized: bool,
}

impl TransformOutcome {
    /// Whether the output differs from the input at all
    pub fn changed(&self) -> bool {
        self.modified || self.normalized
    }
}

/// Run both passes over `text` using `width` pixels
pub fn transform(text: &str, width: u32) -> TransformOutcome {
    let (converted, modified) = convert_markdown_images(text, width);
    let (text, normalized) = normalize_image_tags(&converted, width);
    TransformOutcome {
        text,
        modified,
        normalized,
    }
}

/// True when `text` holds at least one convertible Markdown image reference
pub fn contains_markdown_image(text: &str) -> bool {
    MARKDOWN_IMAGE.is_match(text)
}

/// True when `url` starts with one of the recognized upload prefixes
pub fn is_recognized_url(url: &str) -> bool {
    RECOGNIZED_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Replace every recognized `![alt](url)` with a sized `<img>` tag.
///
/// Returns the new text and whether any replacement happened.
pub fn convert_markdown_images(text: &str, width: u32) -> (String, bool) {
    let mut count = 0usize;
    let replaced = MARKDOWN_IMAGE.replace_all(text, |caps: &Captures| {
        count += 1;
        format!(
            r#"<img src="{}" alt="{}" width="{}">"#,
            &caps[2],
            escape_attr(&caps[1]),
            width
        )
    });
    (replaced.into_owned(), count > 0)
}

/// Rewrite the size of every `<img>` whose `src` is a recognized upload.
///
/// Tags with other sources are returned byte-for-byte. Returns the new text
/// and whether any tag changed.
pub fn normalize_image_tags(text: &str, width: u32) -> (String, bool) {
    let mut changed = false;
    let replaced = IMG_TAG.replace_all(text, |caps: &Captures| {
        let original = &caps[0];
        let (body, close) = split_self_closing(&caps[2]);
        if !UPLOAD_SRC.is_match(body) {
            return original.to_string();
        }

        let stripped = SIZE_ATTR.replace_all(body, "");
        let body = strip_stray_slash(&stripped);
        let rewritten = format!(r#"{}{} width="{}"{}>"#, &caps[1], body, width, close);

        if rewritten != original {
            changed = true;
        }
        rewritten
    });
    (replaced.into_owned(), changed)
}

/// Split a trailing self-closing `/` (with the whitespace before it) off a tag body.
///
/// The slash only closes the tag after whitespace or a closing quote; glued to
/// an unquoted value it is part of that value (`src=https://host/9/`).
fn split_self_closing(body: &str) -> (&str, &str) {
    if let Some(rest) = body.strip_suffix('/') {
        let attrs = rest.trim_end();
        if attrs.len() < rest.len() || attrs.ends_with(['"', '\'']) {
            return body.split_at(attrs.len());
        }
    }
    (body, "")
}

/// Drop a `/` left dangling at the end of the attribute list once sizes are removed
fn strip_stray_slash(body: &str) -> &str {
    let body = body.trim_end();
    match body.strip_suffix('/') {
        Some(rest) if rest.ends_with(|c: char| c.is_whitespace() || c == '"' || c == '\'') => {
            rest.trim_end()
        }
        _ => body,
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
