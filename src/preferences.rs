//! Width preference store
//!
//! The width is read on every scan and written only through the
//! "Set Image Width" command. Stores never cache: a write is visible to the
//! very next read.

use std::cell::Cell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::config::{ResizerConfig, DEFAULT_IMAGE_WIDTH};

/// Accessor/mutator pair for the persisted width
pub trait WidthStore {
    /// Current width, or the default when nothing valid is stored
    fn width(&self) -> u32;

    /// Persist a new width (already validated as positive)
    fn store_width(&mut self, width: u32) -> Result<(), String>;
}

/// In-memory store. Clones share the same value.
#[derive(Debug, Clone)]
pub struct MemoryWidthStore {
    width: Rc<Cell<u32>>,
}

impl MemoryWidthStore {
    pub fn new(width: u32) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
        }
    }
}

impl Default for MemoryWidthStore {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_WIDTH)
    }
}

impl WidthStore for MemoryWidthStore {
    fn width(&self) -> u32 {
        self.width.get()
    }

    fn store_width(&mut self, width: u32) -> Result<(), String> {
        self.width.set(width);
        Ok(())
    }
}

/// Store backed by the YAML config file, re-read on every access
#[derive(Debug, Clone)]
pub struct ConfigWidthStore {
    path: Option<PathBuf>,
}

impl ConfigWidthStore {
    /// Use the per-user config file
    pub fn new() -> Self {
        Self {
            path: crate::config_paths::config_file(),
        }
    }

    /// Use an explicit config file
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn load(&self) -> ResizerConfig {
        match &self.path {
            Some(path) => ResizerConfig::load_from(path),
            None => ResizerConfig::default(),
        }
    }
}

impl Default for ConfigWidthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WidthStore for ConfigWidthStore {
    fn width(&self) -> u32 {
        match self.load().image_width {
            0 => DEFAULT_IMAGE_WIDTH,
            width => width,
        }
    }

    fn store_width(&mut self, width: u32) -> Result<(), String> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| "No config directory available".to_string())?;
        let mut config = self.load();
        config.image_width = width;
        config.save_to(path)
    }
}

/// Why a width input was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidthError {
    /// No leading digits
    NotANumber,
    /// Zero or negative
    NotPositive,
    /// Too large for a pixel width
    TooLarge,
}

impl fmt::Display for WidthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "not a number"),
            Self::NotPositive => write!(f, "width must be positive"),
            Self::TooLarge => write!(f, "width is too large"),
        }
    }
}

impl std::error::Error for WidthError {}

/// User-facing acknowledgement of a width command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    WidthSet(u32),
    InvalidWidth,
    StoreFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthSet(width) => write!(f, "Image width set to {}px", width),
            Self::InvalidWidth => write!(f, "Invalid width."),
            Self::StoreFailed(reason) => write!(f, "Could not save image width: {}", reason),
        }
    }
}

/// Parse a width typed by the user.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// run of digits is used; anything after it is ignored, so `"250px"` is 250
/// and `"3.9"` is 3.
pub fn parse_width(input: &str) -> Result<u32, WidthError> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(WidthError::NotANumber);
    }
    let digits = &rest[..digits_len];

    if negative {
        return Err(WidthError::NotPositive);
    }

    match digits.parse::<u32>() {
        Ok(0) => Err(WidthError::NotPositive),
        Ok(width) => Ok(width),
        Err(_) => Err(WidthError::TooLarge),
    }
}

/// Validate `input` and persist it, returning the acknowledgement to show.
///
/// The store is untouched unless validation succeeds.
pub fn set_width(store: &mut dyn WidthStore, input: &str) -> Notice {
    let width = match parse_width(input) {
        Ok(width) => width,
        Err(e) => {
            tracing::info!("Rejected image width {:?}: {}", input, e);
            return Notice::InvalidWidth;
        }
    };

    match store.store_width(width) {
        Ok(()) => {
            tracing::info!("Image width set to {}px", width);
            Notice::WidthSet(width)
        }
        Err(e) => {
            tracing::warn!("Failed to store image width: {}", e);
            Notice::StoreFailed(e)
        }
    }
}
