//! Page chrome state driven by scroll, click and keyboard events
//!
//! Only the decisions live here (which style, which section, which element
//! gets focus). Applying them to the page is the host's job.

use crate::schedule::Throttle;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Scroll offset past which the header switches to its scrolled style
pub const HEADER_SCROLL_THRESHOLD: f64 = 100.0;
/// Offset added to the scroll position when picking the active section
pub const ACTIVE_SECTION_OFFSET: f64 = 100.0;
/// Gap kept between the header and a section scrolled into view
pub const SCROLL_TARGET_GAP: f64 = 20.0;
/// Scroll offset past which the scroll-to-top button appears
pub const SCROLL_TO_TOP_THRESHOLD: f64 = 300.0;
/// Share of an element that must be in view before it reveals
pub const REVEAL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    #[default]
    Resting,
    Scrolled,
}

impl HeaderStyle {
    pub fn for_scroll(scroll_y: f64) -> Self {
        if scroll_y > HEADER_SCROLL_THRESHOLD {
            HeaderStyle::Scrolled
        } else {
            HeaderStyle::Resting
        }
    }
}

/// Mobile navigation menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Hamburger click
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Returns true if the menu was open
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    pub fn on_nav_link_click(&mut self) -> bool {
        self.close()
    }

    /// Click anywhere outside the header
    pub fn on_outside_click(&mut self) -> bool {
        self.close()
    }

    pub fn on_escape(&mut self) -> bool {
        self.close()
    }
}

/// Anchor id the skip link jumps to
pub const MAIN_CONTENT_ID: &str = "main-content";

/// "Skip to main content" link, off screen until it has keyboard focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipLink {
    visible: bool,
}

impl SkipLink {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_focus(&mut self) {
        self.visible = true;
    }

    pub fn on_blur(&mut self) {
        self.visible = false;
    }

    pub fn target(&self) -> &'static str {
        MAIN_CONTENT_ID
    }
}

/// A page section nav links point at
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl Section {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }
}

/// Scroll position that brings a section just below the header
pub fn scroll_target(section_top: f64, header_height: f64) -> f64 {
    section_top - header_height - SCROLL_TARGET_GAP
}

/// Section whose nav link is highlighted at this scroll position
///
/// When sections overlap the last matching one wins.
pub fn active_section(sections: &[Section], scroll_y: f64) -> Option<&str> {
    let y = scroll_y + ACTIVE_SECTION_OFFSET;
    sections
        .iter()
        .filter(|s| y >= s.top && y < s.top + s.height)
        .last()
        .map(|s| s.id.as_str())
}

pub fn scroll_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > SCROLL_TO_TOP_THRESHOLD
}

/// Scroll-driven chrome, each handler throttled at its own rate
///
/// Header restyling runs at most every 16 ms; section highlight and the
/// scroll-to-top button at most every 100 ms.
#[derive(Debug)]
pub struct ScrollChrome {
    sections: Vec<Section>,
    header: HeaderStyle,
    active: Option<String>,
    scroll_to_top: bool,
    header_throttle: Throttle,
    highlight_throttle: Throttle,
    scroll_to_top_throttle: Throttle,
}

impl ScrollChrome {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            header: HeaderStyle::Resting,
            active: None,
            scroll_to_top: false,
            header_throttle: Throttle::new(Duration::from_millis(16)),
            highlight_throttle: Throttle::new(Duration::from_millis(100)),
            scroll_to_top_throttle: Throttle::new(Duration::from_millis(100)),
        }
    }

    /// Handle a scroll event; returns true if anything visible changed
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        let mut changed = false;

        if let Some(header) = self.header_throttle.call(|| HeaderStyle::for_scroll(scroll_y)) {
            changed |= header != self.header;
            self.header = header;
        }

        if self.highlight_throttle.try_fire() {
            // Between sections the previous highlight stays
            if let Some(id) = active_section(&self.sections, scroll_y) {
                if self.active.as_deref() != Some(id) {
                    self.active = Some(id.to_string());
                    changed = true;
                }
            }
        }

        if let Some(visible) = self
            .scroll_to_top_throttle
            .call(|| scroll_to_top_visible(scroll_y))
        {
            changed |= visible != self.scroll_to_top;
            self.scroll_to_top = visible;
        }

        changed
    }

    pub fn header(&self) -> HeaderStyle {
        self.header
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn scroll_to_top_visible(&self) -> bool {
        self.scroll_to_top
    }
}

/// One-shot visibility tracking for fade-in elements
///
/// An element reveals the first time enough of it is in view and is then
/// no longer observed.
#[derive(Debug, Default)]
pub struct RevealTracker {
    observed: HashSet<String>,
    revealed: HashSet<String>,
}

impl RevealTracker {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            observed: ids.into_iter().map(Into::into).collect(),
            revealed: HashSet::new(),
        }
    }

    /// Without intersection support everything is shown at once
    pub fn reveal_all(&mut self) {
        self.revealed.extend(self.observed.drain());
    }

    /// Returns true if this call revealed the element
    pub fn on_intersection(&mut self, id: &str, ratio: f64) -> bool {
        if ratio < REVEAL_THRESHOLD || !self.observed.remove(id) {
            return false;
        }
        self.revealed.insert(id.to_string());
        true
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn pending(&self) -> usize {
        self.observed.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded,
    /// Failed to load, hidden
    Hidden,
}

/// Lazy image loading state
#[derive(Debug, Default)]
pub struct LazyImages {
    images: HashMap<String, ImageState>,
}

impl LazyImages {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: sources
                .into_iter()
                .map(|src| (src.into(), ImageState::Pending))
                .collect(),
        }
    }

    /// Image entered the viewport; returns true if it was marked loaded
    pub fn on_intersection(&mut self, src: &str) -> bool {
        match self.images.get_mut(src) {
            Some(state) if *state == ImageState::Pending => {
                *state = ImageState::Loaded;
                true
            }
            _ => false,
        }
    }

    pub fn mark_failed(&mut self, src: &str) {
        if let Some(state) = self.images.get_mut(src) {
            tracing::warn!("Failed to load image: {}", src);
            *state = ImageState::Hidden;
        }
    }

    pub fn state(&self, src: &str) -> Option<ImageState> {
        self.images.get(src).copied()
    }
}

/// Element to focus after Tab (or Shift+Tab), wrapping at both ends
///
/// `current` is `None` when focus is outside the focusable list; forward
/// then goes to the first element, backward to the last.
pub fn next_focus_index(current: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (current.filter(|&i| i < len), backwards) {
        (Some(i), false) if i + 1 < len => i + 1,
        (_, false) => 0,
        (Some(i), true) if i > 0 => i - 1,
        (_, true) => len - 1,
    };
    Some(next)
}
