//! Domain types for slide aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// One rendered HTML fragment representing a single presentation frame.
///
/// The aggregator never looks inside a slide; it only orders and groups them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slide(String);

impl Slide {
    /// Create a slide from an HTML fragment.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// The HTML fragment.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the slide, returning its HTML.
    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Slide {
    fn from(html: String) -> Self {
        Self(html)
    }
}

impl From<&str> for Slide {
    fn from(html: &str) -> Self {
        Self(html.to_string())
    }
}

/// Ordered, append-only list of slides. Render order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideSequence {
    slides: Vec<Slide>,
}

impl SlideSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a slide at the end.
    pub fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    pub fn as_slice(&self) -> &[Slide] {
        &self.slides
    }

    /// Move all slides out, leaving the sequence empty.
    pub fn take(&mut self) -> Vec<Slide> {
        std::mem::take(&mut self.slides)
    }

    pub fn clear(&mut self) {
        self.slides.clear();
    }
}

impl Index<usize> for SlideSequence {
    type Output = Slide;

    fn index(&self, index: usize) -> &Slide {
        &self.slides[index]
    }
}

impl<'a> IntoIterator for &'a SlideSequence {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

impl IntoIterator for SlideSequence {
    type Item = Slide;
    type IntoIter = std::vec::IntoIter<Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.into_iter()
    }
}

impl FromIterator<Slide> for SlideSequence {
    fn from_iter<I: IntoIterator<Item = Slide>>(iter: I) -> Self {
        Self {
            slides: iter.into_iter().collect(),
        }
    }
}

/// Current nesting depth of slide scopes. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NestingDepth(u32);

impl NestingDepth {
    /// Deepest nesting allowed: a slide inside a slide inside a presentation.
    pub const MAX: u32 = 2;

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_top_level(self) -> bool {
        self.0 == 0
    }

    /// Whether the depth is past [`NestingDepth::MAX`].
    pub fn exceeded(self) -> bool {
        self.0 > Self::MAX
    }

    pub(crate) fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    pub(crate) fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }
}

impl fmt::Display for NestingDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a presentation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Closed,
    Open,
}

/// Metadata handed to the document template alongside the slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckMeta {
    /// Base URL of the reveal.js distribution.
    pub cdn: String,

    /// reveal.js version string appended to the CDN URL.
    pub version: String,
}
