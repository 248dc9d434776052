//! Slide aggregation, reveal.js presentation building, and output capture
//! helpers for notebook workflows.

pub mod aggregator;
pub mod capture;
pub mod error;
pub mod figure;
pub mod html;
pub mod naming;
pub mod presentation;
pub mod store;
pub mod template;
pub mod timer;
pub mod types;

pub use aggregator::{wrap_sections, FinishedDeck, NestedScope, SessionLock, SlideAggregator};
pub use capture::{Captured, Destination, Redirect, Suppress};
pub use error::{ContextError, Error, Result};
pub use figure::{FigureRenderer, FigureSlot};
pub use html::{escape_text, side_by_side, slide_tag, HtmlBuffer, HtmlRepr, ListKind};
pub use presentation::{Presentation, PresentationConfig, SlideContext};
pub use store::{DocumentStore, FileStore};
pub use template::{DocumentTemplate, RevealTemplate};
pub use timer::{Runtime, Timer};
pub use types::{DeckMeta, NestingDepth, Slide, SlideSequence};
