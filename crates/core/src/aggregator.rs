//! Nesting-aware slide aggregation.
//!
//! Slides submitted at the top level are appended to the deck as-is. Slides
//! submitted inside nested scopes are buffered, and when the outermost nested
//! scope closes the buffer is folded into a single vertical stack of
//! `<section>` panels appended as one deck entry.

use crate::error::{ContextError, Result};
use crate::store::DocumentStore;
use crate::template::DocumentTemplate;
use crate::types::{DeckMeta, NestingDepth, SessionState, Slide, SlideSequence};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL_SESSION_LOCK: LazyLock<SessionLock> = LazyLock::new(SessionLock::new);

/// Separator placed between panels of a nested stack.
const SECTION_SEPARATOR: &str = "\n</section>\n<section>\n    ";

/// Guard flag allowing at most one open presentation per lock.
///
/// [`SessionLock::global`] is shared by the whole process. Independent locks
/// can be created for callers that need isolated sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionLock {
    active: Arc<AtomicBool>,
}

impl SessionLock {
    /// Create a fresh, unheld lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide lock.
    pub fn global() -> Self {
        GLOBAL_SESSION_LOCK.clone()
    }

    /// Whether some session currently holds this lock.
    pub fn is_held(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn try_acquire(&self) -> bool {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Output of a successfully closed session.
#[derive(Debug, Clone)]
pub struct FinishedDeck {
    /// Where the rendered document was written.
    pub path: PathBuf,

    /// The flattened slides, in render order.
    pub slides: SlideSequence,
}

/// Join fragments into a vertical stack of `<section>` panels.
///
/// Returns an empty slide for an empty input.
pub fn wrap_sections(fragments: &[Slide]) -> Slide {
    if fragments.is_empty() {
        return Slide::default();
    }

    let joined = fragments
        .iter()
        .map(Slide::as_str)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);

    Slide::new(format!("<section>\n    {}\n</section>\n", joined))
}

/// Accumulates slide fragments for one presentation at a time.
#[derive(Debug)]
pub struct SlideAggregator {
    lock: SessionLock,
    state: SessionState,
    slides: SlideSequence,
    pending: Vec<Slide>,
    depth: NestingDepth,
}

impl SlideAggregator {
    /// Create a closed aggregator guarded by `lock`.
    pub fn new(lock: SessionLock) -> Self {
        Self {
            lock,
            state: SessionState::Closed,
            slides: SlideSequence::new(),
            pending: Vec::new(),
            depth: NestingDepth::default(),
        }
    }

    /// Open a session.
    ///
    /// Fails with [`ContextError::SessionAlreadyOpen`] if this aggregator, or
    /// any other aggregator sharing the lock, already has a session open. The
    /// open session is left untouched.
    pub fn begin_session(&mut self) -> Result<()> {
        if self.state == SessionState::Open || !self.lock.try_acquire() {
            return Err(ContextError::SessionAlreadyOpen.into());
        }

        self.slides.clear();
        self.pending.clear();
        self.depth = NestingDepth::default();
        self.state = SessionState::Open;
        log::debug!("Presentation session opened");
        Ok(())
    }

    /// Render the deck, persist it under `name`, and close the session.
    ///
    /// If rendering or persisting fails the session stays open so the caller
    /// can retry or [`destroy`](Self::destroy) it.
    pub fn end_session(
        &mut self,
        template: &dyn DocumentTemplate,
        meta: &DeckMeta,
        store: &dyn DocumentStore,
        name: &str,
    ) -> Result<FinishedDeck> {
        self.ensure_open()?;

        if !self.depth.is_top_level() || !self.pending.is_empty() {
            log::warn!(
                "Closing presentation with {} unclosed nested scope(s); flushing {} pending slide(s)",
                self.depth,
                self.pending.len()
            );
            self.depth = NestingDepth::default();
            self.flush_pending();
        }

        let html = template.render(&self.slides, meta)?;
        let path = store.write(name, &html)?;

        let slides = std::mem::take(&mut self.slides);
        self.close();
        log::debug!("Presentation session closed: {} slide(s) -> {}", slides.len(), path.display());

        Ok(FinishedDeck { path, slides })
    }

    /// Enter a nested scope.
    ///
    /// The depth is incremented even when this fails with
    /// [`ContextError::DepthExceeded`], so the matching
    /// [`exit_nested_scope`](Self::exit_nested_scope) keeps the count balanced.
    pub fn enter_nested_scope(&mut self) -> Result<()> {
        self.depth.increment();
        if self.depth.exceeded() {
            return Err(ContextError::DepthExceeded {
                depth: self.depth.get(),
            }
            .into());
        }
        Ok(())
    }

    /// Leave a nested scope, folding buffered slides into the deck once the
    /// outermost scope closes.
    pub fn exit_nested_scope(&mut self) {
        if self.depth.is_top_level() {
            log::warn!("exit_nested_scope called at top level; ignoring");
            return;
        }

        self.depth.decrement();
        if self.depth.is_top_level() {
            self.flush_pending();
        }
    }

    /// Enter a nested scope that is exited when the returned guard drops.
    ///
    /// On failure the scope is exited immediately and no guard is returned.
    pub fn nested(&mut self) -> Result<NestedScope<'_>> {
        if let Err(e) = self.enter_nested_scope() {
            self.exit_nested_scope();
            return Err(e);
        }
        Ok(NestedScope { aggregator: self })
    }

    /// Submit a slide at the current depth.
    pub fn submit(&mut self, fragment: impl Into<Slide>) -> Result<()> {
        self.ensure_open()?;

        let fragment = fragment.into();
        if self.depth.is_top_level() {
            self.slides.push(fragment);
        } else {
            self.pending.push(fragment);
        }
        Ok(())
    }

    /// Submit a slide ahead of everything buffered in the current nested
    /// stack. At the top level this is the same as [`submit`](Self::submit).
    pub fn submit_leading(&mut self, fragment: impl Into<Slide>) -> Result<()> {
        self.ensure_open()?;

        let fragment = fragment.into();
        if self.depth.is_top_level() {
            self.slides.push(fragment);
        } else {
            self.pending.insert(0, fragment);
        }
        Ok(())
    }

    /// Slides flattened so far, in render order.
    pub fn slides(&self) -> &SlideSequence {
        &self.slides
    }

    pub fn depth(&self) -> NestingDepth {
        self.depth
    }

    /// Number of slides buffered in the currently open nested stack.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Drop all state and release the session lock.
    pub fn destroy(&mut self) {
        self.slides.clear();
        self.pending.clear();
        self.depth = NestingDepth::default();
        if self.is_open() {
            log::debug!("Presentation session destroyed");
        }
        self.close();
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ContextError::NoActiveSession.into())
        }
    }

    fn flush_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let composite = wrap_sections(&self.pending);
        self.pending.clear();
        self.slides.push(composite);
    }

    fn close(&mut self) {
        if self.state == SessionState::Open {
            self.lock.release();
        }
        self.state = SessionState::Closed;
    }
}

impl Default for SlideAggregator {
    fn default() -> Self {
        Self::new(SessionLock::global())
    }
}

impl Drop for SlideAggregator {
    fn drop(&mut self) {
        if self.is_open() {
            log::warn!("Presentation dropped while open; releasing session");
            self.close();
        }
    }
}

/// A nested slide scope, exited when dropped.
///
/// Dereferences to the aggregator so slides can be submitted through it.
#[derive(Debug)]
pub struct NestedScope<'a> {
    aggregator: &'a mut SlideAggregator,
}

impl Deref for NestedScope<'_> {
    type Target = SlideAggregator;

    fn deref(&self) -> &SlideAggregator {
        self.aggregator
    }
}

impl DerefMut for NestedScope<'_> {
    fn deref_mut(&mut self) -> &mut SlideAggregator {
        self.aggregator
    }
}

impl Drop for NestedScope<'_> {
    fn drop(&mut self) {
        self.aggregator.exit_nested_scope();
    }
}
