//! Presentation host: owns the aggregator and its collaborators.
//!
//! ```no_run
//! use std::fmt::Write;
//! use nbkit_core::{Presentation, PresentationConfig};
//!
//! let mut deck = Presentation::open(PresentationConfig::default())?;
//! deck.slide(|s| {
//!     writeln!(s, "Quarterly numbers")?;
//!     s.slide(|detail| {
//!         detail.set_figure("<svg></svg>");
//!         Ok(())
//!     });
//!     Ok(())
//! });
//! let path = deck.finish()?;
//! # Ok::<(), nbkit_core::Error>(())
//! ```

use crate::aggregator::{FinishedDeck, SessionLock, SlideAggregator};
use crate::error::{ContextError, Error, Result};
use crate::figure::{FigureRenderer, FigureSlot};
use crate::html::{slide_tag, HtmlBuffer, HtmlRepr, ListKind};
use crate::naming::default_presentation_name;
use crate::store::{DocumentStore, FileStore};
use crate::template::{DocumentTemplate, RevealTemplate};
use crate::types::{DeckMeta, Slide, SlideSequence};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::Location;
use std::path::{Path, PathBuf};

/// Default reveal.js CDN base URL.
pub const DEFAULT_CDN: &str = "https://cdn.jsdelivr.net/reveal.js";

/// Default reveal.js version.
pub const DEFAULT_REVEAL_VERSION: &str = "2.6.2";

/// Settings for a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Output file name. Generated when `None`.
    pub name: Option<String>,

    /// reveal.js CDN base URL.
    pub cdn: String,

    /// reveal.js version.
    pub version: String,

    /// Directory the document is written to.
    pub output_dir: PathBuf,

    /// Page title.
    pub title: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            name: None,
            cdn: DEFAULT_CDN.to_string(),
            version: DEFAULT_REVEAL_VERSION.to_string(),
            output_dir: PathBuf::from("."),
            title: "Presentation".to_string(),
        }
    }
}

impl PresentationConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

/// A slide deck being built, from open to [`finish`](Presentation::finish).
pub struct Presentation {
    name: String,
    meta: DeckMeta,
    aggregator: SlideAggregator,
    template: Box<dyn DocumentTemplate>,
    store: Box<dyn DocumentStore>,
    finished: Option<FinishedDeck>,
}

impl Presentation {
    /// Open a presentation on the process-wide session lock, rendering with
    /// [`RevealTemplate`] into `config.output_dir`.
    pub fn open(config: PresentationConfig) -> Result<Self> {
        Self::open_on(config, SessionLock::global())
    }

    /// Like [`open`](Self::open), guarded by `lock` instead of the
    /// process-wide lock.
    pub fn open_on(config: PresentationConfig, lock: SessionLock) -> Result<Self> {
        let template = RevealTemplate::new().with_title(config.title.clone());
        let store = FileStore::new(&config.output_dir);
        Self::open_with(config, lock, Box::new(template), Box::new(store))
    }

    /// Open a presentation with explicit collaborators.
    ///
    /// Fails with [`ContextError::SessionAlreadyOpen`] if `lock` is held.
    pub fn open_with(
        config: PresentationConfig,
        lock: SessionLock,
        template: Box<dyn DocumentTemplate>,
        store: Box<dyn DocumentStore>,
    ) -> Result<Self> {
        let mut aggregator = SlideAggregator::new(lock);
        aggregator.begin_session()?;

        let name = config.name.unwrap_or_else(default_presentation_name);
        log::debug!("Opened presentation {}", name);

        Ok(Self {
            name,
            meta: DeckMeta {
                cdn: config.cdn,
                version: config.version,
            },
            aggregator,
            template,
            store,
            finished: None,
        })
    }

    /// Output file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &DeckMeta {
        &self.meta
    }

    pub fn is_open(&self) -> bool {
        self.aggregator.is_open()
    }

    /// Build one slide from `body`.
    ///
    /// Failures are logged with the caller's location and the slide is
    /// skipped; the presentation stays usable. Returns whether the slide was
    /// added.
    #[track_caller]
    pub fn slide<F>(&mut self, body: F) -> bool
    where
        F: FnOnce(&mut SlideContext<'_>) -> Result<()>,
    {
        run_slide(&mut self.aggregator, body, Location::caller())
    }

    /// Add a pre-rendered slide at the current depth.
    pub fn submit(&mut self, fragment: impl Into<Slide>) -> Result<()> {
        self.aggregator.submit(fragment)
    }

    /// Slides in render order, whether the deck is still open or finished.
    pub fn slides(&self) -> &SlideSequence {
        match &self.finished {
            Some(finished) => &finished.slides,
            None => self.aggregator.slides(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides().is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides().iter()
    }

    /// Path of the written document once finished.
    pub fn path(&self) -> Option<&Path> {
        self.finished.as_ref().map(|f| f.path.as_path())
    }

    /// Render and write the deck, then close the session.
    ///
    /// On failure the session stays open; call [`destroy`](Self::destroy) to
    /// abandon it.
    pub fn finish(&mut self) -> Result<PathBuf> {
        if self.finished.is_some() {
            return Err(ContextError::NoActiveSession.into());
        }

        let finished = self.aggregator.end_session(
            self.template.as_ref(),
            &self.meta,
            self.store.as_ref(),
            &self.name,
        )?;
        let path = finished.path.clone();
        log::info!("Saved {} slide(s) to {}", finished.slides.len(), path.display());
        self.finished = Some(finished);
        Ok(path)
    }

    /// Abandon the deck and release the session lock.
    pub fn destroy(&mut self) {
        self.aggregator.destroy();
    }
}

impl HtmlRepr for Presentation {
    fn to_html(&self) -> String {
        self.iter().map(Slide::as_str).collect()
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("slides", &self.len())
            .field("open", &self.is_open())
            .finish()
    }
}

/// What a slide body writes into: commentary text, a figure, and nested
/// slides.
pub struct SlideContext<'a> {
    aggregator: &'a mut SlideAggregator,
    text: HtmlBuffer,
    figure: FigureSlot,
}

impl SlideContext<'_> {
    /// Nested slide, stacked vertically under the enclosing one.
    #[track_caller]
    pub fn slide<F>(&mut self, body: F) -> bool
    where
        F: FnOnce(&mut SlideContext<'_>) -> Result<()>,
    {
        run_slide(self.aggregator, body, Location::caller())
    }

    /// Set the figure panel's HTML.
    pub fn set_figure(&mut self, html: impl Into<String>) {
        self.figure.set(html);
    }

    /// Append a list to the commentary panel.
    pub fn list<I, S>(&mut self, kind: ListKind, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.text.write_list(kind, items);
    }

    /// Append raw HTML to the commentary panel.
    pub fn html(&mut self, html: &str) {
        self.text.push_html(html);
    }

    /// Current nesting depth, 1 inside a top-level slide.
    pub fn depth(&self) -> u32 {
        self.aggregator.depth().get()
    }
}

impl fmt::Write for SlideContext<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(&mut self.text, s)
    }
}

fn run_slide<F>(
    aggregator: &mut SlideAggregator,
    body: F,
    location: &'static Location<'static>,
) -> bool
where
    F: FnOnce(&mut SlideContext<'_>) -> Result<()>,
{
    match build_slide(aggregator, body) {
        Ok(()) => true,
        Err(e) => {
            report_error(&e, location);
            false
        }
    }
}

fn build_slide<F>(aggregator: &mut SlideAggregator, body: F) -> Result<()>
where
    F: FnOnce(&mut SlideContext<'_>) -> Result<()>,
{
    let outermost = aggregator.depth().is_top_level();
    if outermost && !aggregator.is_open() {
        return Err(ContextError::NoActiveSession.into());
    }

    let mut scope = aggregator.nested()?;
    let mut ctx = SlideContext {
        aggregator: &mut *scope,
        text: HtmlBuffer::new(),
        figure: FigureSlot::new(),
    };
    body(&mut ctx)?;

    let SlideContext {
        text, mut figure, ..
    } = ctx;
    let html = slide_tag(&figure.render_active()?, text.as_str());

    // An outer slide leads the stack of its sub-slides.
    if outermost && scope.pending_len() > 0 {
        return scope.submit_leading(html);
    }

    drop(scope);
    aggregator.submit(html)
}

fn report_error(err: &Error, location: &Location<'_>) {
    log::error!("{}", error_report(err, location));
}

/// Error kind and message followed by the source location of the slide.
fn error_report(err: &Error, location: &Location<'_>) -> String {
    format!(
        "{}: {}\n\tfilename: {}\n\tlineno: {}",
        err.kind(),
        err,
        location.file(),
        location.line()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::wrap_sections;
    use std::fmt::Write;

    struct Fixture {
        _dir: tempfile::TempDir,
        deck: Presentation,
    }

    fn open_deck(name: Option<&str>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PresentationConfig::default().with_output_dir(dir.path());
        if let Some(name) = name {
            config = config.with_name(name);
        }
        let deck = Presentation::open_with(
            config,
            SessionLock::new(),
            Box::new(RevealTemplate::new()),
            Box::new(FileStore::new(dir.path())),
        )
        .unwrap();
        Fixture { _dir: dir, deck }
    }

    #[test]
    fn test_generated_name() {
        let fixture = open_deck(None);
        assert!(fixture.deck.name().starts_with("presentation_"));
        assert!(fixture.deck.name().ends_with(".slides.html"));
    }

    #[test]
    fn test_single_slide() {
        let mut fixture = open_deck(Some("deck.html"));
        let added = fixture.deck.slide(|s| {
            write!(s, "hello world")?;
            s.set_figure("<svg id='fig'></svg>");
            Ok(())
        });

        assert!(added);
        assert_eq!(fixture.deck.len(), 1);
        let html = fixture.deck.slides()[0].as_str();
        assert!(html.contains("hello&nbsp;world"));
        assert!(html.contains("<svg id='fig'></svg>"));
        assert_eq!(html, slide_tag("<svg id='fig'></svg>", "hello&nbsp;world"));
    }

    #[test]
    fn test_sub_slides_stack_under_parent() {
        let mut fixture = open_deck(Some("deck.html"));
        fixture.deck.slide(|s| {
            write!(s, "parent")?;
            assert_eq!(s.depth(), 1);
            s.slide(|c| Ok(write!(c, "child1")?));
            s.slide(|c| Ok(write!(c, "child2")?));
            Ok(())
        });

        assert_eq!(fixture.deck.len(), 1);
        let expected = wrap_sections(&[
            Slide::new(slide_tag("", "parent")),
            Slide::new(slide_tag("", "child1")),
            Slide::new(slide_tag("", "child2")),
        ]);
        assert_eq!(fixture.deck.slides()[0], expected);
    }

    #[test]
    fn test_too_deep_slide_is_skipped() {
        let mut fixture = open_deck(Some("deck.html"));
        let mut deepest_added = true;
        fixture.deck.slide(|s| {
            s.slide(|c| {
                deepest_added = c.slide(|_| Ok(()));
                Ok(())
            });
            Ok(())
        });

        assert!(!deepest_added);
        assert_eq!(fixture.deck.len(), 1);
        assert_eq!(fixture.deck.aggregator.depth().get(), 0);

        // The deck is still usable.
        assert!(fixture.deck.slide(|_| Ok(())));
        assert_eq!(fixture.deck.len(), 2);
    }

    #[test]
    fn test_raw_html_and_lists_are_not_escaped_twice() {
        let mut fixture = open_deck(Some("deck.html"));
        fixture.deck.slide(|s| {
            s.html("<img src='a.png' width='10'>");
            s.list(ListKind::Ordered, ["x"]);
            write!(s, "a b")?;
            Ok(())
        });

        let html = fixture.deck.slides()[0].as_str();
        assert!(html.contains("<img src='a.png' width='10'>"));
        assert!(html.contains("<ol>\n<li>x</li>\n</ol>\n"));
        assert!(html.contains("a&nbsp;b"));
        assert!(!html.contains("<br>"));
    }

    #[test]
    fn test_error_report_names_kind_and_location() {
        let mut agg = SlideAggregator::new(SessionLock::new());
        agg.begin_session().unwrap();
        let err = build_slide(&mut agg, |_| Err(Error::Figure("no backend".to_string())))
            .unwrap_err();

        let (line, location) = (line!(), Location::caller());
        let report = error_report(&err, location);

        assert!(report.starts_with("FigureError: Figure rendering error: no backend"));
        assert!(report.contains(&format!("filename: {}", file!())));
        assert!(report.contains(&format!("lineno: {}", line)));
        assert_eq!(agg.depth().get(), 0);
    }

    #[test]
    fn test_failing_body_is_contained() {
        let mut fixture = open_deck(Some("deck.html"));
        let added = fixture
            .deck
            .slide(|_| Err(Error::Figure("no backend".to_string())));

        assert!(!added);
        assert!(fixture.deck.is_empty());
        assert!(fixture.deck.slide(|_| Ok(())));
        assert_eq!(fixture.deck.len(), 1);
    }

    #[test]
    fn test_finish_writes_document() {
        let mut fixture = open_deck(Some("deck.slides.html"));
        fixture.deck.submit("<p>raw</p>").unwrap();
        fixture.deck.slide(|s| {
            s.list(ListKind::Unordered, ["x", "y"]);
            Ok(())
        });

        let path = fixture.deck.finish().unwrap();
        assert_eq!(path.file_name().unwrap(), "deck.slides.html");
        assert_eq!(fixture.deck.path(), Some(path.as_path()));
        assert!(!fixture.deck.is_open());

        // Slides stay readable after finishing.
        assert_eq!(fixture.deck.len(), 2);
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<p>raw</p>"));
        assert!(html.contains("<ul>"));

        assert!(fixture.deck.finish().is_err());
    }

    #[test]
    fn test_slide_after_finish_is_rejected() {
        let mut fixture = open_deck(Some("deck.html"));
        fixture.deck.finish().unwrap();
        assert!(!fixture.deck.slide(|_| Ok(())));
    }

    #[test]
    fn test_second_presentation_blocked_until_destroy() {
        let dir = tempfile::tempdir().unwrap();
        let lock = SessionLock::new();
        let open = |lock: &SessionLock| {
            Presentation::open_with(
                PresentationConfig::default().with_name("deck.html"),
                lock.clone(),
                Box::new(RevealTemplate::new()),
                Box::new(FileStore::new(dir.path())),
            )
        };

        let mut first = open(&lock).unwrap();
        let err = open(&lock).unwrap_err();
        assert!(matches!(err, Error::Context(ContextError::SessionAlreadyOpen)));

        first.destroy();
        assert!(open(&lock).is_ok());
    }

    #[test]
    fn test_to_html_concatenates_slides() {
        let mut fixture = open_deck(Some("deck.html"));
        fixture.deck.submit("<p>a</p>").unwrap();
        fixture.deck.submit("<p>b</p>").unwrap();
        assert_eq!(fixture.deck.to_html(), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = PresentationConfig::from_json(r#"{"name": "talk.html"}"#).unwrap();
        assert_eq!(config.name.as_deref(), Some("talk.html"));
        assert_eq!(config.cdn, DEFAULT_CDN);
        assert_eq!(config.version, DEFAULT_REVEAL_VERSION);
    }

    #[test]
    fn test_config_from_json_invalid() {
        let err = PresentationConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
