//! reveal.js document template.
//!
//! Wraps the flattened slides in a minimal reveal.js page. Styling beyond
//! the stock theme is left to the caller's own [`DocumentTemplate`].

use crate::error::Result;
use crate::types::{DeckMeta, SlideSequence};
use std::fmt::Write;

/// Turns a flattened slide sequence into a complete document.
pub trait DocumentTemplate {
    fn render(&self, slides: &SlideSequence, meta: &DeckMeta) -> Result<String>;
}

/// Minimal reveal.js page loading its assets from `meta.cdn`/`meta.version`.
#[derive(Debug, Clone)]
pub struct RevealTemplate {
    title: String,
    theme: String,
}

impl Default for RevealTemplate {
    fn default() -> Self {
        Self {
            title: "Presentation".to_string(),
            theme: "simple".to_string(),
        }
    }
}

impl RevealTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the reveal.js theme name (a file under `css/theme/`).
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }
}

impl DocumentTemplate for RevealTemplate {
    fn render(&self, slides: &SlideSequence, meta: &DeckMeta) -> Result<String> {
        let base = format!("{}/{}", meta.cdn.trim_end_matches('/'), meta.version);

        let mut sections = String::new();
        for slide in slides {
            // Stacked slides already carry their own <section> panels.
            writeln!(sections, "<section>\n{}\n</section>", slide)?;
        }

        Ok(format!(
            r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="{base}/css/reveal.min.css">
<link rel="stylesheet" href="{base}/css/theme/{theme}.css" id="theme">
</head>
<body>
<div class="reveal">
<div class="slides">
{sections}</div>
</div>
<script src="{base}/lib/js/head.min.js"></script>
<script src="{base}/js/reveal.min.js"></script>
<script>
Reveal.initialize({{ controls: true, progress: true, history: true, center: true, transition: 'linear' }});
</script>
</body>
</html>
"#,
            title = self.title,
            theme = self.theme,
        ))
    }
}
