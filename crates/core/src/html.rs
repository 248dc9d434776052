//! HTML fragment helpers: text escaping, slide layout, side-by-side panels.

use std::fmt;

/// Opening tag of one side-by-side panel.
const PANEL_OPEN: &str = "<div style='display:inline-block; float:left; padding-right:10px;'>";
const PANEL_CLOSE: &str = "</div>";

/// Make plain text render verbatim in HTML.
///
/// Spaces become `&nbsp;`, newlines `<br>`, and tabs four `&nbsp;`. Markup
/// characters are passed through so fragments can carry inline tags.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => out.push_str("&nbsp;"),
            '\n' => out.push_str("<br>"),
            '\t' => out.push_str("&nbsp;&nbsp;&nbsp;&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Two-panel slide: figure on the left, commentary on the right.
///
/// Both panels are HTML and are inserted untouched; pass plain text through
/// [`escape_text`] first.
pub fn slide_tag(image: &str, sentence: &str) -> String {
    format!(
        r#"
        <div class="slide_container" style="width:840px;display:inline-block;">
            <div class="figure_box" style="display:inline-block; float:left;">
                {image}
            </div>

            <div class="description_box" style="font-size:18px;padding-top:60px;font-family:Century Gothic;">
                {sentence}
            </div>
        </div>
    "#
    )
}

/// Types that know how to show themselves as an HTML fragment.
pub trait HtmlRepr {
    fn to_html(&self) -> String;
}

/// Monospace paragraph used for anything without a richer representation.
fn monospace(text: &str) -> String {
    format!(r#"<p><font face="courier">{}</font></p>"#, escape_text(text))
}

impl HtmlRepr for str {
    fn to_html(&self) -> String {
        monospace(self)
    }
}

impl HtmlRepr for String {
    fn to_html(&self) -> String {
        monospace(self)
    }
}

/// Already-rendered HTML, emitted untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html(pub String);

impl HtmlRepr for Html {
    fn to_html(&self) -> String {
        self.0.clone()
    }
}

/// Renders any `Debug` value as a monospace paragraph.
pub struct DebugRepr<'a, T: fmt::Debug + ?Sized>(pub &'a T);

impl<T: fmt::Debug + ?Sized> HtmlRepr for DebugRepr<'_, T> {
    fn to_html(&self) -> String {
        monospace(&format!("{:?}", self.0))
    }
}

/// Lay out items horizontally, e.g. to compare tables next to each other.
///
/// Returns an empty string when there is nothing to show.
pub fn side_by_side(items: &[&dyn HtmlRepr]) -> String {
    items
        .iter()
        .map(|item| format!("{PANEL_OPEN}{}{PANEL_CLOSE}", item.to_html()))
        .collect()
}

/// Script that hides notebook input cells and adds a link to toggle them.
pub fn toggle_input_cells() -> &'static str {
    r#"<script>
    code_show=true;
    function code_toggle() {
     if (code_show){
     $('div.input').hide();
     } else {
     $('div.input').show();
     }
     code_show = !code_show
    }
    $( document ).ready(code_toggle);
    </script>
    The raw code for this IPython notebook is by default hidden for easier reading.
    To toggle on/off the raw code, click <a href="javascript:code_toggle()">here</a>."#
}

/// HTML list flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Ordered => "ol",
            ListKind::Unordered => "ul",
        }
    }
}

/// Text sink that converts everything written into HTML.
///
/// Collects the commentary panel of a slide.
#[derive(Debug, Clone, Default)]
pub struct HtmlBuffer {
    html: String,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append items as an HTML list.
    pub fn write_list<I, S>(&mut self, kind: ListKind, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tag = kind.tag();
        self.html.push_str(&format!("<{tag}>\n"));
        for item in items {
            self.html
                .push_str(&format!("<li>{}</li>\n", escape_text(item.as_ref())));
        }
        self.html.push_str(&format!("</{tag}>\n"));
    }

    /// Append pre-rendered HTML without escaping.
    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

impl fmt::Write for HtmlBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.html.push_str(&escape_text(s));
        Ok(())
    }
}
