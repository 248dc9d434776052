//! Figure panel rendering.

use crate::error::Result;

/// Supplies the embeddable HTML of the currently active figure.
///
/// Implementations return an empty string when no figure is active and
/// clear the active figure once it has been rendered.
pub trait FigureRenderer {
    fn render_active(&mut self) -> Result<String>;
}

/// Holds at most one figure, set by the slide body.
#[derive(Debug, Clone, Default)]
pub struct FigureSlot {
    active: Option<String>,
}

impl FigureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `html` the active figure, replacing any previous one.
    pub fn set(&mut self, html: impl Into<String>) {
        self.active = Some(html.into());
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

impl FigureRenderer for FigureSlot {
    fn render_active(&mut self) -> Result<String> {
        Ok(self.active.take().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_slot_renders_empty() {
        let mut slot = FigureSlot::new();
        assert_eq!(slot.render_active().unwrap(), "");
    }

    #[test]
    fn test_render_clears_figure() {
        let mut slot = FigureSlot::new();
        slot.set("<svg></svg>");
        assert!(slot.is_active());
        assert_eq!(slot.render_active().unwrap(), "<svg></svg>");
        assert!(!slot.is_active());
    }
}
