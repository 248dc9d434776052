//! nbconvert target formats.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Target format passed to `nbconvert --to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Custom,
    #[default]
    Html,
    Latex,
    Markdown,
    Notebook,
    Pdf,
    Python,
    Rst,
    Script,
    Slides,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 10] = [
        ExportFormat::Custom,
        ExportFormat::Html,
        ExportFormat::Latex,
        ExportFormat::Markdown,
        ExportFormat::Notebook,
        ExportFormat::Pdf,
        ExportFormat::Python,
        ExportFormat::Rst,
        ExportFormat::Script,
        ExportFormat::Slides,
    ];

    /// Name as nbconvert spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Custom => "custom",
            ExportFormat::Html => "html",
            ExportFormat::Latex => "latex",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Notebook => "notebook",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Python => "python",
            ExportFormat::Rst => "rst",
            ExportFormat::Script => "script",
            ExportFormat::Slides => "slides",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.as_str()).collect()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("slides".parse::<ExportFormat>().unwrap(), ExportFormat::Slides);
        assert_eq!("HTML".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert_eq!(ExportFormat::default(), ExportFormat::Html);
    }

    #[test]
    fn test_unknown_format_lists_choices() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'docx'"));
        assert!(msg.contains("slides"));
    }

    #[test]
    fn test_names_round_trip_display() {
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }
}
