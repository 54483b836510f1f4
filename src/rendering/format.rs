//! Diagram output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File format a chunk diagram is rendered to.
///
/// Every format except [`OutputFormat::Dot`] needs Graphviz installed; `dot`
/// writes the graph source itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Pdf,
    Jpg,
    Dot,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Png,
        OutputFormat::Svg,
        OutputFormat::Pdf,
        OutputFormat::Jpg,
        OutputFormat::Dot,
    ];

    /// File extension, also the Graphviz `-T` output type.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Dot => "dot",
        }
    }

    /// Whether a browser can show the file in an `<img>` tag.
    pub fn is_image(self) -> bool {
        matches!(
            self,
            OutputFormat::Png | OutputFormat::Svg | OutputFormat::Jpg
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let lower = if lower == "jpeg" { "jpg".to_string() } else { lower };
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == lower)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|f| f.extension()).collect();
                format!("unknown format '{s}' (expected one of: {})", known.join(", "))
            })
    }
}
