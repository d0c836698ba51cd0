//! Render configuration.

use clap::ValueEnum;
use ladder::{DecimalFormat, Side};

/// Which sides of the book to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideSelection {
    Asks,
    Bids,
    /// Asks first, then bids, sharing one maximum.
    Both,
}

impl SideSelection {
    pub fn sides(self) -> &'static [Side] {
        match self {
            SideSelection::Asks => &[Side::Asks],
            SideSelection::Bids => &[Side::Bids],
            SideSelection::Both => &[Side::Asks, Side::Bids],
        }
    }
}

/// Output format for the `render` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, human-readable table
    Text,
    /// Tab-separated values, one line per row
    Tsv,
    /// The rendered tree as JSON
    Json,
    /// `<ul>` fragment with a `--stop` custom property per row
    Html,
}

/// All tuneable parameters for rendering.
///
/// Use [`Default::default()`] and override what the command line sets.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Sides to render.
    pub sides: SideSelection,
    /// Output format (ignored by the terminal view).
    pub format: OutputFormat,
    /// Extra class attached to every rendered list.
    pub class_name: String,
    /// Fixed price decimals; `None` prints the shortest exact form.
    pub price_decimals: Option<usize>,
    /// Fixed size decimals; `None` prints the shortest exact form.
    pub size_decimals: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sides: SideSelection::Both,
            format: OutputFormat::Text,
            class_name: String::new(),
            price_decimals: None,
            size_decimals: None,
        }
    }
}

impl RenderConfig {
    pub fn decimal_format(&self) -> DecimalFormat {
        DecimalFormat::new(self.price_decimals, self.size_decimals)
    }
}
