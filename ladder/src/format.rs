//! Cell and graph-stop formatting.
//!
//! The renderers never format numbers themselves; they call into a
//! [`LevelFormat`] supplied by the caller.

/// Formatting collaborators used by the renderers.
pub trait LevelFormat {
    /// Text for a price cell.
    fn price(&self, value: f64) -> String;

    /// Text for a size or cumulative size cell.
    fn size(&self, value: f64) -> String;

    /// Length-like value for the depth bar stop, given the fill ratio.
    fn graph_stop(&self, ratio: f64) -> String;
}

/// Decimal formatting with optional fixed precision.
///
/// With no precision configured a value is printed in its shortest
/// round-tripping form and a trailing `.0` is dropped, so `105.25` stays
/// `"105.25"` and `100.0` becomes `"100"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecimalFormat {
    pub price_decimals: Option<usize>,
    pub size_decimals: Option<usize>,
}

impl DecimalFormat {
    pub fn new(price_decimals: Option<usize>, size_decimals: Option<usize>) -> Self {
        Self {
            price_decimals,
            size_decimals,
        }
    }
}

impl LevelFormat for DecimalFormat {
    fn price(&self, value: f64) -> String {
        format_number(value, self.price_decimals)
    }

    fn size(&self, value: f64) -> String {
        format_number(value, self.size_decimals)
    }

    fn graph_stop(&self, ratio: f64) -> String {
        let mut out = trim_fraction(format!("{:.2}", ratio * 100.0));
        out.push('%');
        out
    }
}

fn format_number(value: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(prec) => format!("{value:.prec$}"),
        None => shortest(value),
    }
}

/// Shortest representation via `ryu`, without a trailing `.0`.
fn shortest(value: f64) -> String {
    let mut b = ryu::Buffer::new();
    let s = b.format(value);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

/// `"62.50"` -> `"62.5"`, `"100.00"` -> `"100"`.
fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    s
}
