//! Order-book side data as handed over by the aggregator.
//!
//! Nothing here is computed from raw book state: levels arrive with their
//! cumulative `total_size` already filled in, and the shared maxima arrive
//! alongside them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LadderError;

/// Which side of the book a list of levels belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Asks,
    Bids,
}

impl Side {
    /// Lowercase name, also used to build side-specific class names.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Asks => "asks",
            Side::Bids => "bids",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = LadderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asks" | "ask" => Ok(Side::Asks),
            "bids" | "bid" => Ok(Side::Bids),
            _ => Err(LadderError::UnknownSide(s.to_string())),
        }
    }
}

/// One price level with its running cumulative size.
///
/// `total_size` is the sum of `size` over this level and every level before
/// it on the same side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub price: f64,
    pub size: f64,
    pub total_size: f64,
}

impl Level {
    pub fn new(price: f64, size: f64, total_size: f64) -> Self {
        Self {
            price,
            size,
            total_size,
        }
    }
}

/// Largest cumulative size per side, plus the larger of the two.
///
/// `max` normalizes depth bars on both sides so their lengths compare.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaxTotalSizeInfo {
    pub asks: f64,
    pub bids: f64,
    pub max: f64,
}

impl MaxTotalSizeInfo {
    pub fn new(asks: f64, bids: f64) -> Self {
        Self {
            asks,
            bids,
            max: asks.max(bids),
        }
    }

    /// Build from two already-totalled sides. An empty side contributes 0.
    pub fn from_levels(asks: &[Level], bids: &[Level]) -> Self {
        Self::new(largest_total(asks), largest_total(bids))
    }
}

fn largest_total(levels: &[Level]) -> f64 {
    levels
        .iter()
        .map(|l| l.total_size)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_parse_is_case_insensitive() {
        assert_eq!("asks".parse::<Side>().unwrap(), Side::Asks);
        assert_eq!("BIDS".parse::<Side>().unwrap(), Side::Bids);
        assert_eq!(" bid ".parse::<Side>().unwrap(), Side::Bids);
    }

    #[test]
    fn test_side_parse_rejects_unknown() {
        let err = "middle".parse::<Side>().unwrap_err();
        assert_eq!(err, LadderError::UnknownSide("middle".into()));
    }

    #[test]
    fn test_level_uses_camel_case_on_the_wire() {
        let level: Level =
            serde_json::from_str(r#"{"price":100.5,"size":2,"totalSize":7}"#).unwrap();
        assert_eq!(level, Level::new(100.5, 2.0, 7.0));

        let json = serde_json::to_string(&level).unwrap();
        assert!(json.contains("\"totalSize\":7.0"));
    }

    #[test]
    fn test_max_info_from_levels() {
        let asks = [Level::new(101.0, 1.0, 1.0), Level::new(102.0, 4.0, 5.0)];
        let bids = [Level::new(100.0, 5.0, 5.0), Level::new(99.0, 3.0, 8.0)];
        let info = MaxTotalSizeInfo::from_levels(&asks, &bids);
        assert_eq!(info.asks, 5.0);
        assert_eq!(info.bids, 8.0);
        assert_eq!(info.max, 8.0);
    }

    #[test]
    fn test_max_info_empty_sides_are_zero() {
        let info = MaxTotalSizeInfo::from_levels(&[], &[]);
        assert_eq!(info, MaxTotalSizeInfo::default());
    }
}
