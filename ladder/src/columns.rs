//! Static column descriptors and per-side column order.

use std::fmt;

use serde::Serialize;

use crate::format::LevelFormat;
use crate::types::{Level, Side};

/// Identity of a displayed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKey {
    Price,
    Size,
    TotalSize,
}

/// How a column's value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Price,
    Size,
}

/// A displayed field: key, header label, accessor and formatter choice.
#[derive(Clone, Copy)]
pub struct Column {
    pub key: ColumnKey,
    pub label: &'static str,
    value: fn(&Level) -> f64,
    kind: ValueKind,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Column {
    /// Raw field value for this column.
    pub fn value(&self, level: &Level) -> f64 {
        (self.value)(level)
    }

    /// Cell text for this column using the caller's formatter.
    pub fn format<F: LevelFormat + ?Sized>(&self, level: &Level, fmt: &F) -> String {
        let value = self.value(level);
        match self.kind {
            ValueKind::Price => fmt.price(value),
            ValueKind::Size => fmt.size(value),
        }
    }
}

fn price_of(level: &Level) -> f64 {
    level.price
}

fn size_of(level: &Level) -> f64 {
    level.size
}

fn total_size_of(level: &Level) -> f64 {
    level.total_size
}

const PRICE: Column = Column {
    key: ColumnKey::Price,
    label: "Price",
    value: price_of,
    kind: ValueKind::Price,
};

const SIZE: Column = Column {
    key: ColumnKey::Size,
    label: "Size",
    value: size_of,
    kind: ValueKind::Size,
};

const TOTAL_SIZE: Column = Column {
    key: ColumnKey::TotalSize,
    label: "Total",
    value: total_size_of,
    kind: ValueKind::Size,
};

/// Asks read outward from the spread left to right.
static ASK_COLUMNS: [Column; 3] = [PRICE, SIZE, TOTAL_SIZE];

/// Bids mirror asks so both price columns meet in the middle.
static BID_COLUMNS: [Column; 3] = [TOTAL_SIZE, SIZE, PRICE];

/// Columns in left-to-right display order for `side`.
pub fn columns_for(side: Side) -> &'static [Column; 3] {
    match side {
        Side::Asks => &ASK_COLUMNS,
        Side::Bids => &BID_COLUMNS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DecimalFormat;

    fn labels(side: Side) -> Vec<&'static str> {
        columns_for(side).iter().map(|c| c.label).collect()
    }

    #[test]
    fn test_ask_column_order() {
        assert_eq!(labels(Side::Asks), ["Price", "Size", "Total"]);
    }

    #[test]
    fn test_bid_column_order_is_reversed() {
        assert_eq!(labels(Side::Bids), ["Total", "Size", "Price"]);
        let asks: Vec<_> = columns_for(Side::Asks).iter().map(|c| c.key).collect();
        let mut bids: Vec<_> = columns_for(Side::Bids).iter().map(|c| c.key).collect();
        bids.reverse();
        assert_eq!(asks, bids);
    }

    #[test]
    fn test_accessors_pick_their_field() {
        let level = Level::new(105.25, 3.0, 11.0);
        let values: Vec<f64> = columns_for(Side::Asks)
            .iter()
            .map(|c| c.value(&level))
            .collect();
        assert_eq!(values, [105.25, 3.0, 11.0]);
    }

    #[test]
    fn test_price_uses_price_formatter() {
        let fmt = DecimalFormat::new(Some(2), Some(0));
        let level = Level::new(105.25, 3.0, 11.0);
        let cells: Vec<String> = columns_for(Side::Asks)
            .iter()
            .map(|c| c.format(&level, &fmt))
            .collect();
        assert_eq!(cells, ["105.25", "3", "11"]);
    }
}
