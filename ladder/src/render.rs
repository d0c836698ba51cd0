//! List and row renderers.
//!
//! Both produce a plain tree ([`RenderedList`] / [`RenderedRow`]) that a host
//! turns into whatever it displays. The tree holds formatted cell text, class
//! names and each row's depth-bar stop.
//!
//! ```text
//!   levels ──► render_list ──► header (labels in side order)
//!                   │
//!                   └──► render_row (per level, input order)
//!                            ├─ fill_ratio = total_size / max
//!                            ├─ style.stop = graph_stop(fill_ratio)
//!                            └─ cells      = column.format(level)
//! ```

use std::collections::HashSet;

use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::warn;

use crate::cache::GraphStopCache;
use crate::columns::{columns_for, ColumnKey};
use crate::format::LevelFormat;
use crate::types::{Level, MaxTotalSizeInfo, Side};

// ---------------------------------------------------------------------------
// Rendered tree
// ---------------------------------------------------------------------------

/// One rendered side: header first, then a row per level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedList {
    pub side: Side,
    pub classes: Vec<String>,
    pub header: HeaderRow,
    pub rows: Vec<RenderedRow>,
}

impl RenderedList {
    /// Header plus value rows.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Header labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.header.cells.iter().map(|c| c.label).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderRow {
    pub classes: Vec<String>,
    pub cells: Vec<HeaderCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub key: ColumnKey,
    pub label: &'static str,
    pub classes: Vec<String>,
}

/// One price level, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRow {
    /// Row identity within the list (the level's price).
    pub key: f64,
    /// `total_size / max`; not displayed as text.
    pub fill_ratio: f64,
    pub style: RowStyle,
    pub classes: Vec<String>,
    pub cells: Vec<RenderedCell>,
}

impl RenderedRow {
    /// Cell for `key`, if the row has one.
    pub fn cell(&self, key: ColumnKey) -> Option<&RenderedCell> {
        self.cells.iter().find(|c| c.key == key)
    }
}

/// Style hooks consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowStyle {
    #[serde(rename = "--stop")]
    pub stop: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    pub key: ColumnKey,
    pub text: String,
    pub classes: Vec<String>,
}

impl RenderedCell {
    /// Whether this cell carries the side's price marker.
    pub fn is_price(&self) -> bool {
        self.key == ColumnKey::Price
    }
}

// ---------------------------------------------------------------------------
// Pure renderers
// ---------------------------------------------------------------------------

/// Render one level without memoization.
pub fn render_row<F>(
    level: &Level,
    side: Side,
    max_info: &MaxTotalSizeInfo,
    fmt: &F,
) -> RenderedRow
where
    F: LevelFormat + ?Sized,
{
    let stop = fmt.graph_stop(level.total_size / max_info.max);
    build_row(level, side, max_info, fmt, stop)
}

/// Render a whole side without memoization.
///
/// Levels are emitted in the order given; an empty slice yields the header
/// alone.
pub fn render_list<F>(
    levels: &[Level],
    side: Side,
    max_info: &MaxTotalSizeInfo,
    class_name: &str,
    fmt: &F,
) -> RenderedList
where
    F: LevelFormat + ?Sized,
{
    assemble(levels, side, class_name, |level| {
        render_row(level, side, max_info, fmt)
    })
}

// ---------------------------------------------------------------------------
// Memoizing renderer
// ---------------------------------------------------------------------------

/// Renderer owning its formatter and a [`GraphStopCache`].
///
/// Produces the same tree as [`render_list`]; graph stops are only
/// recomputed when a row's `(total_size, max)` pair is new to the cache.
#[derive(Debug)]
pub struct OrderList<F> {
    format: F,
    cache: GraphStopCache,
}

impl<F: LevelFormat> OrderList<F> {
    pub fn new(format: F) -> Self {
        Self::with_cache(format, GraphStopCache::default())
    }

    pub fn with_cache(format: F, cache: GraphStopCache) -> Self {
        Self { format, cache }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn cache(&self) -> &GraphStopCache {
        &self.cache
    }

    /// Render a whole side, reusing cached graph stops.
    pub fn render(
        &mut self,
        levels: &[Level],
        side: Side,
        max_info: &MaxTotalSizeInfo,
        class_name: &str,
    ) -> RenderedList {
        let format = &self.format;
        let cache = &mut self.cache;
        assemble(levels, side, class_name, |level| {
            memo_row(format, cache, level, side, max_info)
        })
    }

    /// Render one level, reusing a cached graph stop.
    pub fn render_row(
        &mut self,
        level: &Level,
        side: Side,
        max_info: &MaxTotalSizeInfo,
    ) -> RenderedRow {
        memo_row(&self.format, &mut self.cache, level, side, max_info)
    }
}

fn memo_row<F: LevelFormat>(
    format: &F,
    cache: &mut GraphStopCache,
    level: &Level,
    side: Side,
    max_info: &MaxTotalSizeInfo,
) -> RenderedRow {
    let stop = cache.stop(level.total_size, max_info.max, |ratio| format.graph_stop(ratio));
    build_row(level, side, max_info, format, stop)
}

// ---------------------------------------------------------------------------
// Shared assembly
// ---------------------------------------------------------------------------

fn assemble<R>(levels: &[Level], side: Side, class_name: &str, mut row: R) -> RenderedList
where
    R: FnMut(&Level) -> RenderedRow,
{
    let mut classes = Vec::with_capacity(3);
    if !class_name.is_empty() {
        classes.push(class_name.to_string());
    }
    classes.push("order-list".to_string());
    classes.push(format!("{side}-list"));

    let header = HeaderRow {
        classes: vec!["row".to_string(), "header-row".to_string()],
        cells: columns_for(side)
            .iter()
            .map(|column| HeaderCell {
                key: column.key,
                label: column.label,
                classes: vec!["cell".to_string(), "heading-cell".to_string()],
            })
            .collect(),
    };

    let mut seen: HashSet<OrderedFloat<f64>> = HashSet::with_capacity(levels.len());
    let mut rows = Vec::with_capacity(levels.len());
    for level in levels {
        if !seen.insert(OrderedFloat(level.price)) {
            warn!(%side, price = level.price, "duplicate price key in order list");
        }
        rows.push(row(level));
    }

    RenderedList {
        side,
        classes,
        header,
        rows,
    }
}

fn build_row<F>(
    level: &Level,
    side: Side,
    max_info: &MaxTotalSizeInfo,
    fmt: &F,
    stop: String,
) -> RenderedRow
where
    F: LevelFormat + ?Sized,
{
    let cells = columns_for(side)
        .iter()
        .map(|column| {
            let mut classes = vec!["cell".to_string()];
            if column.key == ColumnKey::Price {
                classes.push(format!("{side}-price"));
            }
            classes.push("order-value".to_string());
            RenderedCell {
                key: column.key,
                text: column.format(level, fmt),
                classes,
            }
        })
        .collect();

    RenderedRow {
        key: level.price,
        fill_ratio: level.total_size / max_info.max,
        style: RowStyle { stop },
        classes: vec![
            "row".to_string(),
            "value-row".to_string(),
            format!("{side}-row"),
        ],
        cells,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::format::DecimalFormat;

    fn bids() -> Vec<Level> {
        vec![Level::new(100.0, 5.0, 5.0), Level::new(99.0, 3.0, 8.0)]
    }

    fn max8() -> MaxTotalSizeInfo {
        MaxTotalSizeInfo {
            asks: 8.0,
            bids: 8.0,
            max: 8.0,
        }
    }

    fn texts(row: &RenderedRow) -> Vec<&str> {
        row.cells.iter().map(|c| c.text.as_str()).collect()
    }

    /// Formatter that counts graph-stop calls.
    #[derive(Default)]
    struct Counting {
        stops: Cell<usize>,
    }

    impl LevelFormat for Counting {
        fn price(&self, value: f64) -> String {
            format!("p{value}")
        }

        fn size(&self, value: f64) -> String {
            format!("s{value}")
        }

        fn graph_stop(&self, ratio: f64) -> String {
            self.stops.set(self.stops.get() + 1);
            format!("{ratio}")
        }
    }

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with log output going to the returned sink.
    fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, captured.text())
    }

    #[test]
    fn test_bids_scenario() {
        let list = render_list(&bids(), Side::Bids, &max8(), "", &DecimalFormat::default());

        assert_eq!(list.labels(), ["Total", "Size", "Price"]);
        assert_eq!(list.rows.len(), 2);
        assert_eq!(list.rows[0].fill_ratio, 0.625);
        assert_eq!(list.rows[1].fill_ratio, 1.0);
        assert_eq!(texts(&list.rows[0]), ["5", "5", "100"]);
        assert_eq!(texts(&list.rows[1]), ["8", "3", "99"]);
        assert_eq!(list.rows[0].style.stop, "62.5%");
        assert_eq!(list.rows[1].style.stop, "100%");
    }

    #[test]
    fn test_empty_levels_render_header_only() {
        let list = render_list(&[], Side::Asks, &max8(), "", &DecimalFormat::default());
        assert_eq!(list.row_count(), 1);
        assert!(list.rows.is_empty());
        assert_eq!(list.labels(), ["Price", "Size", "Total"]);
    }

    #[test]
    fn test_row_count_includes_header() {
        let levels: Vec<Level> = (0..7)
            .map(|i| Level::new(100.0 + i as f64, 1.0, 1.0 + i as f64))
            .collect();
        let list = render_list(&levels, Side::Asks, &max8(), "", &DecimalFormat::default());
        assert_eq!(list.row_count(), levels.len() + 1);
    }

    #[test]
    fn test_input_order_is_preserved() {
        // Deliberately unsorted; rendering must not reorder.
        let levels = [
            Level::new(101.0, 1.0, 1.0),
            Level::new(103.0, 1.0, 2.0),
            Level::new(102.0, 1.0, 3.0),
        ];
        let list = render_list(&levels, Side::Asks, &max8(), "", &DecimalFormat::default());
        let keys: Vec<f64> = list.rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, [101.0, 103.0, 102.0]);
    }

    #[test]
    fn test_cells_use_injected_formatter() {
        let fmt = Counting::default();
        let row = render_row(&Level::new(105.25, 2.0, 4.0), Side::Asks, &max8(), &fmt);
        assert_eq!(texts(&row), ["p105.25", "s2", "s4"]);
        assert_eq!(row.style.stop, "0.5");
    }

    #[test]
    fn test_price_cell_carries_side_marker() {
        let row = render_row(
            &Level::new(100.0, 1.0, 1.0),
            Side::Bids,
            &max8(),
            &DecimalFormat::default(),
        );
        let price = row.cell(ColumnKey::Price).unwrap();
        assert!(price.is_price());
        assert!(price.classes.contains(&"bids-price".to_string()));

        let size = row.cell(ColumnKey::Size).unwrap();
        assert!(!size.classes.iter().any(|c| c.ends_with("-price")));
        assert_eq!(row.classes, ["row", "value-row", "bids-row"]);
    }

    #[test]
    fn test_list_classes() {
        let fmt = DecimalFormat::default();
        let list = render_list(&[], Side::Asks, &max8(), "book-right", &fmt);
        assert_eq!(list.classes, ["book-right", "order-list", "asks-list"]);

        let list = render_list(&[], Side::Bids, &max8(), "", &fmt);
        assert_eq!(list.classes, ["order-list", "bids-list"]);
    }

    #[test]
    fn test_zero_max_does_not_panic() {
        let zero = MaxTotalSizeInfo::default();
        let list = render_list(
            &[Level::new(1.0, 1.0, 1.0), Level::new(2.0, 0.0, 0.0)],
            Side::Asks,
            &zero,
            "",
            &DecimalFormat::default(),
        );
        assert!(list.rows[0].fill_ratio.is_infinite());
        assert!(list.rows[1].fill_ratio.is_nan());
    }

    #[test]
    fn test_duplicate_prices_still_render() {
        let levels = [Level::new(100.0, 1.0, 1.0), Level::new(100.0, 1.0, 2.0)];
        let (list, logs) = with_logs(|| {
            render_list(&levels, Side::Bids, &max8(), "", &DecimalFormat::default())
        });
        assert_eq!(list.rows.len(), 2);
        assert!(logs.contains("duplicate price key in order list"), "{logs}");
        assert!(logs.contains("side=bids"), "{logs}");
        assert!(logs.contains("price=100"), "{logs}");
        assert_eq!(logs.matches("duplicate price key").count(), 1);
    }

    #[test]
    fn test_distinct_prices_log_nothing() {
        let (_, logs) = with_logs(|| {
            render_list(&bids(), Side::Bids, &max8(), "", &DecimalFormat::default())
        });
        assert!(!logs.contains("duplicate price key"), "{logs}");
    }

    #[test]
    fn test_memoized_matches_pure() {
        let fmt = DecimalFormat::new(Some(2), Some(3));
        let mut renderer = OrderList::new(fmt);
        let memo = renderer.render(&bids(), Side::Bids, &max8(), "left");
        let pure = render_list(&bids(), Side::Bids, &max8(), "left", &fmt);
        assert_eq!(memo, pure);
    }

    #[test]
    fn test_memoized_stop_computed_once_per_key() {
        let mut renderer = OrderList::new(Counting::default());
        for _ in 0..5 {
            renderer.render(&bids(), Side::Bids, &max8(), "");
        }
        assert_eq!(renderer.format().stops.get(), 2);
        assert_eq!(renderer.cache().misses(), 2);
        assert_eq!(renderer.cache().hits(), 8);

        // A new max invalidates every row.
        let wider = MaxTotalSizeInfo::new(8.0, 16.0);
        let list = renderer.render(&bids(), Side::Bids, &wider, "");
        assert_eq!(renderer.format().stops.get(), 4);
        assert_eq!(list.rows[1].style.stop, "0.5");
    }

    #[test]
    fn test_memoized_keeps_signed_zero_apart() {
        let fmt = DecimalFormat::default();
        let mut renderer = OrderList::new(fmt);
        let levels = [Level::new(100.0, 0.0, 0.0), Level::new(99.0, -0.0, -0.0)];

        let memo = renderer.render(&levels, Side::Bids, &max8(), "");
        let pure = render_list(&levels, Side::Bids, &max8(), "", &fmt);
        assert_eq!(memo.rows[0].style.stop, "0%");
        assert_eq!(pure.rows[1].style.stop, "-0%");
        assert_eq!(memo.rows[1].style.stop, pure.rows[1].style.stop);
        assert_eq!(memo, pure);
    }

    #[test]
    fn test_single_row_renderer() {
        let mut renderer = OrderList::new(DecimalFormat::default());
        let row = renderer.render_row(&Level::new(99.0, 3.0, 8.0), Side::Bids, &max8());
        assert_eq!(row.fill_ratio, 1.0);
        assert_eq!(row.style.stop, "100%");
        assert_eq!(renderer.cache().len(), 1);
    }
}
