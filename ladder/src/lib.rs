pub mod cache;
pub mod columns;
pub mod error;
pub mod format;
pub mod render;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

pub use cache::GraphStopCache;
pub use columns::{columns_for, Column, ColumnKey};
pub use error::{LadderError, Result};
pub use format::{DecimalFormat, LevelFormat};
pub use render::{
    render_list, render_row, HeaderCell, HeaderRow, OrderList, RenderedCell, RenderedList,
    RenderedRow, RowStyle,
};
pub use types::{Level, MaxTotalSizeInfo, Side};
