//! Live order-list view using ratatui + crossterm.
//!
//! Bids on the left, asks on the right, so both price columns meet in the
//! middle. Each row is backed by a depth bar whose length is the row's fill
//! ratio; bid bars grow leftward from the middle, ask bars rightward.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ladder::{DecimalFormat, OrderList, RenderedList, Side};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::RenderConfig;
use crate::error::{OrderListError, Result};
use crate::snapshot::{self, FeedState};

/// Target render interval (10 FPS).
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

const ASK_BAR: Color = Color::Rgb(72, 20, 24);
const BID_BAR: Color = Color::Rgb(16, 56, 32);

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the live view until `q`/`Esc` or cancellation.
///
/// Snapshots are read as newline-delimited JSON from `input` (stdin when
/// `None` or `-`). The view keeps the latest snapshot on screen after the
/// input closes.
///
/// # Errors
///
/// Returns [`OrderListError`] when the input cannot be opened or the terminal
/// cannot be set up.
pub async fn run_view(
    config: RenderConfig,
    input: Option<PathBuf>,
    cancel: CancellationToken,
) -> Result<()> {
    let lines = snapshot::open_stream(input.as_deref()).await?;
    let (feed_tx, mut feed_rx) = watch::channel(FeedState::default());
    let reader_task = tokio::spawn(snapshot::read_stream(lines, feed_tx, cancel.clone()));

    info!(input = ?input, "starting view");

    let mut renderer = OrderList::new(config.decimal_format());
    let mut screen = Screen::default();

    enable_raw_mode().map_err(|e| OrderListError::Terminal(format!("enable raw mode: {e}")))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| OrderListError::Terminal(format!("enter alternate screen: {e}")))?;
    let mut terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
            return Err(OrderListError::Terminal(format!("create terminal: {e}")));
        }
    };

    let mut render_interval = tokio::time::interval(RENDER_INTERVAL);

    let mut quit = false;
    let result: Result<()> = loop {
        if quit {
            break Ok(());
        }

        tokio::select! {
            Ok(()) = feed_rx.changed() => {
                let state = feed_rx.borrow_and_update().clone();
                screen.update(&mut renderer, state);
            }

            // Render tick; also polls keyboard input.
            _ = render_interval.tick() => {
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press
                            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                        {
                            quit = true;
                        }
                    }
                }

                if !quit {
                    if let Err(e) = terminal.draw(|frame| render_ui(frame, &screen, &renderer)) {
                        break Err(OrderListError::Terminal(format!("draw: {e}")));
                    }
                }
            }

            _ = cancel.cancelled() => {
                break Ok(());
            }
        }
    };

    restore_terminal(&mut terminal);

    cancel.cancel();
    let _ = reader_task.await;

    result
}

// ---------------------------------------------------------------------------
// Display state
// ---------------------------------------------------------------------------

/// What is currently on screen, re-rendered only when the feed changes.
#[derive(Default)]
struct Screen {
    asks: Option<RenderedList>,
    bids: Option<RenderedList>,
    max: f64,
    feed: FeedState,
}

impl Screen {
    fn update(&mut self, renderer: &mut OrderList<DecimalFormat>, feed: FeedState) {
        if let Some(snapshot) = &feed.snapshot {
            let max_info = snapshot.max_info();
            self.max = max_info.max;
            self.asks = Some(renderer.render(&snapshot.asks, Side::Asks, &max_info, "asks"));
            self.bids = Some(renderer.render(&snapshot.bids, Side::Bids, &max_info, "bids"));
        }
        self.feed = feed;
    }

    fn status(&self, renderer: &OrderList<DecimalFormat>) -> String {
        let mut status = format!(" snapshots: {}", self.feed.received);
        if let (Some(asks), Some(bids)) = (&self.asks, &self.bids) {
            status.push_str(&format!(
                " | levels: {}/{} | max: {} | stops: {} hit {} miss",
                bids.rows.len(),
                asks.rows.len(),
                self.max,
                renderer.cache().hits(),
                renderer.cache().misses(),
            ));
        }
        if self.feed.closed {
            status.push_str(" | input closed");
        }
        if let Some(err) = &self.feed.last_error {
            status.push_str(" | ");
            status.push_str(err);
        }
        status
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

/// Restore terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    let _ = terminal.show_cursor();
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

// ---------------------------------------------------------------------------
// UI rendering
// ---------------------------------------------------------------------------

/// Render the full frame.
fn render_ui(frame: &mut Frame, screen: &Screen, renderer: &OrderList<DecimalFormat>) {
    let area = frame.area();

    // Layout: header (3 rows), books (rest), status (1 row).
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(" ORDERLIST | 10 FPS | 'q' to quit")
        .style(Style::default().fg(Color::White).bg(Color::Blue).bold())
        .alignment(Alignment::Center);
    frame.render_widget(header, main_layout[0]);

    let books = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[1]);

    render_side(frame, books[0], screen.bids.as_ref(), " Bids ");
    render_side(frame, books[1], screen.asks.as_ref(), " Asks ");

    let status = Paragraph::new(screen.status(renderer)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, main_layout[2]);
}

fn render_side(frame: &mut Frame, area: Rect, list: Option<&RenderedList>, title: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());

    match list {
        Some(list) => frame.render_widget(OrderListWidget::new(list).block(block), area),
        None => {
            let waiting = Paragraph::new(Span::styled(
                " waiting for snapshot...",
                Style::default().fg(Color::Yellow),
            ))
            .block(block);
            frame.render_widget(waiting, area);
        }
    }
}

// ---------------------------------------------------------------------------
// Order list widget
// ---------------------------------------------------------------------------

/// Draws a [`RenderedList`]: header line, then one line per row with its
/// depth bar behind the cell text.
pub struct OrderListWidget<'a> {
    list: &'a RenderedList,
    block: Option<Block<'a>>,
}

impl<'a> OrderListWidget<'a> {
    pub fn new(list: &'a RenderedList) -> Self {
        Self { list, block: None }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for OrderListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let side = self.list.side;
        let header_style = Style::default().fg(Color::DarkGray).bold();
        let labels = self.list.header.cells.iter().map(|c| (c.label, header_style));
        draw_cells(buf, inner, inner.y, labels);

        let price_style = Style::default().fg(match side {
            Side::Asks => Color::Red,
            Side::Bids => Color::Green,
        });

        let value_rows = usize::from(inner.height - 1);
        for (i, row) in self.list.rows.iter().take(value_rows).enumerate() {
            let y = inner.y + 1 + i as u16;

            let width = bar_width(row.fill_ratio, inner.width);
            let start = match side {
                Side::Asks => inner.x,
                Side::Bids => inner.right() - width,
            };
            let color = match side {
                Side::Asks => ASK_BAR,
                Side::Bids => BID_BAR,
            };
            for x in start..start + width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(color);
                }
            }

            let cells = row.cells.iter().map(|c| {
                let style = if c.is_price() {
                    price_style
                } else {
                    Style::default()
                };
                (c.text.as_str(), style)
            });
            draw_cells(buf, inner, y, cells);
        }
    }
}

/// Columns of equal width, text right-aligned; the last takes the remainder.
fn draw_cells<'a>(
    buf: &mut Buffer,
    area: Rect,
    y: u16,
    cells: impl ExactSizeIterator<Item = (&'a str, Style)>,
) {
    let count = cells.len() as u16;
    if count == 0 {
        return;
    }
    let col_width = area.width / count;

    for (i, (text, style)) in cells.enumerate() {
        let i = i as u16;
        let x = area.x + i * col_width;
        let width = if i + 1 == count {
            area.right() - x
        } else {
            col_width
        };
        let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let pad = width.saturating_sub(len.saturating_add(1));
        buf.set_stringn(x + pad, y, text, usize::from(width), style);
    }
}

/// Bar length in cells for a fill ratio; non-finite or negative ratios draw
/// nothing.
fn bar_width(ratio: f64, width: u16) -> u16 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    (ratio.min(1.0) * f64::from(width)).round() as u16
}
