use std::io::Write;
use std::path::Path;

use ladder::{render_list, RenderedList};
use tracing::debug;

use crate::config::{OutputFormat, RenderConfig};
use crate::error::Result;
use crate::snapshot;

/// Load one snapshot, render the configured sides and write them to stdout.
pub fn run_render(config: &RenderConfig, input: Option<&Path>) -> Result<()> {
    let snapshot = snapshot::load(input)?;
    let max_info = snapshot.max_info();
    let fmt = config.decimal_format();

    let lists: Vec<RenderedList> = config
        .sides
        .sides()
        .iter()
        .map(|&side| {
            render_list(
                snapshot.levels(side),
                side,
                &max_info,
                &config.class_name,
                &fmt,
            )
        })
        .collect();

    debug!(
        lists = lists.len(),
        max = max_info.max,
        format = ?config.format,
        "rendered"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_lists(&lists, config.format, &mut out)
}

/// Write rendered lists in the requested format.
pub fn write_lists<W: Write>(
    lists: &[RenderedList],
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    let mut buf = String::new();

    match format {
        OutputFormat::Json => {
            match lists {
                [single] => serde_json::to_writer_pretty(&mut *writer, single)?,
                _ => serde_json::to_writer_pretty(&mut *writer, lists)?,
            }
            writer.write_all(b"\n")?;
            writer.flush()?;
            return Ok(());
        }
        OutputFormat::Text => {
            for (i, list) in lists.iter().enumerate() {
                if i > 0 {
                    buf.push('\n');
                }
                if lists.len() > 1 {
                    buf.push_str(list.side.as_str());
                    buf.push('\n');
                }
                push_text(&mut buf, list);
            }
        }
        OutputFormat::Tsv => {
            for list in lists {
                push_tsv(&mut buf, list);
            }
        }
        OutputFormat::Html => {
            for list in lists {
                push_html(&mut buf, list);
            }
        }
    }

    writer.write_all(buf.as_bytes())?;
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Right-aligned columns, two spaces apart.
fn push_text(buf: &mut String, list: &RenderedList) {
    let mut widths: Vec<usize> = list
        .header
        .cells
        .iter()
        .map(|c| c.label.chars().count())
        .collect();
    for row in &list.rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.text.chars().count());
        }
    }

    push_text_line(buf, &widths, list.header.cells.iter().map(|c| c.label));
    for row in &list.rows {
        push_text_line(buf, &widths, row.cells.iter().map(|c| c.text.as_str()));
    }
}

fn push_text_line<'a>(buf: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    for (i, (text, &width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            buf.push_str("  ");
        }
        let pad = width.saturating_sub(text.chars().count());
        buf.extend(std::iter::repeat(' ').take(pad));
        buf.push_str(text);
    }
    buf.push('\n');
}

// ---------------------------------------------------------------------------
// TSV
// ---------------------------------------------------------------------------

/// side \t cell \t cell \t cell, header line first.
fn push_tsv(buf: &mut String, list: &RenderedList) {
    let side = list.side.as_str();

    buf.push_str(side);
    for cell in &list.header.cells {
        buf.push('\t');
        buf.push_str(cell.label);
    }
    buf.push('\n');

    for row in &list.rows {
        buf.push_str(side);
        for cell in &row.cells {
            buf.push('\t');
            buf.push_str(&cell.text);
        }
        buf.push('\n');
    }
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn push_html(buf: &mut String, list: &RenderedList) {
    buf.push_str("<ul class=\"");
    push_classes(buf, &list.classes);
    buf.push_str("\">\n");

    buf.push_str("  <li class=\"");
    push_classes(buf, &list.header.classes);
    buf.push_str("\">");
    for cell in &list.header.cells {
        buf.push_str("<div class=\"");
        push_classes(buf, &cell.classes);
        buf.push_str("\">");
        push_escaped(buf, cell.label);
        buf.push_str("</div>");
    }
    buf.push_str("</li>\n");

    for row in &list.rows {
        buf.push_str("  <li class=\"");
        push_classes(buf, &row.classes);
        buf.push_str("\" style=\"--stop: ");
        push_escaped(buf, &row.style.stop);
        buf.push_str("\">");
        for cell in &row.cells {
            buf.push_str("<div class=\"");
            push_classes(buf, &cell.classes);
            buf.push_str("\">");
            push_escaped(buf, &cell.text);
            buf.push_str("</div>");
        }
        buf.push_str("</li>\n");
    }

    buf.push_str("</ul>\n");
}

fn push_classes(buf: &mut String, classes: &[String]) {
    for (i, class) in classes.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        push_escaped(buf, class);
    }
}

fn push_escaped(buf: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            _ => buf.push(ch),
        }
    }
}
