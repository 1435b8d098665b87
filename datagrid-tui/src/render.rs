//! Paint the grid render model onto the terminal.
//!
//! [`compose`] turns a [`GridView`] into screen lines of styled segments;
//! [`paint`] writes them with crossterm. Every composed line is exactly
//! the screen width, so painting never needs a clear.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use datagrid::column::{CellContent, ROW_INDEX_ID};
use datagrid::grid::{Body, GridView, HeaderCell, Populated, RenderedRow};
use datagrid::sort::SortDirection;
use datagrid::window::{Stripe, row_top};

use crate::app::App;
use crate::text::{display_width, fit_cell, pad_to_width, slice_columns};

/// Visual role of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Muted,
    Alert,
    Header,
    Focused,
    Even,
    Odd,
    Parent,
    Leaf,
    Link,
    Thumb,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
}

impl Segment {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

pub type Line = Vec<Segment>;

const HINTS: &str = "/ search  ←→ column  ⏎ sort  +/- width  </> move  space group  q quit";

// =============================================================================
// Compose
// =============================================================================

/// Compose a full screen of `height` lines, each `width` cells wide.
pub fn compose(app: &App, width: u16, height: u16) -> Vec<Line> {
    let width = usize::from(width);
    let height = usize::from(height);
    let mut lines = Vec::with_capacity(height);
    lines.push(search_line(app, width));

    match app.grid().view(app.scrollbar_width()) {
        GridView::Loading => lines.push(vec![Segment::new(pad_to_width("Loading…", width), Tone::Muted)]),
        GridView::Empty { message } => {
            lines.push(vec![Segment::new(pad_to_width(message, width), Tone::Alert)]);
        }
        GridView::Populated(view) => compose_populated(app, &view, width, height, &mut lines),
    }

    while lines.len() < height {
        lines.push(vec![Segment::new(" ".repeat(width), Tone::Plain)]);
    }
    lines.truncate(height);
    lines
}

fn search_line(app: &App, width: usize) -> Line {
    let query = app.grid().query();
    let (text, tone) = if app.is_searching() {
        (format!("/{}▏", query), Tone::Focused)
    } else if !query.is_empty() {
        (format!("filter: {}  (esc clears)", query), Tone::Muted)
    } else {
        (HINTS.to_string(), Tone::Muted)
    };
    vec![Segment::new(pad_to_width(&text, width), tone)]
}

fn compose_populated(
    app: &App,
    view: &Populated,
    width: usize,
    height: usize,
    lines: &mut Vec<Line>,
) {
    let scrollbar = usize::from(app.scrollbar_width()).min(width);
    let content = width - scrollbar;
    let offset = app.h_offset() as usize;
    let config = app.grid().config();
    let body_rows = height.saturating_sub(3);

    let header: Line = view
        .header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let tone = if i == app.cursor() { Tone::Focused } else { Tone::Header };
            Segment::new(fit_cell(&header_label(cell), usize::from(cell.width)), tone)
        })
        .collect();
    let mut header = clip(&header, offset, content);
    header.push(Segment::new(" ".repeat(scrollbar), Tone::Header));
    lines.push(header);

    // Place each materialized row by its offset from the top of the viewport.
    let mut body: Vec<Option<Line>> = vec![None; body_rows];
    let row_height = config.row_height.max(1);
    let scroll = app.grid().scroll_offset();
    let rows: Vec<&RenderedRow> = match &view.body {
        Body::Direct(rows) => rows.iter().collect(),
        Body::Windowed(windowed) => windowed.rows.iter().map(|r| &r.row).collect(),
    };
    for row in rows {
        let top = row_top(row.position, row_height);
        if top < scroll {
            continue;
        }
        let y = ((top - scroll) / u32::from(row_height)) as usize;
        if let Some(slot) = body.get_mut(y) {
            *slot = Some(clip(&row_line(view, row), offset, content));
        }
    }

    let content_rows = row_top(app.grid().row_count(), row_height);
    let thumb = thumb_range(content_rows, scroll, body_rows);
    for (y, line) in body.into_iter().enumerate() {
        let mut line = line.unwrap_or_else(|| vec![Segment::new(" ".repeat(content), Tone::Plain)]);
        let tone = if thumb.contains(&y) { Tone::Thumb } else { Tone::Plain };
        line.push(Segment::new(" ".repeat(scrollbar), tone));
        lines.push(line);
    }

    let mut footer = view.footer.clone();
    if let Some(sort) = app.grid().sort() {
        let arrow = direction_arrow(sort.direction);
        footer.push_str(&format!("  ·  sorted by {} {}", sort.column_id, arrow));
    }
    lines.push(vec![Segment::new(pad_to_width(&footer, width), Tone::Muted)]);
}

fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

fn header_label(cell: &HeaderCell) -> String {
    match cell.sort {
        Some(direction) => format!("{} {}", cell.label, direction_arrow(direction)),
        None => cell.label.clone(),
    }
}

fn row_line(view: &Populated, row: &RenderedRow) -> Line {
    let stripe = match row.stripe {
        Stripe::Even => Tone::Even,
        Stripe::Odd => Tone::Odd,
        Stripe::Parent => Tone::Parent,
        Stripe::Leaf => Tone::Leaf,
    };
    let first_data = view.header.iter().position(|h| h.column_id != ROW_INDEX_ID);

    view.header
        .iter()
        .zip(&row.cells)
        .enumerate()
        .map(|(i, (header, cell))| {
            let mut text = String::new();
            if Some(i) == first_data {
                text.push_str(&"  ".repeat(row.depth));
                if row.has_children {
                    text.push_str(if row.expanded { "▾ " } else { "▸ " });
                }
            }
            text.push_str(cell.text());
            let tone = match cell {
                CellContent::Link { .. } => Tone::Link,
                CellContent::Text(_) => stripe,
            };
            Segment::new(fit_cell(&text, usize::from(header.width)), tone)
        })
        .collect()
}

/// Keep columns `[offset, offset + width)` of a segmented line.
fn clip(line: &Line, offset: usize, width: usize) -> Line {
    let mut out = Vec::new();
    let mut x = 0;
    let end = offset + width;
    for segment in line {
        let w = display_width(&segment.text);
        let (start, stop) = (x, x + w);
        x = stop;
        if stop <= offset || start >= end {
            continue;
        }
        let from = offset.saturating_sub(start);
        let to = stop.min(end) - start;
        out.push(Segment::new(slice_columns(&segment.text, from, to - from), segment.tone));
    }
    let used: usize = out.iter().map(|s| display_width(&s.text)).sum();
    if used < width {
        out.push(Segment::new(" ".repeat(width - used), Tone::Plain));
    }
    out
}

/// Body lines covered by the scrollbar thumb.
fn thumb_range(content: u32, scroll: u32, viewport: usize) -> std::ops::Range<usize> {
    let lines = viewport as u64;
    let (content, scroll) = (u64::from(content), u64::from(scroll));
    if lines == 0 || content <= lines {
        return 0..0;
    }
    let size = (lines * lines / content).max(1);
    let start = (scroll * lines / content).min(lines - size);
    start as usize..(start + size) as usize
}

// =============================================================================
// Paint
// =============================================================================

fn apply_tone(out: &mut impl Write, tone: Tone) -> io::Result<()> {
    match tone {
        Tone::Plain | Tone::Even | Tone::Leaf => Ok(()),
        Tone::Muted => queue!(out, SetForegroundColor(Color::DarkGrey)),
        Tone::Alert => queue!(out, SetForegroundColor(Color::Red)),
        Tone::Header => queue!(out, SetAttribute(Attribute::Bold)),
        Tone::Focused => queue!(out, SetAttribute(Attribute::Bold), SetAttribute(Attribute::Reverse)),
        Tone::Odd => queue!(out, SetBackgroundColor(Color::AnsiValue(236))),
        Tone::Parent => queue!(out, SetAttribute(Attribute::Bold), SetBackgroundColor(Color::AnsiValue(237))),
        Tone::Link => queue!(out, SetForegroundColor(Color::Cyan), SetAttribute(Attribute::Underlined)),
        Tone::Thumb => queue!(out, SetBackgroundColor(Color::Grey)),
    }
}

/// Write composed lines to the terminal.
pub fn paint(out: &mut impl Write, lines: &[Line]) -> io::Result<()> {
    for (y, line) in lines.iter().enumerate() {
        let Ok(y) = u16::try_from(y) else { break };
        queue!(out, MoveTo(0, y))?;
        for segment in line {
            apply_tone(out, segment.tone)?;
            queue!(out, Print(&segment.text), SetAttribute(Attribute::Reset), ResetColor)?;
        }
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid::column::ColumnDef;
    use datagrid::grid::{Grid, GridProps};
    use datagrid::value::Row;

    use crate::config::cell_defaults;

    fn text(line: &Line) -> String {
        line.iter().map(|s| s.text.as_str()).collect()
    }

    fn app(rows: Vec<Row>, terminal_rows: u16) -> App {
        let grid = Grid::with_config(
            GridProps::new(rows, vec![ColumnDef::new("name", "Name")]),
            cell_defaults(terminal_rows),
        );
        App::new(grid, 1)
    }

    #[test]
    fn test_lines_fill_the_screen() {
        let rows = (0..40).map(|i| Row::new().set("name", format!("r{}", i))).collect();
        let app = app(rows, 12);
        let lines = compose(&app, 30, 12);
        assert_eq!(lines.len(), 12);
        for line in &lines {
            assert_eq!(display_width(&text(line)), 30);
        }
    }

    #[test]
    fn test_header_and_rows() {
        let rows = vec![Row::new().set("name", "beta"), Row::new().set("name", "alpha")];
        let app = app(rows, 10);
        let lines = compose(&app, 30, 10);
        assert!(text(&lines[1]).starts_with("#    Name ▲"));
        assert!(text(&lines[2]).starts_with("1    alpha"));
        assert!(text(&lines[3]).starts_with("2    beta"));
        assert!(text(&lines[9]).starts_with("2 results"));
    }

    #[test]
    fn test_empty_message() {
        let app = app(Vec::new(), 10);
        let lines = compose(&app, 40, 10);
        assert!(text(&lines[1]).starts_with("No matching records found"));
    }

    #[test]
    fn test_groups_are_marked_and_indented() {
        let rows = vec![Row::new().set("name", "g").child(Row::new().set("name", "c"))];
        let app = app(rows, 10);
        let lines = compose(&app, 30, 10);
        assert!(text(&lines[2]).starts_with("1    ▾ g"));
        assert!(text(&lines[3]).starts_with("2      c"));
        assert_eq!(lines[2][1].tone, Tone::Parent);
    }

    #[test]
    fn test_clip_cuts_segments() {
        let line = vec![Segment::new("abcd", Tone::Plain), Segment::new("efgh", Tone::Link)];
        let clipped = clip(&line, 2, 4);
        assert_eq!(text(&clipped), "cdef");
        assert_eq!(clipped[1].tone, Tone::Link);
        assert_eq!(text(&clip(&line, 6, 4)), "gh  ");
    }

    #[test]
    fn test_thumb() {
        assert_eq!(thumb_range(10, 0, 10), 0..0);
        assert_eq!(thumb_range(100, 0, 10), 0..1);
        assert_eq!(thumb_range(100, 90, 10), 9..10);
    }
}
