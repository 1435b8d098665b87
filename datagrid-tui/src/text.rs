//! Display-width aware string fitting.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Truncate to `max_width` columns, marking the cut with an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        if width + w > target {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push(ELLIPSIS);
    out
}

/// Pad with spaces to exactly `width` columns, truncating if longer.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_to_width(s, width);
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Fit text into a grid cell of `width` columns, leaving one column of
/// gutter on the right.
pub fn fit_cell(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = pad_to_width(s, width - 1);
    out.push(' ');
    out
}

/// The columns `[offset, offset + width)` of `s`, padded to `width`.
///
/// A wide character cut by either edge becomes spaces.
pub fn slice_columns(s: &str, offset: usize, width: usize) -> String {
    let end = offset + width;
    let mut out = String::new();
    let mut x = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        let next = x + w;
        if next <= offset {
            x = next;
            continue;
        }
        if x >= end {
            break;
        }
        if x < offset || next > end {
            let visible = next.min(end) - x.max(offset);
            out.extend(std::iter::repeat_n(' ', visible));
        } else {
            out.push(ch);
        }
        x = next;
    }
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}
