//! Sort engine: type-aware row comparison.
//!
//! [`compare`] dispatches on the column kind. Direction is applied by the
//! caller ([`sort_indices`]) by reversing the comparator result, except
//! that absent dates stay last in both directions.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};

use crate::column::{Column, ColumnKind};
use crate::value::{Row, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort: one column and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Compare two rows by a column.
///
/// The result is the ascending order; callers reverse it for descending.
/// `descending` is only consulted to keep absent dates last after that
/// reversal.
pub fn compare(a: &Row, b: &Row, column: &Column, descending: bool, date_format: &str) -> Ordering {
    let va = column.value(a);
    let vb = column.value(b);
    match column.kind {
        ColumnKind::Date => compare_dates(&va, &vb, descending, date_format),
        ColumnKind::Generic => compare_generic(&va, &vb),
    }
}

/// Sort row indices in place by a column. Stable.
pub fn sort_indices(
    rows: &[Row],
    indices: &mut [usize],
    column: &Column,
    direction: SortDirection,
    date_format: &str,
) {
    let descending = direction.is_descending();
    indices.sort_by(|&a, &b| {
        let ordering = compare(&rows[a], &rows[b], column, descending, date_format);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

// =============================================================================
// Dates
// =============================================================================

/// Parse a date cell. Anything not matching the format is absent.
pub fn parse_date(value: &Value, format: &str) -> Option<NaiveDateTime> {
    let Value::String(text) = value else {
        return None;
    };
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn compare_dates(a: &Value, b: &Value, descending: bool, format: &str) -> Ordering {
    match (parse_date(a, format), parse_date(b, format)) {
        (None, None) => Ordering::Equal,
        // Absent sorts last; pre-invert when the caller will reverse.
        (None, Some(_)) => {
            if descending {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (Some(_), None) => {
            if descending {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

// =============================================================================
// Generic
// =============================================================================

/// Numbers order by magnitude and rank before every other value, which
/// orders naturally by its rendered text.
fn compare_generic(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_natural(&a.display(), &b.display()),
    }
}

/// Case-insensitive alphanumeric comparison with numeric digit runs.
///
/// `"item2" < "item10"`. Strings that tie (case or leading zeros only)
/// fall back to code-point order.
pub fn compare_natural(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();

    loop {
        let (ca, cb) = match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => (ca, cb),
        };

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let run_a = take_digits(&mut ai);
            let run_b = take_digits(&mut bi);
            let ordering = compare_digit_runs(&run_a, &run_b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        } else {
            let ordering = ca.to_lowercase().cmp(cb.to_lowercase());
            if ordering != Ordering::Equal {
                return ordering;
            }
            ai.next();
            bi.next();
        }
    }

    a.cmp(b)
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

/// Compare digit strings by magnitude without parsing (no overflow).
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_runs_compare_by_magnitude() {
        assert_eq!(compare_digit_runs("2", "10"), Ordering::Less);
        assert_eq!(compare_digit_runs("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_digit_runs("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_take_digits_stops_at_letter() {
        let mut chars = "42abc".chars().peekable();
        assert_eq!(take_digits(&mut chars), "42");
        assert_eq!(chars.next(), Some('a'));
    }
}
