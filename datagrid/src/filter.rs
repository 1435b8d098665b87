//! Filter engine: free-text query to row inclusion.
//!
//! A row is kept when any data column's rendered text contains the query,
//! ignoring case. Only top-level rows are tested; children of a kept
//! group are not pruned.

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::column::Column;
use crate::value::Row;

/// Case-insensitive substring matcher for one query.
pub struct RowFilter {
    atom: Option<Atom>,
    matcher: Matcher,
}

impl RowFilter {
    /// Build a filter. An empty query matches every row.
    pub fn new(query: &str) -> Self {
        let atom = (!query.is_empty()).then(|| {
            Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Substring,
                false,
            )
        });
        Self {
            atom,
            matcher: Matcher::new(Config::DEFAULT),
        }
    }

    /// Returns `true` if the query is empty.
    pub fn is_identity(&self) -> bool {
        self.atom.is_none()
    }

    /// Test one piece of text.
    pub fn matches_text(&mut self, text: &str) -> bool {
        let Some(atom) = &self.atom else {
            return true;
        };
        let mut buf = Vec::new();
        let haystack = Utf32Str::new(text, &mut buf);
        atom.score(haystack, &mut self.matcher).is_some()
    }

    /// Test a row against every data column. The row-index column is skipped.
    pub fn matches_row(&mut self, row: &Row, columns: &[Column]) -> bool {
        if self.is_identity() {
            return true;
        }
        columns
            .iter()
            .filter(|c| !c.synthetic)
            .any(|c| self.matches_text(&c.value(row).display()))
    }
}

/// Indices of the rows visible under `query`, in input order.
///
/// An empty query returns every index unchanged.
///
/// # Example
///
/// ```
/// use datagrid::column::{register_columns, ColumnDef};
/// use datagrid::config::GridConfig;
/// use datagrid::filter::filter_indices;
/// use datagrid::value::Row;
///
/// let columns = register_columns(&[ColumnDef::new("name", "Name")], &GridConfig::default());
/// let rows = vec![Row::new().set("name", "Apple"), Row::new().set("name", "Banana")];
/// assert_eq!(filter_indices(&rows, &columns, "APP"), vec![0]);
/// assert_eq!(filter_indices(&rows, &columns, ""), vec![0, 1]);
/// ```
pub fn filter_indices(rows: &[Row], columns: &[Column], query: &str) -> Vec<usize> {
    let mut filter = RowFilter::new(query);
    if filter.is_identity() {
        return (0..rows.len()).collect();
    }
    let kept: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| filter.matches_row(row, columns))
        .map(|(index, _)| index)
        .collect();
    log::trace!("filter '{}' kept {}/{} rows", query, kept.len(), rows.len());
    kept
}

/// The rows visible under `query`, borrowed from the input.
pub fn filter_rows<'a>(rows: &'a [Row], columns: &[Column], query: &str) -> Vec<&'a Row> {
    filter_indices(rows, columns, query)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}
