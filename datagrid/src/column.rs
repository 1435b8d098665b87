//! Column registry: normalizes a caller schema into render-ready columns.
//!
//! [`register_columns`] is a pure transform. It injects the synthetic
//! row-index column unless a column with [`ROW_INDEX_ID`] is already
//! present, pins that column first, and fills in default sizing.
//!
//! Duplicate column identities are a caller precondition violation and
//! are not detected.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::config::GridConfig;
use crate::error::GridError;
use crate::value::{Row, Value};

/// Reserved identity of the synthetic row-index column.
pub const ROW_INDEX_ID: &str = "__row_index";

/// Header label of the row-index column.
pub const ROW_INDEX_LABEL: &str = "#";

/// Semantic type of a column, selects the sort comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Natural alphanumeric ordering.
    #[default]
    Generic,
    /// Chronological ordering of values parsed with the date format.
    Date,
}

/// Maps a row to a cell value.
#[derive(Clone)]
pub enum Accessor {
    /// Read a field of the row by key.
    Field(String),
    /// Compute the value from the whole row.
    Computed(Arc<dyn Fn(&Row) -> Value + Send + Sync>),
}

impl Accessor {
    /// Accessor computed by a closure.
    pub fn computed(f: impl Fn(&Row) -> Value + Send + Sync + 'static) -> Self {
        Accessor::Computed(Arc::new(f))
    }

    /// Read the value for a row. Missing fields read as null.
    pub fn read(&self, row: &Row) -> Value {
        match self {
            Accessor::Field(key) => row.get(key).clone(),
            Accessor::Computed(f) => f(row),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(key) => f.debug_tuple("Field").field(key).finish(),
            Accessor::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// =============================================================================
// Link templates
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart {
    Literal(String),
    Field(String),
}

/// URL template with `{field}` placeholders filled from the row.
///
/// ```
/// use datagrid::column::LinkTemplate;
/// use datagrid::value::Row;
///
/// let template = LinkTemplate::parse("https://example.com/items/{id}").unwrap();
/// let row = Row::new().set("id", 42i64);
/// assert_eq!(template.expand(&row).as_deref(), Some("https://example.com/items/42"));
/// assert_eq!(template.expand(&Row::new()), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    source: String,
    parts: Vec<TemplatePart>,
}

impl LinkTemplate {
    /// Parse a template. Placeholders must be closed and non-empty.
    pub fn parse(template: &str) -> Result<Self, GridError> {
        let mut parts = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            if open > 0 {
                parts.push(TemplatePart::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(GridError::invalid_link_template(template));
            };
            let field = after[..close].trim();
            if field.is_empty() {
                return Err(GridError::invalid_link_template(template));
            }
            parts.push(TemplatePart::Field(field.to_string()));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            parts.push(TemplatePart::Literal(rest.to_string()));
        }
        Ok(Self {
            source: template.to_string(),
            parts,
        })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Expand against a row.
    ///
    /// Returns `None` if any placeholder is empty or the result is not an
    /// absolute URL.
    pub fn expand(&self, row: &Row) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Literal(text) => out.push_str(text),
                TemplatePart::Field(field) => {
                    let value = row.get(field).display();
                    if value.is_empty() {
                        return None;
                    }
                    out.push_str(&value);
                }
            }
        }
        if out.is_empty() || Url::parse(&out).is_err() {
            return None;
        }
        Some(out)
    }
}

// =============================================================================
// Cells
// =============================================================================

/// Rendered content of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Plain text.
    Text(String),
    /// Text linking to an external URL.
    Link { text: String, href: String },
}

impl CellContent {
    /// The visible text of the cell.
    pub fn text(&self) -> &str {
        match self {
            CellContent::Text(text) => text,
            CellContent::Link { text, .. } => text,
        }
    }

    /// The link target, if this cell is a link.
    pub fn href(&self) -> Option<&str> {
        match self {
            CellContent::Text(_) => None,
            CellContent::Link { href, .. } => Some(href),
        }
    }
}

// =============================================================================
// Column definitions
// =============================================================================

/// Caller-supplied column schema entry.
///
/// # Examples
///
/// ```
/// use datagrid::column::ColumnDef;
///
/// let columns = vec![
///     ColumnDef::new("name", "Name"),
///     ColumnDef::new("created", "Created").date().width(120),
///     ColumnDef::new("notes", "Notes").sortable(false),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub id: String,
    pub label: String,
    /// Defaults to reading the field named like the column id.
    pub accessor: Option<Accessor>,
    pub kind: ColumnKind,
    pub width: Option<u16>,
    pub min_width: Option<u16>,
    pub sortable: bool,
    pub link: Option<LinkTemplate>,
}

impl ColumnDef {
    /// Create a sortable generic column.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            accessor: None,
            kind: ColumnKind::Generic,
            width: None,
            min_width: None,
            sortable: true,
            link: None,
        }
    }

    /// Set the accessor.
    pub fn accessor(mut self, accessor: Accessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    /// Mark the column as holding dates.
    pub fn date(mut self) -> Self {
        self.kind = ColumnKind::Date;
        self
    }

    /// Set the initial width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the minimum width.
    pub fn min_width(mut self, min_width: u16) -> Self {
        self.min_width = Some(min_width);
        self
    }

    /// Set whether header clicks sort by this column.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Render cells as links built from this template.
    pub fn link(mut self, template: LinkTemplate) -> Self {
        self.link = Some(template);
        self
    }
}

impl From<&Column> for ColumnDef {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id.clone(),
            label: column.label.clone(),
            accessor: Some(column.accessor.clone()),
            kind: column.kind,
            width: Some(column.width),
            min_width: Some(column.min_width),
            sortable: column.sortable,
            link: column.link.clone(),
        }
    }
}

/// A normalized column.
#[derive(Debug, Clone)]
pub struct Column {
    pub id: String,
    pub label: String,
    pub accessor: Accessor,
    pub kind: ColumnKind,
    /// Default width before any resize.
    pub width: u16,
    /// Resizes never go below this.
    pub min_width: u16,
    pub sortable: bool,
    pub link: Option<LinkTemplate>,
    /// Only the injected row-index column is synthetic.
    pub synthetic: bool,
}

impl Column {
    fn row_index(width: u16) -> Self {
        Self {
            id: ROW_INDEX_ID.to_string(),
            label: ROW_INDEX_LABEL.to_string(),
            accessor: Accessor::Field(ROW_INDEX_ID.to_string()),
            kind: ColumnKind::Generic,
            width,
            min_width: width,
            sortable: false,
            link: None,
            synthetic: true,
        }
    }

    fn from_def(def: &ColumnDef, config: &GridConfig) -> Self {
        let min_width = def.min_width.unwrap_or(config.min_width);
        let width = def.width.unwrap_or(config.default_width).max(min_width);
        Self {
            id: def.id.clone(),
            label: def.label.clone(),
            accessor: def
                .accessor
                .clone()
                .unwrap_or_else(|| Accessor::Field(def.id.clone())),
            kind: def.kind,
            width,
            min_width,
            sortable: def.sortable,
            link: def.link.clone(),
            synthetic: false,
        }
    }

    /// Read this column's value from a row.
    pub fn value(&self, row: &Row) -> Value {
        self.accessor.read(row)
    }

    /// Render the cell for a row at a position in the produced sequence.
    ///
    /// The row-index column shows the 1-based position. Columns with a link
    /// template render a link when the template expands for this row.
    pub fn render(&self, row: &Row, position: usize) -> CellContent {
        if self.synthetic {
            return CellContent::Text((position + 1).to_string());
        }
        let text = self.value(row).display();
        match self.link.as_ref().and_then(|t| t.expand(row)) {
            Some(href) => CellContent::Link { text, href },
            None => CellContent::Text(text),
        }
    }

    /// Whether the column can be picked up for reordering.
    pub fn is_draggable(&self) -> bool {
        !self.synthetic
    }
}

/// Normalize a column schema.
///
/// Injects the row-index column when no column carries [`ROW_INDEX_ID`],
/// moves it to the front either way, and applies default sizing. Feeding
/// the output back in (via `ColumnDef::from`) yields the same columns.
pub fn register_columns(schema: &[ColumnDef], config: &GridConfig) -> Vec<Column> {
    let ids: HashSet<&str> = schema.iter().map(|c| c.id.as_str()).collect();
    let injected = !ids.contains(ROW_INDEX_ID);

    let mut columns = Vec::with_capacity(schema.len() + 1);
    columns.push(Column::row_index(config.row_index_width));

    for def in schema {
        if def.id == ROW_INDEX_ID {
            let width = def.width.unwrap_or(config.row_index_width);
            columns[0] = Column::row_index(width);
        } else {
            columns.push(Column::from_def(def, config));
        }
    }

    log::debug!(
        "registered {} columns (row index injected: {})",
        columns.len(),
        injected
    );
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parts() {
        let template = LinkTemplate::parse("https://x.test/{org}/{ id }?q=1").unwrap();
        assert_eq!(
            template.parts,
            vec![
                TemplatePart::Literal("https://x.test/".into()),
                TemplatePart::Field("org".into()),
                TemplatePart::Literal("/".into()),
                TemplatePart::Field("id".into()),
                TemplatePart::Literal("?q=1".into()),
            ]
        );
    }

    #[test]
    fn test_template_rejects_unclosed_and_empty() {
        assert!(LinkTemplate::parse("https://x.test/{id").is_err());
        assert!(LinkTemplate::parse("https://x.test/{}").is_err());
    }

    #[test]
    fn test_template_requires_absolute_url() {
        let template = LinkTemplate::parse("{path}").unwrap();
        let row = Row::new().set("path", "relative/thing");
        assert_eq!(template.expand(&row), None);

        let row = Row::new().set("path", "https://x.test/a");
        assert_eq!(template.expand(&row).as_deref(), Some("https://x.test/a"));
    }
}
