//! Column and filter definitions supplied by each listing.

use chrono::{DateTime, NaiveDate};
use phonenumber::Mode;
use serde::Serialize;
use serde_json::Value;

/// One record as returned by the backend.
pub type Row = serde_json::Map<String, Value>;

/// Custom cell renderer receiving the whole row.
pub type CellRenderer = fn(&Row) -> String;
/// Custom header renderer.
pub type HeaderRenderer = fn() -> String;

/// Built-in value formatting applied when a column has no custom renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    #[default]
    Text,
    Currency,
    Date,
    DateTime,
    Boolean,
    Phone,
    /// Rich text reduced to its plain-text content.
    Html,
    /// Short status value rendered as a label.
    Badge,
}

#[derive(Clone, Debug)]
pub enum Header {
    Text(String),
    Render(HeaderRenderer),
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    /// Dotted accessor path into the row, e.g. `customer.email`.
    pub id: String,
    pub header: Header,
    pub cell: Option<CellRenderer>,
    pub format: CellFormat,
    pub enable_sorting: bool,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: Header::Text(header.into()),
            cell: None,
            format: CellFormat::Text,
            enable_sorting: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.enable_sorting = true;
        self
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    pub fn cell(mut self, renderer: CellRenderer) -> Self {
        self.cell = Some(renderer);
        self
    }

    pub fn render_header(mut self, renderer: HeaderRenderer) -> Self {
        self.header = Header::Render(renderer);
        self
    }

    pub fn header_text(&self) -> String {
        match &self.header {
            Header::Text(text) => text.clone(),
            Header::Render(render) => render(),
        }
    }

    /// Looks the column's value up in `row`, following dots into nested
    /// objects.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        let mut segments = self.id.split('.');
        let first = segments.next()?;
        segments.try_fold(row.get(first)?, |value, segment| value.get(segment))
    }

    pub fn render_cell(&self, row: &Row) -> String {
        if let Some(render) = self.cell {
            return render(row);
        }
        self.value(row)
            .map(|value| format_value(value, self.format))
            .unwrap_or_default()
    }
}

/// Formats a JSON value for display.
pub fn format_value(value: &Value, format: CellFormat) -> String {
    match (format, value) {
        (_, Value::Null) => String::new(),
        (CellFormat::Currency, value) => as_f64(value)
            .map(|amount| format!("{amount:.2}"))
            .unwrap_or_else(|| plain(value)),
        (CellFormat::Date, Value::String(raw)) => parse_timestamp(raw)
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.format("%Y-%m-%d").to_string())
            })
            .unwrap_or_else(|| raw.clone()),
        (CellFormat::DateTime, Value::String(raw)) => parse_timestamp(raw)
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| raw.clone()),
        (CellFormat::Boolean, Value::Bool(true)) => "Yes".to_string(),
        (CellFormat::Boolean, Value::Bool(false)) => "No".to_string(),
        (CellFormat::Phone, Value::String(raw)) => phonenumber::parse(None, raw.trim())
            .map(|number| number.format().mode(Mode::International).to_string())
            .unwrap_or_else(|_| raw.clone()),
        (CellFormat::Html, Value::String(raw)) => ammonia::Builder::empty()
            .clean(raw)
            .to_string()
            .trim()
            .to_string(),
        (_, value) => plain(value),
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<chrono::FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Widget used for the filter value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FilterKind {
    Text,
    Select(Vec<SelectOption>),
}

/// A field the user may pick in the filter-by selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub field: String,
    pub label: String,
    pub kind: FilterKind,
}

impl FilterOption {
    pub fn text(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            kind: FilterKind::Text,
        }
    }

    pub fn select(
        field: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            kind: FilterKind::Select(options),
        }
    }
}
