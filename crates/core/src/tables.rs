//! Row-oriented tables for display.
//!
//! The extracted record is shaped into small tables (one row per medication, service entry or
//! unknown term) and rendered as HTML table markup with a leading row-index column. Every cell
//! is HTML-escaped, since cell text comes straight from the model.

use crate::extraction::{ExtractionResult, Medication, ServiceItem};
use std::fmt::Write;

/// Column headings of the pharmacy table, in display order.
pub const PHARMACY_COLUMNS: [&str; 5] = ["Medication", "Dosage", "Unit", "ICD Code", "Frequency"];

/// Column heading of the unknown-terms table.
pub const UNKNOWN_WORDS_COLUMN: &str = "Unknown Words";

/// Column headings of the services table, in display order.
pub const SERVICES_COLUMNS: [&str; 2] = ["Category", "Service"];

/// A table of text cells. Every row has one cell per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with empty cells and dropping extra cells.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an HTML `<table>` carrying `class="dataframe {class}"`.
    pub fn to_html(&self, class: &str) -> String {
        let mut html = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            html,
            "<table border=\"1\" class=\"dataframe {}\">",
            escape_html(class)
        );
        html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n");
        for column in &self.columns {
            let _ = writeln!(html, "      <th>{}</th>", escape_html(column));
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for (index, row) in self.rows.iter().enumerate() {
            html.push_str("    <tr>\n");
            let _ = writeln!(html, "      <th>{}</th>", index);
            for cell in row {
                let _ = writeln!(html, "      <td>{}</td>", escape_html(cell));
            }
            html.push_str("    </tr>\n");
        }
        html.push_str("  </tbody>\n</table>");
        html
    }
}

/// One row per medication, in extraction order.
pub fn pharmacy_table(medications: &[Medication]) -> Table {
    let mut table = Table::new(PHARMACY_COLUMNS);
    for med in medications {
        table.push_row(vec![
            med.name.clone(),
            med.dosage.clone(),
            med.unit.clone(),
            med.icd_code.clone(),
            med.frequency.clone(),
        ]);
    }
    table
}

/// One row per service entry, tests included, labelled with its category.
pub fn services_table(services: &[ServiceItem]) -> Table {
    let mut table = Table::new(SERVICES_COLUMNS);
    for service in services {
        table.push_row(vec![service.category.clone(), service.item.clone()]);
    }
    table
}

/// One row per unknown term.
pub fn unknown_terms_table(terms: &[String]) -> Table {
    let mut table = Table::new([UNKNOWN_WORDS_COLUMN]);
    for term in terms {
        table.push_row(vec![term.clone()]);
    }
    table
}

/// Display-ready view of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub status: String,
    pub pharmacy: Table,
    pub services: Table,
    pub unknown_words: Table,
}

impl From<&ExtractionResult> for ResultView {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            status: result.status.clone(),
            pharmacy: pharmacy_table(&result.medications),
            services: services_table(&result.services),
            unknown_words: unknown_terms_table(&result.unknown_terms),
        }
    }
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
