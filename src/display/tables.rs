//! Table formatting utilities for structured output.

use comfy_table::{
    Attribute, Cell, CellAlignment, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_FULL,
};

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        // Apply rounded corners
        table.apply_modifier(UTF8_ROUND_CORNERS);
        // Long member lists wrap instead of overflowing the terminal
        table.set_content_arrangement(ContentArrangement::Dynamic);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Right-align a column, used for counts and scores.
    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(column) = self.table.column_mut(column) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Add several rows at once.
    pub fn add_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        for row in rows {
            self.table.add_row(row);
        }
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// Joins names for a single table cell, keeping at most `limit` of them.
pub fn join_limited<'a, I>(names: I, total: usize, limit: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut joined = names.into_iter().take(limit).collect::<Vec<_>>().join(", ");
    if total > limit {
        joined.push_str(&format!(", … (+{})", total - limit));
    }
    joined
}
