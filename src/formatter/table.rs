//! Table formatting for completion results using tabled

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use super::{Colorizer, EntryRow, escape_control};

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 48;

/// Table formatter for candidate lists and summaries
#[derive(Debug, Clone, Copy)]
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Enable colored output
    use_colors: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    ///
    /// # Arguments
    /// * `use_colors` - Color the header row and candidate names
    pub fn new(use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            use_colors,
        }
    }

    /// Format entries with Catalog, Name, Detail and Insert columns
    pub fn format_rows(&self, rows: &[EntryRow<'_>]) -> String {
        if rows.is_empty() {
            return "(no candidates)".to_string();
        }

        let colorizer = Colorizer::new(self.use_colors);
        let mut builder = Builder::default();
        builder.push_record(["Catalog", "Name", "Detail", "Insert"].map(String::from));
        for row in rows {
            builder.push_record([
                row.catalog.to_string(),
                colorizer.candidate(row.kind, row.name),
                row.detail.to_string(),
                row.insert_template.map(escape_control).unwrap_or_default(),
            ]);
        }

        self.finish(builder, 4)
    }

    /// Format a two-column key/value table
    ///
    /// # Arguments
    /// * `header` - Column titles
    /// * `pairs` - Rows to display
    pub fn format_pairs(&self, header: [&str; 2], pairs: &[(String, String)]) -> String {
        let mut builder = Builder::default();
        builder.push_record(header.map(String::from));
        for (key, value) in pairs {
            builder.push_record([key.clone(), value.clone()]);
        }

        self.finish(builder, 2)
    }

    fn finish(&self, builder: Builder, columns: usize) -> String {
        let mut table: Table = builder.build();
        table.with(Style::modern());

        for i in 0..columns {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }

        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}
