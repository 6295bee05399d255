use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Row as ComfyRow, Table};
use serde::Serialize;
use terminal_size::{Width as TermWidth, terminal_size};

use super::{Cli, OutputFormat};

/// A row of `clientgen` tabular output.
pub(super) trait TableRow {
    const HEADERS: &'static [&'static str];
    fn cells(&self) -> Vec<Cell>;
}

/// Result of one `generate` run.
#[derive(Debug, Clone, Serialize)]
pub(super) struct GeneratedRow {
    pub target: String,
    pub path: String,
    pub operations: usize,
    pub status: &'static str,
}

impl TableRow for GeneratedRow {
    const HEADERS: &'static [&'static str] = &["target", "path", "operations", "status"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::new(&self.target),
            Cell::new(&self.path),
            Cell::new(self.operations),
            Cell::new(self.status),
        ]
    }
}

fn table_width() -> Option<u16> {
    if let Ok(cols) = std::env::var("COLUMNS")
        && let Ok(v) = cols.parse::<u16>()
    {
        return Some(v);
    }
    terminal_size().map(|(TermWidth(w), _)| w)
}

/// Prints `rows` as pretty JSON or as a table, per `--output`.
pub(super) fn print_rows<T: Serialize + TableRow>(cli: &Cli, rows: &[T]) -> anyhow::Result<()> {
    if cli.output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth);
    if let Some(w) = table_width() {
        table.set_width(w);
    }

    let color = super::should_color(cli);
    table.set_header(ComfyRow::from(
        T::HEADERS
            .iter()
            .map(|h| {
                let cell = Cell::new(h);
                if color {
                    cell.add_attribute(Attribute::Bold).fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>(),
    ));
    for row in rows {
        table.add_row(ComfyRow::from(row.cells()));
    }
    println!("{table}");
    Ok(())
}
