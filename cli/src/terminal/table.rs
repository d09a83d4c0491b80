//! The host table. The reported frame height is the number of lines
//! actually written, which is what the redraw logic erases next time.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use jumpr_common::utils::duration;
use jumpr_core::render::Row;
use jumpr_core::watch::FrameHeight;

use crate::terminal::{colors, format};

const HEADERS: [&str; 10] = [
    "N", "ID", "Name", "S", "IP Addr", "Launch", "ICMP", "SSH", "HTTP", "HTTPS",
];

fn cells(row: &Row) -> Vec<Cell> {
    let [icmp, ssh, http, https] = row.probes.map(format::probe_cell);
    vec![
        Cell::new(row.number).fg(colors::ROW_NUMBER),
        Cell::new(&row.short_id),
        Cell::new(&row.name),
        format::state_cell(row.state),
        Cell::new(row.address).fg(colors::ADDRESS),
        Cell::new(duration::compact(row.uptime)),
        icmp,
        ssh,
        http,
        https,
    ]
}

/// Bordered, every column right aligned, no dividers between rows.
fn build(rows: &[Row]) -> Table {
    let header: Vec<Cell> = HEADERS
        .iter()
        .map(|title| Cell::new(title).fg(colors::HEADER).add_attribute(Attribute::Bold))
        .collect();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header);

    // The table goes to stderr; comfy-table only checks stdout on its own.
    if console::colors_enabled_stderr() {
        table.enforce_styling();
    }

    for row in rows {
        table.add_row(cells(row));
    }
    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

pub fn render_lines(rows: &[Row]) -> Vec<String> {
    build(rows).lines().collect()
}

/// Writes the table and returns how many lines it occupies.
pub fn draw<W: Write>(out: &mut W, rows: &[Row]) -> io::Result<FrameHeight> {
    let lines = render_lines(rows);
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(FrameHeight(lines.len()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
