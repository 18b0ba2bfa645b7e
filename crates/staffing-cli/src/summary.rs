//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use staffing_core::{CoverageReport, CoverageRow, CoverageStatus, OccupancyRow};
use staffing_ingest::format_numeric;
use staffing_model::{Shift, StaffMember, TIMESTAMP_FORMAT, TransferRecord, TransferStatus};

pub fn coverage_table<'a>(rows: impl IntoIterator<Item = &'a CoverageRow>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Servicio"),
        header_cell("Turno"),
        header_cell("Requerido"),
        header_cell("Presente"),
        header_cell("Diferencia"),
        header_cell("Ratio"),
        header_cell("Estado"),
    ]);
    apply_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_required = 0u32;
    let mut total_present = 0u32;
    for row in rows {
        total_required += row.required;
        total_present += row.present;
        table.add_row(vec![
            Cell::new(&row.service),
            Cell::new(row.shift.label()),
            Cell::new(row.required),
            Cell::new(row.present),
            difference_cell(row.difference),
            ratio_cell(row.ratio),
            status_cell(row.status),
        ]);
    }
    let difference = i64::from(total_present) - i64::from(total_required);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_required).add_attribute(Attribute::Bold),
        Cell::new(total_present).add_attribute(Attribute::Bold),
        difference_cell(difference),
        dim_cell("-"),
        status_cell(CoverageStatus::from_difference(difference)),
    ]);
    table
}

/// One line per status with its row count, e.g. `Déficit: 2`.
pub fn status_counts(report: &CoverageReport) -> String {
    CoverageStatus::ALL
        .iter()
        .map(|status| format!("{}: {}", status.label(), report.count(*status)))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn occupancy_table(rows: &[OccupancyRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Servicio"),
        header_cell("Camas"),
        header_cell("Pacientes"),
        header_cell("Esperados"),
        header_cell("Ocupación"),
        header_cell("Libres"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows {
        let free = row.free_beds();
        table.add_row(vec![
            Cell::new(&row.service),
            Cell::new(row.beds),
            Cell::new(row.current),
            Cell::new(row.expected),
            match row.rate {
                Some(rate) => Cell::new(percent(rate)),
                None => dim_cell("-"),
            },
            if free < 0 {
                Cell::new(free).fg(Color::Red).add_attribute(Attribute::Bold)
            } else {
                Cell::new(free)
            },
        ]);
    }
    table
}

pub fn staff_table<'a>(staff: impl IntoIterator<Item = &'a StaffMember>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Nombre"),
        header_cell("Rol"),
        header_cell("Servicio"),
        header_cell("Turno"),
        header_cell("Disponible"),
        header_cell("Presente"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Center);
    for member in staff {
        table.add_row(vec![
            Cell::new(member.id),
            Cell::new(&member.name),
            Cell::new(&member.role),
            Cell::new(&member.service),
            shift_cell(member),
            flag_cell(member.available),
            flag_cell(member.present),
        ]);
    }
    table
}

pub fn transfers_table<'a>(records: impl IntoIterator<Item = &'a TransferRecord>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Personal"),
        header_cell("Nombre"),
        header_cell("Origen"),
        header_cell("Destino"),
        header_cell("Estado"),
        header_cell("Oferta"),
        header_cell("Aceptación"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(record.staff_id),
            Cell::new(&record.staff_name),
            Cell::new(placement(&record.origin_service, &record.origin_shift)),
            Cell::new(placement(
                &record.destination_service,
                &record.destination_shift,
            )),
            transfer_status_cell(record.status),
            Cell::new(record.offered_at.format(TIMESTAMP_FORMAT)),
            match record.accepted_at {
                Some(at) => Cell::new(at.format(TIMESTAMP_FORMAT)),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

/// Formats a fraction as a percentage, e.g. `0.75` as `75%`.
pub fn percent(value: f64) -> String {
    format!("{}%", format_numeric((value * 1000.0).round() / 10.0))
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn placement(service: &str, shift: &str) -> String {
    if shift.trim().is_empty() {
        service.to_string()
    } else {
        format!("{service} ({shift})")
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn difference_cell(difference: i64) -> Cell {
    if difference > 0 {
        Cell::new(format!("+{difference}"))
    } else {
        Cell::new(difference)
    }
}

fn ratio_cell(ratio: Option<f64>) -> Cell {
    match ratio {
        Some(ratio) => Cell::new(percent(ratio)),
        None => dim_cell("-"),
    }
}

fn status_cell(status: CoverageStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        CoverageStatus::Deficit => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        CoverageStatus::Balanced => cell.fg(Color::Green),
        CoverageStatus::Surplus => cell.fg(Color::Yellow),
    }
}

fn transfer_status_cell(status: TransferStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        TransferStatus::Pending => cell.fg(Color::Yellow),
        TransferStatus::Accepted => cell.fg(Color::Green),
    }
}

fn shift_cell(member: &StaffMember) -> Cell {
    match member.shift() {
        Shift::Unknown => Cell::new(&member.shift).fg(Color::Red),
        shift => Cell::new(shift.label()),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}
