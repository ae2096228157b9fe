use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keylayout::engine::PopupPlacement;
use keylayout::error::LayoutResult;
use keylayout::model::Key;
use keylayout::pool::KeyView;
use serde::Serialize;
use std::io::Write;

/// One output line of the `frames` command.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub key: u32,
    pub row: usize,
    pub column: usize,
    pub kind: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub popup_x: Option<f64>,
    pub popup_y: Option<f64>,
    pub popup_width: Option<f64>,
    pub popup_height: Option<f64>,
    pub popup_attached: Option<String>,
    pub color: String,
}

impl FrameRecord {
    pub fn new(
        key: &Key,
        (_, row, column): (usize, usize, usize),
        view: &KeyView,
        popup: Option<PopupPlacement>,
    ) -> Self {
        let label = match &view.shape {
            Some(shape) => format!("<{}>", shape.kind()),
            None => view.text.clone(),
        };
        Self {
            key: key.id.0,
            row,
            column,
            kind: key.kind.to_string(),
            label,
            x: view.frame.x,
            y: view.frame.y,
            width: view.frame.width,
            height: view.frame.height,
            popup_x: popup.map(|p| p.frame.x),
            popup_y: popup.map(|p| p.frame.y),
            popup_width: popup.map(|p| p.frame.width),
            popup_height: popup.map(|p| p.frame.height),
            popup_attached: popup.map(|p| p.attached.to_string()),
            color: view.appearance.color.to_hex(),
        }
    }
}

fn num(v: f64) -> Cell {
    Cell::new(format!("{:.1}", v)).set_alignment(CellAlignment::Right)
}

fn opt_num(v: Option<f64>) -> Cell {
    match v {
        Some(v) => num(v),
        None => Cell::new("-").set_alignment(CellAlignment::Right),
    }
}

pub fn print_frames_table(keyboard: &str, page: &str, records: &[FrameRecord]) {
    println!("\nKeyboard: {} ({})", keyboard, page);

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Row"),
        Cell::new("Type"),
        Cell::new("Label").fg(Color::Cyan),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("W").fg(Color::Green),
        Cell::new("H").fg(Color::Green),
        Cell::new("Popup X"),
        Cell::new("Popup Y"),
        Cell::new("Popup W"),
        Cell::new("Popup H"),
        Cell::new("Attach").fg(Color::Yellow),
    ]);

    for r in records {
        let attach = r.popup_attached.as_deref().unwrap_or("-");
        let attach_cell = if attach == "down" {
            Cell::new(attach).fg(Color::Yellow)
        } else {
            Cell::new(attach)
        };

        table.add_row(vec![
            Cell::new(r.key).set_alignment(CellAlignment::Right),
            Cell::new(r.row).set_alignment(CellAlignment::Right),
            Cell::new(&r.kind),
            Cell::new(&r.label),
            num(r.x),
            num(r.y),
            num(r.width),
            num(r.height),
            opt_num(r.popup_x),
            opt_num(r.popup_y),
            opt_num(r.popup_width),
            opt_num(r.popup_height),
            attach_cell,
        ]);
    }

    println!("{}", table);
}

pub fn write_frames_csv<W: Write>(writer: W, records: &[FrameRecord]) -> LayoutResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstantRow {
    pub name: &'static str,
    pub portrait: String,
    pub landscape: String,
}

pub fn print_constants_table(width: f64, rows: &[ConstantRow]) {
    println!("\nResolved constants at width {}", width);

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Constant").add_attribute(Attribute::Bold),
        Cell::new("Portrait").fg(Color::Cyan),
        Cell::new("Landscape").fg(Color::Magenta),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(row.name),
            Cell::new(&row.portrait).set_alignment(CellAlignment::Right),
            Cell::new(&row.landscape).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

pub fn write_constants_csv<W: Write>(writer: W, rows: &[ConstantRow]) -> LayoutResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
