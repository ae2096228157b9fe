use super::OutputFormat;
use crate::reports::{self, ConstantRow};
use clap::Args;
use keylayout::config::LayoutConstants;
use keylayout::error::LayoutResult;
use keylayout::geometry::Orientation;
use serde_json::json;

#[derive(Args, Debug, Clone)]
pub struct ConstantsArgs {
    #[arg(long, default_value_t = 375.0)]
    pub width: f64,

    /// Keys in the widest row, for the key gap.
    #[arg(long, default_value_t = 10)]
    pub keys: usize,

    #[arg(long, default_value_t = false)]
    pub pad: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

struct Resolved {
    side_edges: f64,
    top_edge: f64,
    row_gap: f64,
    last_row_gap: f64,
    key_gap: f64,
    last_row_key_gap: f64,
    area_ratios: (f64, f64),
    calibration: (f64, f64),
    keyboard_width: f64,
}

fn resolve(c: &LayoutConstants, orientation: Orientation, args: &ConstantsArgs) -> Resolved {
    let width = args.width;
    let side_edges = c.side_edges(orientation, width);
    let keyboard_width = c.keyboard_shrunk_size(width - 2.0 * side_edges, args.pad);

    Resolved {
        side_edges,
        top_edge: c.top_edge(orientation, width),
        row_gap: c.row_gap(orientation, width),
        last_row_gap: c.last_row_gap(orientation, width),
        key_gap: c.key_gap(orientation, width, args.keys, args.pad),
        last_row_key_gap: c.last_row_key_gap(orientation, width),
        area_ratios: c.last_row_area_ratios(orientation),
        calibration: c.flexible_end_row_calibration(orientation),
        keyboard_width,
    }
}

fn row(name: &'static str, portrait: impl ToString, landscape: impl ToString) -> ConstantRow {
    ConstantRow {
        name,
        portrait: portrait.to_string(),
        landscape: landscape.to_string(),
    }
}

pub fn run(args: ConstantsArgs, constants: &LayoutConstants) -> LayoutResult<()> {
    let p = resolve(constants, Orientation::Portrait, &args);
    let l = resolve(constants, Orientation::Landscape, &args);
    let popup_total_height = constants.popup_total_height(args.width);

    if args.format == OutputFormat::Json {
        let to_json = |r: &Resolved| {
            json!({
                "side_edges": r.side_edges,
                "top_edge": r.top_edge,
                "row_gap": r.row_gap,
                "last_row_gap": r.last_row_gap,
                "key_gap": r.key_gap,
                "last_row_key_gap": r.last_row_key_gap,
                "last_row_area_ratios": [r.area_ratios.0, r.area_ratios.1],
                "flexible_end_row_calibration": [r.calibration.0, r.calibration.1],
                "keyboard_width": r.keyboard_width,
            })
        };
        let out = json!({
            "width": args.width,
            "popup_total_height": popup_total_height,
            "portrait": to_json(&p),
            "landscape": to_json(&l),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let pair = |a: (f64, f64)| format!("{} / {}", a.0, a.1);
    let rows = vec![
        row("side_edges", p.side_edges, l.side_edges),
        row("top_edge", p.top_edge, l.top_edge),
        row("row_gap", p.row_gap, l.row_gap),
        row("last_row_gap", p.last_row_gap, l.last_row_gap),
        row("key_gap", p.key_gap, l.key_gap),
        row("last_row_key_gap", p.last_row_key_gap, l.last_row_key_gap),
        row("last_row_area_ratios", pair(p.area_ratios), pair(l.area_ratios)),
        row("end_key_calibration", pair(p.calibration), pair(l.calibration)),
        row("keyboard_width", p.keyboard_width, l.keyboard_width),
        row("popup_total_height", popup_total_height, popup_total_height),
    ];

    match args.format {
        OutputFormat::Csv => reports::write_constants_csv(std::io::stdout(), &rows)?,
        _ => reports::print_constants_table(args.width, &rows),
    }
    Ok(())
}
