use super::OutputFormat;
use crate::reports::{self, FrameRecord};
use clap::Args;
use keylayout::config::{AppearanceArgs, DeviceArgs, LayoutConstants};
use keylayout::coordinator::LayoutCoordinator;
use keylayout::error::{LayoutError, LayoutResult};
use keylayout::geometry::{Direction, Frame};
use keylayout::model::{Keyboard, ShiftState};
use keylayout::surface::HeadlessSurface;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct FramesArgs {
    #[arg(long, default_value_t = 375.0)]
    pub width: f64,

    #[arg(long, default_value_t = 216.0)]
    pub height: f64,

    #[arg(short, long, default_value_t = 0)]
    pub page: usize,

    #[arg(long, default_value_t = ShiftState::Disabled)]
    pub shift: ShiftState,

    /// Side the popups open towards.
    #[arg(long, default_value_t = Direction::Up)]
    pub popup: Direction,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub device: DeviceArgs,

    #[command(flatten)]
    pub appearance: AppearanceArgs,
}

pub fn run(args: FramesArgs, keyboard: Keyboard, constants: LayoutConstants) -> LayoutResult<()> {
    let bounds = Frame::new(0.0, 0.0, args.width, args.height);
    let device = args.device.to_profile(args.width)?;
    let surface = HeadlessSurface::with_device(bounds, device);
    let keyboard = Arc::new(keyboard);

    let mut coordinator = LayoutCoordinator::new(
        keyboard.clone(),
        surface,
        constants,
        args.appearance.dark,
        args.appearance.solid_color,
    );

    let uppercase = args.shift.uppercase();
    let stats = coordinator
        .layout_keys(args.page, uppercase, uppercase, args.shift)
        .ok_or_else(|| {
            LayoutError::Config(format!(
                "layout bounds {}x{} have no area",
                args.width, args.height
            ))
        })?;

    info!(
        "📐 Laid out {} keys ({} views)",
        stats.keys,
        coordinator.pool().len()
    );

    let bindings: Vec<_> = coordinator.bindings().collect();
    let mut records = Vec::with_capacity(bindings.len());

    for (id, handle) in bindings {
        let (Some(key), Some(position)) = (keyboard.key(id), keyboard.position(id)) else {
            continue;
        };
        let placement = coordinator.will_show_popup(handle, args.popup);
        coordinator.will_hide_popup(handle);

        let Some(view) = coordinator.view(handle) else {
            continue;
        };
        records.push(FrameRecord::new(key, position, view, placement));
    }

    match args.format {
        OutputFormat::Table => {
            let title = keyboard
                .page(args.page)
                .and_then(|p| p.name.clone())
                .unwrap_or_else(|| format!("page {}", args.page));
            reports::print_frames_table(&keyboard.name, &title, &records);
        }
        OutputFormat::Csv => reports::write_frames_csv(std::io::stdout(), &records)?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }

    Ok(())
}
