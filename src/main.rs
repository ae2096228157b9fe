use clap::{Parser, Subcommand};
use keylayout::config::LayoutConstants;
use keylayout::error::LayoutResult;
use keylayout::layouts::KnownKeyboard;
use keylayout::model::{Keyboard, KeyboardDefinition};
use std::process;
use std::str::FromStr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file overriding the built-in layout constants.
    #[arg(global = true, long)]
    constants: Option<String>,

    /// Built-in keyboard name (qwerty, qwertz, azerty) or a JSON definition file.
    #[arg(global = true, short = 'k', long, default_value = "qwerty")]
    keyboard: String,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out one page and print every key frame and popup frame.
    Frames(cmd::frames::FramesArgs),
    /// Print the constants resolved for a width.
    Constants(cmd::constants::ConstantsArgs),
}

fn load_keyboard(name: &str) -> LayoutResult<Keyboard> {
    if let Ok(known) = KnownKeyboard::from_str(name) {
        return Ok(known.build());
    }
    info!("📂 Loading Keyboard: {}", name);
    Ok(KeyboardDefinition::load_from_file(name)?.into_keyboard())
}

fn load_constants(path: Option<&str>) -> LayoutResult<LayoutConstants> {
    match path {
        Some(path) => {
            info!("⚙️  Loading Constants: {}", path);
            LayoutConstants::load_from_file(path)
        }
        None => Ok(LayoutConstants::default()),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so csv and json output stays clean on stdout
    let level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let constants = load_constants(cli.constants.as_deref()).unwrap_or_else(|e| {
        error!("❌ {}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Frames(args) => load_keyboard(&cli.keyboard)
            .and_then(|keyboard| cmd::frames::run(args, keyboard, constants)),
        Commands::Constants(args) => cmd::constants::run(args, &constants),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
