//! RTG Terminal - ASCII previews of the procedural scenes
//!
//! Controls:
//!   - WASD / Q E: Move (hold Shift to sprint)
//!   - Right mouse drag: Look around (L toggles arrow-key look instead)
//!   - P: Toggle perspective / orthographic
//!   - R: Reset the camera
//!   - Esc: Quit

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;
use rtg_terminal::{SceneConfig, SceneKind, TerminalApp};
use structopt::StructOpt;

// Cli arguments
#[derive(StructOpt, Debug)]
#[structopt(name = "rtg-terminal")]
struct CliArgs {
    /// Scene to show: camera, shapes or pond (overrides the config file)
    #[structopt(short = "s", long = "scene")]
    scene: Option<SceneKind>,
    /// TOML scene configuration
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,
    /// Write log output to this file instead of stderr
    #[structopt(long = "log-file", parse(from_os_str))]
    log_file: Option<PathBuf>,
    /// Output debug info
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::from_args();
    init_logging(&args)?;

    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("Could not load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(scene) = args.scene {
        config.scene = scene;
    }

    let mut app = TerminalApp::new(config).context("Could not set up the scene")?;
    app.run().context("Terminal renderer failed")?;
    Ok(())
}

// Stderr output lands on top of the alternate screen; --log-file avoids that
fn init_logging(args: &CliArgs) -> Result<()> {
    let mut builder = if args.verbose {
        let mut builder = env_logger::Builder::new();
        builder.filter(None, LevelFilter::Debug);
        builder
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
    };

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Could not create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}
