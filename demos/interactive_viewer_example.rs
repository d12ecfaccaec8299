//! Interactive Viewer Example
//!
//! Opens a window and navigates it with mouse and keyboard. The backend here
//! only logs the camera it is handed; a real renderer uploads the uniform.
//!
//! Controls:
//! - Right drag: rotate, left drag: pan, wheel: dolly
//! - Arrows: rotate (up/down tilt under free flight)
//! - Z/X: forward/backward, A/D: left/right, W/S: up/down
//! - M: settings, R: clear items, Esc: quit

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use winit::window::Window;

use lidarview_core::Result;
use lidarview_visualization::{CameraModelKind, CameraUniform, InteractiveViewer, NavigationConfig, RenderBackend};

#[derive(Parser, Debug)]
#[command(name = "interactive_viewer_example")]
#[command(about = "Navigate a window with the lidarview camera", long_about = None)]
struct Cli {
    /// Use the free-flight camera instead of orbiting
    #[arg(long)]
    free_flight: bool,

    /// JSON navigation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Background color as #RRGGBB
    #[arg(long)]
    background: Option<String>,
}

struct LoggingBackend {
    window: Arc<Window>,
    frames: u64,
}

impl RenderBackend for LoggingBackend {
    fn resize(&mut self, width: u32, height: u32) {
        log::info!("Surface resized to {}x{}", width, height);
    }

    fn render(&mut self, camera: &CameraUniform, background: [f32; 3]) -> Result<()> {
        self.frames += 1;
        if self.frames % 120 == 0 {
            log::info!(
                "{}: frame {} eye {:?} background {:?}",
                self.window.title(),
                self.frames,
                camera.view_pos,
                background
            );
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NavigationConfig::load(path)?,
        None => NavigationConfig::default(),
    };
    if cli.free_flight {
        config.model = CameraModelKind::FreeFlight;
    }

    println!("lidarview Interactive Viewer Example");
    println!("====================================");
    println!("Right drag rotates, left drag pans, the wheel dollies.");
    println!("Arrows rotate, Z/X A/D W/S move, Esc quits.");

    let mut app = InteractiveViewer::new(config)
        .with_title("lidarview")
        .with_size(cli.width, cli.height);
    if let Some(color) = &cli.background {
        app.viewer_mut().set_background_color(color)?;
    }
    app.run(|window| Ok(LoggingBackend { window, frames: 0 }))?;

    Ok(())
}
