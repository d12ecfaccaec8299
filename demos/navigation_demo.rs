//! Headless Navigation Demo
//!
//! Drives a viewer with a scripted input session and prints the camera as it
//! moves. Useful for checking navigation settings without opening a window.
//!
//! ```text
//! RUST_LOG=debug cargo run --bin navigation_demo -- --model free-flight --ticks 25
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use nalgebra::{Vector2, Vector3};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use lidarview_core::{LidarCameraExtrinsic, RigidTransform};
use lidarview_visualization::{CameraModelKind, NavigationConfig, Viewer, FOLLOW_NONE};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    Orbit,
    FreeFlight,
}

#[derive(Parser, Debug)]
#[command(name = "navigation_demo")]
#[command(about = "Scripted camera navigation without a window", long_about = None)]
struct Cli {
    /// Camera model to navigate with
    #[arg(long, value_enum, default_value = "orbit")]
    model: Model,

    /// JSON navigation config; the model flag overrides its model
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to hold each scripted key
    #[arg(long, default_value_t = 10)]
    ticks: u32,
}

fn print_camera(label: &str, viewer: &Viewer) {
    let eye = viewer.eye();
    println!("{:<24} eye = ({:8.3}, {:8.3}, {:8.3})", label, eye.x, eye.y, eye.z);
}

fn hold(viewer: &mut Viewer, code: KeyCode, ticks: u32, period: Duration) {
    viewer.on_key_down(code);
    for _ in 0..ticks {
        viewer.advance(period);
    }
    viewer.on_key_up(code);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => NavigationConfig::load(path)
            .with_context(|| format!("loading navigation config {}", path.display()))?,
        None => NavigationConfig::default(),
    };
    config.model = match cli.model {
        Model::Orbit => CameraModelKind::Orbit,
        Model::FreeFlight => CameraModelKind::FreeFlight,
    };
    let period = config.tick_period();

    println!("lidarview Navigation Demo");
    println!("=========================");
    println!("Model: {:?}, {} ticks per key", config.model, cli.ticks);

    let mut viewer = Viewer::new(config);
    print_camera("start", &viewer);

    for (label, code) in [
        ("rotate left", KeyCode::ArrowLeft),
        ("rotate up / tilt up", KeyCode::ArrowUp),
        ("move forward", KeyCode::KeyZ),
        ("strafe right", KeyCode::KeyD),
        ("move up", KeyCode::KeyW),
    ] {
        hold(&mut viewer, code, cli.ticks, period);
        print_camera(label, &viewer);
    }

    viewer.on_mouse_down(MouseButton::Right, Some(Vector2::new(960.0, 540.0)));
    viewer.on_mouse_move(Vector2::new(1010.0, 520.0));
    viewer.on_mouse_up(MouseButton::Right);
    viewer.advance(period);
    print_camera("right drag", &viewer);

    viewer.on_mouse_down(MouseButton::Left, Some(Vector2::new(960.0, 540.0)));
    viewer.on_mouse_move(Vector2::new(900.0, 560.0));
    viewer.on_mouse_up(MouseButton::Left);
    viewer.advance(period);
    print_camera("left drag", &viewer);

    viewer.on_wheel(MouseScrollDelta::LineDelta(0.0, 2.0));
    viewer.advance(period);
    print_camera("wheel", &viewer);

    // Follow a target carried by a moving vehicle; only the orbit camera follows.
    let extrinsic = LidarCameraExtrinsic::default();
    let vehicle = Vector3::new(12.0, -4.0, 0.0);
    viewer
        .follow_targets_mut()
        .set_pose("vehicle", RigidTransform::translation(vehicle));
    println!("Followable: {}", viewer.follow_targets().names().join(", "));
    viewer.follow("vehicle")?;
    viewer.advance(period);
    print_camera("following vehicle", &viewer);
    viewer.follow(FOLLOW_NONE)?;

    println!("Camera quaternion [w, x, y, z]: {}", extrinsic.format_quaternion());
    println!("Camera translation [x, y, z]:  {}", extrinsic.format_translation());

    if let Err(e) = viewer.set_background_color("not-a-color") {
        log::warn!("{}", e);
    }

    let view = viewer.view_matrix();
    println!("\nFinal view matrix:{}", view);

    viewer.reset_camera();
    print_camera("reset", &viewer);

    Ok(())
}
