//! Windowed viewer driven by winit
//!
//! Drawing is left to a [`RenderBackend`]; this module only routes window
//! events into a [`Viewer`] and hands the camera to the backend each frame.

use std::sync::Arc;

use instant::Instant;
use nalgebra::Vector2;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowBuilder},
};

use lidarview_core::{Error, Result};

use crate::config::NavigationConfig;
use crate::keymap::ViewerCommand;
use crate::settings::color_to_rgb_f32;
use crate::view::CameraUniform;
use crate::viewer::{KeyResponse, Viewer};

/// Something that can draw a frame for a camera
pub trait RenderBackend {
    /// The drawing surface changed size
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame
    fn render(&mut self, camera: &CameraUniform, background: [f32; 3]) -> Result<()>;
}

fn window_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("{}: {}", context, e),
    ))
}

/// Window that navigates a [`Viewer`] with mouse and keyboard
pub struct InteractiveViewer {
    viewer: Viewer,
    title: String,
    size: (f64, f64),
}

impl InteractiveViewer {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            viewer: Viewer::new(config),
            title: "lidarview".to_string(),
            size: (1200.0, 800.0),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = (width, height);
        self
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// Open the window and run until it is closed.
    ///
    /// `make_backend` builds the renderer once the window exists.
    pub fn run<B, F>(mut self, make_backend: F) -> Result<()>
    where
        B: RenderBackend + 'static,
        F: FnOnce(Arc<Window>) -> Result<B>,
    {
        let event_loop = EventLoop::new().map_err(|e| window_error("Failed to create event loop", e))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(LogicalSize::new(self.size.0, self.size.1))
                .build(&event_loop)
                .map_err(|e| window_error("Failed to create window", e))?,
        );

        let mut backend = make_backend(window.clone())?;
        let size = window.inner_size();
        backend.resize(size.width, size.height);
        self.viewer.set_viewport(f64::from(size.width), f64::from(size.height));

        log::info!("Viewer window open");

        let mut viewer = self.viewer;
        let mut cursor: Option<Vector2<f64>> = None;

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);

                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => target.exit(),
                        WindowEvent::Resized(new_size) => {
                            backend.resize(new_size.width, new_size.height);
                            viewer.set_viewport(f64::from(new_size.width), f64::from(new_size.height));
                        }
                        WindowEvent::Focused(false) => viewer.on_focus_lost(),
                        WindowEvent::KeyboardInput { event, .. } => {
                            let PhysicalKey::Code(code) = event.physical_key else {
                                return;
                            };
                            match event.state {
                                ElementState::Pressed if !event.repeat => {
                                    match viewer.on_key_down(code) {
                                        KeyResponse::Command(ViewerCommand::Close) => target.exit(),
                                        KeyResponse::Command(command) => {
                                            log::info!("{:?}", command);
                                        }
                                        _ => {}
                                    }
                                }
                                ElementState::Pressed => {}
                                ElementState::Released => viewer.on_key_up(code),
                            }
                        }
                        WindowEvent::MouseInput { state, button, .. } => match state {
                            ElementState::Pressed => viewer.on_mouse_down(button, cursor),
                            ElementState::Released => viewer.on_mouse_up(button),
                        },
                        WindowEvent::CursorMoved { position, .. } => {
                            let pos = Vector2::new(position.x, position.y);
                            cursor = Some(pos);
                            viewer.on_mouse_move(pos);
                        }
                        WindowEvent::CursorLeft { .. } => cursor = None,
                        WindowEvent::MouseWheel { delta, .. } => viewer.on_wheel(delta),
                        WindowEvent::RedrawRequested => {
                            let camera = viewer.camera_uniform();
                            let background = color_to_rgb_f32(viewer.background_color());
                            if let Err(e) = backend.render(&camera, background) {
                                log::error!("Render failed: {}", e);
                            }
                            let fps = viewer.frame_rendered(Instant::now());
                            log::trace!("{} fps", fps);
                        }
                        _ => {}
                    },
                    Event::AboutToWait => {
                        viewer.update(Instant::now());
                        window.request_redraw();
                    }
                    _ => {}
                }
            })
            .map_err(|e| window_error("Event loop error", e))?;

        Ok(())
    }
}
