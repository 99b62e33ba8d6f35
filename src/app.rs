use crate::config::WindowConfig;
use crate::render::{GlDevice, RenderPipeline};
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info};
use raw_window_handle::HasRawWindowHandle;
use std::ffi::CString;
use std::ptr;
use thiserror::Error;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(String),
    #[error("OpenGL context error: {0}")]
    Context(#[from] glutin::error::Error),
}

/// One window with its current OpenGL context and the device bound to it.
pub struct Host {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    device: GlDevice,
}

impl Host {
    /// Opens the window, makes a 3.3 compatibility context current on it and
    /// loads the GL entry points. Entry points that fail to load are logged,
    /// not treated as fatal.
    pub fn new(config: &WindowConfig) -> Result<(Self, EventLoop<()>), HostError> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(false);

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, pick_config)
            .map_err(|e| HostError::Window(e.to_string()))?;
        let window =
            window.ok_or_else(|| HostError::Window("display builder returned no window".into()))?;

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Compatibility)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let gl_context = gl_context.make_current(&gl_surface)?;

        let device = GlDevice::load(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });
        if !device.is_loaded() {
            error!("Failed to load OpenGL entry points");
        }

        info!(
            "Created {}x{} window \"{}\"",
            config.width, config.height, config.title
        );

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                device,
            },
            event_loop,
        ))
    }

    pub fn device(&self) -> &GlDevice {
        &self.device
    }

    fn present(&self) {
        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    /// Drives `pipeline` until the window reports a close request.
    pub fn run(self, event_loop: EventLoop<()>, mut pipeline: RenderPipeline) -> Result<(), HostError> {
        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                pipeline.close();
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if pipeline.render_frame(&self.device) {
                    self.present();
                }
            }
            Event::AboutToWait => {
                if pipeline.is_running() {
                    self.window.request_redraw();
                }
            }
            _ => (),
        })?;

        Ok(())
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("glutin only calls the picker with at least one config")
}

