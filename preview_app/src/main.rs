//! Render preview demo application
//!
//! Opens a window, binds a Vulkan surface to it and refreshes a preview
//! buffer at the configured rate, resizing and refreshing the buffer whenever
//! the window is resized.
//!
//! Usage: `preview_app [config.toml|config.ron]` (defaults to `lve_config.toml`)

mod instance;

use std::time::{Duration, Instant};

use glfw::{Action, Key, WindowEvent};
use instance::VulkanInstance;
use lve_window::prelude::*;

const DEFAULT_CONFIG_PATH: &str = "lve_config.toml";
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Where preview pixels come from
enum PreviewSource {
    BuiltIn,
    External(ExternalRenderer),
}

pub struct PreviewApp {
    // Declaration order is drop order: surface, then instance, then window
    surface: Surface,
    _instance: VulkanInstance,
    window: WindowHandle,
    source: PreviewSource,
    preview: PreviewConfig,
    pixels: Vec<f32>,
    throttle: PreviewThrottle,
    frames: u64,
    updates: u64,
}

impl PreviewApp {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating window...");
        let mut window = WindowHandle::from_config(&config.window)?;

        let extensions = window.required_instance_extensions()?;
        let instance = VulkanInstance::new(&config.window.title, &extensions, config.validation_enabled())?;
        let surface = Surface::new(instance.entry(), instance.instance(), &mut window)?;

        let source = match &config.preview.renderer_library {
            Some(path) => {
                let renderer = ExternalRenderer::load(path)?;
                log::info!("Using external preview renderer '{}'", renderer.name()?);
                PreviewSource::External(renderer)
            }
            None => PreviewSource::BuiltIn,
        };

        let mut app = Self {
            surface,
            _instance: instance,
            window,
            source,
            preview: config.preview.clone(),
            pixels: Vec::new(),
            throttle: PreviewThrottle::new(config.preview.update_interval()),
            frames: 0,
            updates: 0,
        };
        app.resize_preview();
        Ok(app)
    }

    fn preview_size(&self) -> (u32, u32) {
        let extent = self.window.extent();
        (
            self.preview.width.unwrap_or(extent.width),
            self.preview.height.unwrap_or(extent.height),
        )
    }

    fn resize_preview(&mut self) {
        let (width, height) = self.preview_size();
        self.pixels.resize(width as usize * height as usize, 0.0);
        self.throttle.invalidate();
        log::debug!("Preview buffer is now {width}x{height}");
    }

    fn update_preview(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (width, height) = self.preview_size();
        let mut buffer = PreviewBuffer::new(width, height, &mut self.pixels)?;
        match &self.source {
            PreviewSource::BuiltIn => fill_preview(&mut buffer),
            PreviewSource::External(renderer) => renderer.update_render_preview(&mut buffer)?,
        }
        Ok(())
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Starting preview loop on surface {:?}", self.surface.handle());

        while !self.window.should_close() {
            for (_, event) in self.window.poll_events() {
                if let WindowEvent::Key(Key::Escape, _, Action::Press, _) = event {
                    self.window.request_close(true);
                }
            }

            if self.window.was_resized() {
                let extent = self.window.extent();
                log::info!("Window resized to {}x{}", extent.width, extent.height);
                self.resize_preview();
                self.window.reset_resized_flag();
            }

            if self.throttle.is_due(Instant::now()) {
                self.update_preview()?;
                self.updates += 1;
            }
            self.frames += 1;
            std::thread::sleep(FRAME_INTERVAL);
        }

        log::info!(
            "Preview loop finished after {} frames, {} preview updates",
            self.frames,
            self.updates
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_or_default(&config_path);

    lve_window::logging::init(config.log_level());
    log::info!("Starting LVE preview demo");

    let mut app = PreviewApp::new(&config)?;
    let result = app.run();

    match &result {
        Ok(()) => log::info!("Preview demo finished successfully"),
        Err(e) => log::error!("Application error: {e}"),
    }
    result
}
