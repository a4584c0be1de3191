//! # LVE Window
//!
//! Window ownership and render preview plumbing for a Vulkan application.
//!
//! ## Features
//!
//! - **Window Ownership**: [`WindowHandle`] owns exactly one GLFW window and
//!   releases it on drop
//! - **Resize Tracking**: framebuffer resize notifications update the extent
//!   and raise a flag until the caller acknowledges it
//! - **Surface Creation**: binds a `VkSurfaceKHR` to the window for a given instance
//! - **Render Preview**: fills a caller-owned float buffer, from Rust or across a C ABI
//! - **Plugin Host**: loads external preview renderers from shared libraries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lve_window::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut window = WindowHandle::new(800, 600, "Preview")?;
//!
//!     let mut pixels = vec![0.0_f32; 800 * 600];
//!     while !window.should_close() {
//!         window.poll_events();
//!         if window.was_resized() {
//!             let extent = window.extent();
//!             pixels.resize((extent.width * extent.height) as usize, 0.0);
//!             window.reset_resized_flag();
//!         }
//!         let extent = window.extent();
//!         update_render_preview(extent.width, extent.height, &mut pixels)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod ffi;
pub mod logging;
pub mod plugin;
pub mod preview;
pub mod surface;
pub mod window;

pub use preview::{
    fill_preview, update_render_preview, PreviewBuffer, PreviewError, PreviewThrottle, PREVIEW_FILL_VALUE,
};
pub use surface::Surface;
pub use window::{SurfaceError, WindowError, WindowHandle};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{AppConfig, Config, ConfigError, PreviewConfig, WindowConfig},
        ffi::PreviewStatus,
        plugin::{ExternalRenderer, PluginError},
        preview::{fill_preview, update_render_preview, PreviewBuffer, PreviewError, PreviewThrottle},
        surface::Surface,
        window::{
            GlfwBackend, HeadlessBackend, HeadlessController, SurfaceError, WindowBackend,
            WindowError, WindowHandle,
        },
    };
}
