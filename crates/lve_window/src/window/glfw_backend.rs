//! GLFW-based window backend
//!
//! Creates a window with no client API (Vulkan renders into it) and turns
//! GLFW framebuffer size events into resize hook invocations.
//!
//! GLFW reports failures through an error callback before the failing call
//! returns. The callback installed here logs the error and keeps the last
//! description so it can be attached to the `WindowError` the call maps to.

use std::cell::RefCell;

use ash::vk;
use glfw::{Glfw, GlfwReceiver, PWindow, WindowEvent};

use super::backend::{ResizeHook, WindowBackend};
use super::error::{WindowError, WindowResult};

thread_local! {
    static LAST_GLFW_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// GLFW error callback: log and remember, never unwind into C
fn record_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW error {error:?}: {description}");
    LAST_GLFW_ERROR.with(|last| *last.borrow_mut() = Some(format!("{error:?}: {description}")));
}

/// Take the description of the most recent GLFW error on this thread
fn take_glfw_error(fallback: &str) -> String {
    LAST_GLFW_ERROR
        .with(|last| last.borrow_mut().take())
        .unwrap_or_else(|| fallback.to_string())
}

/// Native GLFW window. Dropping it destroys the window.
pub struct GlfwBackend {
    window: PWindow,
    events: GlfwReceiver<(f64, WindowEvent)>,
    glfw: Glfw,
    resize_hook: Option<ResizeHook>,
}

impl GlfwBackend {
    /// Initialise GLFW and open a resizable window without a GL context
    pub fn new(width: u32, height: u32, title: &str) -> WindowResult<Self> {
        // Stale errors from an earlier failed attempt must not leak into this one
        take_glfw_error("");

        let mut glfw = glfw::init(record_glfw_error)
            .map_err(|e| WindowError::InitializationFailed(take_glfw_error(&format!("{e:?}"))))?;

        if !glfw.vulkan_supported() {
            log::warn!("GLFW reports no Vulkan loader; surface creation will fail");
        }

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::CreationFailed(take_glfw_error("no window returned")))?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        window.set_framebuffer_size_polling(true);

        log::debug!("Created GLFW window '{title}' ({width}x{height})");

        Ok(Self {
            window,
            events,
            glfw,
            resize_hook: None,
        })
    }
}

impl WindowBackend for GlfwBackend {
    fn set_resize_hook(&mut self, hook: ResizeHook) {
        self.resize_hook = Some(hook);
    }

    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        self.glfw.poll_events();
        let events: Vec<_> = glfw::flush_messages(&self.events).collect();

        for (_, event) in &events {
            if let WindowEvent::FramebufferSize(width, height) = *event {
                // GLFW reports 0x0 while minimised
                let width = u32::try_from(width).unwrap_or(0);
                let height = u32::try_from(height).unwrap_or(0);
                if let Some(hook) = self.resize_hook.as_mut() {
                    hook(width, height);
                }
            }
        }

        events
    }

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw.get_required_instance_extensions().ok_or_else(|| {
            WindowError::GlfwError(take_glfw_error("Failed to get required extensions"))
        })
    }

    fn create_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self
            .window
            .create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            // Already logged by the callback; the vk::Result carries the detail
            take_glfw_error("");
            Err(result)
        }
    }
}

impl Drop for GlfwBackend {
    fn drop(&mut self) {
        log::debug!("Destroying GLFW window");
    }
}
