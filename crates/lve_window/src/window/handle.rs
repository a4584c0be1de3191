//! High-level window handle for applications
//!
//! [`WindowHandle`] is the single owner of one platform window. It tracks the
//! last known framebuffer extent and a resize flag that stays raised until the
//! caller acknowledges the resize (typically after recreating its swapchain).
//!
//! The handle is neither `Clone` nor `Send`: the native window is released
//! exactly once, when the handle drops, on whichever thread created it.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use ash::vk;
use glfw::WindowEvent;

use super::backend::WindowBackend;
use super::error::{SurfaceError, SurfaceResult, WindowError, WindowResult};
use super::glfw_backend::GlfwBackend;
use crate::config::WindowConfig;

/// State shared between the handle and the resize hook it installs
#[derive(Debug)]
struct WindowState {
    extent: Cell<vk::Extent2D>,
    resized: Cell<bool>,
}

impl WindowState {
    fn on_framebuffer_resize(&self, width: u32, height: u32) {
        self.extent.set(vk::Extent2D { width, height });
        self.resized.set(true);
    }
}

/// Owning handle to one platform window
pub struct WindowHandle {
    backend: Box<dyn WindowBackend>,
    name: String,
    state: Rc<WindowState>,
    surface_instances: HashSet<vk::Instance>,
}

impl WindowHandle {
    /// Open a native GLFW window
    ///
    /// # Errors
    /// `InvalidExtent` or `EmptyTitle` for bad arguments (checked before any
    /// platform resource is acquired), `InitializationFailed` when GLFW cannot
    /// start (for example with no display), `CreationFailed` when the window
    /// cannot be allocated.
    pub fn new(width: u32, height: u32, name: &str) -> WindowResult<Self> {
        Self::with_backend(width, height, name, GlfwBackend::new)
    }

    /// Open a native window described by a [`WindowConfig`]
    pub fn from_config(config: &WindowConfig) -> WindowResult<Self> {
        Self::new(config.width, config.height, &config.title)
    }

    /// Open a window through a caller-supplied platform adapter
    ///
    /// `create_backend` is only invoked once the arguments have been
    /// validated.
    pub fn with_backend<B, F>(width: u32, height: u32, name: &str, create_backend: F) -> WindowResult<Self>
    where
        B: WindowBackend + 'static,
        F: FnOnce(u32, u32, &str) -> WindowResult<B>,
    {
        if width == 0 || height == 0 {
            return Err(WindowError::InvalidExtent { width, height });
        }
        if name.is_empty() {
            return Err(WindowError::EmptyTitle);
        }

        let mut backend = create_backend(width, height, name)?;

        let state = Rc::new(WindowState {
            extent: Cell::new(vk::Extent2D { width, height }),
            resized: Cell::new(false),
        });
        let hook_state = Rc::clone(&state);
        backend.set_resize_hook(Box::new(move |width, height| {
            hook_state.on_framebuffer_resize(width, height);
        }));

        log::info!("Window '{name}' opened ({width}x{height})");

        Ok(Self {
            backend: Box::new(backend),
            name: name.to_string(),
            state,
            surface_instances: HashSet::new(),
        })
    }

    /// Whether the platform has a pending close request
    pub fn should_close(&self) -> bool {
        self.backend.should_close()
    }

    /// Set or clear the close request
    pub fn request_close(&mut self, should_close: bool) {
        self.backend.set_should_close(should_close);
    }

    /// Pump platform events
    ///
    /// Resize notifications update [`extent`](Self::extent) and raise the
    /// resize flag before the events are returned.
    pub fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        self.backend.poll_events()
    }

    /// Last known framebuffer extent in pixels
    pub fn extent(&self) -> vk::Extent2D {
        self.state.extent.get()
    }

    /// Whether a resize notification arrived since the last reset
    pub fn was_resized(&self) -> bool {
        self.state.resized.get()
    }

    /// Acknowledge the last resize
    pub fn reset_resized_flag(&mut self) {
        self.state.resized.set(false);
    }

    /// Display name the window was created with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Vulkan instance extensions required to create surfaces for this window
    pub fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.backend.required_instance_extensions()
    }

    /// Bind a drawing surface to this window for `instance`
    ///
    /// The returned surface belongs to the caller and must be destroyed
    /// before the instance. See [`crate::Surface`] for an owning wrapper.
    ///
    /// # Errors
    /// `NullInstance` for a null handle, `AlreadyCreated` when a surface was
    /// already created for this instance, `CreationFailed` when the platform
    /// cannot bind the two.
    pub fn create_surface(&mut self, instance: vk::Instance) -> SurfaceResult<vk::SurfaceKHR> {
        if instance == vk::Instance::null() {
            return Err(SurfaceError::NullInstance);
        }
        if self.surface_instances.contains(&instance) {
            log::warn!("Rejected second surface for window '{}' on {instance:?}", self.name);
            return Err(SurfaceError::AlreadyCreated);
        }

        let surface = self
            .backend
            .create_surface(instance)
            .map_err(SurfaceError::CreationFailed)?;

        self.surface_instances.insert(instance);
        log::info!("Created surface {surface:?} for window '{}'", self.name);
        Ok(surface)
    }
}

impl Drop for WindowHandle {
    fn drop(&mut self) {
        log::debug!("Closing window '{}'", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::headless::{HeadlessBackend, HeadlessController};
    use ash::vk::Handle;

    fn headless(controller: &HeadlessController, width: u32, height: u32) -> WindowHandle {
        let controller = controller.clone();
        WindowHandle::with_backend(width, height, "test", move |w, h, _| {
            Ok(HeadlessBackend::new(controller, w, h))
        })
        .unwrap()
    }

    #[test]
    fn test_extent_matches_construction() {
        let controller = HeadlessController::new();
        let window = headless(&controller, 800, 600);

        let extent = window.extent();
        assert_eq!((extent.width, extent.height), (800, 600));
        assert_eq!(window.name(), "test");
        assert!(!window.was_resized());
    }

    #[test]
    fn test_rejects_invalid_arguments_before_creating_window() {
        let controller = HeadlessController::new();
        let make = |w, h, name: &str| {
            let controller = controller.clone();
            WindowHandle::with_backend(w, h, name, move |w, h, _| {
                Ok(HeadlessBackend::new(controller, w, h))
            })
        };

        assert!(matches!(
            make(0, 600, "zero"),
            Err(WindowError::InvalidExtent { width: 0, height: 600 })
        ));
        assert!(matches!(
            make(800, 0, "zero"),
            Err(WindowError::InvalidExtent { width: 800, height: 0 })
        ));
        assert!(matches!(make(800, 600, ""), Err(WindowError::EmptyTitle)));
        assert_eq!(controller.stats().created(), 0);
    }

    #[test]
    fn test_backend_failure_is_surfaced() {
        let result = WindowHandle::with_backend(800, 600, "broken", |_, _, _| {
            Err::<HeadlessBackend, _>(WindowError::InitializationFailed("no display".into()))
        });
        assert!(matches!(result, Err(WindowError::InitializationFailed(_))));
    }

    #[test]
    fn test_resize_flag_set_and_reset() {
        let controller = HeadlessController::new();
        let mut window = headless(&controller, 800, 600);

        controller.resize(1024, 768);
        window.poll_events();

        assert!(window.was_resized());
        let extent = window.extent();
        assert_eq!((extent.width, extent.height), (1024, 768));

        window.reset_resized_flag();
        assert!(!window.was_resized());

        // Stays clear until the next notification
        window.poll_events();
        assert!(!window.was_resized());

        controller.resize(640, 480);
        window.poll_events();
        assert!(window.was_resized());
        assert_eq!(window.extent().width, 640);
    }

    #[test]
    fn test_minimised_window_reports_zero_extent() {
        let controller = HeadlessController::new();
        let mut window = headless(&controller, 800, 600);

        controller.resize(0, 0);
        window.poll_events();

        assert!(window.was_resized());
        assert_eq!(window.extent().width, 0);
        assert_eq!(window.extent().height, 0);
    }

    #[test]
    fn test_should_close_only_after_request() {
        let controller = HeadlessController::new();
        let mut window = headless(&controller, 800, 600);

        assert!(!window.should_close());
        window.poll_events();
        assert!(!window.should_close());

        controller.request_close();
        let events = window.poll_events();
        assert!(events.iter().any(|(_, e)| matches!(e, WindowEvent::Close)));
        assert!(window.should_close());

        window.request_close(false);
        assert!(!window.should_close());
    }

    #[test]
    fn test_native_window_released_exactly_once() {
        let controller = HeadlessController::new();
        {
            let window = headless(&controller, 320, 240);
            let moved = window;
            assert!(!moved.should_close());
            assert_eq!(controller.stats().released(), 0);
        }
        assert_eq!(controller.stats().created(), 1);
        assert_eq!(controller.stats().released(), 1);
    }

    #[test]
    fn test_native_window_released_on_early_exit() {
        fn open_then_fail(controller: &HeadlessController) -> Result<(), SurfaceError> {
            let mut window = headless(controller, 320, 240);
            window.create_surface(vk::Instance::from_raw(7))?;
            Ok(())
        }

        let controller = HeadlessController::new();
        assert!(open_then_fail(&controller).is_err());
        assert_eq!(controller.stats().created(), 1);
        assert_eq!(controller.stats().released(), 1);
    }

    #[test]
    fn test_create_surface() {
        let controller = HeadlessController::new();
        controller.set_surfaces_supported(true);
        let mut window = headless(&controller, 800, 600);
        let instance = vk::Instance::from_raw(0x1000);

        let surface = window.create_surface(instance).unwrap();
        assert_ne!(surface, vk::SurfaceKHR::null());

        assert_eq!(window.create_surface(instance), Err(SurfaceError::AlreadyCreated));

        let other = vk::Instance::from_raw(0x2000);
        assert!(window.create_surface(other).is_ok());
    }

    #[test]
    fn test_create_surface_errors() {
        let controller = HeadlessController::new();
        let mut window = headless(&controller, 800, 600);

        assert_eq!(
            window.create_surface(vk::Instance::null()),
            Err(SurfaceError::NullInstance)
        );

        let instance = vk::Instance::from_raw(0x1000);
        assert_eq!(
            window.create_surface(instance),
            Err(SurfaceError::CreationFailed(vk::Result::ERROR_EXTENSION_NOT_PRESENT))
        );

        // A failed attempt does not count as a created surface
        controller.set_surfaces_supported(true);
        assert!(window.create_surface(instance).is_ok());
    }
}
