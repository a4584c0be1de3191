//! Display-less window backend
//!
//! Behaves like a native window whose platform events come from a
//! [`HeadlessController`] instead of a window system. Used for CI runs without
//! a display and for exercising the window state machine in tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use ash::vk::{self, Handle};
use glfw::WindowEvent;

use super::backend::{ResizeHook, WindowBackend};
use super::error::WindowResult;

/// Counts native window acquisitions and releases
#[derive(Debug, Default)]
pub struct BackendStats {
    created: Cell<usize>,
    released: Cell<usize>,
}

impl BackendStats {
    /// Number of windows created
    pub fn created(&self) -> usize {
        self.created.get()
    }

    /// Number of windows released
    pub fn released(&self) -> usize {
        self.released.get()
    }

    /// Windows created but not yet released
    pub fn live(&self) -> usize {
        self.created() - self.released()
    }
}

#[derive(Debug)]
enum PendingEvent {
    Resize(u32, u32),
    Close,
}

#[derive(Debug, Default)]
struct SharedState {
    pending: RefCell<VecDeque<PendingEvent>>,
    surfaces_supported: Cell<bool>,
    next_surface: Cell<u64>,
    stats: BackendStats,
}

/// Injects platform notifications into headless backends
///
/// Cloning the controller shares the same event queue and counters.
#[derive(Debug, Clone, Default)]
pub struct HeadlessController {
    shared: Rc<SharedState>,
}

impl HeadlessController {
    /// Create a controller whose backends refuse surface creation
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a framebuffer resize notification
    pub fn resize(&self, width: u32, height: u32) {
        self.shared
            .pending
            .borrow_mut()
            .push_back(PendingEvent::Resize(width, height));
    }

    /// Queue a close request, as if the user clicked the close button
    pub fn request_close(&self) {
        self.shared.pending.borrow_mut().push_back(PendingEvent::Close);
    }

    /// Whether surface creation returns synthetic handles instead of failing
    pub fn set_surfaces_supported(&self, supported: bool) {
        self.shared.surfaces_supported.set(supported);
    }

    /// Creation/release counters for every backend built from this controller
    pub fn stats(&self) -> &BackendStats {
        &self.shared.stats
    }

    /// Build a backend bound to this controller
    pub fn backend(&self, width: u32, height: u32) -> HeadlessBackend {
        HeadlessBackend::new(self.clone(), width, height)
    }
}

/// Window backend with no native window behind it
pub struct HeadlessBackend {
    controller: HeadlessController,
    framebuffer: (u32, u32),
    should_close: bool,
    clock: f64,
    resize_hook: Option<ResizeHook>,
}

impl HeadlessBackend {
    /// Create a backend of the given size driven by `controller`
    pub fn new(controller: HeadlessController, width: u32, height: u32) -> Self {
        let stats = &controller.shared.stats;
        stats.created.set(stats.created.get() + 1);
        log::debug!("Created headless window ({width}x{height})");

        Self {
            controller,
            framebuffer: (width, height),
            should_close: false,
            clock: 0.0,
            resize_hook: None,
        }
    }
}

impl WindowBackend for HeadlessBackend {
    fn set_resize_hook(&mut self, hook: ResizeHook) {
        self.resize_hook = Some(hook);
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)> {
        let pending: Vec<_> = self.controller.shared.pending.borrow_mut().drain(..).collect();
        let mut events = Vec::with_capacity(pending.len());

        for event in pending {
            self.clock += 1.0 / 60.0;
            match event {
                PendingEvent::Resize(width, height) => {
                    self.framebuffer = (width, height);
                    if let Some(hook) = self.resize_hook.as_mut() {
                        hook(width, height);
                    }
                    events.push((
                        self.clock,
                        WindowEvent::FramebufferSize(
                            i32::try_from(width).unwrap_or(i32::MAX),
                            i32::try_from(height).unwrap_or(i32::MAX),
                        ),
                    ));
                }
                PendingEvent::Close => {
                    self.should_close = true;
                    events.push((self.clock, WindowEvent::Close));
                }
            }
        }

        events
    }

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        Ok(vec!["VK_KHR_surface".to_string()])
    }

    fn create_surface(&mut self, _instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        let shared = &self.controller.shared;
        if !shared.surfaces_supported.get() {
            return Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT);
        }

        let raw = shared.next_surface.get() + 1;
        shared.next_surface.set(raw);
        Ok(vk::SurfaceKHR::from_raw(raw))
    }
}

impl Drop for HeadlessBackend {
    fn drop(&mut self) {
        let stats = &self.controller.shared.stats;
        stats.released.set(stats.released.get() + 1);
        log::debug!("Destroying headless window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_track_create_and_release() {
        let controller = HeadlessController::new();
        {
            let _backend = controller.backend(64, 64);
            assert_eq!(controller.stats().created(), 1);
            assert_eq!(controller.stats().live(), 1);
        }
        assert_eq!(controller.stats().released(), 1);
        assert_eq!(controller.stats().live(), 0);
    }

    #[test]
    fn test_events_are_delivered_on_poll_only() {
        let controller = HeadlessController::new();
        let mut backend = controller.backend(64, 64);

        controller.resize(128, 32);
        controller.request_close();
        assert_eq!(backend.framebuffer, (64, 64));
        assert!(!backend.should_close());

        let events = backend.poll_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].1, WindowEvent::FramebufferSize(128, 32)));
        assert!(matches!(events[1].1, WindowEvent::Close));
        assert_eq!(backend.framebuffer, (128, 32));
        assert!(backend.should_close());

        assert!(backend.poll_events().is_empty());
    }

    #[test]
    fn test_resize_hook_called_per_notification() {
        let controller = HeadlessController::new();
        let mut backend = controller.backend(64, 64);
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        backend.set_resize_hook(Box::new(move |w, h| sink.borrow_mut().push((w, h))));

        controller.resize(10, 20);
        controller.resize(30, 40);
        backend.poll_events();

        assert_eq!(*calls.borrow(), vec![(10, 20), (30, 40)]);
    }

    #[test]
    fn test_surface_creation_requires_support() {
        let controller = HeadlessController::new();
        let mut backend = controller.backend(64, 64);

        assert_eq!(
            backend.create_surface(vk::Instance::null()),
            Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT)
        );

        controller.set_surfaces_supported(true);
        let surface = backend.create_surface(vk::Instance::null()).unwrap();
        assert_ne!(surface, vk::SurfaceKHR::null());
    }
}
