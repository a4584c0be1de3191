//! Platform adapter trait for window backends
//!
//! This module defines the trait every window backend implements. The
//! high-level [`WindowHandle`](super::WindowHandle) owns one backend and
//! forwards to it; applications normally never call these methods directly.
//!
//! A backend owns exactly one native window. It releases that window when it
//! is dropped, so ownership of the backend is ownership of the window.

use ash::vk;
use glfw::WindowEvent;

use super::error::WindowResult;

/// Callback invoked by a backend with the new framebuffer size whenever the
/// platform reports a resize.
pub type ResizeHook = Box<dyn FnMut(u32, u32)>;

/// Interface every platform window adapter implements
///
/// # Design Philosophy
/// - **Single Owner**: a backend value is the native window; dropping it is
///   the one and only release point
/// - **Injected Notifications**: platform callbacks are not hard-wired into
///   the handle. The handle installs a [`ResizeHook`] and the backend decides
///   how platform resize events reach it
/// - **Swappable**: the GLFW backend drives a real window, the headless
///   backend drives the same state machine from injected events
/// - **Errors, Not Aborts**: platform failures come back as `Result`s and
///   must never unwind through the windowing library's C callbacks
///
/// # Thread Safety
/// No `Send` bound: GLFW requires window and event queue access from the
/// main thread. All methods must be called on the thread that created the
/// backend.
pub trait WindowBackend {
    /// Install the resize hook, replacing any previously installed one
    ///
    /// The backend must invoke the hook exactly once per framebuffer resize
    /// notification, and only from within [`WindowBackend::poll_events`], so
    /// the handle's resize flag changes at a predictable point in the frame.
    /// A minimised window is reported as `0x0`.
    fn set_resize_hook(&mut self, hook: ResizeHook);

    /// Whether the platform has a pending close request for this window
    ///
    /// Returns true once the user has asked to close the window (close
    /// button, Alt+F4, window manager) or the application requested it via
    /// [`WindowBackend::set_should_close`]. Querying has no side effect.
    fn should_close(&self) -> bool;

    /// Set or clear the close request
    ///
    /// Closing is only ever requested, never enforced: the window stays live
    /// until the backend is dropped.
    fn set_should_close(&mut self, should_close: bool);

    /// Pump the platform event queue
    ///
    /// Processes pending window system events and returns them in arrival
    /// order, each with its timestamp in seconds. Resize notifications are
    /// routed through the resize hook before the events are handed back, so
    /// by the time the caller sees a `FramebufferSize` event the handle state
    /// already reflects it. Call once per frame.
    fn poll_events(&mut self) -> Vec<(f64, WindowEvent)>;

    /// Vulkan instance extensions the platform needs to create surfaces
    ///
    /// These must be enabled on any instance later passed to
    /// [`WindowBackend::create_surface`].
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Create a surface for this window on `instance`
    ///
    /// Registers platform state for the surface and hands ownership of the
    /// `VkSurfaceKHR` to the caller, who destroys it before the instance.
    /// Callers guarantee this is invoked at most once per instance; the
    /// handle enforces that before reaching the backend.
    fn create_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result>;
}
