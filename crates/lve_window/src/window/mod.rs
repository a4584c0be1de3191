//! Window management subsystem
//!
//! The window subsystem follows a layered architecture:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Application Code            │
//! └─────────────┬───────────────────┘
//!               │ Uses
//!        ┌──────▼───────┐
//!        │ WindowHandle │ ← Public API (handle.rs)
//!        └──────┬───────┘
//!               │ Owns
//!      ┌────────▼────────┐
//!      │ WindowBackend   │ ← Platform adapter trait (backend.rs)
//!      └────────┬────────┘
//!               │ Implemented by
//!   ┌───────────▼───────────┐
//!   │ GlfwBackend           │ ← Native GLFW window (glfw_backend.rs)
//!   │ HeadlessBackend       │ ← Display-less adapter (headless.rs)
//!   └───────────────────────┘
//! ```
//!
//! The handle never talks to GLFW directly. Everything platform specific,
//! including delivery of framebuffer resize notifications, goes through the
//! backend so the handle's state machine can be driven without a display.

pub mod backend;
pub mod error;
pub mod glfw_backend;
pub mod handle;
pub mod headless;

pub use backend::{ResizeHook, WindowBackend};
pub use error::{SurfaceError, SurfaceResult, WindowError, WindowResult};
pub use glfw_backend::GlfwBackend;
pub use handle::WindowHandle;
pub use headless::{BackendStats, HeadlessBackend, HeadlessController};
