//! Window and surface errors

use ash::vk;
use thiserror::Error;

/// Window creation and platform errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// Width or height was zero
    #[error("Invalid window extent {width}x{height}: both dimensions must be positive")]
    InvalidExtent {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Display name was empty
    #[error("Window title must not be empty")]
    EmptyTitle,

    /// The windowing library could not be initialised (no display, missing driver)
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The platform refused to allocate a window
    #[error("Window creation failed: {0}")]
    CreationFailed(String),

    /// Any other error reported by the windowing library
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Errors raised while binding a drawing surface to a window
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The supplied instance handle was null
    #[error("Cannot create a surface for a null Vulkan instance")]
    NullInstance,

    /// A surface was already created for this window and instance
    #[error("A surface already exists for this window and instance")]
    AlreadyCreated,

    /// The platform or graphics backend refused to create the surface
    #[error("Failed to create Vulkan surface: {0:?}")]
    CreationFailed(vk::Result),
}

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;
