//! Vulkan surface management
//!
//! Owning wrapper around a window surface for presentation.

#![allow(unsafe_code)]

use ash::{extensions::khr, vk};

use crate::window::{SurfaceResult, WindowHandle};

/// Vulkan surface wrapper with RAII cleanup
///
/// Must be dropped before the instance it was created from.
pub struct Surface {
    loader: khr::Surface,
    surface: vk::SurfaceKHR,
}

impl Surface {
    /// Create a surface for `window` on `instance`
    pub fn new(entry: &ash::Entry, instance: &ash::Instance, window: &mut WindowHandle) -> SurfaceResult<Self> {
        let surface = window.create_surface(instance.handle())?;
        let loader = khr::Surface::new(entry, instance);
        Ok(Self { loader, surface })
    }

    /// Get the underlying surface handle
    pub fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_surface(self.surface, None);
        }
    }
}
