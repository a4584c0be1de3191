//! Minimal Vulkan instance for surface creation

use std::ffi::{CString, NulError};

use ash::{vk, Entry, Instance};
use thiserror::Error;

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Instance setup errors
#[derive(Error, Debug)]
pub enum InstanceError {
    /// The Vulkan loader could not be found
    #[error("Failed to load Vulkan: {0}")]
    Loading(#[from] ash::LoadingError),

    /// A name contained an interior NUL
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NulError),

    /// vkCreateInstance failed
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),
}

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    entry: Entry,
    instance: Instance,
}

impl VulkanInstance {
    /// Create an instance enabling the given window-system extensions
    pub fn new(app_name: &str, extensions: &[String], enable_validation: bool) -> Result<Self, InstanceError> {
        let entry = unsafe { Entry::load() }?;

        let app_name = CString::new(app_name)?;
        let engine_name = CString::new("LVE")?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let extensions = extensions
            .iter()
            .map(|ext| CString::new(ext.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let extension_ptrs: Vec<_> = extensions.iter().map(|ext| ext.as_ptr()).collect();

        let layers = if enable_validation {
            vec![CString::new(VALIDATION_LAYER)?]
        } else {
            Vec::new()
        };
        let layer_ptrs: Vec<_> = layers.iter().map(|layer| layer.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { entry.create_instance(&create_info, None) }.map_err(InstanceError::Api)?;
        log::info!(
            "Created Vulkan instance ({} extensions, validation {})",
            extension_ptrs.len(),
            if enable_validation { "on" } else { "off" }
        );

        Ok(Self { entry, instance })
    }

    /// Vulkan entry point
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Vulkan instance
    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}
