//! Host side of the preview interop boundary
//!
//! Loads a shared library that exports the symbols declared in
//! `include/lve_preview.h` and drives it with bounds-checked buffers.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_float, c_int, c_uint, CStr, OsStr};
use std::path::PathBuf;

use thiserror::Error;

use crate::ffi::PreviewStatus;
use crate::preview::PreviewBuffer;

type FnRendererName = unsafe extern "C" fn() -> *const c_char;
type FnUpdateRenderPreview = unsafe extern "C" fn(c_uint, c_uint, *mut c_float, usize) -> c_int;

const NAME_SYMBOL: &[u8] = b"preview_renderer_name\0";
const UPDATE_SYMBOL: &[u8] = b"update_render_preview\0";

/// Errors from loading or calling an external renderer
#[derive(Error, Debug)]
pub enum PluginError {
    /// The shared library could not be opened
    #[error("Failed to load renderer library {path}: {source}")]
    Load {
        /// Library path
        path: PathBuf,
        /// Loader error
        source: libloading::Error,
    },

    /// A required symbol is missing
    #[error("Renderer library does not export `{symbol}`: {source}")]
    Symbol {
        /// Symbol name
        symbol: &'static str,
        /// Loader error
        source: libloading::Error,
    },

    /// The renderer returned a failure status
    #[error("Renderer reported {0:?}")]
    Renderer(PreviewStatus),

    /// The renderer returned a status code outside the protocol
    #[error("Renderer returned unknown status code {0}")]
    UnknownStatus(c_int),

    /// The renderer name was null or not UTF-8
    #[error("Renderer name is null or not valid UTF-8")]
    InvalidName,
}

/// A preview renderer living in a separately compiled shared library
pub struct ExternalRenderer {
    library: libloading::Library,
    path: PathBuf,
}

impl ExternalRenderer {
    /// Open the library at `path`
    ///
    /// Running the library's initialisers is inherently trusted; only load
    /// renderers you built or vetted.
    pub fn load(path: impl AsRef<OsStr>) -> Result<Self, PluginError> {
        let path = PathBuf::from(path.as_ref());
        // SAFETY: loading runs foreign initialisers; the library is trusted by the caller
        let library = unsafe { libloading::Library::new(&path) }.map_err(|source| PluginError::Load {
            path: path.clone(),
            source,
        })?;

        log::info!("Loaded preview renderer from {}", path.display());
        Ok(Self { library, path })
    }

    /// Name the renderer reports for itself
    pub fn name(&self) -> Result<String, PluginError> {
        // SAFETY: the symbol type matches the exported C declaration
        let symbol = unsafe { self.library.get::<FnRendererName>(NAME_SYMBOL) }.map_err(|source| {
            PluginError::Symbol {
                symbol: "preview_renderer_name",
                source,
            }
        })?;

        // SAFETY: the protocol requires a static NUL-terminated string or null
        unsafe { name_from_ptr(symbol()) }
    }

    /// Ask the renderer to write a preview into `buffer`
    pub fn update_render_preview(&self, buffer: &mut PreviewBuffer<'_>) -> Result<(), PluginError> {
        // SAFETY: the symbol type matches the exported C declaration
        let symbol = unsafe { self.library.get::<FnUpdateRenderPreview>(UPDATE_SYMBOL) }.map_err(
            |source| PluginError::Symbol {
                symbol: "update_render_preview",
                source,
            },
        )?;

        let (width, height, len) = (buffer.width(), buffer.height(), buffer.len());
        // SAFETY: the pointer and length come from a live, exclusively borrowed slice
        let code = unsafe { symbol(width, height, buffer.as_mut_ptr(), len) };
        status_to_result(code)
    }
}

/// Map a renderer status code onto a `Result`
fn status_to_result(code: c_int) -> Result<(), PluginError> {
    match PreviewStatus::from_code(code) {
        Some(PreviewStatus::Ok) => Ok(()),
        Some(status) => Err(PluginError::Renderer(status)),
        None => Err(PluginError::UnknownStatus(code)),
    }
}

/// Copy a renderer-reported name out of foreign memory
///
/// # Safety
/// `ptr` is null or points to a NUL-terminated string that stays valid for
/// the duration of the call.
unsafe fn name_from_ptr(ptr: *const c_char) -> Result<String, PluginError> {
    if ptr.is_null() {
        return Err(PluginError::InvalidName);
    }
    let name = unsafe { CStr::from_ptr(ptr) };
    name.to_str()
        .map(str::to_owned)
        .map_err(|_| PluginError::InvalidName)
}

impl std::fmt::Debug for ExternalRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalRenderer").field("path", &self.path).finish()
    }
}
