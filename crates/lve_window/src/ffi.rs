//! C ABI for the render preview
//!
//! Exports the preview stub so hosts written in any language can load this
//! crate's `cdylib` and call it. Only fixed-width scalars and a raw
//! pointer/length pair cross the boundary; the memory is wrapped in a
//! [`PreviewBuffer`] before anything is written.
//!
//! The matching C declarations live in `include/lve_preview.h`.

#![allow(unsafe_code)]

use std::ffi::{c_char, c_float, c_int, c_uint, CStr};

use crate::preview::{self, PreviewBuffer, PreviewError};

/// Name reported by [`preview_renderer_name`]
pub const RENDERER_NAME: &CStr = c"lve constant preview";

/// Status codes returned across the C boundary
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// The buffer was filled
    Ok = 0,
    /// `rgb_data` was null while pixels were requested
    NullPointer = 1,
    /// `rgb_len` was smaller than `image_width * image_height`
    BufferTooSmall = 2,
    /// `image_width * image_height` overflowed
    SizeOverflow = 3,
}

impl PreviewStatus {
    /// Decode a raw status code
    pub const fn from_code(code: c_int) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::NullPointer),
            2 => Some(Self::BufferTooSmall),
            3 => Some(Self::SizeOverflow),
            _ => None,
        }
    }

    /// Raw status code
    pub const fn code(self) -> c_int {
        self as c_int
    }
}

impl From<PreviewError> for PreviewStatus {
    fn from(error: PreviewError) -> Self {
        match error {
            PreviewError::BufferTooSmall { .. } => Self::BufferTooSmall,
            PreviewError::SizeOverflow { .. } => Self::SizeOverflow,
        }
    }
}

/// Fill `rgb_data` with the constant preview image
///
/// Writes `1.0` to the first `image_width * image_height` samples, row-major.
/// Returns a [`PreviewStatus`] code; nothing is written unless it is `0`.
///
/// # Safety
/// When `rgb_data` is non-null it must point to `rgb_len` writable,
/// initialised `float`s that nothing else accesses for the duration of the
/// call.
#[no_mangle]
pub unsafe extern "C" fn update_render_preview(
    image_width: c_uint,
    image_height: c_uint,
    rgb_data: *mut c_float,
    rgb_len: usize,
) -> c_int {
    let status = if rgb_data.is_null() {
        match preview::required_len(image_width, image_height) {
            Ok(0) => PreviewStatus::Ok,
            Ok(_) => PreviewStatus::NullPointer,
            Err(e) => e.into(),
        }
    } else {
        // SAFETY: non-null, and the caller guarantees `rgb_len` valid samples
        let data = unsafe { std::slice::from_raw_parts_mut(rgb_data, rgb_len) };
        match PreviewBuffer::new(image_width, image_height, data) {
            Ok(mut buffer) => {
                preview::fill_preview(&mut buffer);
                PreviewStatus::Ok
            }
            Err(e) => e.into(),
        }
    };

    if status != PreviewStatus::Ok {
        log::warn!("update_render_preview({image_width}, {image_height}, len {rgb_len}) failed: {status:?}");
    }
    status.code()
}

/// NUL-terminated, statically allocated name of this renderer
#[no_mangle]
pub extern "C" fn preview_renderer_name() -> *const c_char {
    RENDERER_NAME.as_ptr()
}
