//! Loads this crate's own shared library and drives it through the
//! exported C symbols, the same way a host application would.

#![allow(unsafe_code)]

use std::ffi::{c_float, c_int, c_uint};
use std::path::PathBuf;

use lve_window::prelude::*;

type FnUpdateRenderPreview = unsafe extern "C" fn(c_uint, c_uint, *mut c_float, usize) -> c_int;

/// Locate the cdylib cargo builds next to the test binary
fn built_library() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    let file_name = libloading::library_filename("lve_window");
    let found = [Some(deps), deps.parent()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file());
    found
}

#[test]
fn test_shared_library_fills_preview() {
    let Some(path) = built_library() else {
        eprintln!("lve_window shared library not found next to test binary, skipping");
        return;
    };

    let renderer = ExternalRenderer::load(&path).unwrap();
    assert_eq!(renderer.name().unwrap(), "lve constant preview");

    let mut pixels = vec![0.0_f32; 6];
    let mut buffer = PreviewBuffer::new(3, 2, &mut pixels).unwrap();
    renderer.update_render_preview(&mut buffer).unwrap();

    assert!(pixels.iter().all(|&p| approx::relative_eq!(p, 1.0)));
}

#[test]
fn test_shared_library_reports_short_buffer() {
    let Some(path) = built_library() else {
        eprintln!("lve_window shared library not found next to test binary, skipping");
        return;
    };

    let library = unsafe { libloading::Library::new(&path) }.unwrap();
    let update = unsafe { library.get::<FnUpdateRenderPreview>(b"update_render_preview\0") }.unwrap();

    let mut pixels = vec![0.0_f32; 5];
    let code = unsafe { update(3, 2, pixels.as_mut_ptr(), pixels.len()) };

    assert_eq!(PreviewStatus::from_code(code), Some(PreviewStatus::BufferTooSmall));
    assert!(pixels.iter().all(|&p| p == 0.0), "short buffer must not be written");

    let code = unsafe { update(3, 2, std::ptr::null_mut(), 6) };
    assert_eq!(PreviewStatus::from_code(code), Some(PreviewStatus::NullPointer));
}
