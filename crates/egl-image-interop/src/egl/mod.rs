//! EGL implementation (`EGL_KHR_image_base` + `GL_OES_EGL_image`).

mod functions;
pub mod image;
pub mod pbuffer;

pub use image::EglImageApi;
pub use pbuffer::{current_share_context, PbufferContext};

use std::sync::Once;

use crate::ffi::eglGetProcAddress;

static GL_INIT_ONCE: Once = Once::new();

/// Load GL function pointers through `eglGetProcAddress`, exactly once.
pub(crate) fn load_gl() {
    GL_INIT_ONCE.call_once(|| {
        gl::load_with(|symbol| match std::ffi::CString::new(symbol) {
            Ok(name) => unsafe { eglGetProcAddress(name.as_ptr()) },
            Err(_) => std::ptr::null(),
        });
    });
}

/// Read and clear the EGL error of the calling thread.
pub(crate) fn egl_error() -> u32 {
    unsafe { crate::ffi::eglGetError() as u32 }
}

/// Read and clear one GL error flag.
pub(crate) fn gl_error() -> u32 {
    unsafe { gl::GetError() }
}
